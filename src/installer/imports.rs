//! Post-write import-alias resolution
//!
//! After an item's files land on disk, their import specifiers are matched
//! against the set of just-installed files plus the real filesystem and
//! rewritten into the project's own alias scheme. Matching is a documented
//! heuristic: the extension try-order below is the tie-break, visible and
//! overridable for callers that need a different priority.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::tsconfig::TsConfig;
use crate::config::Config;
use crate::error::{GlacialError, Result};
use crate::paths::{clean_path, to_forward_slashes};
use crate::project::{self, ProjectInfo};
use crate::transform::imports::import_specifier_sites;
use crate::ui::Reporter;

/// Extension try-order for probable-path matching
pub const MODULE_RESOLUTION_EXTENSIONS: &[&str] = &[".vue", ".ts", ".js", ".tsx", ".jsx", ".css"];

/// Extensions stripped from aliased specifiers; anything else (stylesheets,
/// data files) keeps its extension
const CODE_EXTENSIONS: &[&str] = &[".vue", ".ts", ".tsx", ".js", ".jsx"];

/// Rewrite imports of the installed files to the project's alias scheme
///
/// Returns the project-relative paths of files whose content changed. A
/// failure while rewriting one file is reported as a warning and leaves
/// that file's earlier write standing.
pub fn resolve_imports(
    installed: &[String],
    config: &Config,
    reporter: &Reporter,
) -> Result<Vec<String>> {
    let cwd = &config.resolved_paths.cwd;
    let info = project::project_info(cwd);

    let ts_path = project::compiler_config_path(cwd, Some(&info.framework), info.typescript);
    let Ok(ts_config) = TsConfig::load(&ts_path) else {
        return Ok(Vec::new());
    };

    let mut updated = Vec::new();

    for relative in installed {
        let absolute = cwd.join(relative);
        if !absolute.exists() {
            continue;
        }

        match rewrite_file_imports(&absolute, installed, config, &info, &ts_config) {
            Ok(true) => updated.push(relative.clone()),
            Ok(false) => {}
            Err(e) => {
                reporter.warn(&format!("Failed to resolve imports in {relative}: {e}"));
            }
        }
    }

    Ok(updated)
}

fn rewrite_file_imports(
    absolute: &Path,
    installed: &[String],
    config: &Config,
    info: &ProjectInfo,
    ts_config: &TsConfig,
) -> Result<bool> {
    let content = std::fs::read_to_string(absolute).map_err(|e| GlacialError::read(absolute, e))?;

    let mut edits: Vec<(std::ops::Range<usize>, String)> = Vec::new();

    for (range, spec) in import_specifier_sites(&content) {
        // Only specifiers local to the project are candidates.
        if let Some(prefix) = &info.alias_prefix {
            if !spec.starts_with(&format!("{prefix}/")) {
                continue;
            }
        }

        let Some(probable) = ts_config.resolve_import(&spec) else {
            continue;
        };

        let Some(matched) =
            resolve_module_by_probable_path(&probable, installed, config, MODULE_RESOLUTION_EXTENSIONS)
        else {
            continue;
        };

        let Some(aliased) = to_aliased_import(&matched, config, info) else {
            continue;
        };

        if aliased != spec {
            edits.push((range, aliased));
        }
    }

    if edits.is_empty() {
        return Ok(false);
    }

    let mut out = content;
    for (range, replacement) in edits.into_iter().rev() {
        out.replace_range(range, &replacement);
    }

    std::fs::write(absolute, out).map_err(|e| GlacialError::write(absolute, e))?;
    Ok(true)
}

/// Match a probable absolute import path against installed files and disk
///
/// Tries the specifier's own extension first (when present), otherwise each
/// entry of `extensions` in order, in both direct and `index.<ext>` forms,
/// plus a basename scan across the installed files. Candidates are ranked
/// by extension priority, then by whether they sit under the probable
/// path's own directory.
pub fn resolve_module_by_probable_path(
    probable: &Path,
    installed: &[String],
    config: &Config,
    extensions: &[&str],
) -> Option<String> {
    let cwd = clean_path(&config.resolved_paths.cwd);

    let file_set: BTreeSet<&str> = installed.iter().map(String::as_str).collect();

    let probable_str = to_forward_slashes(probable);
    let ext_in_path = Path::new(&probable_str)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()));

    let base = match &ext_in_path {
        Some(ext) => probable_str[..probable_str.len() - ext.len()].to_string(),
        None => probable_str.clone(),
    };

    let rel_base = Path::new(&base)
        .strip_prefix(&cwd)
        .map(to_forward_slashes)
        .unwrap_or_default();

    let owned_ext: Vec<&str> = ext_in_path.as_deref().into_iter().collect();
    let try_exts: &[&str] = if ext_in_path.is_some() {
        &owned_ext
    } else {
        extensions
    };

    let mut candidates: BTreeSet<String> = BTreeSet::new();

    for ext in try_exts {
        for absolute in [
            PathBuf::from(format!("{base}{ext}")),
            Path::new(&base).join(format!("index{ext}")),
        ] {
            let Ok(relative) = absolute.strip_prefix(&cwd) else {
                continue;
            };
            let relative = to_forward_slashes(relative);
            if file_set.contains(relative.as_str()) || absolute.exists() {
                candidates.insert(relative);
            }
        }
    }

    // Fallback: basename scan across everything we just installed.
    let name = Path::new(&base)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if !name.is_empty() {
        for file in installed {
            if try_exts.iter().any(|ext| file.ends_with(&format!("/{name}{ext}"))) {
                candidates.insert(file.clone());
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let ext_rank = |candidate: &str| {
        let ext = Path::new(candidate)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        try_exts
            .iter()
            .position(|e| *e == ext)
            .unwrap_or(try_exts.len())
    };
    let strong_rank =
        |candidate: &str| usize::from(rel_base.is_empty() || !candidate.starts_with(&rel_base));

    let mut sorted: Vec<String> = candidates.into_iter().collect();
    sorted.sort_by_key(|c| (ext_rank(c), strong_rank(c)));

    sorted.into_iter().next()
}

/// Convert a project-relative file path to its aliased import form
///
/// The longest `resolved_paths` root that prefixes the file wins; the
/// remainder is stripped of code extensions, a trailing `/index` collapses,
/// and a leading `src` segment disappears (the alias covers it).
pub fn to_aliased_import(file_path: &str, config: &Config, info: &ProjectInfo) -> Option<String> {
    let absolute = clean_path(&config.resolved_paths.cwd.join(file_path));

    let mut matches: Vec<(&str, &Path)> = config
        .resolved_paths
        .entries()
        .into_iter()
        .filter(|(_, root)| !root.as_os_str().is_empty() && absolute.starts_with(root))
        .collect();
    matches.sort_by_key(|(_, root)| std::cmp::Reverse(root.as_os_str().len()));

    let (alias_key, root) = matches.into_iter().next()?;

    let remainder = absolute.strip_prefix(root).ok()?;
    let remainder = to_forward_slashes(remainder);

    let ext = Path::new(&remainder)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let keep_ext = if CODE_EXTENSIONS.contains(&ext.as_str()) {
        ""
    } else {
        ext.as_str()
    };

    let mut without_ext = remainder[..remainder.len() - ext.len()].to_string();
    if let Some(collapsed) = without_ext.strip_suffix("/index") {
        without_ext = collapsed.to_string();
    }

    let alias_base = if alias_key == "cwd" {
        info.alias_prefix.clone()?
    } else {
        config.aliases.for_key(alias_key)?.to_string()
    };

    let mut suffix = if without_ext.is_empty() {
        String::new()
    } else {
        format!("/{without_ext}")
    };

    // The alias already accounts for the source directory.
    if suffix == "/src" {
        suffix.clear();
    } else if let Some(rest) = suffix.strip_prefix("/src/") {
        suffix = format!("/{rest}");
    }

    Some(format!("{alias_base}{suffix}{keep_ext}"))
}
