//! Alias resolution against the project's compiler path table
//!
//! This module handles:
//! - Turning a raw components.json into absolute `resolved_paths`
//! - Monorepo-aware re-resolution for aliases that point outside the
//!   current package
//! - Synthesizing a raw config from project probes (used by `glacial init`)

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::config::tsconfig::TsConfig;
use crate::config::{builtin_registries, Config, RawConfig, ResolvedPaths, TailwindConfig};
use crate::error::{GlacialError, Result};
use crate::paths::clean_path;
use crate::project::{self, ProjectInfo, TailwindVersion};

/// Directories skipped while searching for workspace package manifests
const PACKAGE_SEARCH_IGNORE: &[&str] = &["node_modules", "dist", "build", "public"];

/// How deep below the common ancestor we look for package.json files
const PACKAGE_SEARCH_DEPTH: usize = 3;

/// Resolve every logical alias of `raw` to an absolute directory
///
/// The compiler path-mapping file depends on the detected framework, so
/// detection runs first. Failure to load the path-mapping file is fatal for
/// this call.
pub fn resolve_config_paths(cwd: &Path, raw: RawConfig) -> Result<Config> {
    let mut registries = builtin_registries();
    registries.extend(raw.registries.clone());

    let framework = project::detect_framework(cwd);
    let typescript = project::is_typescript_project(cwd);

    let ts_path = project::compiler_config_path(cwd, framework.as_ref(), typescript);
    let ts_config = TsConfig::load(&ts_path)?;

    let resolve = |alias: &str| -> Result<PathBuf> {
        ts_config
            .resolve_import(alias)
            .ok_or_else(|| GlacialError::AliasNotResolved {
                alias: alias.to_string(),
            })
    };

    let utils = resolve(&raw.aliases.utils)?;
    let components = resolve(&raw.aliases.components)?;

    let ui = match &raw.aliases.ui {
        Some(alias) => resolve(alias)?,
        None => components.join("ui"),
    };

    let lib = match &raw.aliases.lib {
        Some(alias) => resolve(alias)?,
        None => utils.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf()),
    };

    let composables = match &raw.aliases.composables {
        Some(alias) => resolve(alias)?,
        None => clean_path(&components.join("..").join("composables")),
    };

    Ok(Config {
        typescript: raw.typescript,
        style: raw.style,
        tailwind: raw.tailwind.clone(),
        icon_library: raw.icon_library,
        aliases: raw.aliases,
        registries,
        resolved_paths: ResolvedPaths {
            cwd: cwd.to_path_buf(),
            tailwind_config: if raw.tailwind.config.is_empty() {
                PathBuf::new()
            } else {
                clean_path(&cwd.join(&raw.tailwind.config))
            },
            tailwind_css: clean_path(&cwd.join(&raw.tailwind.css)),
            utils,
            components,
            ui,
            lib,
            composables,
        },
    })
}

/// Per-alias configs for monorepo installs
///
/// Each declared alias (except `utils`) maps to the config of the package
/// that actually owns its resolved directory.
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    pub members: BTreeMap<String, Config>,
}

impl WorkspaceConfig {
    pub fn member(&self, key: &str) -> Option<&Config> {
        self.members.get(key)
    }
}

/// Re-resolve configs for aliases that live outside the current package
///
/// For every alias whose resolved directory sits under a different
/// enclosing package manifest, load a config rooted there. Returns None if
/// any such package has no loadable configuration.
pub fn workspace_config(config: &Config) -> Result<Option<WorkspaceConfig>> {
    let cwd = &config.resolved_paths.cwd;
    let mut members = BTreeMap::new();

    let keys: [(&str, &Path); 4] = [
        ("components", config.resolved_paths.components.as_path()),
        ("ui", config.resolved_paths.ui.as_path()),
        ("lib", config.resolved_paths.lib.as_path()),
        ("composables", config.resolved_paths.composables.as_path()),
    ];

    for (key, resolved) in keys {
        if config.aliases.for_key(key).is_none() {
            continue;
        }

        let Some(package_root) = find_package_root(cwd, resolved) else {
            members.insert(key.to_string(), config.clone());
            continue;
        };

        match Config::load(&package_root)? {
            Some(member) => {
                members.insert(key.to_string(), member);
            }
            None => return Ok(None),
        }
    }

    Ok(Some(WorkspaceConfig { members }))
}

/// Find the package directory that owns `resolved_path`
///
/// Walks the common ancestor of `cwd` and `resolved_path` for package.json
/// files (bounded depth, dependency and build directories ignored) and
/// picks the first whose directory is a prefix of the alias path.
pub fn find_package_root(cwd: &Path, resolved_path: &Path) -> Option<PathBuf> {
    let common = common_ancestor(cwd, resolved_path);
    let relative = resolved_path.strip_prefix(&common).ok()?;
    let relative = crate::paths::to_forward_slashes(relative);

    let mut package_dirs: Vec<String> = WalkDir::new(&common)
        .max_depth(PACKAGE_SEARCH_DEPTH)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| PACKAGE_SEARCH_IGNORE.contains(&name)))
        })
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == "package.json")
        .filter_map(|entry| {
            let dir = entry.path().parent()?.strip_prefix(&common).ok()?;
            Some(crate::paths::to_forward_slashes(dir))
        })
        .collect();

    package_dirs.sort();

    package_dirs
        .into_iter()
        .filter(|dir| !dir.is_empty() && dir != ".")
        .find(|dir| relative == *dir || relative.starts_with(&format!("{dir}/")))
        .map(|dir| common.join(dir))
}

/// Deepest directory shared by two absolute paths
pub fn common_ancestor(a: &Path, b: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for (ca, cb) in a.components().zip(b.components()) {
        if ca != cb {
            break;
        }
        match ca {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => out.push(ca),
            _ => {}
        }
    }

    out
}

/// Synthesize a raw config from project probes
///
/// Used when no components.json exists yet. Returns None when the project
/// has no Tailwind CSS entry file, or is on v3 without a Tailwind config
/// file.
pub fn synthesize_raw_config(info: &ProjectInfo) -> Option<RawConfig> {
    let css = info.tailwind_css_file.clone()?;

    if info.tailwind_version == Some(TailwindVersion::V3) && info.tailwind_config_file.is_none() {
        return None;
    }

    let prefix = info.alias_prefix.as_deref().unwrap_or("@");

    Some(RawConfig {
        schema: Some("https://glacial-ui.dev/schema.json".to_string()),
        typescript: info.typescript,
        style: "new-york".to_string(),
        tailwind: TailwindConfig {
            config: info.tailwind_config_file.clone().unwrap_or_default(),
            css,
            base_color: "zinc".to_string(),
            css_variables: true,
            prefix: String::new(),
        },
        icon_library: Some("lucide".to_string()),
        aliases: crate::config::Aliases {
            components: format!("{prefix}/components"),
            utils: format!("{prefix}/lib/utils"),
            ui: Some(format!("{prefix}/components/ui")),
            lib: Some(format!("{prefix}/lib")),
            composables: Some(format!("{prefix}/composables")),
        },
        registries: BTreeMap::new(),
    })
}
