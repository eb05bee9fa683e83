//! Read-only project probes
//!
//! This module handles:
//! - Framework detection from config-file basenames and manifest dependencies
//! - TypeScript project detection
//! - Tailwind version, config-file and CSS entry-file detection
//! - Compiler path-alias prefix detection
//!
//! Every probe is best-effort: a probe that finds nothing returns None
//! rather than raising. Probes touch disjoint files and may be called in
//! any order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;
use wax::{Glob, Pattern};

use crate::config::tsconfig::TsConfig;
use crate::paths::to_forward_slashes;

/// Directories never considered by filesystem probes
const PROJECT_SHARED_IGNORE: &[&str] = &["node_modules", ".nuxt", "public", "dist", "build"];

/// Compiler path targets that mark an entry as the project's root alias
const ROOT_ALIAS_TARGETS: &[&str] = &["./*", "./src/*", "./app/*", "./resources/js/*"];

/// Supported target frameworks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    Vite,
    Nuxt3,
    Nuxt4,
    Astro,
    Laravel,
    Inertia,
    Manual,
}

impl Framework {
    pub fn name(&self) -> &'static str {
        match self {
            Framework::Vite => "vite",
            Framework::Nuxt3 => "nuxt3",
            Framework::Nuxt4 => "nuxt4",
            Framework::Astro => "astro",
            Framework::Laravel => "laravel",
            Framework::Inertia => "inertia",
            Framework::Manual => "manual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Framework::Vite => "Vite",
            Framework::Nuxt3 => "Nuxt 3",
            Framework::Nuxt4 => "Nuxt 4",
            Framework::Astro => "Astro",
            Framework::Laravel => "Laravel",
            Framework::Inertia => "Inertia",
            Framework::Manual => "Manual",
        }
    }
}

/// Major Tailwind version in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailwindVersion {
    V3,
    V4,
}

/// Aggregated probe results for one project root
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub framework: Framework,
    pub typescript: bool,
    pub is_src_dir: bool,
    pub tailwind_config_file: Option<String>,
    pub tailwind_css_file: Option<String>,
    pub tailwind_version: Option<TailwindVersion>,
    pub alias_prefix: Option<String>,
}

/// Parsed package.json, reduced to dependency tables
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageInfo {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageInfo {
    /// Look up a dependency range, checking prod then dev tables
    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.dependencies
            .get(name)
            .or_else(|| self.dev_dependencies.get(name))
            .map(String::as_str)
    }
}

/// Read and parse package.json at `cwd`, if present and well-formed
pub fn package_info(cwd: &Path) -> Option<PackageInfo> {
    let raw = std::fs::read_to_string(cwd.join("package.json")).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Run every probe and aggregate the results
pub fn project_info(cwd: &Path) -> ProjectInfo {
    ProjectInfo {
        framework: detect_framework(cwd).unwrap_or(Framework::Manual),
        typescript: is_typescript_project(cwd),
        is_src_dir: cwd.join("src").is_dir(),
        tailwind_config_file: tailwind_config_file(cwd),
        tailwind_css_file: tailwind_css_file(cwd),
        tailwind_version: tailwind_version(cwd),
        alias_prefix: ts_config_alias_prefix(cwd),
    }
}

/// Detect the framework from config-file basenames and manifest dependencies
///
/// Precedence: nuxt (major from the manifest) > astro > laravel > inertia >
/// wxt/vite. Returns None when nothing matches; callers fall back to
/// [`Framework::Manual`].
pub fn detect_framework(cwd: &Path) -> Option<Framework> {
    let pkg = package_info(cwd);
    let mut config_files = glob_files(cwd, "**/{nuxt,vite,astro,wxt}.config.*", 3);
    config_files.extend(glob_files(cwd, "**/composer.json", 3));

    if config_files.iter().any(|f| f.starts_with("nuxt.config.")) {
        let range = pkg.as_ref().and_then(|p| p.dependency("nuxt"));
        let major = range.and_then(range_major).unwrap_or(4);

        return match major {
            4 => Some(Framework::Nuxt4),
            3 => Some(Framework::Nuxt3),
            _ => None,
        };
    }

    if config_files.iter().any(|f| f.starts_with("astro.config.")) {
        return Some(Framework::Astro);
    }

    if config_files.iter().any(|f| f.starts_with("composer.json")) {
        return Some(Framework::Laravel);
    }

    let has_inertia = pkg
        .as_ref()
        .and_then(|p| p.dependency("@inertiajs/vue3"))
        .is_some()
        || cwd.join("resources/js").is_dir();
    if has_inertia {
        return Some(Framework::Inertia);
    }

    if config_files
        .iter()
        .any(|f| f.starts_with("wxt.config.") || f.starts_with("vite.config."))
    {
        return Some(Framework::Vite);
    }

    None
}

/// A project is a TypeScript project when a tsconfig.* sits at its root
pub fn is_typescript_project(cwd: &Path) -> bool {
    !glob_files(cwd, "tsconfig.*", 1).is_empty()
}

/// Infer the Tailwind major version
///
/// A components.json with an empty `tailwind.config` is taken as v4. That
/// is an assumption, not a confirmed signal: v4 projects simply have no
/// config file to point at. Otherwise the manifest dependency range
/// decides.
pub fn tailwind_version(cwd: &Path) -> Option<TailwindVersion> {
    if let Ok(Some(raw)) = crate::config::load_raw_config(cwd) {
        if raw.tailwind.config.is_empty() {
            return Some(TailwindVersion::V4);
        }
    }

    let pkg = package_info(cwd)?;
    let has_nuxt_tailwind = pkg.dependency("@nuxtjs/tailwindcss").is_some();
    let tailwind_range = pkg.dependency("tailwindcss");

    if tailwind_range.is_none() && !has_nuxt_tailwind {
        return None;
    }

    let v3 = regex::Regex::new(r"^(\^|~)?3(\.\d+)*(-.*)?$").expect("valid regex");
    if v3.is_match(tailwind_range.unwrap_or("")) {
        return Some(TailwindVersion::V3);
    }

    Some(TailwindVersion::V4)
}

/// Find the Tailwind CSS entry file: the first stylesheet carrying an
/// `@import "tailwindcss"` or `@tailwind base` directive
pub fn tailwind_css_file(cwd: &Path) -> Option<String> {
    let files = glob_files(cwd, "**/*.{css,scss}", 5);

    for file in files {
        let Ok(contents) = std::fs::read_to_string(cwd.join(&file)) else {
            continue;
        };
        if contents.contains("@import \"tailwindcss\"")
            || contents.contains("@import 'tailwindcss'")
            || contents.contains("@tailwind base")
        {
            return Some(file);
        }
    }

    None
}

/// Find a tailwind.config.* file near the project root
pub fn tailwind_config_file(cwd: &Path) -> Option<String> {
    glob_files(cwd, "**/tailwind.config.*", 3).into_iter().next()
}

/// Detect the project's primary path-alias prefix
///
/// The first compiler `paths` entry whose targets include a known root
/// pattern wins; Nuxt's generated `#build` alias is special-cased to `@`.
/// Falls back to the first entry's key.
pub fn ts_config_alias_prefix(cwd: &Path) -> Option<String> {
    let framework = detect_framework(cwd);
    let typescript = is_typescript_project(cwd);
    let config_path = compiler_config_path(cwd, framework.as_ref(), typescript);

    let ts_config = TsConfig::load(&config_path).ok()?;
    if ts_config.paths.is_empty() {
        return None;
    }

    for (pattern, targets) in &ts_config.paths {
        if targets.iter().any(|t| ROOT_ALIAS_TARGETS.contains(&t.as_str())) {
            let alias = pattern.strip_suffix("/*").unwrap_or(pattern);
            return Some(if alias == "#build" {
                "@".to_string()
            } else {
                alias.to_string()
            });
        }
    }

    ts_config
        .paths
        .first()
        .map(|(pattern, _)| pattern.strip_suffix("/*").unwrap_or(pattern).to_string())
}

/// Where the framework publishes its compiler path-mapping file
///
/// Nuxt generates tsconfigs under `.nuxt/`, Laravel/Inertia under
/// `inertia/`; everything else keeps tsconfig.json (or jsconfig.json for
/// plain JavaScript projects) at the root.
pub fn compiler_config_path(cwd: &Path, framework: Option<&Framework>, typescript: bool) -> PathBuf {
    let relative = match framework {
        Some(Framework::Nuxt4) => ".nuxt/tsconfig.app.json",
        Some(Framework::Nuxt3) => ".nuxt/tsconfig.json",
        Some(Framework::Inertia) => "inertia/tsconfig.json",
        _ if typescript => "tsconfig.json",
        _ => "jsconfig.json",
    };

    cwd.join(relative)
}

/// Major version of a dependency range like `^3.4.1` or `~4.0.0-beta.1`
fn range_major(range: &str) -> Option<u64> {
    let digits: String = range
        .trim_start_matches(['^', '~', '>', '<', '=', 'v', ' '])
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Relative paths under `cwd` matching `pattern`, bounded to `max_depth`
///
/// Ignored directory names are pruned from the walk. Results are sorted for
/// deterministic precedence checks.
fn glob_files(cwd: &Path, pattern: &str, max_depth: usize) -> Vec<String> {
    let Ok(glob) = Glob::new(pattern) else {
        return Vec::new();
    };

    let mut matches: Vec<String> = WalkDir::new(cwd)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| PROJECT_SHARED_IGNORE.contains(&name)))
        })
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(cwd).ok()?;
            let relative = to_forward_slashes(relative);
            glob.is_match(relative.as_str()).then_some(relative)
        })
        .collect();

    matches.sort();
    matches
}
