//! Destination planning for registry files
//!
//! Precedence, first match wins:
//! 1. a custom output path passed on the command line,
//! 2. the file's explicit `target` override,
//! 3. the type-based default root plus the file's path relative to the
//!    item's common root.
//!
//! A plan of `None` means the file is skipped (used deliberately for page
//! targets on frameworks without a known page convention).

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::Config;
use crate::project::Framework;
use crate::registry::{FileType, RegistryFile};

/// Inputs that vary per file within one registry item
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Deepest directory shared by sibling files of the item
    pub common_root: String,
    /// Detected target framework, used for page-route remapping
    pub framework: Option<Framework>,
    /// Custom output path override from the command line
    pub path: Option<String>,
    /// Position of the file within the item's declared order
    pub file_index: usize,
}

fn file_like() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.[^/\\]+$").expect("valid regex"))
}

fn page_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/page(\.[jt]sx?)$").expect("valid regex"))
}

/// Compute the absolute destination for one registry file
pub fn resolve_file_path(
    file: &RegistryFile,
    config: &Config,
    options: &PlanOptions,
) -> Option<PathBuf> {
    let cwd = &config.resolved_paths.cwd;

    if let Some(custom) = options.path.as_deref() {
        let resolved = if Path::new(custom).is_absolute() {
            PathBuf::from(custom)
        } else {
            cwd.join(custom)
        };

        if file_like().is_match(custom) {
            // A file-looking override only applies to the first file of a
            // multi-file item; later files fall through to normal planning.
            if options.file_index == 0 {
                return Some(resolved);
            }
        } else {
            let file_name = Path::new(&file.path).file_name()?;
            return Some(resolved.join(file_name));
        }
    }

    if let Some(target) = &file.target {
        if let Some(rooted) = target.strip_prefix("~/") {
            return Some(cwd.join(rooted));
        }

        let target = if file.file_type == FileType::Page {
            resolve_page_target(target, options.framework)?
        } else {
            target.clone()
        };

        // The consuming project's own source-directory convention comes in
        // through its resolved alias roots, not the registry's path.
        return Some(cwd.join(target.replacen("src/", "", 1)));
    }

    let target_dir = type_target_directory(file.file_type, config);
    let relative = resolve_nested_file_path(&file.path, &options.common_root);
    Some(target_dir.join(relative))
}

fn type_target_directory(file_type: FileType, config: &Config) -> PathBuf {
    let paths = &config.resolved_paths;
    match file_type {
        FileType::Ui => paths.ui.clone(),
        FileType::Lib => paths.lib.clone(),
        FileType::Block | FileType::Component => paths.components.clone(),
        FileType::Hook | FileType::Composable => paths.composables.clone(),
        _ => paths.components.clone(),
    }
}

/// Remap a page target to the detected framework's route convention
///
/// Nuxt keeps registry page paths as-is; Laravel rewrites `app/` routes into
/// `resources/js/pages/` and collapses the `/page.ext` suffix. Anything else
/// has no known convention and yields None, skipping the file.
pub fn resolve_page_target(target: &str, framework: Option<Framework>) -> Option<String> {
    match framework? {
        Framework::Nuxt3 | Framework::Nuxt4 => Some(target.to_string()),
        Framework::Laravel => {
            let result = if let Some(rest) = target.strip_prefix("app/") {
                format!("resources/js/pages/{rest}")
            } else {
                target.to_string()
            };
            Some(page_suffix().replace(&result, "$1").into_owned())
        }
        _ => None,
    }
}

/// Deepest directory shared by `needle` and its sibling paths
///
/// Falls back to the needle's own parent directory when no sibling shares a
/// prefix. Returns an empty string for root-level files; results carry a
/// leading slash otherwise.
pub fn find_common_root(paths: &[String], needle: &str) -> String {
    let normalized: Vec<&str> = paths.iter().map(|p| p.trim_start_matches('/')).collect();
    let normalized_needle = needle.trim_start_matches('/');

    let segments: Vec<&str> = normalized_needle.split('/').collect();
    if segments.len() < 2 {
        return String::new();
    }
    let dir_segments = &segments[..segments.len() - 1];

    for i in (1..=dir_segments.len()).rev() {
        let test = dir_segments[..i].join("/");
        let has_related = normalized
            .iter()
            .any(|p| *p != normalized_needle && p.starts_with(&format!("{test}/")));
        if has_related {
            return format!("/{test}");
        }
    }

    format!("/{}", dir_segments.join("/"))
}

/// Path of `file_path` relative to the common root, keeping the root's last
/// segment so the item's own folder is preserved at the destination
pub fn resolve_nested_file_path(file_path: &str, common_root: &str) -> String {
    let file = file_path.trim_matches('/');
    let root = common_root.trim_matches('/');

    let last_segment = root.rsplit('/').next().unwrap_or("");

    format!("{}{}", last_segment, file.replacen(root, "", 1))
}

/// Rewrite typed source extensions for JavaScript-only projects
pub fn fix_extension_for_js(path: PathBuf) -> PathBuf {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return path;
    };

    let fixed = if let Some(stem) = name.strip_suffix(".tsx") {
        format!("{stem}.jsx")
    } else if let Some(stem) = name.strip_suffix(".ts") {
        format!("{stem}.js")
    } else {
        return path;
    };

    path.with_file_name(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AliasOverlay, ConfigOverlay, ResolvedPathsOverlay};

    fn test_config() -> Config {
        crate::config::create_config(ConfigOverlay {
            aliases: AliasOverlay {
                components: Some("@/components".to_string()),
                utils: Some("@/lib/utils".to_string()),
                ui: Some("@/components/ui".to_string()),
                ..AliasOverlay::default()
            },
            resolved_paths: ResolvedPathsOverlay {
                cwd: Some(PathBuf::from("/project")),
                components: Some(PathBuf::from("/project/components")),
                ui: Some(PathBuf::from("/project/components/ui")),
                lib: Some(PathBuf::from("/project/lib")),
                composables: Some(PathBuf::from("/project/composables")),
                utils: Some(PathBuf::from("/project/lib/utils")),
                ..ResolvedPathsOverlay::default()
            },
            ..ConfigOverlay::default()
        })
    }

    fn ui_file(path: &str) -> RegistryFile {
        RegistryFile {
            path: path.to_string(),
            content: Some(String::new()),
            file_type: FileType::Ui,
            target: None,
        }
    }

    #[test]
    fn test_type_default_with_common_root() {
        let config = test_config();
        let file = ui_file("ui/button/Button.vue");
        let options = PlanOptions {
            common_root: find_common_root(
                &[
                    "ui/button/Button.vue".to_string(),
                    "ui/button/index.ts".to_string(),
                ],
                "ui/button/Button.vue",
            ),
            ..PlanOptions::default()
        };

        let planned = resolve_file_path(&file, &config, &options).unwrap();
        assert_eq!(
            planned,
            PathBuf::from("/project/components/ui/button/Button.vue")
        );
    }

    #[test]
    fn test_custom_directory_path_flattens() {
        let config = test_config();
        let file = ui_file("ui/button/Button.vue");
        let options = PlanOptions {
            path: Some("./widgets".to_string()),
            file_index: 1,
            ..PlanOptions::default()
        };

        let planned = resolve_file_path(&file, &config, &options).unwrap();
        assert_eq!(planned, PathBuf::from("/project/widgets/Button.vue"));
    }

    #[test]
    fn test_custom_file_path_first_file_only() {
        let config = test_config();
        let file = ui_file("ui/button/Button.vue");

        let first = PlanOptions {
            path: Some("custom/My.vue".to_string()),
            file_index: 0,
            common_root: "/ui/button".to_string(),
            ..PlanOptions::default()
        };
        assert_eq!(
            resolve_file_path(&file, &config, &first).unwrap(),
            PathBuf::from("/project/custom/My.vue")
        );

        // Later files fall through to normal planning.
        let second = PlanOptions {
            path: Some("custom/My.vue".to_string()),
            file_index: 1,
            common_root: "/ui/button".to_string(),
            ..PlanOptions::default()
        };
        assert_eq!(
            resolve_file_path(&file, &config, &second).unwrap(),
            PathBuf::from("/project/components/ui/button/Button.vue")
        );
    }

    #[test]
    fn test_explicit_target_tilde_rooted() {
        let config = test_config();
        let mut file = ui_file("env/.env.example");
        file.target = Some("~/.env".to_string());

        let planned = resolve_file_path(&file, &config, &PlanOptions::default()).unwrap();
        assert_eq!(planned, PathBuf::from("/project/.env"));
    }

    #[test]
    fn test_explicit_target_strips_src_segment() {
        let config = test_config();
        let mut file = ui_file("lib/utils.ts");
        file.target = Some("src/lib/utils.ts".to_string());

        let planned = resolve_file_path(&file, &config, &PlanOptions::default()).unwrap();
        assert_eq!(planned, PathBuf::from("/project/lib/utils.ts"));
    }

    #[test]
    fn test_page_target_unsupported_framework_skips() {
        let config = test_config();
        let mut file = ui_file("pages/dashboard/page.vue");
        file.file_type = FileType::Page;
        file.target = Some("app/dashboard/page.vue".to_string());

        let options = PlanOptions {
            framework: Some(Framework::Vite),
            ..PlanOptions::default()
        };
        assert!(resolve_file_path(&file, &config, &options).is_none());

        let no_framework = PlanOptions::default();
        assert!(resolve_file_path(&file, &config, &no_framework).is_none());
    }

    #[test]
    fn test_page_target_nuxt_kept() {
        let options = resolve_page_target("pages/dashboard.vue", Some(Framework::Nuxt3));
        assert_eq!(options, Some("pages/dashboard.vue".to_string()));
    }

    #[test]
    fn test_page_target_laravel_remapped() {
        let remapped = resolve_page_target("app/dashboard/page.tsx", Some(Framework::Laravel));
        assert_eq!(remapped, Some("resources/js/pages/dashboard.tsx".to_string()));
    }

    #[test]
    fn test_find_common_root_with_siblings() {
        let paths = vec![
            "registry/new-york/ui/button/Button.vue".to_string(),
            "registry/new-york/ui/button/index.ts".to_string(),
        ];
        assert_eq!(
            find_common_root(&paths, "registry/new-york/ui/button/Button.vue"),
            "/registry/new-york/ui/button"
        );
    }

    #[test]
    fn test_find_common_root_single_file_uses_parent() {
        let paths = vec!["ui/card/Card.vue".to_string()];
        assert_eq!(find_common_root(&paths, "ui/card/Card.vue"), "/ui/card");
    }

    #[test]
    fn test_find_common_root_root_level() {
        let paths = vec!["utils.ts".to_string()];
        assert_eq!(find_common_root(&paths, "utils.ts"), "");
    }

    #[test]
    fn test_resolve_nested_file_path() {
        assert_eq!(
            resolve_nested_file_path(
                "registry/new-york-v4/ui/button/Button.vue",
                "registry/new-york-v4/ui/button"
            ),
            "button/Button.vue"
        );
    }

    #[test]
    fn test_resolve_nested_file_path_root_level() {
        assert_eq!(resolve_nested_file_path("utils.ts", ""), "utils.ts");
    }

    #[test]
    fn test_fix_extension_for_js() {
        assert_eq!(
            fix_extension_for_js(PathBuf::from("/p/lib/utils.ts")),
            PathBuf::from("/p/lib/utils.js")
        );
        assert_eq!(
            fix_extension_for_js(PathBuf::from("/p/App.tsx")),
            PathBuf::from("/p/App.jsx")
        );
        assert_eq!(
            fix_extension_for_js(PathBuf::from("/p/Button.vue")),
            PathBuf::from("/p/Button.vue")
        );
    }
}
