//! Project configuration (components.json)
//!
//! This module handles:
//! - The raw configuration schema and its defaults
//! - Loading and validating components.json
//! - Built-in registry names and the user-registry collision check
//! - A typed overlay builder for contexts that bypass framework detection
//!
//! Alias resolution against the compiler path table lives in [`resolve`];
//! tsconfig loading lives in [`tsconfig`].

pub mod resolve;
pub mod tsconfig;

pub use resolve::{resolve_config_paths, workspace_config, WorkspaceConfig};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GlacialError, Result};

pub const CONFIG_FILE_NAME: &str = "components.json";
pub const DEFAULT_STYLE: &str = "default";

/// Registries shipped with the tool; user configuration cannot override
/// these names
pub fn builtin_registries() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "@glacial".to_string(),
        "https://registry.glacial-ui.dev/{name}.json".to_string(),
    )])
}

/// Tailwind section of components.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TailwindConfig {
    #[serde(default)]
    pub config: String,
    #[serde(default)]
    pub css: String,
    #[serde(default, rename = "baseColor")]
    pub base_color: String,
    #[serde(default, rename = "cssVariables")]
    pub css_variables: bool,
    #[serde(default)]
    pub prefix: String,
}

/// Logical alias section of components.json
///
/// `components` and `utils` are required; the rest have resolution
/// fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aliases {
    pub components: String,
    pub utils: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composables: Option<String>,
}

impl Aliases {
    /// Look up an alias string by its resolved-paths key
    pub fn for_key(&self, key: &str) -> Option<&str> {
        match key {
            "components" => Some(self.components.as_str()),
            "utils" => Some(self.utils.as_str()),
            "ui" => self.ui.as_deref(),
            "lib" => self.lib.as_deref(),
            "composables" => self.composables.as_deref(),
            _ => None,
        }
    }
}

/// components.json as written by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default = "default_true")]
    pub typescript: bool,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub tailwind: TailwindConfig,
    #[serde(rename = "iconLibrary", default, skip_serializing_if = "Option::is_none")]
    pub icon_library: Option<String>,
    pub aliases: Aliases,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub registries: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

/// Absolute directories every alias resolves to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPaths {
    pub cwd: PathBuf,
    pub tailwind_config: PathBuf,
    pub tailwind_css: PathBuf,
    pub utils: PathBuf,
    pub components: PathBuf,
    pub ui: PathBuf,
    pub lib: PathBuf,
    pub composables: PathBuf,
}

impl ResolvedPaths {
    /// Alias roots in a stable order, keyed the way [`Aliases::for_key`]
    /// expects. `cwd` is included so files outside any alias still get a
    /// project-root alias form.
    pub fn entries(&self) -> [(&'static str, &Path); 6] {
        [
            ("cwd", self.cwd.as_path()),
            ("utils", self.utils.as_path()),
            ("components", self.components.as_path()),
            ("ui", self.ui.as_path()),
            ("lib", self.lib.as_path()),
            ("composables", self.composables.as_path()),
        ]
    }
}

/// Fully resolved project configuration, one per command invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub typescript: bool,
    pub style: String,
    pub tailwind: TailwindConfig,
    pub icon_library: Option<String>,
    pub aliases: Aliases,
    pub registries: BTreeMap<String, String>,
    pub resolved_paths: ResolvedPaths,
}

impl Config {
    /// Load and resolve the configuration for `cwd`
    ///
    /// Returns `Ok(None)` when no components.json exists. A malformed file
    /// or a user registry colliding with a built-in name is fatal.
    pub fn load(cwd: &Path) -> Result<Option<Config>> {
        let Some(mut raw) = load_raw_config(cwd)? else {
            return Ok(None);
        };

        // Default icon library follows the style.
        if raw.icon_library.is_none() {
            raw.icon_library = Some(if raw.style == "new-york" {
                "radix".to_string()
            } else {
                "lucide".to_string()
            });
        }

        resolve_config_paths(cwd, raw).map(Some)
    }
}

/// Read components.json without resolving paths
///
/// Also used by the Tailwind version probe, which only needs the raw
/// `tailwind.config` field.
pub fn load_raw_config(cwd: &Path) -> Result<Option<RawConfig>> {
    let path = cwd.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| GlacialError::ConfigParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let raw: RawConfig =
        serde_json::from_str(&contents).map_err(|e| GlacialError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let builtin = builtin_registries();
    for name in raw.registries.keys() {
        if builtin.contains_key(name) {
            return Err(GlacialError::RegistryNameReserved { name: name.clone() });
        }
    }

    Ok(Some(raw))
}

/// Partial configuration with named optional fields per section
///
/// Sections merge key-wise into the defaults; scalars overwrite. This is
/// the explicit counterpart of an ad hoc deep merge: every defaultable
/// field is visible here.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverlay {
    pub typescript: Option<bool>,
    pub style: Option<String>,
    pub icon_library: Option<String>,
    pub tailwind: TailwindOverlay,
    pub aliases: AliasOverlay,
    pub registries: BTreeMap<String, String>,
    pub resolved_paths: ResolvedPathsOverlay,
}

#[derive(Debug, Clone, Default)]
pub struct TailwindOverlay {
    pub config: Option<String>,
    pub css: Option<String>,
    pub base_color: Option<String>,
    pub css_variables: Option<bool>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AliasOverlay {
    pub components: Option<String>,
    pub utils: Option<String>,
    pub ui: Option<String>,
    pub lib: Option<String>,
    pub composables: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedPathsOverlay {
    pub cwd: Option<PathBuf>,
    pub tailwind_config: Option<PathBuf>,
    pub tailwind_css: Option<PathBuf>,
    pub utils: Option<PathBuf>,
    pub components: Option<PathBuf>,
    pub ui: Option<PathBuf>,
    pub lib: Option<PathBuf>,
    pub composables: Option<PathBuf>,
}

/// Build a config with sane defaults for contexts that bypass framework
/// detection (universal registry items, tests)
pub fn create_config(overlay: ConfigOverlay) -> Config {
    let cwd = overlay
        .resolved_paths
        .cwd
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut registries = builtin_registries();
    registries.extend(overlay.registries);

    Config {
        typescript: overlay.typescript.unwrap_or(true),
        style: overlay.style.unwrap_or_default(),
        icon_library: overlay.icon_library,
        tailwind: TailwindConfig {
            config: overlay.tailwind.config.unwrap_or_default(),
            css: overlay.tailwind.css.unwrap_or_default(),
            base_color: overlay.tailwind.base_color.unwrap_or_default(),
            css_variables: overlay.tailwind.css_variables.unwrap_or(false),
            prefix: overlay.tailwind.prefix.unwrap_or_default(),
        },
        aliases: Aliases {
            components: overlay.aliases.components.unwrap_or_default(),
            utils: overlay.aliases.utils.unwrap_or_default(),
            ui: overlay.aliases.ui,
            lib: overlay.aliases.lib,
            composables: overlay.aliases.composables,
        },
        registries,
        resolved_paths: ResolvedPaths {
            cwd,
            tailwind_config: overlay.resolved_paths.tailwind_config.unwrap_or_default(),
            tailwind_css: overlay.resolved_paths.tailwind_css.unwrap_or_default(),
            utils: overlay.resolved_paths.utils.unwrap_or_default(),
            components: overlay.resolved_paths.components.unwrap_or_default(),
            ui: overlay.resolved_paths.ui.unwrap_or_default(),
            lib: overlay.resolved_paths.lib.unwrap_or_default(),
            composables: overlay.resolved_paths.composables.unwrap_or_default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config_json() -> &'static str {
        r#"{
  "$schema": "https://glacial-ui.dev/schema.json",
  "style": "new-york",
  "typescript": true,
  "tailwind": {
    "config": "tailwind.config.js",
    "css": "src/index.css",
    "baseColor": "zinc",
    "cssVariables": true
  },
  "aliases": {
    "components": "@/components",
    "utils": "@/lib/utils"
  }
}"#
    }

    #[test]
    fn test_load_raw_config_absent() {
        let temp = TempDir::new().unwrap();
        assert!(load_raw_config(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_raw_config_parses() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), sample_config_json()).unwrap();

        let raw = load_raw_config(temp.path()).unwrap().unwrap();
        assert_eq!(raw.style, "new-york");
        assert_eq!(raw.tailwind.base_color, "zinc");
        assert_eq!(raw.aliases.components, "@/components");
        assert!(raw.aliases.ui.is_none());
    }

    #[test]
    fn test_load_raw_config_malformed_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();

        assert!(matches!(
            load_raw_config(temp.path()),
            Err(GlacialError::ConfigParseFailed { .. })
        ));
    }

    #[test]
    fn test_builtin_registry_name_is_reserved() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{
  "style": "default",
  "aliases": { "components": "@/components", "utils": "@/lib/utils" },
  "registries": { "@glacial": "https://evil.example/{name}" }
}"#,
        )
        .unwrap();

        assert!(matches!(
            load_raw_config(temp.path()),
            Err(GlacialError::RegistryNameReserved { .. })
        ));
    }

    #[test]
    fn test_create_config_defaults() {
        let config = create_config(ConfigOverlay::default());
        assert!(config.typescript);
        assert!(config.style.is_empty());
        assert!(config.registries.contains_key("@glacial"));
    }

    #[test]
    fn test_create_config_section_merge() {
        let overlay = ConfigOverlay {
            style: Some("new-york".to_string()),
            tailwind: TailwindOverlay {
                prefix: Some("tw-".to_string()),
                ..TailwindOverlay::default()
            },
            aliases: AliasOverlay {
                components: Some("@/components".to_string()),
                ..AliasOverlay::default()
            },
            registries: BTreeMap::from([(
                "@acme".to_string(),
                "https://acme.dev/r/{name}.json".to_string(),
            )]),
            ..ConfigOverlay::default()
        };

        let config = create_config(overlay);
        // Scalars overwritten
        assert_eq!(config.style, "new-york");
        assert_eq!(config.tailwind.prefix, "tw-");
        // Untouched fields keep defaults
        assert!(config.tailwind.css.is_empty());
        assert_eq!(config.aliases.components, "@/components");
        assert!(config.aliases.utils.is_empty());
        // Registries merge key-wise, built-ins preserved
        assert!(config.registries.contains_key("@glacial"));
        assert!(config.registries.contains_key("@acme"));
    }

    #[test]
    fn test_aliases_for_key() {
        let aliases = Aliases {
            components: "@/components".to_string(),
            utils: "@/lib/utils".to_string(),
            ui: Some("@/components/ui".to_string()),
            lib: None,
            composables: None,
        };

        assert_eq!(aliases.for_key("ui"), Some("@/components/ui"));
        assert_eq!(aliases.for_key("lib"), None);
        assert_eq!(aliases.for_key("bogus"), None);
    }
}
