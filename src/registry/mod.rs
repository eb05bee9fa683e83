//! Registry item model and the fetch collaborator contract
//!
//! This module handles:
//! - The registry item / file descriptor schema
//! - The narrow [`RegistrySource`] contract the installer consumes
//! - A local, directory-backed source used by the CLI
//!
//! Network transports are deliberately out of this crate's core; anything
//! that can produce a [`RegistryItem`] plugs in through [`RegistrySource`].

pub mod local;

pub use local::LocalRegistry;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File kinds a registry item may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "registry:ui")]
    Ui,
    #[serde(rename = "registry:lib")]
    Lib,
    #[serde(rename = "registry:component")]
    Component,
    #[serde(rename = "registry:composable")]
    Composable,
    #[serde(rename = "registry:hook")]
    Hook,
    #[serde(rename = "registry:page")]
    Page,
    #[serde(rename = "registry:block")]
    Block,
    #[serde(rename = "registry:file")]
    File,
}

/// One file descriptor inside a registry item
///
/// `path` is registry-relative; `target` optionally overrides the planned
/// destination and may be `~/`-rooted at the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// A named, installable bundle of file descriptors plus dependency metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryItem {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub files: Vec<RegistryFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(rename = "devDependencies", default, skip_serializing_if = "Vec::is_empty")]
    pub dev_dependencies: Vec<String>,
    #[serde(
        rename = "registryDependencies",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub registry_dependencies: Vec<String>,
}

/// Base-color payload consumed by the CSS-variable stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseColor {
    #[serde(default, rename = "inlineColors")]
    pub inline_colors: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default, rename = "cssVars")]
    pub css_vars: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default, rename = "inlineColorsTemplate")]
    pub inline_colors_template: String,
    #[serde(default, rename = "cssVarsTemplate")]
    pub css_vars_template: String,
}

/// Icon-name translation table: source icon name → target library → name
pub type IconTranslations = BTreeMap<String, BTreeMap<String, String>>;

/// Narrow contract for anything that can serve registry content
pub trait RegistrySource {
    /// Fetch one item by name for a given style
    fn item(&self, name: &str, style: &str) -> Result<RegistryItem>;

    /// Fetch the base-color payload for a color token
    fn base_color(&self, name: &str) -> Result<BaseColor>;

    /// Fetch the icon translation table; empty when the source has none
    fn icons(&self) -> Result<IconTranslations>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_file_deserializes_type_tags() {
        let json = r#"{
  "path": "ui/button/Button.vue",
  "type": "registry:ui",
  "content": "<template></template>"
}"#;
        let file: RegistryFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.file_type, FileType::Ui);
        assert!(file.target.is_none());
    }

    #[test]
    fn test_registry_item_defaults() {
        let json = r#"{ "name": "button" }"#;
        let item: RegistryItem = serde_json::from_str(json).unwrap();
        assert!(item.files.is_empty());
        assert!(item.dependencies.is_empty());
    }

    #[test]
    fn test_registry_item_roundtrip() {
        let item = RegistryItem {
            name: "button".to_string(),
            item_type: Some("registry:ui".to_string()),
            files: vec![RegistryFile {
                path: "ui/button/Button.vue".to_string(),
                content: Some("<template/>".to_string()),
                file_type: FileType::Ui,
                target: None,
            }],
            dependencies: vec!["reka-ui".to_string()],
            dev_dependencies: Vec::new(),
            registry_dependencies: vec!["utils".to_string()],
        };

        let json = serde_json::to_string(&item).unwrap();
        let parsed: RegistryItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.files[0].file_type, FileType::Ui);
        assert_eq!(parsed.dependencies, vec!["reka-ui"]);
    }
}
