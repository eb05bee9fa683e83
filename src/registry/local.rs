//! Directory-backed registry source
//!
//! Serves items from a local registry layout:
//!
//! ```text
//! registry/
//!   styles/<style>/<name>.json   item payloads
//!   colors/<name>.json           base-color payloads
//!   icons.json                   icon translation table (optional)
//! ```
//!
//! Filesystem error kinds are mapped onto the registry error taxonomy so
//! callers see the same not-found/forbidden distinctions a remote source
//! would produce.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{GlacialError, Result};
use crate::registry::{BaseColor, IconTranslations, RegistryItem, RegistrySource};

pub struct LocalRegistry {
    root: PathBuf,
}

impl LocalRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, path: &Path, name: &str) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GlacialError::RegistryNotFound {
                name: name.to_string(),
            },
            ErrorKind::PermissionDenied => GlacialError::RegistryForbidden {
                name: name.to_string(),
            },
            _ => GlacialError::FileReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })
    }

    fn parse<T: serde::de::DeserializeOwned>(&self, raw: &str, name: &str) -> Result<T> {
        serde_json::from_str(raw).map_err(|e| GlacialError::RegistryParseFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl RegistrySource for LocalRegistry {
    fn item(&self, name: &str, style: &str) -> Result<RegistryItem> {
        let path = self.root.join("styles").join(style).join(format!("{name}.json"));
        let raw = self.read(&path, name)?;
        self.parse(&raw, name)
    }

    fn base_color(&self, name: &str) -> Result<BaseColor> {
        let path = self.root.join("colors").join(format!("{name}.json"));
        let raw = self.read(&path, name)?;
        self.parse(&raw, name)
    }

    fn icons(&self) -> Result<IconTranslations> {
        let path = self.root.join("icons.json");
        if !path.exists() {
            return Ok(IconTranslations::default());
        }
        let raw = self.read(&path, "icons")?;
        self.parse(&raw, "icons")
    }
}
