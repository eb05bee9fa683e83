//! Compiler path-mapping (tsconfig/jsconfig) support
//!
//! This module handles:
//! - Loading tsconfig.json/jsconfig.json files, including comments and an
//!   `extends` chain
//! - Resolving import aliases through the `compilerOptions.paths` table
//!
//! Only the subset Glacial needs is modeled: `extends`, `baseUrl` and
//! `paths`. Entries are kept in declaration order since alias-prefix
//! detection depends on it.

use std::path::{Path, PathBuf};

use normpath::PathExt;
use serde_json::Value;

use crate::error::{GlacialError, Result};
use crate::paths::clean_path;

/// Maximum `extends` chain length before we give up
const MAX_EXTENDS_DEPTH: usize = 10;

/// A loaded compiler configuration, reduced to what alias resolution needs
#[derive(Debug, Clone)]
pub struct TsConfig {
    /// Directory the `paths` table is relative to (declaring file's dir,
    /// adjusted by `baseUrl` when present)
    pub base_dir: PathBuf,
    /// `compilerOptions.paths`, in declaration order
    pub paths: Vec<(String, Vec<String>)>,
}

impl TsConfig {
    /// Load a compiler config file, following its `extends` chain
    ///
    /// The nearest file that declares `paths` wins; its own directory (plus
    /// its `baseUrl`, if any) anchors the table.
    pub fn load(path: &Path) -> Result<TsConfig> {
        let mut current = path.to_path_buf();
        let mut depth = 0;

        loop {
            let raw = std::fs::read_to_string(&current).map_err(|e| {
                GlacialError::TsconfigLoadFailed {
                    path: current.display().to_string(),
                    reason: e.to_string(),
                }
            })?;

            let value: Value = serde_json::from_str(&strip_jsonc_comments(&raw)).map_err(|e| {
                GlacialError::TsconfigLoadFailed {
                    path: current.display().to_string(),
                    reason: e.to_string(),
                }
            })?;

            let dir = current.parent().unwrap_or(Path::new(".")).to_path_buf();
            let compiler = value.get("compilerOptions");

            if let Some(paths) = compiler.and_then(|c| c.get("paths")).and_then(Value::as_object) {
                let base_url = compiler
                    .and_then(|c| c.get("baseUrl"))
                    .and_then(Value::as_str)
                    .unwrap_or(".");

                let entries = paths
                    .iter()
                    .map(|(pattern, targets)| {
                        let targets = match targets {
                            Value::String(s) => vec![s.clone()],
                            Value::Array(items) => items
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect(),
                            _ => Vec::new(),
                        };
                        (pattern.clone(), targets)
                    })
                    .collect();

                return Ok(TsConfig {
                    base_dir: clean_path(&dir.join(base_url)),
                    paths: entries,
                });
            }

            let parent = value.get("extends").and_then(Value::as_str);
            match parent {
                Some(parent) if depth < MAX_EXTENDS_DEPTH => {
                    let mut next = dir.join(parent);
                    if next.extension().is_none() {
                        next.set_extension("json");
                    }
                    current = match next.normalize() {
                        Ok(normalized) => normalized.into_path_buf(),
                        Err(_) => next,
                    };
                    depth += 1;
                }
                _ => {
                    // No paths anywhere in the chain: empty table rooted at
                    // the original file's directory.
                    return Ok(TsConfig {
                        base_dir: path.parent().unwrap_or(Path::new(".")).to_path_buf(),
                        paths: Vec::new(),
                    });
                }
            }
        }
    }

    /// Resolve an import alias through the paths table
    ///
    /// Returns the probable absolute path for `alias`, without checking that
    /// anything exists there. First matching entry wins.
    pub fn resolve_import(&self, alias: &str) -> Option<PathBuf> {
        for (pattern, targets) in &self.paths {
            let Some(target) = targets.first() else {
                continue;
            };

            if let Some(prefix) = pattern.strip_suffix('*') {
                if let Some(rest) = alias.strip_prefix(prefix) {
                    let substituted = target.replacen('*', rest, 1);
                    return Some(clean_path(&self.base_dir.join(substituted)));
                }
            } else if alias == pattern {
                return Some(clean_path(&self.base_dir.join(target)));
            }
        }

        None
    }
}

/// Strip `//` and `/* */` comments from JSONC content
///
/// tsconfig.json files routinely carry comments that serde_json rejects.
pub fn strip_jsonc_comments(content: &str) -> String {
    let mut result = String::new();
    let mut in_string = false;
    let mut in_single_comment = false;
    let mut in_multi_comment = false;
    let chars: Vec<char> = content.chars().collect();
    let len = chars.len();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if in_single_comment {
            if c == '\n' {
                in_single_comment = false;
                result.push(c);
            }
        } else if in_multi_comment {
            if c == '*' && next == Some('/') {
                in_multi_comment = false;
                i += 1;
            }
        } else if in_string {
            result.push(c);
            if c == '"' && (i == 0 || chars[i - 1] != '\\') {
                in_string = false;
            }
        } else {
            match (c, next) {
                ('/', Some('/')) => {
                    in_single_comment = true;
                    i += 1;
                }
                ('/', Some('*')) => {
                    in_multi_comment = true;
                    i += 1;
                }
                ('"', _) => {
                    in_string = true;
                    result.push(c);
                }
                _ => {
                    result.push(c);
                }
            }
        }

        i += 1;
    }

    result
}
