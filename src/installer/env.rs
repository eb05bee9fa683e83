//! Environment-file handling
//!
//! Env files are never transformed or overwritten: installs append keys the
//! existing file does not have and leave every existing line verbatim.

use std::path::{Path, PathBuf};

/// Conventional env file names, in redirect-preference order
pub const ENV_FILE_NAMES: &[&str] = &[
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
    ".env.example",
];

/// Anything named `.env*` is treated as an environment file
pub fn is_env_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(".env"))
}

/// Find an existing conventionally named env file in `dir`
pub fn find_existing_env_file(dir: &Path) -> Option<PathBuf> {
    ENV_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Parse `KEY=value` lines, in order; comments and blanks are skipped
pub fn parse_env_content(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Keys present in `new` but absent from `existing`, in `new`'s order
pub fn new_env_keys(existing: &str, new: &str) -> Vec<String> {
    let existing_keys: Vec<String> = parse_env_content(existing)
        .into_iter()
        .map(|(key, _)| key)
        .collect();

    parse_env_content(new)
        .into_iter()
        .map(|(key, _)| key)
        .filter(|key| !existing_keys.contains(key))
        .collect()
}

/// Append `new`'s unknown keys to `existing`, preserving existing lines
/// verbatim
pub fn merge_env_content(existing: &str, new: &str) -> String {
    let missing = new_env_keys(existing, new);
    if missing.is_empty() {
        return existing.to_string();
    }

    let mut out = existing.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }

    for line in new.lines() {
        let parsed = parse_env_content(line);
        if let Some((key, _)) = parsed.first() {
            if missing.contains(key) {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out
}
