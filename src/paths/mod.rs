//! Destination path handling
//!
//! This module handles:
//! - Lexical path normalization shared across the crate
//! - Traversal-safety validation of externally influenced destinations
//! - Planning the absolute destination for each registry file

pub mod planner;
pub mod safety;

pub use planner::{
    find_common_root, fix_extension_for_js, resolve_file_path, resolve_nested_file_path,
    PlanOptions,
};
pub use safety::is_safe_target;

use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically: collapse `.` and resolve `..` components
///
/// Does not touch the filesystem, so it works for destinations that do not
/// exist yet. `..` at the root stays at the root; `..` at the start of a
/// relative path is preserved.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }

    out
}

/// Render a path with forward slashes for import specifiers and reports
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_collapses_dots() {
        assert_eq!(clean_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }

    #[test]
    fn test_clean_path_parent_at_root() {
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_clean_path_relative_parent_preserved() {
        assert_eq!(clean_path(Path::new("../a/b")), PathBuf::from("../a/b"));
    }

    #[test]
    fn test_clean_path_empty_becomes_dot() {
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_to_forward_slashes() {
        assert_eq!(to_forward_slashes(Path::new("a/b/c.vue")), "a/b/c.vue");
    }
}
