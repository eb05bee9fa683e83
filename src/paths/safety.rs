//! Traversal safety for externally influenced destination paths
//!
//! Registry files carry `target` overrides and users pass `--path`; both
//! reach the filesystem, so every such destination is validated here before
//! any write. The checks cover raw, normalized and percent-decoded forms of
//! the input.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::paths::clean_path;

/// Upper bound on percent-decode rounds (guards against decode loops)
const MAX_DECODE_ROUNDS: usize = 8;

fn catch_all_brackets() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // [...slug] style catch-all route segments may legitimately contain `..`
    RE.get_or_init(|| Regex::new(r"\[\.\.\..*?\]").expect("valid regex"))
}

/// Validate `target_path` as a write destination under `cwd`
///
/// Returns false for NUL bytes, traversal sequences (raw or percent-encoded,
/// decoded iteratively), control characters, `~` combined with `../`, and
/// foreign drive-letter absolute paths. A `..` inside a `[...slug]` bracket
/// pattern is exempt. Finally the resolved absolute path must equal `cwd` or
/// be a separator-bounded descendant of it.
pub fn is_safe_target(target_path: &str, cwd: &Path) -> bool {
    // NUL bytes can truncate paths at OS boundaries.
    if target_path.contains('\0') {
        return false;
    }

    // Iteratively decode percent-escapes to catch nested encodings like
    // %252e%252e%252f.
    let decoded = match percent_decode_iterative(target_path) {
        Some(decoded) => decoded,
        None => return false,
    };

    let normalized_target = clean_path(Path::new(&decoded));
    let normalized_target_str = normalized_target.to_string_lossy();

    if has_traversal(&normalized_target_str)
        || has_traversal(&decoded)
        || has_traversal(target_path)
    {
        return false;
    }

    let clean_target = catch_all_brackets().replace_all(target_path, "");
    let clean_decoded = catch_all_brackets().replace_all(&decoded, "");

    for candidate in [clean_target.as_ref(), clean_decoded.as_ref()] {
        if candidate.contains("..")
            || candidate.contains("\0")
            || candidate.chars().any(|c| ('\x01'..'\x20').contains(&c))
        {
            return false;
        }
    }

    // A `~` only matters when combined with traversal.
    if (target_path.contains('~') || decoded.contains('~'))
        && (target_path.contains("../") || decoded.contains("../"))
    {
        return false;
    }

    // Drive-letter absolute paths are foreign everywhere but Windows.
    if is_drive_letter_path(&decoded) {
        if cfg!(windows) {
            return decoded
                .to_lowercase()
                .starts_with(&cwd.to_string_lossy().to_lowercase());
        }
        return false;
    }

    let normalized_root = clean_path(cwd);
    let absolute_target = if normalized_target.is_absolute() {
        normalized_target
    } else {
        clean_path(&normalized_root.join(&normalized_target))
    };

    absolute_target == normalized_root || absolute_target.starts_with(&normalized_root)
}

fn has_traversal(path: &str) -> bool {
    catch_all_brackets().replace_all(path, "").contains("..")
}

fn is_drive_letter_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
}

/// Decode %XX escapes until a fixpoint, bounded by `MAX_DECODE_ROUNDS`
///
/// Returns None for escapes that do not form valid UTF-8.
fn percent_decode_iterative(input: &str) -> Option<String> {
    let mut current = input.to_string();

    for _ in 0..MAX_DECODE_ROUNDS {
        if !current.contains('%') {
            break;
        }
        let next = percent_decode_once(&current)?;
        if next == current {
            break;
        }
        current = next;
    }

    Some(current)
}

fn percent_decode_once(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok()?;
            if let Ok(byte) = u8::from_str_radix(hex, 16) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        PathBuf::from("/home/user/project")
    }

    #[test]
    fn test_plain_relative_path_is_safe() {
        assert!(is_safe_target("components/ui/button.vue", &cwd()));
    }

    #[test]
    fn test_absolute_path_under_cwd_is_safe() {
        assert!(is_safe_target("/home/user/project/components/x.vue", &cwd()));
    }

    #[test]
    fn test_absolute_path_outside_cwd_is_rejected() {
        assert!(!is_safe_target("/etc/passwd", &cwd()));
    }

    #[test]
    fn test_sibling_prefix_is_rejected() {
        // Separator-bounded descendant check: /home/user/project-evil is not
        // inside /home/user/project.
        assert!(!is_safe_target("/home/user/project-evil/x.vue", &cwd()));
    }

    #[test]
    fn test_traversal_is_rejected() {
        assert!(!is_safe_target("../outside.txt", &cwd()));
        assert!(!is_safe_target("a/../../outside.txt", &cwd()));
        assert!(!is_safe_target("..", &cwd()));
    }

    #[test]
    fn test_encoded_traversal_is_rejected() {
        assert!(!is_safe_target("%2e%2e%2fetc/passwd", &cwd()));
        // Double-encoded
        assert!(!is_safe_target("%252e%252e%252fetc/passwd", &cwd()));
    }

    #[test]
    fn test_nul_byte_is_rejected() {
        assert!(!is_safe_target("file\0.txt", &cwd()));
        assert!(!is_safe_target("file%00.txt", &cwd()));
    }

    #[test]
    fn test_control_characters_are_rejected() {
        assert!(!is_safe_target("file\x01name.txt", &cwd()));
    }

    #[test]
    fn test_tilde_with_traversal_is_rejected() {
        assert!(!is_safe_target("~/../../etc/passwd", &cwd()));
    }

    #[test]
    fn test_catch_all_route_brackets_are_exempt() {
        assert!(is_safe_target("pages/[...slug].vue", &cwd()));
        assert!(is_safe_target("pages/docs/[...all]/index.vue", &cwd()));
    }

    #[test]
    fn test_traversal_outside_brackets_still_rejected() {
        assert!(!is_safe_target("pages/[...slug]/../../../etc.vue", &cwd()));
    }

    #[test]
    #[cfg(not(windows))]
    fn test_drive_letter_rejected_off_windows() {
        assert!(!is_safe_target("C:\\Windows\\System32", &cwd()));
        assert!(!is_safe_target("c:/anything", &cwd()));
    }

    #[test]
    fn test_invalid_utf8_escape_is_rejected() {
        assert!(!is_safe_target("file%ff%fe.txt", &cwd()));
    }
}
