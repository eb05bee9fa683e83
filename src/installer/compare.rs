//! Content equivalence for the identity check
//!
//! Two files count as the same when they differ only in line endings and
//! trailing whitespace. Workspace-sourced installs additionally ignore
//! import lines, since the import-alias resolver rewrites those per
//! package.

/// Is `new` content equivalent to what is already on disk?
pub fn is_content_same(existing: &str, new: &str, ignore_imports: bool) -> bool {
    normalize(existing, ignore_imports) == normalize(new, ignore_imports)
}

fn normalize(content: &str, ignore_imports: bool) -> String {
    let unified = content.replace("\r\n", "\n");
    let mut lines: Vec<&str> = Vec::new();
    let mut in_import = false;

    for line in unified.lines() {
        let trimmed = line.trim_start();

        if ignore_imports {
            if in_import {
                // A multi-line import ends on the line carrying the
                // specifier string.
                if trimmed.contains('\'') || trimmed.contains('"') {
                    in_import = false;
                }
                continue;
            }
            if trimmed.starts_with("import ") || trimmed.starts_with("import{") {
                in_import = !(trimmed.contains('\'') || trimmed.contains('"'));
                continue;
            }
        }

        lines.push(line.trim_end());
    }

    // Trailing blank lines are not a difference.
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
