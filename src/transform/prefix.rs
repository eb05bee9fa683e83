//! Tailwind prefix injection
//!
//! Adds the configured utility prefix to class lists found in:
//! - `cn(...)` class-list-combinator calls (string literals, ternary arms,
//!   the right operand of binary concatenation, and non-variant-keyed
//!   object string values)
//! - `cva(...)` variant-style-factory calls (the base class list and
//!   `variants` object values; variant keys are never prefixed)
//! - template class attributes, static and bound
//!
//! Prefixing is token-level: v3 splits each class into variant, value and
//! modifier and puts the prefix before the value; v4 prepends `prefix:`
//! unless the token already carries it, which keeps the stage idempotent.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::project::TailwindVersion;
use crate::transform::{TransformContext, TransformStage};

/// Object keys whose string values are option names, not class lists
const VARIANT_OPTION_KEYS: &[&str] = &["variant", "size", "color", "type", "state"];

/// Attribute names treated as class bindings in templates
const CLASS_ATTRS: &str = "class|className|classes|classNames";

pub struct TailwindPrefix;

impl TransformStage for TailwindPrefix {
    fn name(&self) -> &'static str {
        "tailwind-prefix"
    }

    fn apply(&self, ctx: &TransformContext, source: &str) -> Result<(String, usize)> {
        let prefix = ctx.config.tailwind.prefix.clone();
        if prefix.is_empty() {
            return Ok((source.to_string(), 0));
        }

        let mut count = 0;
        let out = transform_source(source, &prefix, ctx.tailwind_version, &mut count);
        Ok((out, count))
    }
}

fn transform_source(
    source: &str,
    prefix: &str,
    version: Option<TailwindVersion>,
    count: &mut usize,
) -> String {
    // Template markup and script code get separate handling; a cn() call
    // inside a bound attribute belongs to the template pass.
    match template_span(source) {
        Some((start, end)) => {
            let head = transform_script(&source[..start], prefix, version, count);
            let template = transform_template(&source[start..end], prefix, version, count);
            let tail = transform_script(&source[end..], prefix, version, count);
            format!("{head}{template}{tail}")
        }
        None => transform_script(source, prefix, version, count),
    }
}

fn template_span(source: &str) -> Option<(usize, usize)> {
    let start = source.find("<template")?;
    let end = source.rfind("</template>")? + "</template>".len();
    (end > start).then_some((start, end))
}

#[derive(Clone, Copy, PartialEq)]
enum CallKind {
    Combinator,
    VariantFactory,
}

/// Prefix class lists inside cn() and cva() call sites
fn transform_script(
    source: &str,
    prefix: &str,
    version: Option<TailwindVersion>,
    count: &mut usize,
) -> String {
    let mut spans: Vec<(usize, usize, CallKind)> = Vec::new();
    for (start, end) in find_call_spans(source, "cn") {
        spans.push((start, end, CallKind::Combinator));
    }
    for (start, end) in find_call_spans(source, "cva") {
        spans.push((start, end, CallKind::VariantFactory));
    }

    // A call nested inside another collected span is already covered by
    // the outer walk; keep outermost spans only.
    spans.sort_by_key(|s| s.0);
    let mut outer: Vec<(usize, usize, CallKind)> = Vec::new();
    for span in spans {
        if outer
            .iter()
            .all(|(start, end, _)| !(span.0 >= *start && span.1 <= *end))
        {
            outer.push(span);
        }
    }

    let mut out = source.to_string();
    for (start, end, kind) in outer.into_iter().rev() {
        let inner = &source[start..end];
        let replaced = match kind {
            CallKind::Combinator => transform_class_expression(inner, prefix, version, count),
            CallKind::VariantFactory => transform_cva_content(inner, prefix, version, count),
        };
        out.replace_range(start..end, &replaced);
    }

    out
}

/// Content spans (inside the parentheses) of `name(...)` call sites
fn find_call_spans(source: &str, name: &str) -> Vec<(usize, usize)> {
    let bytes = source.as_bytes();
    let mut spans = Vec::new();

    for (idx, _) in source.match_indices(name) {
        // Word boundary on the left; method calls are not combinator calls.
        if idx > 0 {
            let prev = bytes[idx - 1] as char;
            if prev.is_alphanumeric() || prev == '_' || prev == '$' || prev == '.' {
                continue;
            }
        }

        let mut after = idx + name.len();
        while after < bytes.len() && (bytes[after] as char).is_whitespace() {
            after += 1;
        }
        if after >= bytes.len() || bytes[after] != b'(' {
            continue;
        }

        if let Some((start, end)) = balanced_paren_span(source, after) {
            spans.push((start, end));
        }
    }

    spans
}

/// Span of the contents between the paren at `open_idx` and its match
fn balanced_paren_span(source: &str, open_idx: usize) -> Option<(usize, usize)> {
    let chars: Vec<(usize, char)> = source[open_idx..]
        .char_indices()
        .map(|(i, c)| (i + open_idx, c))
        .collect();

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in chars {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open_idx + 1, i));
                }
            }
            _ => {}
        }
    }

    None
}

/// Walk an expression and prefix the string literals that are class lists
///
/// Skips comparison operands, object keys, values of variant-option keys
/// and the left operand of string concatenation. Ternary arms are
/// transformed; the test never is.
fn transform_class_expression(
    expr: &str,
    prefix: &str,
    version: Option<TailwindVersion>,
    count: &mut usize,
) -> String {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = String::with_capacity(expr.len());

    let mut i = 0;
    let mut depth = 0usize;
    let mut ternary_depths: Vec<usize> = Vec::new();
    let mut prev_sig: Option<char> = None;
    let mut last_colon_ternary = false;
    let mut last_token = String::new();
    let mut pending_key: Option<String> = None;

    while i < chars.len() {
        let c = chars[i];

        match c {
            '\'' | '"' => {
                let (content, next_i) = read_literal(&chars, i, c);
                let decision = literal_decision(
                    &chars,
                    next_i,
                    depth,
                    &ternary_depths,
                    prev_sig,
                    last_colon_ternary,
                    pending_key.as_deref(),
                );

                if decision {
                    let prefixed = apply_prefix(&content, prefix, version);
                    if prefixed != content {
                        *count += 1;
                    }
                    out.push(c);
                    out.push_str(&prefixed);
                    out.push(c);
                } else {
                    out.push(c);
                    out.push_str(&content);
                    out.push(c);
                }

                last_token = content;
                pending_key = None;
                prev_sig = Some(c);
                i = next_i;
            }
            '`' => {
                // Template literals pass through untouched.
                out.push(c);
                i += 1;
                let mut escaped = false;
                while i < chars.len() {
                    let t = chars[i];
                    out.push(t);
                    i += 1;
                    if escaped {
                        escaped = false;
                    } else if t == '\\' {
                        escaped = true;
                    } else if t == '`' {
                        break;
                    }
                }
                prev_sig = Some('`');
                pending_key = None;
            }
            '(' | '{' | '[' => {
                depth += 1;
                out.push(c);
                prev_sig = Some(c);
                last_token.clear();
                pending_key = None;
                i += 1;
            }
            ')' | '}' | ']' => {
                depth = depth.saturating_sub(1);
                ternary_depths.retain(|d| *d <= depth);
                out.push(c);
                prev_sig = Some(c);
                last_token.clear();
                pending_key = None;
                i += 1;
            }
            '?' => {
                let next = chars.get(i + 1).copied();
                if next == Some('.') || next == Some('?') {
                    out.push(c);
                    out.push(next.unwrap_or_default());
                    i += 2;
                } else {
                    ternary_depths.push(depth);
                    out.push(c);
                    i += 1;
                }
                prev_sig = Some('?');
                last_token.clear();
                pending_key = None;
            }
            ':' => {
                if ternary_depths.last() == Some(&depth) {
                    ternary_depths.pop();
                    last_colon_ternary = true;
                    pending_key = None;
                } else {
                    last_colon_ternary = false;
                    pending_key = Some(last_token.clone());
                }
                out.push(c);
                prev_sig = Some(c);
                i += 1;
            }
            c if c.is_whitespace() => {
                out.push(c);
                i += 1;
            }
            c if c.is_alphanumeric() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    out.push(chars[i]);
                    i += 1;
                }
                last_token = chars[start..i].iter().collect();
                prev_sig = Some('a');
                pending_key = None;
            }
            _ => {
                out.push(c);
                prev_sig = Some(c);
                last_token.clear();
                pending_key = None;
                i += 1;
            }
        }
    }

    out
}

/// Read a quoted literal starting at `start`; returns content and the index
/// past the closing quote
fn read_literal(chars: &[char], start: usize, quote: char) -> (String, usize) {
    let mut content = String::new();
    let mut i = start + 1;
    let mut escaped = false;

    while i < chars.len() {
        let c = chars[i];
        if escaped {
            content.push(c);
            escaped = false;
        } else if c == '\\' {
            content.push(c);
            escaped = true;
        } else if c == quote {
            return (content, i + 1);
        } else {
            content.push(c);
        }
        i += 1;
    }

    (content, i)
}

/// Should the literal ending right before `after` be prefixed?
#[allow(clippy::too_many_arguments)]
fn literal_decision(
    chars: &[char],
    after: usize,
    depth: usize,
    ternary_depths: &[usize],
    prev_sig: Option<char>,
    last_colon_ternary: bool,
    pending_key: Option<&str>,
) -> bool {
    // Comparison operand on the left: x === 'value'
    if matches!(prev_sig, Some('=') | Some('!') | Some('<') | Some('>')) {
        return false;
    }

    // Value position after a colon.
    if prev_sig == Some(':') && !last_colon_ternary {
        if let Some(key) = pending_key {
            if VARIANT_OPTION_KEYS.contains(&key) {
                return false;
            }
        }
    }

    // Look ahead past whitespace.
    let mut j = after;
    while j < chars.len() && chars[j].is_whitespace() {
        j += 1;
    }

    if let Some(&next) = chars.get(j) {
        // Key position: 'name': ... (a pending ternary colon is not a key).
        if next == ':' && ternary_depths.last() != Some(&depth) {
            return false;
        }
        // Comparison operand on the right: 'value' === x
        if (next == '=' || next == '!') && chars.get(j + 1) == Some(&'=') {
            return false;
        }
        // Left operand of concatenation; only the right operand is a class
        // list.
        if next == '+' {
            return false;
        }
    }

    true
}

/// Prefix a cva(...) argument span: base class list plus variants values
fn transform_cva_content(
    content: &str,
    prefix: &str,
    version: Option<TailwindVersion>,
    count: &mut usize,
) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());

    let mut i = 0;
    let mut depth = 0usize;
    let mut base_done = false;

    while i < chars.len() {
        let c = chars[i];

        match c {
            '\'' | '"' => {
                let (literal, next_i) = read_literal(&chars, i, c);
                if depth == 0 && !base_done {
                    let prefixed = apply_prefix(&literal, prefix, version);
                    if prefixed != literal {
                        *count += 1;
                    }
                    out.push(c);
                    out.push_str(&prefixed);
                    out.push(c);
                    base_done = true;
                } else {
                    out.push(c);
                    out.push_str(&literal);
                    out.push(c);
                }
                i = next_i;
            }
            '(' | '{' | '[' => {
                depth += 1;
                out.push(c);
                i += 1;
            }
            ')' | '}' | ']' => {
                depth = depth.saturating_sub(1);
                out.push(c);
                i += 1;
            }
            c if c.is_alphanumeric() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                out.push_str(&word);

                if word == "variants" {
                    // variants: { ... } property values are class lists;
                    // the keys are variant names and stay untouched.
                    let mut j = i;
                    while j < chars.len() && chars[j].is_whitespace() {
                        j += 1;
                    }
                    if chars.get(j) == Some(&':') {
                        let mut k = j + 1;
                        while k < chars.len() && chars[k].is_whitespace() {
                            k += 1;
                        }
                        if chars.get(k) == Some(&'{') {
                            if let Some((span_start, span_end)) =
                                balanced_brace_span(&chars, k)
                            {
                                let object: String =
                                    chars[span_start..span_end].iter().collect();
                                let transformed =
                                    transform_class_expression(&object, prefix, version, count);
                                let head: String = chars[i..span_start].iter().collect();
                                out.push_str(&head);
                                out.push_str(&transformed);
                                out.push('}');
                                i = span_end + 1;
                                continue;
                            }
                        }
                    }
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Span of the contents between the brace at `open_idx` and its match
fn balanced_brace_span(chars: &[char], open_idx: usize) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate().skip(open_idx) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open_idx + 1, i));
                }
            }
            _ => {}
        }
    }

    None
}

/// Prefix class attributes inside a template block
fn transform_template(
    template: &str,
    prefix: &str,
    version: Option<TailwindVersion>,
    count: &mut usize,
) -> String {
    static BOUND_DQ: OnceLock<Regex> = OnceLock::new();
    static BOUND_SQ: OnceLock<Regex> = OnceLock::new();
    static STATIC_DQ: OnceLock<Regex> = OnceLock::new();
    static STATIC_SQ: OnceLock<Regex> = OnceLock::new();

    let bound_dq = BOUND_DQ.get_or_init(|| {
        Regex::new(&format!(
            r#"(?P<head>(?:v-bind)?:(?:{CLASS_ATTRS})\s*=\s*")(?P<expr>[^"]*)""#
        ))
        .expect("valid regex")
    });
    let bound_sq = BOUND_SQ.get_or_init(|| {
        Regex::new(&format!(
            r#"(?P<head>(?:v-bind)?:(?:{CLASS_ATTRS})\s*=\s*')(?P<expr>[^']*)'"#
        ))
        .expect("valid regex")
    });
    let static_dq = STATIC_DQ.get_or_init(|| {
        Regex::new(&format!(
            r#"(?P<pre>[^:\w-])(?P<attr>{CLASS_ATTRS})(?P<eq>\s*=\s*")(?P<val>[^"]*)""#
        ))
        .expect("valid regex")
    });
    let static_sq = STATIC_SQ.get_or_init(|| {
        Regex::new(&format!(
            r#"(?P<pre>[^:\w-])(?P<attr>{CLASS_ATTRS})(?P<eq>\s*=\s*')(?P<val>[^']*)'"#
        ))
        .expect("valid regex")
    });

    let mut out = template.to_string();

    for (re, quote) in [(bound_dq, '"'), (bound_sq, '\'')] {
        out = re
            .replace_all(&out, |caps: &regex::Captures| {
                let expr = transform_class_expression(&caps["expr"], prefix, version, count);
                format!("{}{}{}", &caps["head"], expr, quote)
            })
            .into_owned();
    }

    for (re, quote) in [(static_dq, '"'), (static_sq, '\'')] {
        out = re
            .replace_all(&out, |caps: &regex::Captures| {
                let prefixed = apply_prefix(&caps["val"], prefix, version);
                if prefixed != caps["val"] {
                    *count += 1;
                }
                format!(
                    "{}{}{}{}{}",
                    &caps["pre"], &caps["attr"], &caps["eq"], prefixed, quote
                )
            })
            .into_owned();
    }

    out
}

/// Split a class token into variant, value and modifier
///
/// `hover:bg-primary/50` → (`hover`, `bg-primary`, `50`)
pub fn split_class_name(class: &str) -> (Option<String>, String, Option<String>) {
    if !class.contains('/') && !class.contains(':') {
        return (None, class.to_string(), None);
    }

    let (without_modifier, modifier) = match class.split_once('/') {
        Some((before, after)) => (before.to_string(), Some(after.to_string())),
        None => (class.to_string(), None),
    };

    if without_modifier.contains(':') {
        let mut parts: Vec<&str> = without_modifier.split(':').collect();
        let value = parts.pop().unwrap_or_default().to_string();
        (Some(parts.join(":")), value, modifier)
    } else {
        (None, without_modifier, modifier)
    }
}

/// Prefix each space-separated class token
///
/// v3 inserts the prefix immediately before the value, preserving variant
/// and modifier segments. v4 (and unknown versions) prepend `prefix:`
/// unless the token already starts with it.
pub fn apply_prefix(input: &str, prefix: &str, version: Option<TailwindVersion>) -> String {
    let tokens = input.split(' ').filter(|t| !t.is_empty());

    match version {
        Some(TailwindVersion::V3) => tokens
            .map(|token| {
                let (variant, value, modifier) = split_class_name(token);
                match (variant, modifier) {
                    (Some(v), Some(m)) => format!("{v}:{prefix}{value}/{m}"),
                    (Some(v), None) => format!("{v}:{prefix}{value}"),
                    (None, Some(m)) => format!("{prefix}{value}/{m}"),
                    (None, None) => format!("{prefix}{value}"),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        _ => tokens
            .map(|token| {
                if token.starts_with(&format!("{prefix}:")) {
                    token.to_string()
                } else {
                    format!("{prefix}:{}", token.trim())
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Prefix utility classes inlined through `@apply` lines in CSS text
pub fn apply_prefixes_css(css: &str, prefix: &str, version: Option<TailwindVersion>) -> String {
    let mut out = css.to_string();

    for line in css.lines() {
        if line.contains("@apply") {
            let original = line.replacen("@apply", "", 1).trim().to_string();
            if original.is_empty() {
                continue;
            }
            let prefixed = apply_prefix(&original, prefix, version);
            out = out.replacen(&original, &prefixed, 1);
        }
    }

    out
}
