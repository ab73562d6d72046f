//! Outbound input sanitization.
//!
//! Every request body passes through [`sanitize`] before serialization so
//! reflected data can never carry executable markup back into a page.
//!
//! DESIGN
//! ======
//! Strings are reduced to plain text: tags and comments are removed, and the
//! contents of raw-text elements (`<script>`, `<style>`, ...) are dropped
//! along with their tags. A `<` that does not open a tag (`a < b`) is kept.
//! Trim and strip repeat until nothing changes, which makes the function
//! idempotent even for inputs like `<<b>script>` that reassemble a tag once
//! the inner one is removed.

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod sanitize_test;

use serde_json::Value;

/// Elements whose contents are script or otherwise not displayable text.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "noscript", "template", "object", "textarea", "title", "xmp", "noembed",
    "noframes",
];

/// Sanitize an untrusted JSON value.
///
/// Strings become trimmed plain text, objects and arrays are sanitized
/// element-wise with keys and order preserved, everything else is returned
/// unchanged.
#[must_use]
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(sanitize_text(&text)),
        Value::Object(map) => Value::Object(map.into_iter().map(|(key, v)| (key, sanitize(v))).collect()),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        other => other,
    }
}

/// Trim and strip markup from a single string.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    let mut current = input.trim().to_owned();
    loop {
        let stripped = strip_markup(&current);
        let next = stripped.trim();
        if next == current {
            return current;
        }
        current = next.to_owned();
    }
}

fn strip_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        let (text, tail) = rest.split_at(open);
        out.push_str(text);
        match markup_len(tail) {
            Some(len) => rest = tail.get(len..).unwrap_or_default(),
            None => {
                out.push('<');
                rest = tail.get(1..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    out
}

/// Byte length of the markup construct starting at `tail` (which begins with
/// `<`), or `None` when the `<` is literal text. Unterminated constructs
/// consume the rest of the input.
fn markup_len(tail: &str) -> Option<usize> {
    if tail.starts_with("<!--") {
        return Some(tail.find("-->").map_or(tail.len(), |end| end + 3));
    }

    let after = tail.get(1..).unwrap_or_default();
    let first = after.chars().next()?;
    if !(first.is_ascii_alphabetic() || matches!(first, '/' | '!' | '?')) {
        return None;
    }

    let tag_end = tail.find('>').map_or(tail.len(), |end| end + 1);
    if !first.is_ascii_alphabetic() {
        return Some(tag_end);
    }

    let name: String = after
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if !RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
        return Some(tag_end);
    }

    // Raw-text element: drop everything through the matching close tag.
    let close = format!("</{name}");
    let Some(close_at) = tail.get(tag_end..).and_then(|body| find_ignore_ascii_case(body, &close)) else {
        return Some(tail.len());
    };
    let close_start = tag_end + close_at;
    let close_end = tail
        .get(close_start..)
        .and_then(|rest| rest.find('>'))
        .map_or(tail.len(), |end| close_start + end + 1);
    Some(close_end)
}

/// Byte offset of the first ASCII-case-insensitive match of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}
