//! Placeholder scanning, coverage checks and substitution

use std::fmt::Display;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, SubforgeError};
use crate::validation_error;

/// Opening marker of a placeholder
pub const PLACEHOLDER_OPEN: &str = "{{";
/// Closing marker of a placeholder
pub const PLACEHOLDER_CLOSE: &str = "}}";
/// Secondary marker, used on both sides of the name (`§name§`)
pub const GENERAL_MARKER: &str = "§";

fn variable_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder regex is valid"))
}

/// Count well-formed `{{identifier}}` placeholders, repeats included
pub fn count_variables(pattern: &str) -> usize {
    variable_regex().find_iter(pattern).count()
}

/// Extract placeholder names left to right, duplicates preserved
pub fn extract_variables(pattern: &str) -> Vec<String> {
    variable_regex()
        .captures_iter(pattern)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Check that every variable referenced by `pattern` is available.
///
/// The error lists every absent name, not only the first one.
pub fn check_coverage<F>(pattern: &str, is_available: F) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    let mut missing: Vec<String> = Vec::new();
    for name in extract_variables(pattern) {
        if !is_available(&name) && !missing.contains(&name) {
            missing.push(name);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SubforgeError::missing_variables(pattern, missing))
    }
}

/// Replace every `{{name}}` and `§name§` whose name has a value.
///
/// Placeholders without a value are left verbatim so a pattern silently
/// keeps its unresolved parts. The pattern is scanned once: inserted values
/// are never substituted again. Where two placeholders start at the same
/// position the longer one wins.
pub fn substitute<I, K, V>(pattern: &str, values: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    if !pattern.contains(PLACEHOLDER_OPEN) && !pattern.contains(GENERAL_MARKER) {
        return pattern.to_string();
    }

    let mut tokens: Vec<(String, String)> = Vec::new();
    for (name, value) in values {
        let name = name.as_ref();
        let value = value.to_string();
        tokens.push((format!("{PLACEHOLDER_OPEN}{name}{PLACEHOLDER_CLOSE}"), value.clone()));
        tokens.push((format!("{GENERAL_MARKER}{name}{GENERAL_MARKER}"), value));
    }
    tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut result = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(pos) = rest.find(|c: char| c == '{' || c == '§') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match tokens.iter().find(|(token, _)| tail.starts_with(token.as_str())) {
            Some((token, value)) => {
                result.push_str(value);
                rest = &tail[token.len()..];
            }
            None => {
                let width = tail.chars().next().map_or(1, char::len_utf8);
                result.push_str(&tail[..width]);
                rest = &tail[width..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Verify that every opening marker has a matching closing marker.
pub fn validate_syntax(pattern: &str) -> Result<()> {
    let mut rest = pattern;
    let mut offset = 0;

    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        let after_open = &rest[start + PLACEHOLDER_OPEN.len()..];
        match after_open.find(PLACEHOLDER_CLOSE) {
            Some(end) => {
                let consumed = start + PLACEHOLDER_OPEN.len() + end + PLACEHOLDER_CLOSE.len();
                offset += consumed;
                rest = &rest[consumed..];
            }
            None => {
                return Err(validation_error!(
                    "pattern '{}' has an unclosed '{}' at byte {}",
                    pattern,
                    PLACEHOLDER_OPEN,
                    offset + start
                ));
            }
        }
    }
    Ok(())
}
