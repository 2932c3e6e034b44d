//! Permutation config files (patterns and payloads) and wordlist loading

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, MAIN_SEPARATOR};

use crate::error::{Result, SubforgeError};
use crate::permute::{default_patterns, default_payloads};

/// Patterns and payloads as read from a YAML or JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermutationConfig {
    pub patterns: Vec<String>,
    pub payloads: HashMap<String, Vec<String>>,
}

impl PermutationConfig {
    /// The embedded default pattern and payload set
    pub fn builtin() -> Self {
        Self {
            patterns: default_patterns(),
            payloads: default_payloads(),
        }
    }

    /// Load a config file. `.json` files are parsed as JSON, anything else as YAML.
    ///
    /// Payload entries that look like file paths are replaced by the lines of
    /// that file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SubforgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        let mut config = Self::parse(&content, is_json(path))?;
        config.resolve_wordlists();
        tracing::debug!(
            path = %path.display(),
            patterns = config.patterns.len(),
            payloads = config.payloads.len(),
            "Loaded permutation config"
        );
        Ok(config)
    }

    /// Parse config text; blank input is an empty config
    pub fn parse(content: &str, json: bool) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let parsed: std::result::Result<Self, String> = if json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| SubforgeError::parse(message, Some(content.to_string())))
    }

    /// Expand wordlist file references in the payloads
    pub fn resolve_wordlists(&mut self) {
        for values in self.payloads.values_mut() {
            *values = resolve_payload_values(std::mem::take(values));
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Whether a payload entry names a wordlist file rather than a literal value
pub fn is_wordlist_reference(entry: &str) -> bool {
    entry.contains('/') || entry.contains(MAIN_SEPARATOR)
}

/// Replace wordlist references with their lines. Unreadable files are skipped.
pub fn resolve_payload_values(values: Vec<String>) -> Vec<String> {
    let mut resolved = Vec::with_capacity(values.len());
    for value in values {
        if !is_wordlist_reference(&value) {
            resolved.push(value);
            continue;
        }
        match load_wordlist(Path::new(&value)) {
            Ok(words) => resolved.extend(words),
            Err(e) => tracing::warn!(path = %value, error = %e, "Skipping unreadable wordlist"),
        }
    }
    resolved
}

/// Read a file of one entry per line; lines are trimmed and blank lines dropped
pub fn load_wordlist(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SubforgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
