//! Mining payload words from the input subdomains

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::DecomposedDomain;

/// Payload slot that receives mined words
pub const WORD_PAYLOAD: &str = "word";
/// Payload slot that receives mined numbers
pub const NUMBER_PAYLOAD: &str = "number";

struct Extractors {
    alphanumeric: Regex,
    alphabetic: Regex,
    numeric: Regex,
}

fn extractors() -> &'static Extractors {
    static RE: OnceLock<Extractors> = OnceLock::new();
    RE.get_or_init(|| Extractors {
        alphanumeric: Regex::new(r"[a-zA-Z0-9]+").expect("alphanumeric regex is valid"),
        alphabetic: Regex::new(r"[a-zA-Z]{3,}").expect("alphabetic regex is valid"),
        numeric: Regex::new(r"[0-9]+").expect("numeric regex is valid"),
    })
}

/// Tokens mined from subdomain labels
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MinedTokens {
    pub words: Vec<String>,
    pub numbers: Vec<String>,
}

/// Extract word and number tokens from the `sub` and `multi_level` labels
pub fn mine_tokens(inputs: &[DecomposedDomain]) -> MinedTokens {
    let re = extractors();
    let mut words = Vec::new();
    let mut numbers = Vec::new();

    let labels = inputs
        .iter()
        .flat_map(|input| std::iter::once(&input.sub).chain(input.multi_level.iter()))
        .filter(|label| !label.is_empty());

    let mut alphabetic = Vec::new();
    for label in labels {
        words.extend(re.alphanumeric.find_iter(label).map(|m| m.as_str().to_string()));
        alphabetic.extend(re.alphabetic.find_iter(label).map(|m| m.as_str().to_string()));
        numbers.extend(re.numeric.find_iter(label).map(|m| m.as_str().to_string()));
    }
    words.extend(alphabetic);

    MinedTokens {
        words: dedupe_preserving_order(words),
        numbers,
    }
}

/// Merge mined tokens into the `word` and `number` payloads.
///
/// Mined values come first. A slot that is missing or empty is left alone.
pub fn enrich_payloads(inputs: &[DecomposedDomain], payloads: &mut HashMap<String, Vec<String>>) {
    let mined = mine_tokens(inputs);
    merge_into(payloads, WORD_PAYLOAD, mined.words);
    merge_into(payloads, NUMBER_PAYLOAD, mined.numbers);
}

fn merge_into(payloads: &mut HashMap<String, Vec<String>>, name: &str, mined: Vec<String>) {
    let Some(existing) = payloads.get_mut(name) else {
        return;
    };
    if existing.is_empty() {
        return;
    }

    let before = existing.len();
    let mut merged = mined;
    merged.append(existing);
    *existing = dedupe_preserving_order(merged);
    tracing::debug!(payload = name, before, after = existing.len(), "Enriched payload");
}

/// Remove repeated values, keeping the first occurrence
pub fn dedupe_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
