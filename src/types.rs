//! Core types and structures for subforge

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for a [`Mutator`](crate::permute::Mutator)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Base domains (hostnames or URLs)
    pub domains: Vec<String>,
    /// Patterns; the built-in set is used when empty
    pub patterns: Vec<String>,
    /// Named payloads; the built-in set is used when empty
    pub payloads: HashMap<String, Vec<String>>,
    /// Maximum number of results written
    pub limit: Option<usize>,
    /// Maximum number of bytes written, line terminators included
    pub max_size: Option<usize>,
    /// Mine words and numbers from the input subdomains into the payloads
    pub enrich: bool,
    /// Drop repeated results, keeping the first occurrence
    pub dedupe: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            patterns: Vec::new(),
            payloads: HashMap::new(),
            limit: None,
            max_size: None,
            enrich: false,
            dedupe: true,
        }
    }
}

impl Options {
    /// Options for the given domains, everything else default
    pub fn with_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Size estimate of a run, computed without generating any result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    /// Upper bound on the number of results
    pub count: usize,
    /// Longest domain-substituted statement in bytes
    pub max_result_len: usize,
}

impl Estimate {
    /// Bytes the dedup stage may have to remember
    pub fn dedupe_budget(&self) -> usize {
        self.count.saturating_mul(self.max_result_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_dedupes() {
        let options = Options::default();
        assert!(options.dedupe);
        assert!(!options.enrich);
        assert!(options.limit.is_none());
    }

    #[test]
    fn test_with_domains() {
        let options = Options::with_domains(["a.example.com", "b.example.com"]);
        assert_eq!(options.domains.len(), 2);
        assert!(options.patterns.is_empty());
    }

    #[test]
    fn test_dedupe_budget_saturates() {
        let estimate = Estimate {
            count: usize::MAX,
            max_result_len: 2,
        };
        assert_eq!(estimate.dedupe_budget(), usize::MAX);
    }
}
