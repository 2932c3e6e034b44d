//! Built-in permutation patterns and payloads
//!
//! Used whenever the caller supplies no patterns or no payloads.

use std::collections::HashMap;

/// Default patterns
pub const DEFAULT_PATTERNS: &[&str] = &[
    // Dash joins
    "{{sub}}-{{word}}.{{suffix}}",  // api-prod.scanme.sh
    "{{word}}-{{sub}}.{{suffix}}",  // prod-api.scanme.sh
    // Extra level
    "{{word}}.{{sub}}.{{suffix}}",  // prod.api.scanme.sh
    "{{sub}}.{{word}}.{{suffix}}",  // api.prod.scanme.sh
    // Numbering
    "{{sub}}{{number}}.{{suffix}}", // api1.scanme.sh
    "{{sub}}-{{number}}.{{suffix}}", // api-1.scanme.sh
    // Concatenation
    "{{sub}}{{word}}.{{suffix}}",   // apiprod.scanme.sh
    "{{word}}{{sub}}.{{suffix}}",   // prodapi.scanme.sh
    // Regions
    "{{region}}.{{sub}}.{{suffix}}", // us-east-1.api.scanme.sh
    "{{sub}}.{{region}}.{{suffix}}", // api.us-east-1.scanme.sh
    // New subdomains directly under the root
    "{{word}}.{{root}}",            // prod.scanme.sh
];

/// Default `word` payload
pub const DEFAULT_WORDS: &[&str] = &[
    "admin", "alpha", "api", "app", "assets", "auth", "backup", "beta", "cdn", "ci",
    "cloud", "corp", "dashboard", "data", "db", "demo", "dev", "devel", "docs", "edge",
    "git", "gateway", "grafana", "internal", "jenkins", "k8s", "lab", "lib", "login", "mail",
    "mobile", "monitor", "new", "old", "ops", "portal", "preprod", "prod", "proxy", "qa",
    "sandbox", "secure", "sso", "stage", "staging", "static", "status", "test", "uat", "vpn",
    "web", "wp",
];

/// Default `number` payload
pub const DEFAULT_NUMBERS: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "01", "02", "03"];

/// Default `region` payload
pub const DEFAULT_REGIONS: &[&str] = &[
    "us-east-1", "us-east-2", "us-west-1", "us-west-2", "eu-west-1", "eu-west-2", "eu-central-1",
    "ap-south-1", "ap-southeast-1", "ap-southeast-2", "ap-northeast-1", "sa-east-1",
];

/// Default patterns as owned strings
pub fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|s| s.to_string()).collect()
}

/// Default payloads as owned strings
pub fn default_payloads() -> HashMap<String, Vec<String>> {
    [("word", DEFAULT_WORDS), ("number", DEFAULT_NUMBERS), ("region", DEFAULT_REGIONS)]
        .into_iter()
        .map(|(name, values)| (name.to_string(), values.iter().map(|s| s.to_string()).collect()))
        .collect()
}
