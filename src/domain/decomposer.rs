//! Split a hostname or URL into its public-suffix components

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::{Host, Url};

use super::validator::DomainValidator;
use crate::error::{Result, SubforgeError};

/// Canonical components of an input hostname.
///
/// For `nested.multilevel.scanme.co.uk`:
/// `tld = uk`, `etld = co.uk`, `sld = scanme`, `root = scanme.co.uk`,
/// `sub = nested`, `suffix = multilevel.scanme.co.uk`, `multi_level = [multilevel]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecomposedDomain {
    /// Rightmost label of the public suffix
    pub tld: String,
    /// Multi-label public suffix, empty when the suffix is a single label
    pub etld: String,
    /// Label directly left of the public suffix
    pub sld: String,
    /// Registrable domain (eTLD+1)
    pub root: String,
    /// Leftmost label of the subdomain prefix, empty for a bare root
    pub sub: String,
    /// Hostname without `sub`; equal to `root` when there is no prefix
    pub suffix: String,
    /// Prefix labels between `sub` and `root`, left to right
    pub multi_level: Vec<String>,
}

impl DecomposedDomain {
    /// Parse a hostname or URL
    pub fn parse(raw: &str) -> Result<Self> {
        decompose(raw)
    }

    /// Full hostname these components were built from
    pub fn hostname(&self) -> String {
        if self.sub.is_empty() {
            self.suffix.clone()
        } else {
            format!("{}.{}", self.sub, self.suffix)
        }
    }

    /// Variable projection used by pattern substitution.
    ///
    /// Keys: `tld, etld, sld, root, sub, suffix, sub1..subN`. Empty values are omitted.
    pub fn variables(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        let fixed = [
            ("tld", &self.tld),
            ("etld", &self.etld),
            ("sld", &self.sld),
            ("root", &self.root),
            ("sub", &self.sub),
            ("suffix", &self.suffix),
        ];
        for (key, value) in fixed {
            if !value.is_empty() {
                vars.insert(key.to_string(), value.clone());
            }
        }
        for (index, label) in self.multi_level.iter().enumerate() {
            if !label.is_empty() {
                vars.insert(format!("sub{}", index + 1), label.clone());
            }
        }
        vars
    }
}

/// Decompose a hostname or URL into [`DecomposedDomain`].
///
/// Scheme, credentials, port, path and query are discarded. A leading `*.` is
/// stripped; any other wildcard is rejected.
pub fn decompose(raw: &str) -> Result<DecomposedDomain> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(SubforgeError::decompose(raw, "empty hostname"));
    }

    let input = strip_leading_wildcard(input);
    let mut hostname = match extract_hostname(&input) {
        Ok(host) => host,
        Err(_) if input.contains('*') => return Err(wildcard_error(raw)),
        Err(e) => return Err(e),
    };
    if let Some(stripped) = hostname.strip_suffix('.') {
        hostname = stripped.to_string();
    }
    if hostname.contains('*') {
        return Err(wildcard_error(raw));
    }

    DomainValidator::new()
        .validate(&hostname)
        .map_err(|e| SubforgeError::decompose(raw, e.to_string()))?;

    let suffix = psl::suffix_str(&hostname)
        .ok_or_else(|| SubforgeError::decompose(raw, "failed to extract public suffix"))?;

    let mut domain = DecomposedDomain::default();
    match suffix.rsplit_once('.') {
        Some((_, tld)) => {
            domain.etld = suffix.to_string();
            domain.tld = tld.to_string();
        }
        None => domain.tld = suffix.to_string(),
    }

    let root = psl::domain_str(&hostname).ok_or_else(|| {
        SubforgeError::decompose(
            raw,
            format!("'{}' appears to be a public suffix without a registered domain", hostname),
        )
    })?;
    domain.root = root.to_string();
    domain.sld = root
        .strip_suffix(suffix)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(root)
        .to_string();

    let prefix = hostname
        .strip_suffix(root)
        .map(|rest| rest.trim_end_matches('.'))
        .unwrap_or_default();

    match prefix.split_once('.') {
        Some((first, rest)) => {
            domain.sub = first.to_string();
            domain.multi_level = rest.split('.').map(str::to_string).collect();
        }
        None => domain.sub = prefix.to_string(),
    }

    domain.suffix = if domain.sub.is_empty() {
        hostname.clone()
    } else {
        hostname
            .strip_prefix(&format!("{}.", domain.sub))
            .unwrap_or(&hostname)
            .to_string()
    };

    tracing::trace!(input = %raw, root = %domain.root, sub = %domain.sub, "decomposed domain");
    Ok(domain)
}

fn wildcard_error(raw: &str) -> SubforgeError {
    SubforgeError::decompose(raw, "wildcard in middle of domain not supported")
}

/// Drop a single `*.` in front of the host, with or without a scheme
fn strip_leading_wildcard(input: &str) -> String {
    if let Some(rest) = input.strip_prefix("*.") {
        return rest.to_string();
    }
    match input.split_once("://") {
        Some((scheme, rest)) => match rest.strip_prefix("*.") {
            Some(host) => format!("{}://{}", scheme, host),
            None => input.to_string(),
        },
        None => input.to_string(),
    }
}

/// Pull the host out of a bare hostname or URL
fn extract_hostname(input: &str) -> Result<String> {
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{}", input)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| SubforgeError::decompose(input, format!("failed to parse URL: {}", e)))?;

    match url.host() {
        Some(Host::Domain(host)) if !host.is_empty() => Ok(host.to_string()),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Err(SubforgeError::decompose(
            input,
            "IP addresses have no registrable domain",
        )),
        _ => Err(SubforgeError::decompose(input, "empty hostname in URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect(tld: &str, etld: &str, sld: &str, root: &str, sub: &str, suffix: &str, multi: &[&str]) -> DecomposedDomain {
        DecomposedDomain {
            tld: tld.into(),
            etld: etld.into(),
            sld: sld.into(),
            root: root.into(),
            sub: sub.into(),
            suffix: suffix.into(),
            multi_level: multi.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_root_only_variants() {
        let expected = expect("uk", "co.uk", "scanme", "scanme.co.uk", "", "scanme.co.uk", &[]);
        for input in ["scanme.co.uk", "https://scanme.co.uk", "scanme.co.uk:443", "https://scanme.co.uk:443"] {
            assert_eq!(decompose(input).unwrap(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_subdomains() {
        let cases = [
            ("something.scanme.sh", expect("sh", "", "scanme", "scanme.sh", "something", "scanme.sh", &[])),
            (
                "nested.something.scanme.sh",
                expect("sh", "", "scanme", "scanme.sh", "nested", "something.scanme.sh", &["something"]),
            ),
            (
                "nested.multilevel.scanme.co.uk",
                expect("uk", "co.uk", "scanme", "scanme.co.uk", "nested", "multilevel.scanme.co.uk", &["multilevel"]),
            ),
            (
                "sub.level1.level2.scanme.sh",
                expect("sh", "", "scanme", "scanme.sh", "sub", "level1.level2.scanme.sh", &["level1", "level2"]),
            ),
            ("scanme.sh", expect("sh", "", "scanme", "scanme.sh", "", "scanme.sh", &[])),
        ];
        for (input, expected) in cases {
            assert_eq!(decompose(input).unwrap(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_full_url() {
        let d = decompose("https://a.b.example.co.uk:443/x").unwrap();
        assert_eq!(d.tld, "uk");
        assert_eq!(d.etld, "co.uk");
        assert_eq!(d.sld, "example");
        assert_eq!(d.root, "example.co.uk");
        assert_eq!(d.sub, "a");
        assert_eq!(d.multi_level, vec!["b"]);
        assert_eq!(d.suffix, "b.example.co.uk");
    }

    #[test]
    fn test_sub_suffix_invariants() {
        for input in ["api.example.com", "a.b.c.d.e.f.example.com", "example.com", "x.y.example.com.au"] {
            let d = decompose(input).unwrap();
            if d.sub.is_empty() {
                assert_eq!(d.suffix, d.root);
            } else {
                assert_eq!(format!("{}.{}", d.sub, d.suffix), input);
            }
            assert_eq!(d.hostname(), input);
        }
    }

    #[test]
    fn test_errors() {
        for input in [
            "ht!tp://invalid",
            ".com",
            "co.uk",
            "com",
            "api.*.example.com",
            "*.*.example.com",
            "",
            "   ",
            "http://127.0.0.1",
        ] {
            assert!(decompose(input).is_err(), "expected error for {input:?}");
        }
    }

    #[test]
    fn test_wildcards() {
        let d = decompose("*.example.com").unwrap();
        assert_eq!(d.root, "example.com");
        assert_eq!(d.sld, "example");
        assert_eq!(d.tld, "com");
        assert!(d.sub.is_empty());

        let d = decompose("*.api.example.com").unwrap();
        assert_eq!(d.root, "example.com");
        assert_eq!(d.sub, "api");

        let d = decompose("https://*.dev.example.org/login").unwrap();
        assert_eq!(d.root, "example.org");
        assert_eq!(d.sub, "dev");

        assert!(decompose("api.*.example.com").is_err());
    }

    #[test]
    fn test_edge_cases() {
        let d = decompose("a.b.c.d.e.f.example.com").unwrap();
        assert_eq!(d.sub, "a");
        assert_eq!(d.multi_level, vec!["b", "c", "d", "e", "f"]);

        assert_eq!(decompose("123.example.com").unwrap().sub, "123");
        assert_eq!(decompose("api-v1.example.com").unwrap().sub, "api-v1");
        assert_eq!(decompose("API.Example.COM").unwrap().sub, "api");

        let d = decompose("https://api.example.com/path/to/resource?q=1").unwrap();
        assert_eq!(d.sub, "api");
        assert_eq!(d.root, "example.com");

        assert_eq!(decompose("example.com.").unwrap().root, "example.com");
    }

    #[test]
    fn test_different_tlds() {
        let cases = [
            ("example.com", "com", "", "example"),
            ("example.co.uk", "uk", "co.uk", "example"),
            ("example.org", "org", "", "example"),
            ("example.com.au", "au", "com.au", "example"),
            ("example.ac.uk", "uk", "ac.uk", "example"),
        ];
        for (input, tld, etld, sld) in cases {
            let d = decompose(input).unwrap();
            assert_eq!(d.tld, tld);
            assert_eq!(d.etld, etld);
            assert_eq!(d.sld, sld);
        }
    }

    #[test]
    fn test_variables() {
        let vars = decompose("api.example.com").unwrap().variables();
        assert_eq!(vars["sub"], "api");
        assert_eq!(vars["root"], "example.com");
        assert_eq!(vars["sld"], "example");
        assert_eq!(vars["tld"], "com");
        assert!(!vars.contains_key("etld"));

        let vars = decompose("a.b.c.d.example.com").unwrap().variables();
        assert_eq!(vars["sub1"], "b");
        assert_eq!(vars["sub2"], "c");
        assert_eq!(vars["sub3"], "d");

        let vars = decompose("api.example.co.uk").unwrap().variables();
        assert_eq!(vars["etld"], "co.uk");
        assert_eq!(vars["tld"], "uk");

        let d = decompose("example.com").unwrap();
        let vars = d.variables();
        assert!(!vars.contains_key("sub"));
        assert!(vars.values().all(|v| !v.is_empty()));
        assert_eq!(vars, d.variables());
    }
}
