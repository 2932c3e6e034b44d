//! Input domain handling: syntax validation and public-suffix decomposition

pub mod decomposer;
pub mod validator;

// Re-export main functionality
pub use decomposer::{decompose, DecomposedDomain};
pub use validator::DomainValidator;

/// Variable names a decomposed domain can provide (besides `sub1..subN`)
pub const DOMAIN_VARIABLES: &[&str] = &["tld", "etld", "sld", "root", "sub", "suffix"];

/// Whether `name` is one of the variables derived from an input domain
pub fn is_domain_variable(name: &str) -> bool {
    if DOMAIN_VARIABLES.contains(&name) {
        return true;
    }
    name.strip_prefix("sub")
        .map(|index| !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
