//! Hostname syntax validation

use crate::error::{Result, SubforgeError};

/// Maximum length of a full hostname in bytes
pub const MAX_HOSTNAME_LEN: usize = 253;
/// Maximum length of a single label in bytes
pub const MAX_LABEL_LEN: usize = 63;

/// Label-level syntax checks applied to a hostname before decomposition.
///
/// Labels follow LDH rules plus underscores, so service labels like
/// `_dmarc` pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainValidator;

impl DomainValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a lowercase ASCII hostname
    pub fn validate(&self, hostname: &str) -> Result<()> {
        self.validate_format(hostname)?;
        self.validate_length(hostname)?;

        for label in hostname.split('.') {
            self.validate_label(hostname, label)?;
        }
        Ok(())
    }

    fn validate_format(&self, hostname: &str) -> Result<()> {
        if hostname.is_empty() {
            return Err(SubforgeError::validation("hostname cannot be empty"));
        }

        if hostname.starts_with('.') || hostname.ends_with('.') {
            return Err(SubforgeError::validation(format!(
                "hostname '{}' cannot start or end with a dot",
                hostname
            )));
        }

        if hostname.contains("..") {
            return Err(SubforgeError::validation(format!(
                "hostname '{}' contains an empty label",
                hostname
            )));
        }

        Ok(())
    }

    fn validate_length(&self, hostname: &str) -> Result<()> {
        if hostname.len() > MAX_HOSTNAME_LEN {
            return Err(SubforgeError::validation(format!(
                "hostname too long ({} bytes, max {})",
                hostname.len(),
                MAX_HOSTNAME_LEN
            )));
        }
        Ok(())
    }

    fn validate_label(&self, hostname: &str, label: &str) -> Result<()> {
        if label.is_empty() {
            return Err(SubforgeError::validation(format!(
                "hostname '{}' contains an empty label",
                hostname
            )));
        }

        if label.len() > MAX_LABEL_LEN {
            return Err(SubforgeError::validation(format!(
                "label '{}' too long (max {} characters)",
                label, MAX_LABEL_LEN
            )));
        }

        let valid = label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(SubforgeError::validation(format!(
                "label '{}' contains invalid characters",
                label
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_validation() {
        let validator = DomainValidator::new();

        assert!(validator.validate("example.com").is_ok());
        assert!(validator.validate("sub.example.com").is_ok());
        assert!(validator.validate("api-v1.example.com").is_ok());
        assert!(validator.validate("_dmarc.example.com").is_ok());
        assert!(validator.validate("xn--bcher-kva.example").is_ok());

        assert!(validator.validate("").is_err());
        assert!(validator.validate(".com").is_err());
        assert!(validator.validate("example..com").is_err());
        assert!(validator.validate("exa mple.com").is_err());
        assert!(validator.validate("*.example.com").is_err());
    }

    #[test]
    fn test_label_charset() {
        let validator = DomainValidator::new();
        assert!(validator.validate("_dmarc.example.com").is_ok());
        assert!(validator.validate("_sip._tcp.example.com").is_ok());
        assert!(validator.validate("Example.com").is_err());
        assert!(validator.validate("api!.example.com").is_err());
    }

    #[test]
    fn test_length_limits() {
        let validator = DomainValidator::new();
        let long_label = "a".repeat(MAX_LABEL_LEN + 1);
        assert!(validator.validate(&format!("{}.example.com", long_label)).is_err());

        let label = "a".repeat(60);
        let long_host = vec![label.as_str(); 5].join(".");
        assert!(validator.validate(&long_host).is_err());
    }
}
