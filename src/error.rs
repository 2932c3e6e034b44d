//! Error handling for subforge

use thiserror::Error;

/// Main error type for subforge
#[derive(Error, Debug, Clone)]
pub enum SubforgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to decompose '{input}': {message}")]
    Decompose { input: String, message: String },

    #[error("Pattern '{pattern}' references unavailable variables: {}", .missing.join(", "))]
    MissingVariables {
        pattern: String,
        missing: Vec<String>,
    },

    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl SubforgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a decomposition error for a single input
    pub fn decompose(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decompose {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a coverage error; each missing name is rendered as `{{name}}`
    pub fn missing_variables<I, S>(pattern: impl Into<String>, missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::MissingVariables {
            pattern: pattern.into(),
            missing: missing
                .into_iter()
                .map(|name| format!("{{{{{}}}}}", name.as_ref()))
                .collect(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Whether the run stopped because its cancellation token fired.
    ///
    /// Callers should treat this as an expected shutdown rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your domains, patterns and payloads", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Decompose { input, message } => {
                format!("⚠️  Could not parse domain '{}': {}", input, message)
            }
            Self::MissingVariables { pattern, missing } => {
                format!(
                    "⚠️  Pattern '{}' cannot be used: missing {}\n💡 Provide a payload for each variable",
                    pattern,
                    missing.join(", ")
                )
            }
            Self::Sink { message } => {
                format!("❌ Output error: {}\n💡 Check the output destination", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 Check the config file syntax", message)
            }
            Self::Cancelled => "⚠️  Operation cancelled".to_string(),
        }
    }
}

/// Convert from common error types
impl From<std::io::Error> for SubforgeError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<serde_json::Error> for SubforgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<serde_yaml::Error> for SubforgeError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SubforgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::SubforgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SubforgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::SubforgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SubforgeError::validation(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variables_rendering() {
        let err = SubforgeError::missing_variables("{{a}}.{{b}}", ["a", "b"]);
        let text = err.to_string();
        assert!(text.contains("{{a}}"));
        assert!(text.contains("{{b}}"));
    }

    #[test]
    fn test_cancelled_is_distinguished() {
        assert!(SubforgeError::Cancelled.is_cancelled());
        assert!(!SubforgeError::sink("x").is_cancelled());
    }

    #[test]
    fn test_macros() {
        let err = config_error!("no domains {}", 1);
        assert!(err.to_string().contains("no domains 1"));
        let err = validation_error!("bad");
        assert!(matches!(err, SubforgeError::Validation { .. }));
        assert!(err.user_message().contains("bad"));
    }
}
