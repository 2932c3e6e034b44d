//! Subforge - subdomain permutation generator
//!
//! Decomposes input domains, fills pattern templates with payload words and
//! streams the resulting candidate names for downstream resolution.

pub mod config;
pub mod domain;
pub mod error;
pub mod permute;
pub mod template;
pub mod types;

// Re-export commonly used types
pub use config::PermutationConfig;
pub use error::{Result, SubforgeError};
pub use types::{Estimate, Options};

// Re-export main functionality
pub use domain::{decompose, DecomposedDomain};
pub use permute::Mutator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
