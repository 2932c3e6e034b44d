//! Permutation generation: cartesian expansion, the mutator pipeline and its stages

pub mod cartesian;
pub mod dedupe;
pub mod defaults;
pub mod enrich;
pub mod mutator;
pub mod session;

// Re-export main functionality
pub use cartesian::{expand, ValueSets};
pub use dedupe::Deduplicator;
pub use defaults::{default_patterns, default_payloads};
pub use enrich::{enrich_payloads, mine_tokens, MinedTokens};
pub use mutator::Mutator;
pub use session::{ExecutionSession, SkipReason};
