//! Pattern templates: `{{name}}` placeholders and their substitution.

mod engine;

pub use engine::{
    check_coverage, count_variables, extract_variables, substitute, validate_syntax,
    GENERAL_MARKER, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN,
};
