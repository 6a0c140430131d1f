//! Enhancer errors

use pensions_dom::SelectorError;

use crate::autocomplete::AutocompleteError;
use crate::library::LibraryError;

/// Failure of a single enhancement step
///
/// Never fatal: the enhancer records it and moves on to the next step.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("Invalid {what} selector: {source}")]
    Selector {
        what: &'static str,
        #[source]
        source: SelectorError,
    },

    #[error("Component library `{name}` failed to initialise: {source}")]
    Library {
        name: String,
        #[source]
        source: LibraryError,
    },

    #[error("Autocomplete enhancement failed: {0}")]
    Autocomplete(#[from] AutocompleteError),
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid enhancer configuration: {0}")]
    Json(#[from] serde_json::Error),
}
