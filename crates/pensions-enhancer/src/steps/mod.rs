//! Enhancement steps
//!
//! Each step checks for its elements first; absence is a skip, not an
//! error. Handlers the steps register live next to them.

pub(crate) mod bootstrap;
pub(crate) mod history;
pub(crate) mod show_hide;
pub(crate) mod numeric;
pub(crate) mod links;
pub(crate) mod country;
pub(crate) mod print_view;
pub(crate) mod banner;

use pensions_dom::Selector;

use crate::EnhanceError;

/// Result of a step that ran without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Applied,
    Skipped(&'static str),
}

/// Parse a configured selector
pub(crate) fn selector(text: &str, what: &'static str) -> Result<Selector, EnhanceError> {
    Selector::parse(text).map_err(|source| EnhanceError::Selector { what, source })
}
