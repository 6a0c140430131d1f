//! Component library seam
//!
//! The UI and government-service component libraries render and wire
//! their own markup. The enhancer only calls their batch initialisers.

use pensions_dom::Document;

/// Error reported by a component library's initialiser
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("{0}")]
    Init(String),
}

/// A component library with an `initAll`-style entry point
pub trait ComponentLibrary {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    /// Initialise every component found in the document
    fn init_all(&self, document: &mut Document) -> Result<(), LibraryError>;
}
