//! Pensions HTML Parser
//!
//! Turns server-rendered HTML into a [`pensions_dom::Document`] using
//! html5ever, so pages can be enhanced exactly as the browser sees them.

mod parser;

pub use parser::HtmlParser;

use pensions_dom::Document;

/// Parse an HTML string into a document at `about:blank`
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
