//! Pensions Frontend Page Enhancer
//!
//! Progressive enhancement for the manage-pension-schemes pages: component
//! library bootstrap, history sanitization, back and print links, the
//! country autocomplete, numeric input hardening, print view expansion,
//! show/hide content and the user-research banner.
//!
//! # Example
//! ```rust,ignore
//! use pensions_enhancer::{PageEnhancer, EnhancerConfig, Window};
//!
//! let document = pensions_html::parse(html)?;
//! let window = Window::new(document.url());
//! let mut page = PageEnhancer::new(EnhancerConfig::default()).initialize(document, window);
//! page.click(back_link);
//! ```

mod autocomplete;
mod capabilities;
mod config;
mod enhancer;
mod error;
mod library;
mod page;
mod report;
mod steps;
mod window;

pub use autocomplete::{AccessibleAutocomplete, Autocomplete, AutocompleteError, AutocompleteOptions, Combobox};
pub use capabilities::Capabilities;
pub use config::{BannerText, EnhancerConfig, Selectors, Variant};
pub use enhancer::{initialize, PageEnhancer};
pub use error::{ConfigError, EnhanceError};
pub use library::{ComponentLibrary, LibraryError};
pub use page::{EnhancedPage, Handler, PRINT_MEDIA};
pub use report::{EnhancementReport, Step, StepOutcome};
pub use steps::StepStatus;
pub use window::{Features, History, HistoryEntry, Navigation, Window};

// Re-export the DOM for callers driving pages
pub use pensions_dom as dom;

/// Enhancer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
