//! Capability probe
//!
//! All feature detection happens here, once, before any step runs.

use pensions_dom::Document;

use crate::Window;

/// What the current browser and page support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// `history.replaceState` exists
    pub history_replace: bool,
    /// `window.matchMedia` exists
    pub match_media: bool,
    /// `onbeforeprint`/`onafterprint` exist
    pub print_events: bool,
    /// Touch input (Modernizr `touchevents` class or the window says so)
    pub touch: bool,
    /// Firefox, which mishandles trailing zeroes in number inputs
    pub firefox: bool,
    /// `<details>` is polyfilled (`no-details` class on the root)
    pub details_polyfill: bool,
}

impl Capabilities {
    /// Probe the window and the rendered document
    pub fn probe(document: &Document, window: &Window) -> Self {
        let features = window.features();
        let root_has = |class: &str| {
            document
                .document_element()
                .is_some_and(|html| document.has_class(html, class))
        };
        Self {
            history_replace: features.history_replace_state,
            match_media: features.match_media,
            print_events: features.print_events,
            touch: features.touch_events || root_has("touchevents"),
            firefox: window.user_agent().contains("Firefox"),
            details_polyfill: root_has("no-details"),
        }
    }

    /// Whether currency fields should switch to numeric keyboards
    pub fn numeric_keyboard(&self) -> bool {
        self.touch && !self.firefox
    }
}
