//! Print view expansion
//!
//! Collapsed details sections would print as bare summaries, so every
//! section is opened while the page prints and the ones opened here are
//! closed again afterwards. The `print` media query and the
//! before/after-print events may both fire for one print; the ledger makes
//! the second notification a no-op.

use pensions_dom::{EventTarget, EventType, NodeId, Selector};

use crate::page::{Handler, PRINT_MEDIA};
use crate::steps::{selector, StepStatus};
use crate::{Capabilities, EnhanceError, EnhancedPage, EnhancerConfig};

/// Marks a section opened for printing
const PRINT_OPEN_CLASS: &str = "print--open";
/// Summary styling while printing
const SUMMARY_CLASS: &str = "heading-medium";

/// Details sections opened for the current print
#[derive(Debug, Clone, Default)]
pub(crate) struct PrintExpansion {
    details: Option<Selector>,
    active: bool,
    opened: Vec<NodeId>,
    /// Summaries given the print styling, which they did not already carry
    styled: Vec<NodeId>,
}

impl PrintExpansion {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn opened(&self) -> &[NodeId] {
        &self.opened
    }
}

/// Focus and scroll position held across a print toggle
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FocusSnapshot {
    focused: Option<NodeId>,
    scroll_x: f64,
    scroll_y: f64,
}

impl FocusSnapshot {
    fn capture(page: &EnhancedPage) -> Self {
        Self {
            focused: page.document.active_element(),
            scroll_x: page.window.page_x_offset(),
            scroll_y: page.window.page_y_offset(),
        }
    }

    fn restore(self, page: &mut EnhancedPage) {
        match self.focused {
            Some(node) => page.focus(node),
            None => page.blur(),
        }
        page.window.scroll_to(self.scroll_x, self.scroll_y);
    }
}

pub(crate) fn run(
    page: &mut EnhancedPage,
    caps: &Capabilities,
    config: &EnhancerConfig,
) -> Result<StepStatus, EnhanceError> {
    if !config.print_expansion {
        return Ok(StepStatus::Skipped("disabled by configuration"));
    }
    let details = selector(&config.selectors.details, "details")?;
    if !caps.match_media && !caps.print_events {
        return Ok(StepStatus::Skipped("browser reports no print notifications"));
    }
    page.print_expansion.details = Some(details);

    if caps.match_media {
        page.listeners.add(
            EventTarget::MediaQuery(PRINT_MEDIA.to_string()),
            EventType::Change,
            Handler::PrintMediaChange,
        );
    }
    if caps.print_events {
        page.listeners.add(EventTarget::Window, EventType::BeforePrint, Handler::BeforePrint);
        page.listeners.add(EventTarget::Window, EventType::AfterPrint, Handler::AfterPrint);
    }
    Ok(StepStatus::Applied)
}

impl EnhancedPage {
    /// Whether details sections are currently expanded for printing
    pub fn is_print_expanded(&self) -> bool {
        self.print_expansion.is_active()
    }

    /// Sections the current print opened
    pub fn print_opened(&self) -> &[NodeId] {
        self.print_expansion.opened()
    }

    pub(crate) fn before_print(&mut self) {
        if self.print_expansion.active {
            return;
        }
        let Some(selector) = self.print_expansion.details.clone() else {
            return;
        };
        let snapshot = FocusSnapshot::capture(self);

        let root = self.document.tree.root();
        let mut opened = Vec::new();
        let mut styled = Vec::new();
        for details in self.document.select_all(root, &selector) {
            if self.details_open(details) {
                continue;
            }
            let summary = self.summary_of(details);
            if let Some(summary) = summary.filter(|&s| !self.document.has_class(s, SUMMARY_CLASS)) {
                self.document.add_class(summary, SUMMARY_CLASS);
                styled.push(summary);
            }
            self.document.add_class(details, PRINT_OPEN_CLASS);
            self.set_details_open(details, summary, true);
            opened.push(details);
        }

        tracing::debug!("Opened {} details sections for printing", opened.len());
        self.print_expansion.opened = opened;
        self.print_expansion.styled = styled;
        self.print_expansion.active = true;
        snapshot.restore(self);
    }

    pub(crate) fn after_print(&mut self) {
        if !self.print_expansion.active {
            return;
        }
        let snapshot = FocusSnapshot::capture(self);

        for summary in std::mem::take(&mut self.print_expansion.styled) {
            self.document.remove_class(summary, SUMMARY_CLASS);
        }

        let opened = std::mem::take(&mut self.print_expansion.opened);
        for &details in &opened {
            if !self.document.has_class(details, PRINT_OPEN_CLASS) {
                continue;
            }
            self.document.remove_class(details, PRINT_OPEN_CLASS);
            let summary = self.summary_of(details);
            self.set_details_open(details, summary, false);
        }

        tracing::debug!("Closed {} details sections after printing", opened.len());
        self.print_expansion.active = false;
        snapshot.restore(self);
    }

    fn summary_of(&self, details: NodeId) -> Option<NodeId> {
        self.document
            .tree
            .element_children(details)
            .find(|&c| self.document.tag_name(c) == Some("summary"))
    }

    /// Polyfilled sections toggle through their summary; native ones take
    /// the `open` attribute directly
    fn set_details_open(&mut self, details: NodeId, summary: Option<NodeId>, open: bool) {
        if self.details_open(details) == open {
            return;
        }
        match summary {
            Some(summary) if self.capabilities.details_polyfill => {
                self.click(summary);
            }
            _ if open => self.document.set_attr(details, "open", "open"),
            _ => {
                self.document.remove_attr(details, "open");
            }
        }
    }
}
