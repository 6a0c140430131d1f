//! Back and print links
//!
//! Both links carry a real href so they work without script. Once
//! enhanced, clicks stay on the page: the back link walks history and
//! the print link opens the print dialog.

use pensions_dom::{Event, EventTarget, EventType};

use crate::page::Handler;
use crate::steps::{selector, StepStatus};
use crate::{EnhanceError, EnhancedPage, EnhancerConfig};

pub(crate) fn run_back_link(page: &mut EnhancedPage, config: &EnhancerConfig) -> Result<StepStatus, EnhanceError> {
    intercept(page, &config.selectors.back_link, "back link", Handler::BackLink)
}

pub(crate) fn run_print_link(page: &mut EnhancedPage, config: &EnhancerConfig) -> Result<StepStatus, EnhanceError> {
    intercept(page, &config.selectors.print_link, "print link", Handler::PrintLink)
}

fn intercept(
    page: &mut EnhancedPage,
    selector_text: &str,
    what: &'static str,
    handler: Handler,
) -> Result<StepStatus, EnhanceError> {
    let selector = selector(selector_text, what)?;
    let root = page.document.tree.root();
    let Some(link) = page.document.select(root, &selector) else {
        return Ok(StepStatus::Skipped("link not on page"));
    };
    page.listeners.add(EventTarget::Node(link), EventType::Click, handler);
    Ok(StepStatus::Applied)
}

impl EnhancedPage {
    pub(crate) fn on_back_link(&mut self, event: &mut Event) {
        event.prevent_default();
        self.window.back();
    }

    pub(crate) fn on_print_link(&mut self, event: &mut Event) {
        event.prevent_default();
        self.print();
    }
}
