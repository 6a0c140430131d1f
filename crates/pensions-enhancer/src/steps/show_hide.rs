//! Show/hide content
//!
//! A radio or checkbox whose wrapper carries `data-target` reveals the
//! element with that id while it is checked.

use pensions_dom::{EventTarget, EventType, NodeId};

use crate::page::{Dispatch, Handler};
use crate::steps::{selector, StepStatus};
use crate::{EnhanceError, EnhancedPage, EnhancerConfig};

const HIDDEN_CLASS: &str = "js-hidden";

pub(crate) fn run(page: &mut EnhancedPage, config: &EnhancerConfig) -> Result<StepStatus, EnhanceError> {
    if !config.show_hide_content {
        return Ok(StepStatus::Skipped("disabled by configuration"));
    }
    let selector = selector(&config.selectors.show_hide_inputs, "show/hide input")?;
    let root = page.document.tree.root();

    let mut controls: Vec<NodeId> = Vec::new();
    let mut wired = 0;
    for input in page.document.select_all(root, &selector) {
        let Some(target_id) = page.target_id(input) else {
            continue;
        };
        page.document.set_attr(input, "aria-controls", target_id);
        page.sync_show_hide(input);
        wired += 1;

        // Checking a sibling radio unchecks this one, so the whole group listens
        let members = if page.document.input_type(input) == "radio" {
            page.document.radio_group(input)
        } else {
            vec![input]
        };
        for member in members {
            if !controls.contains(&member) {
                controls.push(member);
            }
        }
    }

    for &control in &controls {
        page.listeners.add(EventTarget::Node(control), EventType::Click, Handler::ShowHideToggle);
    }

    if wired == 0 {
        return Ok(StepStatus::Skipped("no show/hide controls on page"));
    }
    tracing::debug!("Wired {} show/hide controls ({} listening)", wired, controls.len());
    Ok(StepStatus::Applied)
}

impl EnhancedPage {
    pub(crate) fn on_show_hide_click(&mut self, dispatch: Dispatch) {
        let Some(input) = dispatch.this else {
            return;
        };
        let controls = if self.document.input_type(input) == "radio" {
            self.document.radio_group(input)
        } else {
            vec![input]
        };
        for control in controls {
            self.sync_show_hide(control);
        }
    }

    /// Id of the element a control reveals, if that element exists
    fn target_id(&self, input: NodeId) -> Option<String> {
        let wrapper = self.document.tree.parent_element(input)?;
        let id = self.document.attr(wrapper, "data-target").filter(|id| !id.is_empty())?;
        self.document.get_element_by_id(id).map(|_| id.to_string())
    }

    fn sync_show_hide(&mut self, input: NodeId) {
        let Some(target) = self.target_id(input).and_then(|id| self.document.get_element_by_id(&id)) else {
            return;
        };
        let shown = self.document.checked(input);
        self.document.set_attr(input, "aria-expanded", shown.to_string());
        self.document.set_attr(target, "aria-hidden", (!shown).to_string());
        if shown {
            self.document.remove_class(target, HIDDEN_CLASS);
        } else {
            self.document.add_class(target, HIDDEN_CLASS);
        }
    }
}
