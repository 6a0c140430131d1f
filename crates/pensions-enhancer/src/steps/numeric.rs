//! Numeric input hardening
//!
//! Touch devices get the numeric keyboard on currency and percentage
//! fields. Number inputs ignore the wheel while focused and reject the
//! arrow and comma keys, so values cannot drift while scrolling.

use pensions_dom::{Event, EventTarget, EventType, NodeId};

use crate::page::{Dispatch, Handler};
use crate::steps::{selector, StepStatus};
use crate::{Capabilities, EnhanceError, EnhancedPage, EnhancerConfig};

/// Keys that would step or reformat a number (`event.which`)
const KEY_UP: u32 = 38;
const KEY_DOWN: u32 = 40;
const KEY_COMMA: u32 = 188;

pub(crate) fn run(
    page: &mut EnhancedPage,
    caps: &Capabilities,
    config: &EnhancerConfig,
) -> Result<StepStatus, EnhanceError> {
    if !config.numeric_inputs {
        return Ok(StepStatus::Skipped("disabled by configuration"));
    }
    let fields = selector(&config.selectors.numeric_fields, "numeric field")?;
    let number_input = selector(&config.selectors.number_input, "number input")?;
    let forms = selector("form", "form")?;
    let root = page.document.tree.root();

    let mut converted = 0;
    if caps.numeric_keyboard() {
        for field in page.document.select_all(root, &fields) {
            page.document.set_attr(field, "type", "number");
            page.document.set_attr(field, "step", "any");
            page.document.set_attr(field, "min", "0");
            converted += 1;
        }
        tracing::debug!("Switched {} fields to numeric keyboards", converted);
    }

    let forms = page.document.select_all(root, &forms);
    for &form in &forms {
        let target = EventTarget::Node(form);
        page.listeners
            .add_delegated(target.clone(), EventType::FocusIn, number_input.clone(), Handler::GuardWheel);
        page.listeners
            .add_delegated(target.clone(), EventType::FocusOut, number_input.clone(), Handler::ReleaseWheel);
        page.listeners
            .add_delegated(target, EventType::KeyDown, number_input.clone(), Handler::BlockNumberKeys);
    }

    if converted == 0 && forms.is_empty() {
        return Ok(StepStatus::Skipped("no forms on page"));
    }
    Ok(StepStatus::Applied)
}

impl EnhancedPage {
    pub(crate) fn on_number_focus(&mut self, dispatch: Dispatch) {
        let Some(input) = dispatch.this else {
            return;
        };
        if !self.is_wheel_guarded(input) {
            self.listeners
                .add(EventTarget::Node(input), EventType::Wheel, Handler::BlockWheel);
        }
    }

    pub(crate) fn on_number_blur(&mut self, dispatch: Dispatch) {
        let Some(input) = dispatch.this else {
            return;
        };
        self.listeners
            .remove_where(&EventTarget::Node(input), EventType::Wheel, |h| *h == Handler::BlockWheel);
    }

    pub(crate) fn on_number_keydown(&mut self, event: &mut Event) {
        if matches!(event.which(), KEY_UP | KEY_DOWN | KEY_COMMA) {
            event.prevent_default();
        }
    }

    /// Whether wheel changes on this input are currently blocked
    pub fn is_wheel_guarded(&self, input: NodeId) -> bool {
        self.listeners
            .for_target(&EventTarget::Node(input), EventType::Wheel)
            .iter()
            .any(|l| l.handler == Handler::BlockWheel)
    }
}
