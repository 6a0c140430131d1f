//! History sanitization
//!
//! Replacing the current entry with itself stops the browser offering to
//! resubmit the form when the user navigates back to this page.

use crate::steps::StepStatus;
use crate::{Capabilities, EnhanceError, EnhancedPage};

pub(crate) fn run(page: &mut EnhancedPage, caps: &Capabilities) -> Result<StepStatus, EnhanceError> {
    if !caps.history_replace {
        return Ok(StepStatus::Skipped("history.replaceState unsupported"));
    }
    let history = page.window.history_mut();
    let current = history.current().clone();
    history.replace_state(current.state, current.title, current.url);
    Ok(StepStatus::Applied)
}
