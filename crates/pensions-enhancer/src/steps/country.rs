//! Country autocomplete
//!
//! The country select is handed to the autocomplete library, which
//! renders a combobox in its place and keeps the select as the value
//! posted with the form. Editing the combobox text invalidates the
//! previously chosen country until a suggestion is confirmed again.

use pensions_dom::{Event, EventTarget, EventType, NodeId};

use crate::autocomplete::{AutocompleteOptions, Combobox};
use crate::page::{Dispatch, Handler};
use crate::steps::{selector, StepStatus};
use crate::{EnhanceError, EnhancedPage, EnhancerConfig};

/// Keys that leave the selected country in place (`event.which`)
const KEY_TAB: u32 = 9;
const KEY_ENTER: u32 = 13;

pub(crate) fn run(page: &mut EnhancedPage, config: &EnhancerConfig) -> Result<StepStatus, EnhanceError> {
    let select_selector = selector(&config.selectors.country_select, "country select")?;
    let combobox_selector = selector(&config.selectors.combobox_input, "combobox input")?;
    let option_text = selector(&config.selectors.autocomplete_option_text, "autocomplete option text")?;
    let option = selector(".autocomplete__option", "autocomplete option")?;

    let root = page.document.tree.root();
    let Some(select) = page.document.select(root, &select_selector) else {
        return Ok(StepStatus::Skipped("no country select on page"));
    };

    let options = AutocompleteOptions {
        default_value: String::new(),
        select_element: select,
        source: config.autocomplete_source.clone(),
    };
    let autocomplete = page.autocomplete.clone();
    let combobox = autocomplete.enhance_select_element(&mut page.document, &options)?;

    let input = page
        .document
        .tree
        .parent(combobox.input)
        .and_then(|wrapper| page.document.select(wrapper, &combobox_selector))
        .unwrap_or(combobox.input);
    let combobox = Combobox { input, ..combobox };

    let target = EventTarget::Node(combobox.input);
    page.listeners.add(
        target.clone(),
        EventType::KeyDown,
        Handler::ClearSelectOnEdit { select: combobox.select },
    );
    page.listeners.add(target, EventType::Input, Handler::Suggest(combobox));
    page.listeners.add_delegated(
        EventTarget::Node(combobox.menu),
        EventType::Click,
        option,
        Handler::ConfirmSuggestion(combobox),
    );
    if let Some(body) = page.document.body() {
        page.listeners
            .add_delegated(EventTarget::Node(body), EventType::MouseUp, option_text, Handler::ClickParentOption);
    }

    Ok(StepStatus::Applied)
}

impl EnhancedPage {
    /// Any key but Enter or Tab clears the chosen country
    pub(crate) fn on_combobox_keydown(&mut self, select: NodeId, event: &mut Event) {
        if !matches!(event.which(), KEY_ENTER | KEY_TAB) {
            self.document.set_value(select, "");
        }
    }

    pub(crate) fn on_combobox_input(&mut self, combobox: &Combobox) {
        let query = self.document.value(combobox.input);
        let autocomplete = self.autocomplete.clone();
        autocomplete.suggest(&mut self.document, combobox, &query);
    }

    pub(crate) fn on_suggestion_click(&mut self, combobox: &Combobox, dispatch: Dispatch) {
        let Some(option) = dispatch.this else {
            return;
        };
        let autocomplete = self.autocomplete.clone();
        autocomplete.confirm(&mut self.document, combobox, option);
    }

    /// Releasing the mouse on a suggestion's text clicks the suggestion
    pub(crate) fn on_option_text_mouseup(&mut self, dispatch: Dispatch, event: &mut Event) {
        event.prevent_default();
        if let Some(option) = dispatch.this.and_then(|text| self.document.tree.parent_element(text)) {
            self.click(option);
        }
    }
}
