//! Accessible autocomplete
//!
//! [`Autocomplete`] is the seam to the widget library that turns a
//! `<select>` into a combobox. [`AccessibleAutocomplete`] renders the same
//! markup the library does, so pages behave identically under test.

use pensions_dom::{Document, NodeId};
use url::Url;

/// Autocomplete library error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutocompleteError {
    #[error("Element {0} is not a <select>")]
    NotASelect(NodeId),

    #[error("Select element {0} is not attached to the document")]
    Detached(NodeId),
}

/// Options for `enhanceSelectElement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteOptions {
    /// Text the combobox starts with
    pub default_value: String,
    /// The `<select>` being replaced
    pub select_element: NodeId,
    /// Extra suggestion source (location graph)
    pub source: Option<Url>,
}

/// Elements making up an enhanced select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combobox {
    /// Free-text `input[role=combobox]`
    pub input: NodeId,
    /// Backing `<select>`, now hidden
    pub select: NodeId,
    /// Suggestion `ul[role=listbox]`
    pub menu: NodeId,
}

/// Autocomplete widget library
pub trait Autocomplete {
    /// Replace a select with a combobox
    fn enhance_select_element(
        &self,
        document: &mut Document,
        options: &AutocompleteOptions,
    ) -> Result<Combobox, AutocompleteError>;

    /// Refresh the suggestion list for the typed query
    fn suggest(&self, document: &mut Document, combobox: &Combobox, query: &str);

    /// Accept a suggestion: fill the input and select the option's value
    fn confirm(&self, document: &mut Document, combobox: &Combobox, option: NodeId);
}

/// Markup-compatible rendition of the accessible-autocomplete library
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessibleAutocomplete;

impl AccessibleAutocomplete {
    pub fn new() -> Self {
        Self
    }

    fn clear_menu(document: &mut Document, combobox: &Combobox) {
        let items: Vec<NodeId> = document.tree.children(combobox.menu).map(|(id, _)| id).collect();
        for item in items {
            document.tree.detach(item);
        }
        document.remove_class(combobox.menu, "autocomplete__menu--visible");
        document.add_class(combobox.menu, "autocomplete__menu--hidden");
        document.set_attr(combobox.input, "aria-expanded", "false");
    }

    /// (label, value) pairs the query matches: prefix matches first, then
    /// substring matches, each in option order
    fn matches(document: &Document, select: NodeId, query: &str) -> Vec<(String, String)> {
        let needle = query.trim().to_lowercase();
        let candidates: Vec<(String, String)> = document
            .options(select)
            .into_iter()
            .map(|opt| (document.option_label(opt), document.option_value(opt)))
            .filter(|(label, value)| !value.is_empty() && !label.is_empty())
            .collect();

        let (mut prefix, rest): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .filter(|(label, _)| label.to_lowercase().contains(&needle))
            .partition(|(label, _)| label.to_lowercase().starts_with(&needle));
        prefix.extend(rest);
        prefix
    }
}

impl Autocomplete for AccessibleAutocomplete {
    fn enhance_select_element(
        &self,
        document: &mut Document,
        options: &AutocompleteOptions,
    ) -> Result<Combobox, AutocompleteError> {
        let select = options.select_element;
        if document.tag_name(select) != Some("select") {
            return Err(AutocompleteError::NotASelect(select));
        }
        let parent = document
            .tree
            .parent(select)
            .filter(|_| document.tree.is_connected(select))
            .ok_or(AutocompleteError::Detached(select))?;

        let id = document
            .attr(select, "id")
            .filter(|id| !id.is_empty())
            .unwrap_or("autocomplete")
            .to_string();
        let menu_id = format!("{id}__listbox");

        let wrapper = document.tree.create_element("div");
        document.set_attr(wrapper, "class", "autocomplete__wrapper autocomplete-wrapper");
        if let Some(source) = &options.source {
            document.set_attr(wrapper, "data-source", source.as_str());
        }
        document.tree.insert_before(parent, wrapper, select);

        let input = document.tree.create_element("input");
        for (name, value) in [
            ("id", id.as_str()),
            ("class", "autocomplete__input"),
            ("type", "text"),
            ("role", "combobox"),
            ("autocomplete", "off"),
            ("aria-autocomplete", "list"),
            ("aria-expanded", "false"),
            ("aria-owns", menu_id.as_str()),
        ] {
            document.set_attr(input, name, value);
        }
        document.set_value(input, &options.default_value);

        let menu = document.tree.create_element("ul");
        document.set_attr(menu, "id", menu_id.as_str());
        document.set_attr(menu, "class", "autocomplete__menu autocomplete__menu--hidden");
        document.set_attr(menu, "role", "listbox");

        document.tree.append_child(wrapper, input);
        document.tree.append_child(wrapper, menu);
        document.tree.append_child(wrapper, select);

        document.set_attr(select, "id", format!("{id}-select"));
        document.set_attr(select, "style", "display: none;");
        document.set_attr(select, "aria-hidden", "true");

        tracing::debug!("Enhanced select {} into combobox #{}", select, id);
        Ok(Combobox { input, select, menu })
    }

    fn suggest(&self, document: &mut Document, combobox: &Combobox, query: &str) {
        Self::clear_menu(document, combobox);
        if query.trim().is_empty() {
            return;
        }
        let matches = Self::matches(document, combobox.select, query);
        if matches.is_empty() {
            return;
        }

        let menu_id = document.attr(combobox.menu, "id").unwrap_or("autocomplete__listbox").to_string();
        for (index, (label, value)) in matches.iter().enumerate() {
            let item = document.tree.create_element("li");
            document.set_attr(item, "id", format!("{menu_id}--option--{index}"));
            document.set_attr(item, "class", "autocomplete__option");
            document.set_attr(item, "role", "option");
            document.set_attr(item, "data-value", value.as_str());
            let strong = document.tree.create_element("strong");
            document.set_text_content(strong, label);
            document.tree.append_child(item, strong);
            document.tree.append_child(combobox.menu, item);
        }
        document.remove_class(combobox.menu, "autocomplete__menu--hidden");
        document.add_class(combobox.menu, "autocomplete__menu--visible");
        document.set_attr(combobox.input, "aria-expanded", "true");
    }

    fn confirm(&self, document: &mut Document, combobox: &Combobox, option: NodeId) {
        let Some(value) = document.attr(option, "data-value").map(str::to_string) else {
            return;
        };
        let label = document.text_content(option);
        document.set_value(combobox.input, &label);
        document.set_value(combobox.select, &value);
        Self::clear_menu(document, combobox);
        tracing::debug!("Autocomplete confirmed {:?} ({})", label, value);
    }
}
