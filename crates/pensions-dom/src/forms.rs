//! Form controls
//!
//! Value, checkedness and selection for `input`, `textarea` and `select`.
//! Markup supplies the defaults; once set, [`ControlState`] overrides them.

use crate::{ControlState, Document, NodeId};

impl Document {
    /// Lower-cased `type` of an input (`"text"` when missing)
    pub fn input_type(&self, input: NodeId) -> String {
        self.attr(input, "type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string())
    }

    /// Whether the input is a radio button or checkbox
    pub fn is_checkable(&self, input: NodeId) -> bool {
        self.tag_name(input) == Some("input") && matches!(self.input_type(input).as_str(), "radio" | "checkbox")
    }

    /// Current value of a form control
    pub fn value(&self, control: NodeId) -> String {
        let Some(elem) = self.tree.element(control) else {
            return String::new();
        };
        match elem.name.as_str() {
            "select" => self
                .selected_index(control)
                .and_then(|i| self.options(control).get(i).copied())
                .map(|opt| self.option_value(opt))
                .unwrap_or_default(),
            "textarea" => match &elem.control {
                Some(ControlState::Value(v)) => v.clone(),
                _ => self.text_content(control),
            },
            _ => match &elem.control {
                Some(ControlState::Value(v)) => v.clone(),
                _ => elem.get_attr("value").unwrap_or_default().to_string(),
            },
        }
    }

    /// Set the value of a form control
    ///
    /// For a select, the first option with that value becomes selected;
    /// with no such option nothing is selected and the value reads `""`.
    pub fn set_value(&mut self, control: NodeId, value: &str) {
        let state = match self.tag_name(control) {
            Some("select") => {
                let index = self
                    .options(control)
                    .into_iter()
                    .position(|opt| self.option_value(opt) == value);
                ControlState::Selected(index)
            }
            Some(_) => ControlState::Value(value.to_string()),
            None => return,
        };
        if let Some(elem) = self.tree.element_mut(control) {
            elem.control = Some(state);
        }
    }

    /// `option` elements of a select, in document order
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.tree
            .descendants(select)
            .into_iter()
            .filter(|&n| self.tag_name(n) == Some("option"))
            .collect()
    }

    /// Value of an option: its `value` attribute, else its collapsed text
    pub fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(v) => v.to_string(),
            None => self.option_label(option),
        }
    }

    /// Whitespace-collapsed option text
    pub fn option_label(&self, option: NodeId) -> String {
        self.text_content(option).split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Index of the selected option
    pub fn selected_index(&self, select: NodeId) -> Option<usize> {
        if let Some(ControlState::Selected(index)) = self.tree.element(select).and_then(|e| e.control.as_ref()) {
            return *index;
        }
        let options = self.options(select);
        options
            .iter()
            .rposition(|&opt| self.attr(opt, "selected").is_some())
            .or_else(|| (!options.is_empty() && self.attr(select, "multiple").is_none()).then_some(0))
    }

    /// Checkedness of a radio/checkbox
    pub fn checked(&self, input: NodeId) -> bool {
        match self.tree.element(input) {
            Some(elem) => match elem.control {
                Some(ControlState::Checked(c)) => c,
                _ => elem.has_attr("checked"),
            },
            None => false,
        }
    }

    /// Set checkedness; checking a radio unchecks the rest of its group
    pub fn set_checked(&mut self, input: NodeId, checked: bool) {
        if checked && self.input_type(input) == "radio" {
            for other in self.radio_group(input) {
                if other != input {
                    if let Some(elem) = self.tree.element_mut(other) {
                        elem.control = Some(ControlState::Checked(false));
                    }
                }
            }
        }
        if let Some(elem) = self.tree.element_mut(input) {
            elem.control = Some(ControlState::Checked(checked));
        }
    }

    /// Radios sharing this radio's `name` within the same form (or the
    /// document when the radio has no form)
    pub fn radio_group(&self, radio: NodeId) -> Vec<NodeId> {
        let Some(name) = self.attr(radio, "name").filter(|n| !n.is_empty()) else {
            return vec![radio];
        };
        let owner = self.form_owner(radio);
        let scope = owner.unwrap_or(self.tree.root());
        self.tree
            .descendants(scope)
            .into_iter()
            .filter(|&n| {
                self.tag_name(n) == Some("input")
                    && self.input_type(n) == "radio"
                    && self.attr(n, "name") == Some(name)
                    && self.form_owner(n) == owner
            })
            .collect()
    }

    /// Nearest ancestor `<form>`
    pub fn form_owner(&self, control: NodeId) -> Option<NodeId> {
        self.tree.ancestors(control).find(|&a| self.tag_name(a) == Some("form"))
    }
}

#[cfg(test)]
mod tests {
    use crate::Document;

    fn select_with_options(doc: &mut Document, options: &[(&str, &str)]) -> crate::NodeId {
        let body = doc.body().unwrap();
        let select = doc.tree.create_element("select");
        doc.tree.append_child(body, select);
        for (value, label) in options {
            let opt = doc.tree.create_element("option");
            doc.set_attr(opt, "value", *value);
            doc.set_text_content(opt, label);
            doc.tree.append_child(select, opt);
        }
        select
    }

    #[test]
    fn test_select_value() {
        let mut doc = Document::default();
        let select = select_with_options(&mut doc, &[("", "Choose"), ("FR", "France"), ("DE", "Germany")]);

        assert_eq!(doc.value(select), "");
        doc.set_value(select, "DE");
        assert_eq!(doc.value(select), "DE");
        assert_eq!(doc.selected_index(select), Some(2));

        doc.set_value(select, "");
        assert_eq!(doc.selected_index(select), Some(0));
        assert_eq!(doc.value(select), "");
    }

    #[test]
    fn test_select_value_without_blank_option() {
        let mut doc = Document::default();
        let select = select_with_options(&mut doc, &[("FR", "France"), ("DE", "Germany")]);

        assert_eq!(doc.value(select), "FR");
        doc.set_value(select, "");
        assert_eq!(doc.selected_index(select), None);
        assert_eq!(doc.value(select), "");
    }

    #[test]
    fn test_radio_group_exclusive() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let form = doc.tree.create_element("form");
        doc.tree.append_child(body, form);
        let mut radios = Vec::new();
        for value in ["yes", "no"] {
            let r = doc.tree.create_element("input");
            doc.set_attr(r, "type", "radio");
            doc.set_attr(r, "name", "hasScheme");
            doc.set_attr(r, "value", value);
            doc.tree.append_child(form, r);
            radios.push(r);
        }

        doc.set_checked(radios[0], true);
        assert!(doc.checked(radios[0]));
        doc.set_checked(radios[1], true);
        assert!(!doc.checked(radios[0]));
        assert!(doc.checked(radios[1]));
        assert_eq!(doc.radio_group(radios[0]), radios);
    }

    #[test]
    fn test_input_value_dirty_flag() {
        let mut doc = Document::default();
        let input = doc.tree.create_element("input");
        doc.set_attr(input, "value", "12.50");
        assert_eq!(doc.input_type(input), "text");
        assert_eq!(doc.value(input), "12.50");
        doc.set_value(input, "");
        assert_eq!(doc.value(input), "");
    }
}
