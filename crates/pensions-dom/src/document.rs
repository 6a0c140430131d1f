//! Document - High-level document API

use crate::{DomTree, NodeId, Selector, SelectorError};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Focused element, if any
    active_element: Option<NodeId>,
}

impl Document {
    /// Create a document with an empty `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self::from_tree(tree, url)
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self::from_tree(DomTree::new(), url)
    }

    /// Wrap an existing tree
    pub fn from_tree(tree: DomTree, url: &str) -> Self {
        Self {
            tree,
            url: url.to_string(),
            active_element: None,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.head()
            .and_then(|head| self.tree.element_children(head).find(|&c| self.tree.tag_name(c) == Some("title")))
            .map(|title| self.tree.text_content(title).trim().to_string())
            .unwrap_or_default()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.element_children(self.tree.root()).next()
    }

    /// Get `<head>` element
    pub fn head(&self) -> Option<NodeId> {
        self.child_of_html("head")
    }

    /// Get `<body>` element
    pub fn body(&self) -> Option<NodeId> {
        self.child_of_html("body")
    }

    fn child_of_html(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.tree.element_children(html).find(|&c| self.tree.tag_name(c) == Some(tag))
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| self.tree.element(n).is_some_and(|e| e.id() == Some(id)))
    }

    /// First element in document order matching a selector
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select(self.tree.root(), &selector))
    }

    /// All elements in document order matching a selector
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_all(self.tree.root(), &selector))
    }

    /// First descendant of `scope` matching a parsed selector
    pub fn select(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.tree
            .descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(&self.tree, n))
    }

    /// All descendants of `scope` matching a parsed selector
    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.tree
            .descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(&self.tree, n))
            .collect()
    }

    /// Check whether an element matches a selector
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(&self.tree, node)
    }

    /// Nearest inclusive ancestor matching a selector
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .find(|&n| selector.matches(&self.tree, n))
    }

    /// Focused element
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element.filter(|&n| self.tree.is_connected(n))
    }

    /// Move focus, returning the previously focused element
    pub fn set_active_element(&mut self, node: Option<NodeId>) -> Option<NodeId> {
        let previous = self.active_element();
        self.active_element = node.filter(|&n| self.tree.element(n).is_some());
        previous
    }

    /// Whether an element can take focus
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(elem) = self.tree.element(node) else {
            return false;
        };
        if elem.has_attr("disabled") {
            return false;
        }
        match elem.name.as_str() {
            "a" | "area" => elem.has_attr("href"),
            "input" => elem.get_attr("type").is_none_or(|t| !t.eq_ignore_ascii_case("hidden")),
            "button" | "select" | "textarea" | "summary" => true,
            _ => elem.has_attr("tabindex"),
        }
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // Element shorthands used throughout the enhancer

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.attr(node, name)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        self.tree.set_attr(node, name, value);
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.tree.remove_attr(node, name)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.has_class(node, class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.tree.add_class(node, class);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.tree.remove_class(node, class);
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.tree.set_text_content(node, text);
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.tree.tag_name(node)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
