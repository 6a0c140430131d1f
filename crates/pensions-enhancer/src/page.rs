//! Enhanced page
//!
//! Owns the document, the window and every listener the enhancement
//! steps registered, and plays user interactions through them.

use std::sync::Arc;

use pensions_dom::{Document, Event, EventTarget, EventType, Key, Listeners, NodeId};

use crate::autocomplete::{Autocomplete, Combobox};
use crate::report::EnhancementReport;
use crate::steps::print_view::PrintExpansion;
use crate::{Capabilities, Window};

/// Media query the print listeners watch
pub const PRINT_MEDIA: &str = "print";

/// Behaviours the enhancement steps attach to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Back link: `history.back()` instead of following the href
    BackLink,
    /// Print link: open the print dialog instead of navigating
    PrintLink,
    /// Clear the backing select on any edit of the combobox text
    ClearSelectOnEdit { select: NodeId },
    /// Refresh suggestions after the combobox text changed
    Suggest(Combobox),
    /// Accept a clicked suggestion
    ConfirmSuggestion(Combobox),
    /// Forward a mouseup on suggestion text to the suggestion itself
    ClickParentOption,
    /// Start blocking wheel changes on a focused number input
    GuardWheel,
    /// Stop blocking wheel changes on a blurred number input
    ReleaseWheel,
    /// Block a wheel change
    BlockWheel,
    /// Block arrow and comma keys in number inputs
    BlockNumberKeys,
    /// `matchMedia('print')` listener
    PrintMediaChange,
    /// `window.onbeforeprint`
    BeforePrint,
    /// `window.onafterprint`
    AfterPrint,
    /// Show/hide the element a radio or checkbox controls
    ShowHideToggle,
}

/// Nodes a handler runs against
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dispatch {
    /// Node the event originated at
    pub target: Option<NodeId>,
    /// Listener node, or the delegate match for delegated listeners
    pub this: Option<NodeId>,
}

/// A document after enhancement
pub struct EnhancedPage {
    pub(crate) document: Document,
    pub(crate) window: Window,
    pub(crate) capabilities: Capabilities,
    pub(crate) listeners: Listeners<Handler>,
    pub(crate) autocomplete: Arc<dyn Autocomplete>,
    pub(crate) print_expansion: PrintExpansion,
    pub(crate) report: EnhancementReport,
}

impl std::fmt::Debug for EnhancedPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnhancedPage")
            .field("url", &self.document.url())
            .field("capabilities", &self.capabilities)
            .field("listeners", &self.listeners.len())
            .field("report", &self.report)
            .finish()
    }
}

impl EnhancedPage {
    pub(crate) fn new(
        document: Document,
        window: Window,
        capabilities: Capabilities,
        autocomplete: Arc<dyn Autocomplete>,
    ) -> Self {
        Self {
            document,
            window,
            capabilities,
            listeners: Listeners::new(),
            autocomplete,
            print_expansion: PrintExpansion::default(),
            report: EnhancementReport::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// Capabilities probed when the page was enhanced
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn listeners(&self) -> &Listeners<Handler> {
        &self.listeners
    }

    /// Outcome of each enhancement step
    pub fn report(&self) -> &EnhancementReport {
        &self.report
    }

    /// Hand the document and window back
    pub fn into_parts(self) -> (Document, Window) {
        (self.document, self.window)
    }

    // === Dispatch ===

    /// Dispatch an event at a node, bubbling if the event bubbles
    pub fn dispatch(&mut self, target: NodeId, event: Event) -> Event {
        let mut event = event.with_target(target);
        let path: Vec<NodeId> = if event.bubbles {
            std::iter::once(target).chain(self.document.tree.ancestors(target)).collect()
        } else {
            vec![target]
        };

        for current in path {
            let listeners = self
                .listeners
                .for_target(&EventTarget::Node(current), event.event_type);
            for listener in listeners {
                let this = match &listener.delegate {
                    None => current,
                    Some(selector) => {
                        let matched = std::iter::once(target)
                            .chain(self.document.tree.ancestors(target))
                            .take_while(|&n| n != current)
                            .find(|&n| self.document.matches(n, selector));
                        match matched {
                            Some(n) => n,
                            None => continue,
                        }
                    }
                };
                let dispatch = Dispatch {
                    target: Some(target),
                    this: Some(this),
                };
                self.run(&listener.handler, dispatch, &mut event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event
    }

    /// Dispatch an event at the window or a media query list
    pub fn dispatch_to(&mut self, target: EventTarget, mut event: Event) -> Event {
        if let EventTarget::Node(node) = target {
            return self.dispatch(node, event);
        }
        let dispatch = Dispatch { target: None, this: None };
        for listener in self.listeners.for_target(&target, event.event_type) {
            self.run(&listener.handler, dispatch, &mut event);
        }
        event
    }

    fn run(&mut self, handler: &Handler, dispatch: Dispatch, event: &mut Event) {
        tracing::trace!("Running {:?} for {}", handler, event.event_type);
        match handler {
            Handler::BackLink => self.on_back_link(event),
            Handler::PrintLink => self.on_print_link(event),
            Handler::ClearSelectOnEdit { select } => self.on_combobox_keydown(*select, event),
            Handler::Suggest(combobox) => self.on_combobox_input(combobox),
            Handler::ConfirmSuggestion(combobox) => self.on_suggestion_click(combobox, dispatch),
            Handler::ClickParentOption => self.on_option_text_mouseup(dispatch, event),
            Handler::GuardWheel => self.on_number_focus(dispatch),
            Handler::ReleaseWheel => self.on_number_blur(dispatch),
            Handler::BlockWheel => event.prevent_default(),
            Handler::BlockNumberKeys => self.on_number_keydown(event),
            Handler::PrintMediaChange => match event.matches {
                Some(true) => self.before_print(),
                Some(false) => self.after_print(),
                None => {}
            },
            Handler::BeforePrint => self.before_print(),
            Handler::AfterPrint => self.after_print(),
            Handler::ShowHideToggle => self.on_show_hide_click(dispatch),
        }
    }

    // === User interaction ===

    /// Click an element; returns false if the default action was prevented
    ///
    /// Focusable elements take focus first. Checkboxes and radios flip
    /// before listeners run and flip back if the click is cancelled.
    pub fn click(&mut self, node: NodeId) -> bool {
        if self.document.is_focusable(node) && self.document.active_element() != Some(node) {
            self.focus(node);
        }

        let checkable = self.document.is_checkable(node);
        let was_checked = self.document.checked(node);
        let radio_state: Vec<(NodeId, bool)> = if checkable && self.document.input_type(node) == "radio" {
            self.document
                .radio_group(node)
                .into_iter()
                .map(|r| (r, self.document.checked(r)))
                .collect()
        } else {
            Vec::new()
        };
        if checkable {
            let next = self.document.input_type(node) == "radio" || !was_checked;
            self.document.set_checked(node, next);
        }

        let event = self.dispatch(node, Event::new(EventType::Click));

        if event.is_default_prevented() {
            if checkable {
                self.document.set_checked(node, was_checked);
                for (radio, checked) in radio_state {
                    self.document.set_checked(radio, checked);
                }
            }
            return false;
        }

        if checkable && self.document.checked(node) != was_checked {
            self.dispatch(node, Event::new(EventType::Change));
        }
        self.click_default_action(node);
        true
    }

    fn click_default_action(&mut self, node: NodeId) {
        let inclusive: Vec<NodeId> = std::iter::once(node).chain(self.document.tree.ancestors(node)).collect();
        for n in inclusive {
            match self.document.tag_name(n) {
                Some("a") => {
                    if let Some(href) = self.document.attr(n, "href").map(str::to_string) {
                        self.window.navigate(&href);
                    }
                    return;
                }
                Some("summary") => {
                    if let Some(details) = self
                        .document
                        .tree
                        .parent_element(n)
                        .filter(|&d| self.document.tag_name(d) == Some("details"))
                    {
                        self.toggle_details(details, n);
                    }
                    return;
                }
                _ => {}
            }
        }
    }

    fn toggle_details(&mut self, details: NodeId, summary: NodeId) {
        let open = self.details_open(details);
        if open {
            self.document.remove_attr(details, "open");
        } else {
            self.document.set_attr(details, "open", "open");
        }
        if self.capabilities.details_polyfill {
            if open {
                self.document.remove_class(details, "open");
            } else {
                self.document.add_class(details, "open");
            }
            self.document.set_attr(summary, "aria-expanded", if open { "false" } else { "true" });
        }
    }

    /// Whether a details section is open (natively or via the polyfill)
    pub fn details_open(&self, details: NodeId) -> bool {
        self.document.attr(details, "open").is_some() || self.document.has_class(details, "open")
    }

    /// Release the mouse over an element
    pub fn mouse_up(&mut self, node: NodeId) -> bool {
        !self.dispatch(node, Event::new(EventType::MouseUp)).is_default_prevented()
    }

    /// Press a key in an element; returns false if the default was prevented
    ///
    /// Printable keys insert text into text fields, Backspace deletes,
    /// and arrows step number inputs. Each text change fires `input`.
    pub fn key_down(&mut self, node: NodeId, key: Key) -> bool {
        let event = self.dispatch(node, Event::key_down(key.clone()));
        if event.is_default_prevented() {
            return false;
        }
        if !self.is_text_field(node) {
            return true;
        }
        let value = self.document.value(node);
        let next = match key {
            Key::Backspace => {
                let mut v = value.clone();
                v.pop();
                Some(v)
            }
            Key::ArrowUp | Key::ArrowDown if self.document.input_type(node) == "number" => {
                let step = if key == Key::ArrowUp { 1.0 } else { -1.0 };
                Some(format_number(value.trim().parse::<f64>().unwrap_or(0.0) + step))
            }
            _ => key.printable().map(|c| format!("{value}{c}")),
        };
        if let Some(next) = next.filter(|n| *n != value) {
            self.document.set_value(node, &next);
            self.dispatch(node, Event::new(EventType::Input));
        }
        true
    }

    /// Type text one key at a time
    pub fn type_text(&mut self, node: NodeId, text: &str) {
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Character(c) };
            self.key_down(node, key);
        }
    }

    /// Scroll the wheel over an element; returns false if blocked
    ///
    /// Unblocked wheel over a focused number input steps its value down.
    pub fn wheel(&mut self, node: NodeId) -> bool {
        let event = self.dispatch(node, Event::new(EventType::Wheel));
        if event.is_default_prevented() {
            return false;
        }
        if self.document.active_element() == Some(node)
            && self.document.tag_name(node) == Some("input")
            && self.document.input_type(node) == "number"
        {
            let value = self.document.value(node).trim().parse::<f64>().unwrap_or(0.0);
            self.document.set_value(node, &format_number(value - 1.0));
            self.dispatch(node, Event::new(EventType::Input));
        }
        true
    }

    /// Focus an element, blurring the current one
    pub fn focus(&mut self, node: NodeId) {
        if !self.document.is_focusable(node) || self.document.active_element() == Some(node) {
            return;
        }
        self.blur();
        self.document.set_active_element(Some(node));
        self.dispatch(node, Event::new(EventType::Focus));
        self.dispatch(node, Event::new(EventType::FocusIn));
    }

    /// Blur the focused element, if any
    pub fn blur(&mut self) {
        if let Some(previous) = self.document.set_active_element(None) {
            self.dispatch(previous, Event::new(EventType::Blur));
            self.dispatch(previous, Event::new(EventType::FocusOut));
        }
    }

    // === Printing ===

    /// `window.print()`: the dialog opens and closes before control returns
    ///
    /// Runs the full print lifecycle, so sections opened for the printout
    /// are closed again by the time the caller sees the page.
    pub fn print(&mut self) {
        self.window.print();
        self.begin_print();
        self.end_print();
    }

    /// The browser starts printing
    ///
    /// Notifies the `print` media query listeners and `beforeprint`, each
    /// only where the browser supports it.
    pub fn begin_print(&mut self) {
        self.window.set_printing(true);
        if self.capabilities.match_media {
            self.dispatch_to(EventTarget::MediaQuery(PRINT_MEDIA.to_string()), Event::media_change(true));
        }
        if self.capabilities.print_events {
            self.dispatch_to(EventTarget::Window, Event::new(EventType::BeforePrint));
        }
    }

    /// The browser finished printing
    pub fn end_print(&mut self) {
        self.window.set_printing(false);
        if self.capabilities.match_media {
            self.dispatch_to(EventTarget::MediaQuery(PRINT_MEDIA.to_string()), Event::media_change(false));
        }
        if self.capabilities.print_events {
            self.dispatch_to(EventTarget::Window, Event::new(EventType::AfterPrint));
        }
    }

    fn is_text_field(&self, node: NodeId) -> bool {
        match self.document.tag_name(node) {
            Some("textarea") => true,
            Some("input") => !matches!(
                self.document.input_type(node).as_str(),
                "radio" | "checkbox" | "submit" | "button" | "hidden" | "reset" | "image" | "file"
            ),
            _ => false,
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
