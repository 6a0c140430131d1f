//! DOM Events
//!
//! Event values, keyboard keys, and a listener registry. Handlers are an
//! embedder-chosen type `H`, so dispatch stays in the embedder's hands
//! and the registry never borrows the document.

use crate::{NodeId, Selector};

/// Event types the enhancer listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseUp,
    KeyDown,
    Input,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    Wheel,
    Change,
    BeforePrint,
    AfterPrint,
}

impl EventType {
    /// DOM event name
    pub fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseUp => "mouseup",
            Self::KeyDown => "keydown",
            Self::Input => "input",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::Wheel => "wheel",
            Self::Change => "change",
            Self::BeforePrint => "beforeprint",
            Self::AfterPrint => "afterprint",
        }
    }

    /// Whether the event propagates to ancestors
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::Focus | Self::Blur | Self::BeforePrint | Self::AfterPrint)
    }

    /// Whether `prevent_default` has an effect
    pub fn cancelable(self) -> bool {
        matches!(self, Self::Click | Self::MouseUp | Self::KeyDown | Self::Wheel)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(char),

    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,

    // Editing
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    Space,

    Unidentified(String),
}

impl Key {
    /// Parse from a `KeyboardEvent.key` string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            " " => Self::Space,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified(s.to_string()),
                }
            }
        }
    }

    /// Legacy `KeyboardEvent.which` code
    pub fn key_code(&self) -> u32 {
        match self {
            Self::Backspace => 8,
            Self::Tab => 9,
            Self::Enter => 13,
            Self::Escape => 27,
            Self::Space => 32,
            Self::End => 35,
            Self::Home => 36,
            Self::ArrowLeft => 37,
            Self::ArrowUp => 38,
            Self::ArrowRight => 39,
            Self::ArrowDown => 40,
            Self::Delete => 46,
            Self::Character(',') => 188,
            Self::Character('.') => 190,
            Self::Character('-') => 189,
            Self::Character(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as u32,
            Self::Character(_) | Self::Unidentified(_) => 0,
        }
    }

    /// Character inserted into a text field, if any
    pub fn printable(&self) -> Option<char> {
        match self {
            Self::Character(c) => Some(*c),
            Self::Space => Some(' '),
            _ => None,
        }
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Node(NodeId),
    Window,
    /// A `matchMedia` query list, keyed by its query text
    MediaQuery(String),
}

/// Event being dispatched
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    /// Originating node (None for window/media events)
    pub target: Option<NodeId>,
    /// Key for keyboard events
    pub key: Option<Key>,
    /// Media query state for media change events
    pub matches: Option<bool>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create an event with the type's default bubbling/cancelable flags
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            target: None,
            key: None,
            matches: None,
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a keydown event
    pub fn key_down(key: Key) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventType::KeyDown)
        }
    }

    /// `event.which`: the legacy key code, 0 for non-keyboard events
    pub fn which(&self) -> u32 {
        self.key.as_ref().map_or(0, Key::key_code)
    }

    /// Create a media query change event
    pub fn media_change(matches: bool) -> Self {
        Self {
            matches: Some(matches),
            bubbles: false,
            cancelable: false,
            ..Self::new(EventType::Change)
        }
    }

    /// Set the originating node
    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A registered listener, as returned for dispatch
#[derive(Debug, Clone)]
pub struct Listener<H> {
    pub id: ListenerId,
    /// Only fire when the event came from inside a match of this selector
    pub delegate: Option<Selector>,
    pub handler: H,
}

#[derive(Debug, Clone)]
struct Registration<H> {
    target: EventTarget,
    event_type: EventType,
    listener: Listener<H>,
}

/// Listener registry
#[derive(Debug, Clone)]
pub struct Listeners<H> {
    next_id: u64,
    entries: Vec<Registration<H>>,
}

impl<H> Default for Listeners<H> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<H: Clone> Listeners<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a direct listener
    pub fn add(&mut self, target: EventTarget, event_type: EventType, handler: H) -> ListenerId {
        self.register(target, event_type, None, handler)
    }

    /// Register a delegated listener (jQuery-style `.on(type, selector, fn)`)
    pub fn add_delegated(
        &mut self,
        target: EventTarget,
        event_type: EventType,
        delegate: Selector,
        handler: H,
    ) -> ListenerId {
        self.register(target, event_type, Some(delegate), handler)
    }

    fn register(
        &mut self,
        target: EventTarget,
        event_type: EventType,
        delegate: Option<Selector>,
        handler: H,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        tracing::trace!("Registered {} listener {:?} on {:?}", event_type, id, target);
        self.entries.push(Registration {
            target,
            event_type,
            listener: Listener { id, delegate, handler },
        });
        id
    }

    /// Remove one listener
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.listener.id != id);
        self.entries.len() != before
    }

    /// Remove every listener of a type on a target whose handler matches
    pub fn remove_where(
        &mut self,
        target: &EventTarget,
        event_type: EventType,
        pred: impl Fn(&H) -> bool,
    ) -> usize {
        let before = self.entries.len();
        self.entries.retain(|r| {
            !(r.target == *target && r.event_type == event_type && pred(&r.listener.handler))
        });
        before - self.entries.len()
    }

    /// Listeners for a target and type, in registration order
    pub fn for_target(&self, target: &EventTarget, event_type: EventType) -> Vec<Listener<H>> {
        self.entries
            .iter()
            .filter(|r| r.target == *target && r.event_type == event_type)
            .map(|r| r.listener.clone())
            .collect()
    }

    /// Count listeners of a type on a target
    pub fn count(&self, target: &EventTarget, event_type: EventType) -> usize {
        self.entries
            .iter()
            .filter(|r| r.target == *target && r.event_type == event_type)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
