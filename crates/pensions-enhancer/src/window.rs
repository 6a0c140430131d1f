//! Browser window model
//!
//! The slice of `window` the page script touches: history, printing,
//! scrolling, and which optional APIs exist.

use url::Url;

/// Optional browser APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// `history.replaceState`
    pub history_replace_state: bool,
    /// `window.matchMedia`
    pub match_media: bool,
    /// `onbeforeprint` / `onafterprint`
    pub print_events: bool,
    /// Touch input
    pub touch_events: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            history_replace_state: true,
            match_media: true,
            print_events: true,
            touch_events: false,
        }
    }
}

impl Features {
    /// A browser without any of the optional APIs
    pub fn none() -> Self {
        Self {
            history_replace_state: false,
            match_media: false,
            print_events: false,
            touch_events: false,
        }
    }
}

/// History entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub state: Option<String>, // JSON-serialized state
}

/// Session history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    current: usize,
}

impl History {
    pub fn new(initial_url: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial_url.to_string(),
                title: String::new(),
                state: None,
            }],
            current: 0,
        }
    }

    /// Push a new history entry
    pub fn push_state(&mut self, state: Option<String>, title: String, url: String) {
        // Remove forward history
        self.entries.truncate(self.current + 1);

        self.entries.push(HistoryEntry { url, title, state });
        self.current = self.entries.len() - 1;
    }

    /// Replace current entry
    pub fn replace_state(&mut self, state: Option<String>, title: String, url: String) {
        if let Some(entry) = self.entries.get_mut(self.current) {
            entry.url = url;
            entry.title = title;
            entry.state = state;
        }
    }

    /// Go back
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.current > 0 {
            self.current -= 1;
            Some(&self.entries[self.current])
        } else {
            None
        }
    }

    /// Go forward
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.current + 1 < self.entries.len() {
            self.current += 1;
            Some(&self.entries[self.current])
        } else {
            None
        }
    }

    /// Move by `delta` entries; out-of-range moves are ignored
    pub fn go(&mut self, delta: isize) -> Option<&HistoryEntry> {
        let target = self.current.checked_add_signed(delta).filter(|&i| i < self.entries.len())?;
        self.current = target;
        Some(&self.entries[self.current])
    }

    /// Get current entry
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    /// Index of the current entry
    pub fn index(&self) -> usize {
        self.current
    }

    /// Get history length
    pub fn length(&self) -> usize {
        self.entries.len()
    }
}

/// Navigation performed by the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// `history.back()`
    Back,
    /// Following a link to this absolute URL
    Load(String),
}

/// Browser window
#[derive(Debug, Clone)]
pub struct Window {
    features: Features,
    user_agent: String,
    history: History,
    scroll_x: f64,
    scroll_y: f64,
    print_requests: usize,
    printing: bool,
    prints_completed: usize,
    navigations: Vec<Navigation>,
}

impl Window {
    /// Window showing `url`, with default features
    pub fn new(url: &str) -> Self {
        Self {
            features: Features::default(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string(),
            history: History::new(url),
            scroll_x: 0.0,
            scroll_y: 0.0,
            print_requests: 0,
            printing: false,
            prints_completed: 0,
            navigations: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Start from an existing session history
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// `history.back()`
    pub fn back(&mut self) {
        tracing::debug!("history.back() from {}", self.history.current().url);
        self.history.back();
        self.navigations.push(Navigation::Back);
    }

    /// Follow a link, resolving `href` against the current entry
    pub fn navigate(&mut self, href: &str) {
        let resolved = Url::parse(&self.history.current().url)
            .and_then(|base| base.join(href))
            .map(String::from)
            .unwrap_or_else(|_| href.to_string());
        tracing::debug!("Navigating to {}", resolved);
        self.history.push_state(None, String::new(), resolved.clone());
        self.navigations.push(Navigation::Load(resolved));
    }

    /// Navigations in the order they happened
    pub fn navigations(&self) -> &[Navigation] {
        &self.navigations
    }

    /// `window.print()`
    pub fn print(&mut self) {
        self.print_requests += 1;
        tracing::debug!("Print dialog requested ({} so far)", self.print_requests);
    }

    /// How many times the print dialog was requested
    pub fn print_requests(&self) -> usize {
        self.print_requests
    }

    /// Whether the print media query currently matches
    pub fn is_printing(&self) -> bool {
        self.printing
    }

    /// How many print jobs ran to completion
    pub fn prints_completed(&self) -> usize {
        self.prints_completed
    }

    pub(crate) fn set_printing(&mut self, printing: bool) {
        if self.printing && !printing {
            self.prints_completed += 1;
        }
        self.printing = printing;
    }

    /// `window.pageYOffset`
    pub fn page_y_offset(&self) -> f64 {
        self.scroll_y
    }

    /// `window.pageXOffset`
    pub fn page_x_offset(&self) -> f64 {
        self.scroll_x
    }

    /// `window.scrollTo(x, y)`
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll_x = x.max(0.0);
        self.scroll_y = y.max(0.0);
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
