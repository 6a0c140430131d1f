//! Page enhancer - main entry point

use std::sync::Arc;

use pensions_dom::Document;

use crate::report::Step;
use crate::steps::{banner, bootstrap, country, history, links, numeric, print_view, show_hide};
use crate::{AccessibleAutocomplete, Autocomplete, Capabilities, ComponentLibrary, EnhancedPage, EnhancerConfig, Window};

/// Runs the enhancement steps against rendered pages
#[derive(Clone)]
pub struct PageEnhancer {
    config: EnhancerConfig,
    libraries: Vec<Arc<dyn ComponentLibrary>>,
    autocomplete: Arc<dyn Autocomplete>,
}

impl PageEnhancer {
    /// Create an enhancer with the given configuration
    pub fn new(config: EnhancerConfig) -> Self {
        Self {
            config,
            libraries: Vec::new(),
            autocomplete: Arc::new(AccessibleAutocomplete::new()),
        }
    }

    /// Register a component library; libraries initialise in registration order
    pub fn with_library(mut self, library: Arc<dyn ComponentLibrary>) -> Self {
        self.libraries.push(library);
        self
    }

    /// Replace the autocomplete library
    pub fn with_autocomplete(mut self, autocomplete: Arc<dyn Autocomplete>) -> Self {
        self.autocomplete = autocomplete;
        self
    }

    /// Get enhancer configuration
    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    /// Enhance one rendered page
    ///
    /// Never fails: each step's outcome, including failures, is in
    /// [`EnhancedPage::report`].
    pub fn initialize(&self, document: Document, window: Window) -> EnhancedPage {
        let caps = Capabilities::probe(&document, &window);
        tracing::debug!("Probed capabilities: {:?}", caps);

        let mut page = EnhancedPage::new(document, window, caps, self.autocomplete.clone());
        let config = &self.config;

        let result = bootstrap::run(&mut page, &self.libraries);
        page.report.record(Step::LibraryBootstrap, result);
        let result = history::run(&mut page, &caps);
        page.report.record(Step::HistorySanitization, result);
        let result = show_hide::run(&mut page, config);
        page.report.record(Step::ShowHideContent, result);
        let result = numeric::run(&mut page, &caps, config);
        page.report.record(Step::NumericInputs, result);
        let result = links::run_back_link(&mut page, config);
        page.report.record(Step::BackLink, result);
        let result = links::run_print_link(&mut page, config);
        page.report.record(Step::PrintLink, result);
        let result = country::run(&mut page, config);
        page.report.record(Step::CountryAutocomplete, result);
        let result = print_view::run(&mut page, &caps, config);
        page.report.record(Step::PrintExpansion, result);
        let result = banner::run(&mut page, config);
        page.report.record(Step::ResearchBanner, result);

        let failed = page.report.failures().count();
        tracing::info!(
            "Enhanced {} ({} listeners, {} failed steps)",
            page.document.url(),
            page.listeners.len(),
            failed
        );
        page
    }
}

impl Default for PageEnhancer {
    fn default() -> Self {
        Self::new(EnhancerConfig::default())
    }
}

impl std::fmt::Debug for PageEnhancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageEnhancer")
            .field("config", &self.config)
            .field(
                "libraries",
                &self.libraries.iter().map(|l| l.name().to_string()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Enhance a page with the default configuration and no component libraries
pub fn initialize(document: Document, window: Window) -> EnhancedPage {
    PageEnhancer::default().initialize(document, window)
}
