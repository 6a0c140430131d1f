//! Enhancer Configuration
//!
//! Every field has a default, so a partial JSON document only overrides
//! what it names.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ConfigError;

/// Page enhancer configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Where each enhancement looks for its elements
    pub selectors: Selectors,

    /// Wire show/hide toggles for radios and checkboxes with `data-target`
    pub show_hide_content: bool,

    /// Numeric keyboards and wheel/arrow guards on currency fields
    pub numeric_inputs: bool,

    /// Expand details sections while printing
    pub print_expansion: bool,

    /// Labels written into the user-research banner, if enabled
    pub research_banner: Option<BannerText>,

    /// Location graph handed to the autocomplete library
    pub autocomplete_source: Option<Url>,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            show_hide_content: true,
            numeric_inputs: true,
            print_expansion: true,
            research_banner: Some(BannerText::default()),
            autocomplete_source: None,
        }
    }
}

impl EnhancerConfig {
    /// Configuration matching one released variant of the page script
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Earlier => Self {
                research_banner: None,
                autocomplete_source: Url::parse(
                    "https://www.tax.service.gov.uk/manage-pension-schemes/assets/javascripts/autocomplete/location-autocomplete-graph.json",
                )
                .ok(),
                ..Self::default()
            },
            Variant::Latest => Self {
                numeric_inputs: false,
                print_expansion: false,
                show_hide_content: false,
                ..Self::default()
            },
        }
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Released variants of the page script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Numeric hardening and print expansion, no banner
    Earlier,
    /// Banner override, component libraries only
    Latest,
}

/// Selectors for the elements each step enhances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub back_link: String,
    pub print_link: String,
    pub country_select: String,
    pub combobox_input: String,
    pub autocomplete_option_text: String,
    pub numeric_fields: String,
    pub number_input: String,
    pub details: String,
    pub show_hide_inputs: String,
    pub research_banner: String,
    pub banner_title: String,
    pub banner_link: String,
    pub banner_close: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            back_link: "#back-link".into(),
            print_link: "#print-link".into(),
            country_select: "select".into(),
            combobox_input: r#"input[role="combobox"]"#.into(),
            autocomplete_option_text: ".autocomplete__option > strong".into(),
            numeric_fields: r#"[data-type="currency"] > input[type="text"], [data-type="percentage"] > input[type="text"]"#.into(),
            number_input: r#"input[type="number"]"#.into(),
            details: "details".into(),
            show_hide_inputs: r#"[data-target] > input[type="radio"], [data-target] > input[type="checkbox"]"#.into(),
            research_banner: ".hmrc-user-research-banner".into(),
            banner_title: ".hmrc-user-research-banner__title".into(),
            banner_link: ".hmrc-user-research-banner__link".into(),
            banner_close: ".hmrc-user-research-banner__close".into(),
        }
    }
}

/// Fixed user-research banner labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerText {
    pub title: String,
    pub link: String,
    pub close: String,
}

impl Default for BannerText {
    fn default() -> Self {
        Self {
            title: "Help make GOV.UK better".into(),
            link: "Sign up to take part in research (opens in new tab)".into(),
            close: "No thanks".into(),
        }
    }
}
