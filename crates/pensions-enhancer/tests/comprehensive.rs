//! Comprehensive tests for pensions-enhancer
//!
//! Whole pages parsed with pensions-html, enhanced, then driven through
//! clicks, keys, focus and print cycles.

use std::sync::Arc;

use pensions_dom::{Document, Key, NodeId};
use pensions_enhancer::{
    ComponentLibrary, EnhancedPage, EnhancerConfig, Features, History, LibraryError, Navigation, PageEnhancer, Step,
    StepOutcome, Variant, Window,
};
use pensions_html::HtmlParser;

const URL: &str = "https://www.tax.service.gov.uk/manage-pension-schemes/declaration";

const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head><title>Declaration - Manage pension schemes</title></head>
<body>
  <div class="hmrc-user-research-banner">
    <h2 class="hmrc-user-research-banner__title">Old title</h2>
    <a class="hmrc-user-research-banner__link" href="https://signup.example">Old link</a>
    <button class="hmrc-user-research-banner__close">Old close</button>
  </div>
  <a href="/manage-pension-schemes/previous" id="back-link" class="govuk-back-link">Back</a>
  <form action="/manage-pension-schemes/declaration" method="post">
    <div data-type="currency"><input type="text" id="amount" name="amount"></div>
    <div data-type="percentage"><input type="text" id="rate" name="rate"></div>
    <input type="number" id="members" name="members" value="10">
    <label for="country">Country</label>
    <select id="country" name="country">
      <option value="">Select a country</option>
      <option value="FR">France</option>
      <option value="DE">Germany</option>
      <option value="GB" selected>United Kingdom</option>
    </select>
    <div data-target="scheme-details"><input type="radio" name="has-scheme" id="has-scheme-yes" value="yes"></div>
    <div data-target="no-scheme"><input type="radio" name="has-scheme" id="has-scheme-no" value="no"></div>
    <div id="scheme-details">Scheme name</div>
    <div id="no-scheme">Tell us why</div>
    <div data-target="contact-panel"><input type="checkbox" id="contact" name="contact"></div>
    <div id="contact-panel">Contact details</div>
  </form>
  <details id="d1"><summary id="s1">Section one</summary><p>One</p></details>
  <details id="d2" open><summary id="s2">Section two</summary><p>Two</p></details>
  <a href="#" id="print-link">Print this page</a>
</body>
</html>"##;

const FIREFOX_UA: &str = "Mozilla/5.0 (Android 14; Mobile; rv:125.0) Gecko/125.0 Firefox/125.0";

fn load(html: &str) -> Document {
    HtmlParser::new().parse_with_url(html, URL).unwrap()
}

fn enhance_with(config: EnhancerConfig, html: &str, window: Window) -> EnhancedPage {
    PageEnhancer::new(config).initialize(load(html), window)
}

fn enhance(html: &str) -> EnhancedPage {
    enhance_with(EnhancerConfig::default(), html, Window::new(URL))
}

fn id(page: &EnhancedPage, id: &str) -> NodeId {
    page.document().get_element_by_id(id).unwrap()
}

// ============================================================================
// Initialisation
// ============================================================================

#[test]
fn test_full_page_applies_every_step() {
    let page = enhance(PAGE);
    let report = page.report();

    assert_eq!(
        report.outcome(Step::LibraryBootstrap),
        Some(&StepOutcome::Skipped("no component libraries registered"))
    );
    for step in [
        Step::HistorySanitization,
        Step::ShowHideContent,
        Step::NumericInputs,
        Step::BackLink,
        Step::PrintLink,
        Step::CountryAutocomplete,
        Step::PrintExpansion,
        Step::ResearchBanner,
    ] {
        assert!(report.applied(step), "{step} should apply, got {:?}", report.outcome(step));
    }
    assert_eq!(report.failures().count(), 0);
    assert_eq!(report.steps().count(), 9);
}

#[test]
fn test_history_entry_replaced_in_place() {
    let mut history = History::new("https://www.tax.service.gov.uk/manage-pension-schemes/start");
    history.push_state(None, "Declaration".into(), URL.into());
    let before = history.clone();

    let page = enhance_with(EnhancerConfig::default(), PAGE, Window::new(URL).with_history(history));

    assert_eq!(page.window().history(), &before);
    assert!(page.report().applied(Step::HistorySanitization));
}

#[test]
fn test_history_sanitization_skipped_without_replace_state() {
    let features = Features {
        history_replace_state: false,
        ..Features::default()
    };
    let page = enhance_with(EnhancerConfig::default(), PAGE, Window::new(URL).with_features(features));

    assert!(matches!(
        page.report().outcome(Step::HistorySanitization),
        Some(StepOutcome::Skipped(_))
    ));
}

struct MarkingLibrary {
    name: &'static str,
    class: &'static str,
}

impl ComponentLibrary for MarkingLibrary {
    fn name(&self) -> &str {
        self.name
    }

    fn init_all(&self, document: &mut Document) -> Result<(), LibraryError> {
        let body = document.body().ok_or_else(|| LibraryError::Init("no body".into()))?;
        document.add_class(body, self.class);
        Ok(())
    }
}

struct BrokenLibrary;

impl ComponentLibrary for BrokenLibrary {
    fn name(&self) -> &str {
        "broken"
    }

    fn init_all(&self, _document: &mut Document) -> Result<(), LibraryError> {
        Err(LibraryError::Init("component registry missing".into()))
    }
}

#[test]
fn test_libraries_initialise_in_order() {
    let enhancer = PageEnhancer::default()
        .with_library(Arc::new(MarkingLibrary {
            name: "govuk-frontend",
            class: "govuk-frontend-supported",
        }))
        .with_library(Arc::new(MarkingLibrary {
            name: "hmrc-frontend",
            class: "hmrc-frontend-supported",
        }));
    let page = enhancer.initialize(load(PAGE), Window::new(URL));

    let body = page.document().body().unwrap();
    assert!(page.document().has_class(body, "govuk-frontend-supported"));
    assert!(page.document().has_class(body, "hmrc-frontend-supported"));
    assert!(page.report().applied(Step::LibraryBootstrap));
}

#[test]
fn test_library_failure_does_not_block_other_steps() {
    let enhancer = PageEnhancer::default()
        .with_library(Arc::new(BrokenLibrary))
        .with_library(Arc::new(MarkingLibrary {
            name: "hmrc-frontend",
            class: "hmrc-frontend-supported",
        }));
    let mut page = enhancer.initialize(load(PAGE), Window::new(URL));

    let failures: Vec<_> = page.report().failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Step::LibraryBootstrap);
    assert!(failures[0].1.contains("broken"));

    let body = page.document().body().unwrap();
    assert!(page.document().has_class(body, "hmrc-frontend-supported"));

    let back = id(&page, "back-link");
    assert!(!page.click(back));
    assert_eq!(page.window().navigations(), &[Navigation::Back]);
}

// ============================================================================
// Back and print links
// ============================================================================

#[test]
fn test_back_link_goes_back_once() {
    let mut history = History::new("https://www.tax.service.gov.uk/manage-pension-schemes/start");
    history.push_state(None, String::new(), URL.into());
    let mut page = enhance_with(EnhancerConfig::default(), PAGE, Window::new(URL).with_history(history));

    let back = id(&page, "back-link");
    assert!(!page.click(back));

    assert_eq!(page.window().navigations(), &[Navigation::Back]);
    assert_eq!(page.window().history().index(), 0);
    assert_eq!(
        page.window().history().current().url,
        "https://www.tax.service.gov.uk/manage-pension-schemes/start"
    );
}

#[test]
fn test_print_link_opens_dialog_without_navigating() {
    let mut page = enhance(PAGE);
    let print = id(&page, "print-link");

    assert!(!page.click(print));
    assert!(!page.click(print));

    assert_eq!(page.window().print_requests(), 2);
    assert!(page.window().navigations().is_empty());
}

#[test]
fn test_print_link_expands_and_restores_page() {
    let mut page = enhance(PAGE);
    let print = id(&page, "print-link");
    let (d1, d2) = (id(&page, "d1"), id(&page, "d2"));
    let members = id(&page, "members");
    page.focus(members);
    page.window_mut().scroll_to(0.0, 300.0);

    page.click(print);

    assert_eq!(page.window().prints_completed(), 1);
    assert!(!page.window().is_printing());
    assert!(!page.is_print_expanded());
    assert!(page.print_opened().is_empty());
    assert!(!page.details_open(d1));
    assert!(page.details_open(d2));
    assert!(!page.document().has_class(d1, "print--open"));
    assert_eq!(page.document().active_element(), Some(members));
    assert_eq!(page.window().page_y_offset(), 300.0);
}

#[test]
fn test_plain_links_still_navigate() {
    let mut page = enhance(PAGE);
    let banner_link = page
        .document()
        .query_selector(".hmrc-user-research-banner__link")
        .unwrap()
        .unwrap();

    assert!(page.click(banner_link));
    assert_eq!(
        page.window().navigations(),
        &[Navigation::Load("https://signup.example/".to_string())]
    );
}

// ============================================================================
// Country autocomplete
// ============================================================================

#[test]
fn test_country_select_replaced_by_combobox() {
    let page = enhance(PAGE);
    let doc = page.document();

    let input = id(&page, "country");
    let select = id(&page, "country-select");
    assert_eq!(doc.tag_name(input), Some("input"));
    assert_eq!(doc.attr(input, "role"), Some("combobox"));
    assert_eq!(doc.value(input), "");
    assert_eq!(doc.tag_name(select), Some("select"));
    assert_eq!(doc.value(select), "GB");

    let wrapper = doc.tree().parent(select).unwrap();
    assert!(doc.has_class(wrapper, "autocomplete-wrapper"));
}

#[test]
fn test_enter_and_tab_keep_selected_country() {
    let mut page = enhance(PAGE);
    let input = id(&page, "country");
    let select = id(&page, "country-select");

    page.key_down(input, Key::parse("Enter"));
    page.key_down(input, Key::parse("Tab"));
    assert_eq!(page.document().value(select), "GB");

    page.key_down(input, Key::parse("Escape"));
    assert_eq!(page.document().value(select), "");
}

#[test]
fn test_typing_clears_select_and_confirming_sets_it() {
    let mut page = enhance(PAGE);
    let input = id(&page, "country");
    let select = id(&page, "country-select");

    page.type_text(input, "Fra");
    assert_eq!(page.document().value(select), "");
    assert_eq!(page.document().value(input), "Fra");

    let options = page.document().query_selector_all(".autocomplete__option").unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(page.document().text_content(options[0]), "France");

    page.click(options[0]);
    assert_eq!(page.document().value(select), "FR");
    assert_eq!(page.document().value(input), "France");

    page.key_down(input, Key::Enter);
    page.key_down(input, Key::Tab);
    assert_eq!(page.document().value(select), "FR");

    page.key_down(input, Key::Backspace);
    assert_eq!(page.document().value(select), "");
    assert_eq!(page.document().value(input), "Franc");
}

#[test]
fn test_mouseup_on_option_text_confirms_option() {
    let mut page = enhance(PAGE);
    let input = id(&page, "country");
    let select = id(&page, "country-select");

    page.type_text(input, "ger");
    let text = page
        .document()
        .query_selector(".autocomplete__option > strong")
        .unwrap()
        .unwrap();

    assert!(!page.mouse_up(text));
    assert_eq!(page.document().value(select), "DE");
    assert_eq!(page.document().value(input), "Germany");
    assert!(page.document().query_selector(".autocomplete__option").unwrap().is_none());
}

#[test]
fn test_autocomplete_source_forwarded() {
    let page = enhance_with(EnhancerConfig::for_variant(Variant::Earlier), PAGE, Window::new(URL));
    let wrapper = page.document().query_selector(".autocomplete-wrapper").unwrap().unwrap();

    assert_eq!(
        page.document().attr(wrapper, "data-source"),
        Some("https://www.tax.service.gov.uk/manage-pension-schemes/assets/javascripts/autocomplete/location-autocomplete-graph.json")
    );
}

// ============================================================================
// Numeric inputs
// ============================================================================

fn touch_window() -> Window {
    Window::new(URL).with_features(Features {
        touch_events: true,
        ..Features::default()
    })
}

#[test]
fn test_touch_converts_currency_and_percentage_fields() {
    let page = enhance_with(EnhancerConfig::default(), PAGE, touch_window());

    for field in ["amount", "rate"] {
        let node = id(&page, field);
        assert_eq!(page.document().attr(node, "type"), Some("number"));
        assert_eq!(page.document().attr(node, "step"), Some("any"));
        assert_eq!(page.document().attr(node, "min"), Some("0"));
    }
}

#[test]
fn test_touchevents_class_counts_as_touch() {
    let html = PAGE.replace(r#"<html lang="en">"#, r#"<html lang="en" class="js touchevents">"#);
    let page = enhance(&html);

    assert!(page.capabilities().touch);
    assert_eq!(page.document().attr(id(&page, "amount"), "type"), Some("number"));
}

#[test]
fn test_firefox_keeps_text_fields() {
    let page = enhance_with(EnhancerConfig::default(), PAGE, touch_window().with_user_agent(FIREFOX_UA));

    let amount = id(&page, "amount");
    assert_eq!(page.document().attr(amount, "type"), Some("text"));
    assert_eq!(page.document().attr(amount, "step"), None);
}

#[test]
fn test_desktop_keeps_text_fields() {
    let page = enhance(PAGE);
    assert_eq!(page.document().attr(id(&page, "amount"), "type"), Some("text"));
}

#[test]
fn test_wheel_blocked_only_while_focused() {
    let mut page = enhance(PAGE);
    let members = id(&page, "members");

    assert!(!page.is_wheel_guarded(members));
    assert!(page.wheel(members));

    page.focus(members);
    assert!(page.is_wheel_guarded(members));
    assert!(!page.wheel(members));
    assert_eq!(page.document().value(members), "10");

    page.blur();
    assert!(!page.is_wheel_guarded(members));
    assert!(page.wheel(members));
}

#[test]
fn test_converted_field_gets_wheel_guard() {
    let mut page = enhance_with(EnhancerConfig::default(), PAGE, touch_window());
    let amount = id(&page, "amount");

    page.focus(amount);
    assert!(!page.wheel(amount));

    let members = id(&page, "members");
    page.focus(members);
    assert!(!page.is_wheel_guarded(amount));
    assert!(page.is_wheel_guarded(members));
}

#[test]
fn test_arrow_and_comma_keys_blocked() {
    let mut page = enhance(PAGE);
    let members = id(&page, "members");

    assert!(!page.key_down(members, Key::ArrowUp));
    assert!(!page.key_down(members, Key::ArrowDown));
    assert!(!page.key_down(members, Key::Character(',')));
    assert_eq!(page.document().value(members), "10");

    assert!(page.key_down(members, Key::Character('5')));
    assert_eq!(page.document().value(members), "105");
}

#[test]
fn test_number_keys_matched_by_legacy_code() {
    let mut page = enhance(PAGE);
    let members = id(&page, "members");

    assert!(!page.key_down(members, Key::parse("ArrowUp")));
    assert!(!page.key_down(members, Key::parse(",")));
    assert!(page.key_down(members, Key::parse("ArrowLeft")));
    assert!(page.key_down(members, Key::parse("Shift")));
    assert_eq!(page.document().value(members), "10");
}

#[test]
fn test_arrow_keys_allowed_in_text_fields() {
    let mut page = enhance(PAGE);
    let amount = id(&page, "amount");

    assert!(page.key_down(amount, Key::ArrowUp));
    assert!(page.key_down(amount, Key::Character(',')));
}

// ============================================================================
// Show/hide content
// ============================================================================

#[test]
fn test_show_hide_initial_state() {
    let page = enhance(PAGE);
    let doc = page.document();
    let yes = id(&page, "has-scheme-yes");
    let details = id(&page, "scheme-details");

    assert_eq!(doc.attr(yes, "aria-controls"), Some("scheme-details"));
    assert_eq!(doc.attr(yes, "aria-expanded"), Some("false"));
    assert_eq!(doc.attr(details, "aria-hidden"), Some("true"));
    assert!(doc.has_class(details, "js-hidden"));
}

#[test]
fn test_radio_group_toggles_targets() {
    let mut page = enhance(PAGE);
    let yes = id(&page, "has-scheme-yes");
    let no = id(&page, "has-scheme-no");
    let scheme = id(&page, "scheme-details");
    let reason = id(&page, "no-scheme");

    page.click(yes);
    assert!(!page.document().has_class(scheme, "js-hidden"));
    assert!(page.document().has_class(reason, "js-hidden"));

    page.click(no);
    assert!(page.document().has_class(scheme, "js-hidden"));
    assert!(!page.document().has_class(reason, "js-hidden"));
    assert_eq!(page.document().attr(yes, "aria-expanded"), Some("false"));
    assert_eq!(page.document().attr(no, "aria-expanded"), Some("true"));
}

#[test]
fn test_radio_without_target_hides_sibling_target() {
    let html = r#"<form>
        <div data-target="yes-panel"><input type="radio" name="member" id="member-yes" value="yes"></div>
        <div><input type="radio" name="member" id="member-no" value="no"></div>
        <div id="yes-panel">Membership number</div>
    </form>"#;
    let mut page = enhance(html);
    let yes = id(&page, "member-yes");
    let no = id(&page, "member-no");
    let panel = id(&page, "yes-panel");

    page.click(yes);
    assert!(!page.document().has_class(panel, "js-hidden"));
    assert_eq!(page.document().attr(yes, "aria-expanded"), Some("true"));

    page.click(no);
    assert!(page.document().has_class(panel, "js-hidden"));
    assert_eq!(page.document().attr(panel, "aria-hidden"), Some("true"));
    assert_eq!(page.document().attr(yes, "aria-expanded"), Some("false"));
    assert_eq!(page.document().attr(no, "aria-controls"), None);
    assert_eq!(page.document().attr(no, "aria-expanded"), None);
}

#[test]
fn test_checkbox_toggles_target() {
    let mut page = enhance(PAGE);
    let contact = id(&page, "contact");
    let panel = id(&page, "contact-panel");

    page.click(contact);
    assert_eq!(page.document().attr(panel, "aria-hidden"), Some("false"));
    page.click(contact);
    assert_eq!(page.document().attr(panel, "aria-hidden"), Some("true"));
    assert!(page.document().has_class(panel, "js-hidden"));
}

// ============================================================================
// Print view
// ============================================================================

#[test]
fn test_print_cycle_is_symmetric() {
    let mut page = enhance(PAGE);
    let (d1, d2) = (id(&page, "d1"), id(&page, "d2"));
    let (s1, s2) = (id(&page, "s1"), id(&page, "s2"));
    let members = id(&page, "members");
    page.focus(members);
    page.window_mut().scroll_to(0.0, 480.0);

    page.begin_print();
    assert!(page.is_print_expanded());
    assert_eq!(page.print_opened(), &[d1]);
    assert!(page.details_open(d1));
    assert!(page.document().has_class(d1, "print--open"));
    assert!(!page.document().has_class(d2, "print--open"));
    assert!(page.document().has_class(s1, "heading-medium"));
    assert!(!page.document().has_class(s2, "heading-medium"));

    page.end_print();
    assert!(!page.is_print_expanded());
    assert!(!page.details_open(d1));
    assert!(page.details_open(d2));
    assert!(!page.document().has_class(d1, "print--open"));
    assert!(!page.document().has_class(s1, "heading-medium"));
    assert!(!page.document().has_class(s2, "heading-medium"));

    assert_eq!(page.document().active_element(), Some(members));
    assert_eq!(page.window().page_y_offset(), 480.0);
}

#[test]
fn test_print_keeps_existing_summary_styling() {
    let html = r#"<main>
        <details id="styled"><summary id="styled-summary" class="heading-medium">Scheme details</summary><p>A</p></details>
        <details id="open" open><summary id="open-summary" class="govuk-details__summary">Help</summary><p>B</p></details>
    </main>"#;
    let mut page = enhance(html);
    let styled = id(&page, "styled");
    let styled_summary = id(&page, "styled-summary");
    let open_summary = id(&page, "open-summary");

    page.begin_print();
    assert!(page.details_open(styled));
    assert!(!page.document().has_class(open_summary, "heading-medium"));

    page.end_print();
    assert!(!page.details_open(styled));
    assert!(page.document().has_class(styled_summary, "heading-medium"));
    assert_eq!(page.document().attr(open_summary, "class"), Some("govuk-details__summary"));
}

#[test]
fn test_polyfill_mode_toggles_through_summary() {
    let html = PAGE.replace(r#"<html lang="en">"#, r#"<html lang="en" class="no-details">"#);
    let mut page = enhance(&html);
    let d1 = id(&page, "d1");
    let s1 = id(&page, "s1");
    let members = id(&page, "members");
    page.focus(members);
    page.window_mut().scroll_to(0.0, 120.0);

    page.begin_print();
    assert!(page.document().has_class(d1, "open"));
    assert_eq!(page.document().attr(s1, "aria-expanded"), Some("true"));
    assert_eq!(page.document().active_element(), Some(members));
    assert!(page.is_wheel_guarded(members));

    page.end_print();
    assert!(!page.document().has_class(d1, "open"));
    assert_eq!(page.document().attr(s1, "aria-expanded"), Some("false"));
    assert_eq!(page.document().active_element(), Some(members));
    assert_eq!(page.window().page_y_offset(), 120.0);
}

#[test]
fn test_polyfill_mode_restores_missing_focus() {
    let html = PAGE.replace(r#"<html lang="en">"#, r#"<html lang="en" class="no-details">"#);
    let mut page = enhance(&html);

    page.begin_print();
    assert_eq!(page.document().active_element(), None);
    page.end_print();
    assert_eq!(page.document().active_element(), None);
}

#[test]
fn test_media_query_only_browser() {
    let features = Features {
        print_events: false,
        ..Features::default()
    };
    let mut page = enhance_with(EnhancerConfig::default(), PAGE, Window::new(URL).with_features(features));
    let d1 = id(&page, "d1");

    page.begin_print();
    assert!(page.details_open(d1));
    page.end_print();
    assert!(!page.details_open(d1));
}

#[test]
fn test_print_expansion_disabled_by_latest_variant() {
    let mut page = enhance_with(EnhancerConfig::for_variant(Variant::Latest), PAGE, Window::new(URL));
    let d1 = id(&page, "d1");

    page.begin_print();
    assert!(!page.details_open(d1));
    assert!(page.window().is_printing());
    page.end_print();
    assert!(!page.window().is_printing());
}

// ============================================================================
// Research banner
// ============================================================================

#[test]
fn test_banner_text_overwritten() {
    let page = enhance(PAGE);
    let doc = page.document();
    let text = |sel: &str| doc.text_content(doc.query_selector(sel).unwrap().unwrap());

    assert_eq!(text(".hmrc-user-research-banner__title"), "Help make GOV.UK better");
    assert_eq!(
        text(".hmrc-user-research-banner__link"),
        "Sign up to take part in research (opens in new tab)"
    );
    assert_eq!(text(".hmrc-user-research-banner__close"), "No thanks");
}

#[test]
fn test_banner_untouched_in_earlier_variant() {
    let page = enhance_with(EnhancerConfig::for_variant(Variant::Earlier), PAGE, Window::new(URL));
    let title = page
        .document()
        .query_selector(".hmrc-user-research-banner__title")
        .unwrap()
        .unwrap();

    assert_eq!(page.document().text_content(title), "Old title");
    assert!(matches!(
        page.report().outcome(Step::ResearchBanner),
        Some(StepOutcome::Skipped(_))
    ));
}
