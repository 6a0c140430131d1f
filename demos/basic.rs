//! Example: enhance a declaration page and click through it

use pensions_dom::Key;
use pensions_enhancer::{EnhancerConfig, Features, PageEnhancer, Window};
use pensions_html::HtmlParser;

const URL: &str = "https://www.tax.service.gov.uk/manage-pension-schemes/declaration";

const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en" class="touchevents">
<head><title>Declaration</title></head>
<body>
  <a href="/manage-pension-schemes/previous" id="back-link">Back</a>
  <form method="post">
    <div data-type="currency"><input type="text" id="amount" name="amount"></div>
    <select id="country" name="country">
      <option value="">Select a country</option>
      <option value="FR">France</option>
      <option value="GB">United Kingdom</option>
    </select>
  </form>
  <details id="help"><summary>Help with this page</summary><p>Call us.</p></details>
  <a href="#" id="print-link">Print this page</a>
</body>
</html>"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => EnhancerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EnhancerConfig::default(),
    };

    let document = HtmlParser::new().parse_with_url(PAGE, URL)?;
    let window = Window::new(URL).with_features(Features {
        touch_events: true,
        ..Features::default()
    });
    let mut page = PageEnhancer::new(config).initialize(document, window);

    println!("pensions-enhancer v{}", pensions_enhancer::VERSION);
    for (step, outcome) in page.report().steps() {
        println!("  {step}: {outcome:?}");
    }

    if let Some(input) = page.document().get_element_by_id("country") {
        page.type_text(input, "uni");
        if let Some(option) = page.document().query_selector(".autocomplete__option")? {
            page.click(option);
        }
        page.key_down(input, Key::Tab);
        println!("Country combobox reads {:?}", page.document().value(input));
    }

    if let Some(details) = page.document().get_element_by_id("help") {
        page.begin_print();
        println!("Help open while printing: {}", page.details_open(details));
        page.end_print();
        println!("Help open after printing: {}", page.details_open(details));
    }

    if let Some(back) = page.document().get_element_by_id("back-link") {
        page.click(back);
    }
    println!("Navigations: {:?}", page.window().navigations());
    Ok(())
}
