//! User-research banner labels

use crate::steps::{selector, StepStatus};
use crate::{EnhanceError, EnhancedPage, EnhancerConfig};

pub(crate) fn run(page: &mut EnhancedPage, config: &EnhancerConfig) -> Result<StepStatus, EnhanceError> {
    let Some(text) = &config.research_banner else {
        return Ok(StepStatus::Skipped("disabled by configuration"));
    };
    let banner_selector = selector(&config.selectors.research_banner, "research banner")?;
    let root = page.document.tree.root();
    let Some(banner) = page.document.select(root, &banner_selector) else {
        return Ok(StepStatus::Skipped("no research banner on page"));
    };

    for (part, label, what) in [
        (&config.selectors.banner_title, &text.title, "banner title"),
        (&config.selectors.banner_link, &text.link, "banner link"),
        (&config.selectors.banner_close, &text.close, "banner close"),
    ] {
        let part = selector(part, what)?;
        for node in page.document.select_all(banner, &part) {
            page.document.set_text_content(node, label);
        }
    }
    Ok(StepStatus::Applied)
}
