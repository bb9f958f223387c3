//! Smooth-scroll targets for nav links and call-to-action buttons.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const CTA_SECTION_ID: &str = "cta";
pub const DEFAULT_SCROLL_GAP_PX: f64 = 20.0;

/// Scroll offset that puts a section just below the fixed navbar.
pub fn scroll_target(section_top: f64, nav_height: f64, gap: f64) -> f64 {
    (section_top - nav_height - gap).max(0.0)
}

/// Section id from an in-page `#anchor` href.
pub fn anchor_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Measured positions of the page's sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub nav_height_px: f64,
    pub gap_px: f64,
    /// Section id to its top offset in the document.
    pub sections: BTreeMap<String, f64>,
}

impl PageLayout {
    pub fn new(nav_height_px: f64, gap_px: f64) -> Self {
        Self {
            nav_height_px,
            gap_px,
            sections: BTreeMap::new(),
        }
    }

    pub fn with_section(mut self, id: impl Into<String>, top_px: f64) -> Self {
        self.sections.insert(id.into(), top_px);
        self
    }

    /// Where a nav link scrolls to; `None` when the href is not an in-page
    /// anchor or the section is missing.
    pub fn scroll_for_link(&self, href: &str) -> Option<f64> {
        let top = self.sections.get(anchor_id(href)?)?;
        Some(scroll_target(*top, self.nav_height_px, self.gap_px))
    }

    /// Where a CTA button scrolls to. Buttons inside the sign-up form submit
    /// instead of scrolling.
    pub fn scroll_for_cta(&self, inside_form: bool) -> Option<f64> {
        if inside_form {
            return None;
        }
        let top = self.sections.get(CTA_SECTION_ID)?;
        Some(scroll_target(*top, self.nav_height_px, self.gap_px))
    }
}
