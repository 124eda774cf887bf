//! Header navigation: which section is highlighted while scrolling, and
//! the collapsible menu on small screens.

use crate::config::{NavItem, SiteConfig};

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Tracks the active section from the scroll position.
///
/// The marker line sits `offset` pixels below the top of the viewport. When
/// sections overlap the last one in document order wins; when the marker is
/// in no section the previous highlight is kept.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollSpy {
    sections: Vec<SectionBounds>,
    offset: f64,
    active: String,
}

impl ScrollSpy {
    pub fn new(sections: Vec<SectionBounds>, offset: f64, initial: impl Into<String>) -> Self {
        Self {
            sections,
            offset,
            active: initial.into(),
        }
    }

    pub fn from_config(sections: Vec<SectionBounds>) -> Self {
        let config = SiteConfig::global();
        Self::new(
            sections,
            f64::from(config.scroll_offset_px),
            config.default_section.clone(),
        )
    }

    /// Replaces the measured layout, e.g. after a resize.
    pub fn set_sections(&mut self, sections: Vec<SectionBounds>) {
        self.sections = sections;
    }

    /// Handles a scroll event and returns the id to highlight.
    pub fn on_scroll(&mut self, scroll_y: f64) -> &str {
        let marker = scroll_y + self.offset;
        if let Some(section) = self
            .sections
            .iter()
            .rev()
            .find(|section| section.contains(marker))
            && section.id != self.active
        {
            tracing::debug!(section = %section.id, "active section changed");
            self.active = section.id.clone();
        }
        &self.active
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active == id
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Following a link collapses the menu.
    pub fn on_link_click(&mut self) {
        if self.open {
            self.open = false;
        }
    }
}

pub fn nav_items() -> &'static [NavItem] {
    &SiteConfig::global().nav
}
