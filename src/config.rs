use std::fmt::{Display, Formatter};
use std::sync::LazyLock;
use std::time::Duration;

use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::feedback::Rating;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct SiteAssets;

const SITE_FILE: &str = "site.toml";

static GLOBAL: LazyLock<SiteConfig> = LazyLock::new(|| match SiteConfig::embedded() {
    Ok(config) => config,
    Err(error) => {
        tracing::warn!(%error, "falling back to built-in site config");
        SiteConfig::default()
    }
});

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(file) => write!(f, "embedded config file {file} is missing"),
            ConfigError::Parse(error) => write!(f, "failed to parse site config: {error}"),
            ConfigError::Invalid(reason) => write!(f, "invalid site config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct NavItem {
    pub id: String,
    pub label: String,
}

/// One entry of the feedback rating selector, in display order.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct RatingOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
pub struct CarouselSettings {
    pub slides: usize,
    #[serde(default)]
    pub start: usize,
    pub interval_ms: u64,
    /// Number of slots rendered around the current slide.
    #[serde(default = "one")]
    pub visible: usize,
}

impl CarouselSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn one() -> usize {
    1
}

fn builtin_ratings() -> Vec<RatingOption> {
    Rating::OPTIONS
        .into_iter()
        .map(|rating| RatingOption {
            value: rating.value().into(),
            label: rating.label().into(),
        })
        .collect()
}

/// Read-only settings shared by every component of the site.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct SiteConfig {
    pub scroll_offset_px: u32,
    pub default_section: String,
    pub submit_delay_ms: u64,
    pub nav: Vec<NavItem>,
    #[serde(default = "builtin_ratings")]
    pub ratings: Vec<RatingOption>,
    pub hero: CarouselSettings,
    pub gallery: CarouselSettings,
}

impl SiteConfig {
    /// Parsed once on first use. Falls back to [`SiteConfig::default`] if the
    /// embedded file cannot be read.
    pub fn global() -> &'static SiteConfig {
        &GLOBAL
    }

    pub fn embedded() -> Result<Self, ConfigError> {
        let file = SiteAssets::get(SITE_FILE).ok_or(ConfigError::Missing(SITE_FILE))?;
        let raw = std::str::from_utf8(file.data.as_ref())
            .map_err(|error| ConfigError::Parse(error.to_string()))?;
        Self::from_toml_str(raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig =
            toml::from_str(raw).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    fn check(&self) -> Result<(), ConfigError> {
        for (name, carousel) in [("hero", &self.hero), ("gallery", &self.gallery)] {
            if carousel.slides == 0 {
                return Err(ConfigError::Invalid(format!("{name} has no slides")));
            }
            if carousel.start >= carousel.slides {
                return Err(ConfigError::Invalid(format!(
                    "{name} starts at {} but has {} slides",
                    carousel.start, carousel.slides
                )));
            }
            if carousel.interval_ms == 0 {
                return Err(ConfigError::Invalid(format!("{name} interval is zero")));
            }
        }
        if self.nav.iter().any(|item| item.id.trim().is_empty()) {
            return Err(ConfigError::Invalid("nav item without id".into()));
        }
        let mut seen = Vec::with_capacity(self.ratings.len());
        for option in &self.ratings {
            let rating = Rating::from_value(&option.value).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown rating value {:?}", option.value))
            })?;
            if seen.contains(&rating) {
                return Err(ConfigError::Invalid(format!(
                    "rating {:?} listed twice",
                    option.value
                )));
            }
            seen.push(rating);
        }
        if seen.len() != Rating::OPTIONS.len() {
            return Err(ConfigError::Invalid(format!(
                "expected {} rating options, found {}",
                Rating::OPTIONS.len(),
                seen.len()
            )));
        }
        Ok(())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let nav = [
            ("about", "About us"),
            ("classes", "Classes"),
            ("trainers", "Trainers"),
            ("facilities", "Facilities"),
            ("gallery", "Gallery"),
            ("membership", "Membership"),
            ("testimonials", "Testimonials"),
        ]
        .into_iter()
        .map(|(id, label)| NavItem {
            id: id.into(),
            label: label.into(),
        })
        .collect();

        Self {
            scroll_offset_px: 150,
            default_section: "home".into(),
            submit_delay_ms: 800,
            nav,
            ratings: builtin_ratings(),
            hero: CarouselSettings {
                slides: 3,
                start: 0,
                interval_ms: 8000,
                visible: 1,
            },
            gallery: CarouselSettings {
                slides: 9,
                start: 4,
                interval_ms: 5000,
                visible: 9,
            },
        }
    }
}
