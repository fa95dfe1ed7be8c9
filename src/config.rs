//! Switcher configuration.
//!
//! Every identifier the switcher shares with the outside world lives here:
//! the storage key other consumers must use to interoperate, the class that
//! styling rules key off, and the control it decorates. The defaults match
//! the markup and stylesheets the switcher was first written for.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::theme::Theme;

pub const DEFAULT_STORAGE_KEY: &str = "habit-tracker-theme";
pub const DEFAULT_DARK_CLASS: &str = "dark-theme";
pub const DEFAULT_CONTROL_ID: &str = "theme-toggle";
pub const DEFAULT_INDICATOR_SELECTOR: &str = ".theme-icon";

/// What a toggle control shows: the indicator text and its two
/// accessibility attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlView {
    /// Text placed in the nested indicator element
    pub icon: String,
    /// Value for `aria-label`
    pub label: String,
    /// Value for `title`
    pub title: String,
}

impl ControlView {
    pub fn new(icon: &str, label: &str, title: &str) -> Self {
        Self {
            icon: icon.to_string(),
            label: label.to_string(),
            title: title.to_string(),
        }
    }
}

/// Configuration for a [`ThemeSwitcher`](crate::ThemeSwitcher).
///
/// Missing fields fall back to their defaults when deserialized.
///
/// # Example
///
/// ```rust
/// use duskmode::SwitcherConfig;
///
/// let config = SwitcherConfig::from_json(r#"{ "storage_key": "site-theme" }"#).unwrap();
/// assert_eq!(config.storage_key, "site-theme");
/// assert_eq!(config.control_id, "theme-toggle");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Key the explicit preference is stored under
    pub storage_key: String,
    /// Presentation flag set on the document root while dark
    pub dark_class: String,
    /// Identifier of the optional toggle control
    pub control_id: String,
    /// Selector of the indicator nested inside the control
    pub indicator_selector: String,
    /// Shown while the effective theme is dark
    pub to_light: ControlView,
    /// Shown while the effective theme is light
    pub to_dark: ControlView,
}

impl SwitcherConfig {
    /// Parses a JSON config, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or if the storage key,
    /// dark class or control id is empty.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: SwitcherConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the identifiers shared with collaborators are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("storage_key", &self.storage_key),
            ("dark_class", &self.dark_class),
            ("control_id", &self.control_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }
        Ok(())
    }

    /// The control view advertising the action a click would perform.
    ///
    /// While dark, the control offers the switch to light, and vice versa.
    pub fn control_view(&self, current: Theme) -> &ControlView {
        match current {
            Theme::Dark => &self.to_light,
            Theme::Light => &self.to_dark,
        }
    }
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            dark_class: DEFAULT_DARK_CLASS.to_string(),
            control_id: DEFAULT_CONTROL_ID.to_string(),
            indicator_selector: DEFAULT_INDICATOR_SELECTOR.to_string(),
            to_light: ControlView::new("\u{2600}\u{fe0f}", "Switch to light mode", "Light Mode"),
            to_dark: ControlView::new("\u{1f319}", "Switch to dark mode", "Dark Mode"),
        }
    }
}
