//! The two-valued theme type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of exactly two presentation modes.
///
/// Serializes as the lowercase strings `"light"` and `"dark"`, which are the
/// only values ever written to a preference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the other theme.
    pub fn inverse(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Maps a host's "prefers dark" signal onto a theme.
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// The canonical storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is neither `"light"` nor `"dark"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}', expected 'light' or 'dark'")]
pub struct ThemeParseError(pub String);

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_is_total() {
        assert_eq!(Theme::Light.inverse(), Theme::Dark);
        assert_eq!(Theme::Dark.inverse(), Theme::Light);
        assert_eq!(Theme::Dark.inverse().inverse(), Theme::Dark);
    }

    #[test]
    fn test_from_dark_flag() {
        assert_eq!(Theme::from_dark_flag(true), Theme::Dark);
        assert_eq!(Theme::from_dark_flag(false), Theme::Light);
    }

    #[test]
    fn test_parse_canonical_values() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
    }

    #[test]
    fn test_parse_rejects_other_values() {
        let err = "Dark".parse::<Theme>().unwrap_err();
        assert!(err.to_string().contains("Dark"));
        assert!("".parse::<Theme>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn test_display_matches_storage_form() {
        assert_eq!(Theme::Dark.to_string(), Theme::Dark.as_str());
    }
}
