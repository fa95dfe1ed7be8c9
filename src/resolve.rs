//! Preference resolution.
//!
//! Three signals compete for the effective theme, in strict order:
//!
//! 1. an explicit stored preference, if one is present;
//! 2. the host's system preference, if it reports dark;
//! 3. [`Theme::Light`] otherwise.

use tracing::warn;

use crate::theme::Theme;

/// Computes the effective theme from an explicit preference and the system
/// signal.
///
/// `system` is `None` when the host cannot answer, which resolves the same
/// way as "not dark".
///
/// # Example
///
/// ```rust
/// use duskmode::{resolve, Theme};
///
/// assert_eq!(resolve(Some(Theme::Light), Some(true)), Theme::Light);
/// assert_eq!(resolve(None, Some(true)), Theme::Dark);
/// assert_eq!(resolve(None, None), Theme::Light);
/// ```
pub fn resolve(stored: Option<Theme>, system: Option<bool>) -> Theme {
    if let Some(theme) = stored {
        return theme;
    }
    if system == Some(true) {
        return Theme::Dark;
    }
    Theme::Light
}

/// Reads a raw stored value as a theme.
///
/// Stored values are trusted: anything present counts as an explicit
/// preference, and only `"dark"` reads as dark. Values other than the two
/// canonical strings are logged since this crate never writes them.
pub fn read_stored(raw: &str) -> Theme {
    match raw.parse::<Theme>() {
        Ok(theme) => theme,
        Err(err) => {
            warn!(value = raw, %err, "non-canonical stored theme, reading as light");
            Theme::Light
        }
    }
}
