//! Applying a theme to a document.

use tracing::debug;

use crate::config::{ControlView, SwitcherConfig};
use crate::theme::Theme;

/// The document a switcher renders into.
///
/// Implementations tolerate missing pieces: a document without a toggle
/// control, or a control without an indicator, is not an error.
pub trait Document {
    /// Sets or clears the root presentation flag styling rules key off.
    fn set_dark(&mut self, dark: bool);

    /// Writes `view` onto the toggle control.
    ///
    /// Returns `false` if the document has no control.
    fn update_control(&mut self, view: &ControlView) -> bool;
}

/// Applies `theme`: sets the root flag and refreshes the control, if any.
///
/// Applying the same theme twice leaves the document exactly as applying it
/// once does.
pub fn apply_theme<D: Document + ?Sized>(document: &mut D, config: &SwitcherConfig, theme: Theme) {
    document.set_dark(theme.is_dark());
    if !document.update_control(config.control_view(theme)) {
        debug!(%theme, control = %config.control_id, "no toggle control to update");
    }
}

/// Observable state of a toggle control in a [`MemoryDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlState {
    /// Indicator text, or `None` if the control has no indicator
    pub icon: Option<String>,
    pub aria_label: Option<String>,
    pub title: Option<String>,
    has_indicator: bool,
}

impl ControlState {
    /// A control with a nested indicator element.
    pub fn with_indicator() -> Self {
        Self {
            has_indicator: true,
            ..Self::default()
        }
    }

    /// A control without an indicator; only its attributes are updated.
    pub fn without_indicator() -> Self {
        Self::default()
    }
}

/// In-memory document for headless hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    dark: bool,
    control: Option<ControlState>,
}

impl MemoryDocument {
    /// A document without a toggle control.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document with a toggle control.
    pub fn with_control(control: ControlState) -> Self {
        Self {
            dark: false,
            control: Some(control),
        }
    }

    /// Adds a control, as when the document structure finishes loading.
    pub fn insert_control(&mut self, control: ControlState) {
        self.control = Some(control);
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn control(&self) -> Option<&ControlState> {
        self.control.as_ref()
    }
}

impl Document for MemoryDocument {
    fn set_dark(&mut self, dark: bool) {
        self.dark = dark;
    }

    fn update_control(&mut self, view: &ControlView) -> bool {
        let Some(control) = self.control.as_mut() else {
            return false;
        };
        if control.has_indicator {
            control.icon = Some(view.icon.clone());
        }
        control.aria_label = Some(view.label.clone());
        control.title = Some(view.title.clone());
        true
    }
}
