//! System color-mode sources.
//!
//! A source answers "does the host prefer dark?" synchronously and may offer
//! a change stream. Hosts that cannot answer report `None`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
#[cfg(not(target_arch = "wasm32"))]
use once_cell::sync::Lazy;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use crate::theme::Theme;

/// Callback invoked with the new "prefers dark" value on each change.
pub type SystemListener = Box<dyn FnMut(bool)>;

/// The host environment's ambient light/dark signal.
pub trait SystemPreference {
    /// Returns whether the host prefers dark, or `None` if it cannot tell.
    fn prefers_dark(&self) -> Option<bool>;

    /// Registers `listener` for change notifications.
    ///
    /// Returns `false` if the host has no change stream, in which case the
    /// listener is dropped.
    fn watch(&self, listener: SystemListener) -> bool {
        let _ = listener;
        false
    }
}

/// A host without any system preference support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSystemPreference;

impl SystemPreference for NoSystemPreference {
    fn prefers_dark(&self) -> Option<bool> {
        None
    }
}

#[derive(Default)]
struct ManualState {
    dark: Cell<Option<bool>>,
    listeners: RefCell<Vec<SystemListener>>,
}

/// A system source driven by the host application.
///
/// Clones share state, so one handle can live in a switcher while another
/// reports changes through [`set_dark`](Self::set_dark).
///
/// # Example
///
/// ```rust
/// use duskmode::{ManualSystem, SystemPreference};
///
/// let system = ManualSystem::new(false);
/// let handle = system.clone();
/// handle.set_dark(true);
/// assert_eq!(system.prefers_dark(), Some(true));
/// ```
#[derive(Clone, Default)]
pub struct ManualSystem {
    state: Rc<ManualState>,
}

impl ManualSystem {
    pub fn new(dark: bool) -> Self {
        let system = Self::default();
        system.state.dark.set(Some(dark));
        system
    }

    /// A source that supports change notifications but has no initial answer.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Updates the signal and notifies every registered listener.
    pub fn set_dark(&self, dark: bool) {
        self.state.dark.set(Some(dark));
        // Listeners may query this source, so none of its borrows are held
        // while they run.
        let mut listeners = self.state.listeners.take();
        for listener in listeners.iter_mut() {
            listener(dark);
        }
        let mut registered = self.state.listeners.borrow_mut();
        listeners.append(&mut registered);
        *registered = listeners;
    }

    pub fn listener_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }
}

impl SystemPreference for ManualSystem {
    fn prefers_dark(&self) -> Option<bool> {
        self.state.dark.get()
    }

    fn watch(&self, listener: SystemListener) -> bool {
        self.state.listeners.borrow_mut().push(listener);
        true
    }
}

#[cfg(not(target_arch = "wasm32"))]
type SystemDetector = fn() -> Theme;

#[cfg(not(target_arch = "wasm32"))]
static SYSTEM_DETECTOR: Lazy<Mutex<SystemDetector>> = Lazy::new(|| Mutex::new(os_theme_detector));

/// Overrides the detector [`OsSystemPreference`] consults.
///
/// This is useful for testing or when you want to force a specific mode.
#[cfg(not(target_arch = "wasm32"))]
pub fn set_system_detector(detector: SystemDetector) {
    let mut guard = SYSTEM_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = detector;
}

/// Restores the operating system detector.
#[cfg(not(target_arch = "wasm32"))]
pub fn reset_system_detector() {
    set_system_detector(os_theme_detector);
}

#[cfg(not(target_arch = "wasm32"))]
fn detect_system_theme() -> Theme {
    let detector = SYSTEM_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    (*detector)()
}

#[cfg(not(target_arch = "wasm32"))]
fn os_theme_detector() -> Theme {
    match detect_os_theme() {
        OsThemeMode::Dark => Theme::Dark,
        OsThemeMode::Light => Theme::Light,
    }
}

/// The operating system's light/dark setting.
///
/// Queried on every call; the operating system offers no change stream here,
/// so hosts that poll forward changes with
/// [`ThemeSwitcher::on_system_change`](crate::ThemeSwitcher::on_system_change).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSystemPreference;

#[cfg(not(target_arch = "wasm32"))]
impl SystemPreference for OsSystemPreference {
    fn prefers_dark(&self) -> Option<bool> {
        Some(detect_system_theme().is_dark())
    }
}
