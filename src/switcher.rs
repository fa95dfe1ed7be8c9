//! The theme switcher: resolution, toggling and system-change handling
//! bound to one document.
//!
//! A [`ThemeSwitcher`] owns its three collaborators and runs every entry
//! point to completion:
//!
//! - [`start`](ThemeSwitcher::start): resolve and apply immediately, before
//!   the document structure is ready
//! - [`ready`](ThemeSwitcher::ready): re-apply once the toggle control
//!   exists
//! - [`toggle`](ThemeSwitcher::toggle): invert, persist, apply
//! - [`on_system_change`](ThemeSwitcher::on_system_change): follow the
//!   system unless an explicit choice exists
//!
//! [`ThemeSwitcher::install`] performs the one-time wiring for a document.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::apply::{apply_theme, Document};
use crate::config::SwitcherConfig;
use crate::global;
use crate::resolve::{read_stored, resolve};
use crate::store::PreferenceStore;
use crate::system::SystemPreference;
use crate::theme::Theme;

/// A switcher shared between the event handlers of one document.
pub type SharedSwitcher<S, P, D> = Rc<RefCell<ThemeSwitcher<S, P, D>>>;

/// Resolves, applies and persists the theme of one document.
///
/// # Example
///
/// ```rust
/// use duskmode::{ManualSystem, MemoryDocument, MemoryStore, SwitcherConfig, Theme, ThemeSwitcher};
///
/// let mut switcher = ThemeSwitcher::new(
///     MemoryStore::new(),
///     ManualSystem::new(false),
///     MemoryDocument::new(),
///     SwitcherConfig::default(),
/// );
///
/// assert_eq!(switcher.start(), Theme::Light);
/// assert_eq!(switcher.toggle(), Theme::Dark);
/// assert!(switcher.document().is_dark());
/// assert_eq!(switcher.stored_preference(), Some(Theme::Dark));
/// ```
pub struct ThemeSwitcher<S, P, D> {
    store: S,
    system: P,
    document: D,
    config: SwitcherConfig,
    /// Explicit choice the store failed to persist; wins for this session.
    session: Option<Theme>,
}

impl<S, P, D> ThemeSwitcher<S, P, D>
where
    S: PreferenceStore,
    P: SystemPreference,
    D: Document,
{
    pub fn new(store: S, system: P, document: D, config: SwitcherConfig) -> Self {
        Self {
            store,
            system,
            document,
            config,
            session: None,
        }
    }

    /// The explicit preference, if the user has made one.
    pub fn stored_preference(&self) -> Option<Theme> {
        self.session.or_else(|| {
            self.store
                .get(&self.config.storage_key)
                .map(|raw| read_stored(&raw))
        })
    }

    /// Whether an explicit preference overrides the system signal.
    pub fn has_explicit_preference(&self) -> bool {
        self.session.is_some() || self.store.get(&self.config.storage_key).is_some()
    }

    /// Computes the effective theme without side effects.
    pub fn resolve(&self) -> Theme {
        resolve(self.stored_preference(), self.system.prefers_dark())
    }

    /// Applies `theme` to the document.
    pub fn apply(&mut self, theme: Theme) {
        debug!(%theme, "applying theme");
        apply_theme(&mut self.document, &self.config, theme);
    }

    /// Resolves and applies immediately, without waiting for the document
    /// structure.
    pub fn start(&mut self) -> Theme {
        let theme = self.resolve();
        self.apply(theme);
        theme
    }

    /// Re-applies the effective theme once the document structure is ready,
    /// so a control that did not exist during [`start`](Self::start) is
    /// refreshed along with the root flag.
    ///
    /// Returns `false` if the document has no control.
    pub fn ready(&mut self) -> bool {
        let theme = self.resolve();
        self.document.set_dark(theme.is_dark());
        let found = self.document.update_control(self.config.control_view(theme));
        if !found {
            debug!(control = %self.config.control_id, "toggle control not found");
        }
        found
    }

    /// Inverts the effective theme, persists it as the explicit preference
    /// and applies it.
    ///
    /// A failed write is not fatal: the new theme is kept in memory and wins
    /// over the store for the rest of the session.
    pub fn toggle(&mut self) -> Theme {
        let next = self.resolve().inverse();
        match self.store.set(&self.config.storage_key, next.as_str()) {
            Ok(()) => self.session = None,
            Err(err) => {
                warn!(%err, theme = %next, "could not persist theme, keeping it for this session");
                self.session = Some(next);
            }
        }
        info!(theme = %next, "theme toggled");
        self.apply(next);
        next
    }

    /// Follows a system preference change unless an explicit choice exists.
    ///
    /// Never writes to the store. Returns whether the theme was applied.
    pub fn on_system_change(&mut self, dark: bool) -> bool {
        if self.has_explicit_preference() {
            debug!(dark, "explicit preference set, ignoring system change");
            return false;
        }
        self.apply(Theme::from_dark_flag(dark));
        true
    }

    pub fn config(&self) -> &SwitcherConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn system(&self) -> &P {
        &self.system
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the document, for hosts that build it up over time.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }
}

impl<S, P, D> ThemeSwitcher<S, P, D>
where
    S: PreferenceStore + 'static,
    P: SystemPreference + 'static,
    D: Document + 'static,
{
    /// Wires the switcher into its document.
    ///
    /// Runs [`start`](Self::start), subscribes to system changes when the
    /// source offers a stream, and registers the switcher as the global
    /// [`toggle`](crate::toggle) target. The returned handle is what event
    /// handlers share; they hold weak references, so dropping every strong
    /// handle turns them into no-ops.
    pub fn install(self) -> SharedSwitcher<S, P, D> {
        let shared = Rc::new(RefCell::new(self));
        let theme = shared.borrow_mut().start();
        debug!(%theme, "initial theme applied");

        let weak = Rc::downgrade(&shared);
        let listener = Box::new(move |dark: bool| {
            if let Some(switcher) = weak.upgrade() {
                switcher.borrow_mut().on_system_change(dark);
            }
        });
        if !shared.borrow().system.watch(listener) {
            debug!("system preference changes unavailable, no listener registered");
        }

        global::register(toggle_handler(&shared));
        shared
    }
}

/// A handler that toggles `shared`, for binding to a control's activation.
pub fn toggle_handler<S, P, D>(shared: &SharedSwitcher<S, P, D>) -> impl Fn() + 'static
where
    S: PreferenceStore + 'static,
    P: SystemPreference + 'static,
    D: Document + 'static,
{
    let weak: Weak<RefCell<ThemeSwitcher<S, P, D>>> = Rc::downgrade(shared);
    move || {
        if let Some(switcher) = weak.upgrade() {
            switcher.borrow_mut().toggle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::{ControlState, MemoryDocument};
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use crate::system::{ManualSystem, NoSystemPreference};

    fn switcher(
        store: MemoryStore,
        dark: bool,
    ) -> ThemeSwitcher<MemoryStore, ManualSystem, MemoryDocument> {
        ThemeSwitcher::new(
            store,
            ManualSystem::new(dark),
            MemoryDocument::with_control(ControlState::with_indicator()),
            SwitcherConfig::default(),
        )
    }

    /// Refuses every write.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl PreferenceStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::QuotaExceeded)
        }
    }

    #[test]
    fn test_start_follows_system() {
        let mut s = switcher(MemoryStore::new(), true);
        assert_eq!(s.start(), Theme::Dark);
        assert!(s.document().is_dark());
    }

    #[test]
    fn test_start_prefers_stored() {
        let mut s = switcher(MemoryStore::with_entry("habit-tracker-theme", "light"), true);
        assert_eq!(s.start(), Theme::Light);
        assert!(!s.document().is_dark());
    }

    #[test]
    fn test_start_does_not_write() {
        let mut s = switcher(MemoryStore::new(), true);
        s.start();
        assert_eq!(s.store().writes(), 0);
    }

    #[test]
    fn test_toggle_inverts_and_persists() {
        let mut s = switcher(MemoryStore::new(), false);
        s.start();

        assert_eq!(s.toggle(), Theme::Dark);
        assert_eq!(s.store().get("habit-tracker-theme").as_deref(), Some("dark"));
        assert!(s.document().is_dark());

        assert_eq!(s.toggle(), Theme::Light);
        assert_eq!(s.store().get("habit-tracker-theme").as_deref(), Some("light"));
        assert!(!s.document().is_dark());
    }

    #[test]
    fn test_toggle_from_system_dark_stores_light() {
        let mut s = switcher(MemoryStore::new(), true);
        s.start();
        assert_eq!(s.toggle(), Theme::Light);
        assert_eq!(s.stored_preference(), Some(Theme::Light));
    }

    #[test]
    fn test_system_change_ignored_with_explicit_choice() {
        let mut s = switcher(MemoryStore::with_entry("habit-tracker-theme", "light"), false);
        s.start();
        assert!(!s.on_system_change(true));
        assert!(!s.document().is_dark());
    }

    #[test]
    fn test_system_change_applied_without_writing() {
        let mut s = switcher(MemoryStore::new(), false);
        s.start();
        assert!(s.on_system_change(true));
        assert!(s.document().is_dark());
        assert_eq!(s.store().writes(), 0);
        assert_eq!(s.stored_preference(), None);
    }

    #[test]
    fn test_empty_stored_value_counts_as_explicit() {
        let mut s = switcher(MemoryStore::with_entry("habit-tracker-theme", ""), true);
        assert_eq!(s.start(), Theme::Light);
        assert!(!s.on_system_change(true));
    }

    #[test]
    fn test_ready_refreshes_late_control() {
        let mut s = ThemeSwitcher::new(
            MemoryStore::new(),
            ManualSystem::new(true),
            MemoryDocument::new(),
            SwitcherConfig::default(),
        );
        s.start();
        assert!(!s.ready());

        s.document_mut()
            .insert_control(ControlState::with_indicator());
        assert!(s.ready());
        let control = s.document().control().unwrap();
        assert_eq!(control.aria_label.as_deref(), Some("Switch to light mode"));
    }

    #[test]
    fn test_ready_reapplies_root_flag() {
        let mut s = switcher(MemoryStore::new(), true);
        s.start();
        s.document_mut().set_dark(false);

        assert!(s.ready());
        assert!(s.document().is_dark());
    }

    #[test]
    fn test_failed_write_falls_back_to_session() {
        let mut s = ThemeSwitcher::new(
            ReadOnlyStore::default(),
            NoSystemPreference,
            MemoryDocument::new(),
            SwitcherConfig::default(),
        );
        s.start();

        assert_eq!(s.toggle(), Theme::Dark);
        assert!(s.document().is_dark());
        assert_eq!(s.stored_preference(), Some(Theme::Dark));
        assert!(s.has_explicit_preference());

        assert_eq!(s.toggle(), Theme::Light);
        assert!(!s.document().is_dark());
    }

    #[test]
    fn test_session_fallback_blocks_system_change() {
        let mut s = ThemeSwitcher::new(
            ReadOnlyStore::default(),
            ManualSystem::new(false),
            MemoryDocument::new(),
            SwitcherConfig::default(),
        );
        s.start();
        s.toggle();
        s.toggle();
        assert!(!s.on_system_change(true));
        assert!(!s.document().is_dark());
    }

    #[test]
    fn test_custom_storage_key() {
        let config = SwitcherConfig {
            storage_key: "site-theme".to_string(),
            ..SwitcherConfig::default()
        };
        let mut s = ThemeSwitcher::new(
            MemoryStore::new(),
            NoSystemPreference,
            MemoryDocument::new(),
            config,
        );
        s.toggle();
        assert_eq!(s.store().get("site-theme").as_deref(), Some("dark"));
        assert_eq!(s.store().get("habit-tracker-theme"), None);
    }
}
