//! # Duskmode - light/dark theme switching with a persisted choice
//!
//! Duskmode decides whether a document renders light or dark, remembers the
//! user's explicit choice, and follows the host's system preference while no
//! choice has been made.
//!
//! ## Resolution
//!
//! Three signals compete, in strict order:
//!
//! 1. An explicit stored preference. Once set it wins forever in that
//!    storage scope; there is no way to clear it.
//! 2. The system preference, if it reports dark.
//! 3. [`Theme::Light`].
//!
//! Only [`ThemeSwitcher::toggle`] ever writes a preference. System changes
//! are applied while no explicit choice exists and are never persisted.
//!
//! ## Collaborators
//!
//! A [`ThemeSwitcher`] owns three collaborators behind traits:
//!
//! - [`PreferenceStore`]: synchronous key-value storage ([`MemoryStore`],
//!   [`JsonFileStore`], or `web::LocalStorage` with the `web` feature)
//! - [`SystemPreference`]: the host's dark signal and its change stream
//!   ([`ManualSystem`], [`NoSystemPreference`], [`OsSystemPreference`] on
//!   native targets, or `web::MediaQuerySystem`)
//! - [`Document`]: the root presentation flag and an optional toggle
//!   control ([`MemoryDocument`], or `web::WebDocument`)
//!
//! ## Example
//!
//! ```rust
//! use duskmode::{
//!     ControlState, ManualSystem, MemoryDocument, MemoryStore, SwitcherConfig, Theme,
//!     ThemeSwitcher,
//! };
//!
//! let system = ManualSystem::new(false);
//! let switcher = ThemeSwitcher::new(
//!     MemoryStore::new(),
//!     system.clone(),
//!     MemoryDocument::with_control(ControlState::with_indicator()),
//!     SwitcherConfig::default(),
//! )
//! .install();
//!
//! assert!(!switcher.borrow().document().is_dark());
//!
//! // No explicit choice yet: the system is followed.
//! system.set_dark(true);
//! assert!(switcher.borrow().document().is_dark());
//!
//! // An explicit choice overrides the system from now on.
//! assert!(duskmode::toggle());
//! assert_eq!(switcher.borrow().stored_preference(), Some(Theme::Light));
//! system.set_dark(true);
//! assert!(!switcher.borrow().document().is_dark());
//! ```
//!
//! ## Logging
//!
//! Duskmode emits [`tracing`] events and never installs a subscriber.

pub mod apply;
pub mod config;
pub mod error;
pub mod global;
pub mod resolve;
pub mod store;
pub mod switcher;
pub mod system;
pub mod theme;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use apply::{apply_theme, ControlState, Document, MemoryDocument};
pub use config::{ControlView, SwitcherConfig};
pub use error::{ConfigError, StoreError};
pub use global::toggle;
pub use resolve::resolve;
pub use store::{JsonFileStore, MemoryStore, PreferenceStore};
pub use switcher::{toggle_handler, SharedSwitcher, ThemeSwitcher};
#[cfg(not(target_arch = "wasm32"))]
pub use system::{reset_system_detector, set_system_detector, OsSystemPreference};
pub use system::{ManualSystem, NoSystemPreference, SystemListener, SystemPreference};
pub use theme::{Theme, ThemeParseError};
