//! Browser host: `localStorage`, `prefers-color-scheme` and the DOM.
//!
//! Call [`init_theme`] (exported to JavaScript as `initTheme`) from a script
//! in `<head>` so the theme is applied before first paint. The toggle control
//! is bound once the document has finished parsing, and `window.toggleTheme`
//! is exposed for inline handlers.

use std::cell::RefCell;

use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DocumentReadyState, DomException, MediaQueryList, MediaQueryListEvent, Storage, Window};

use crate::apply::Document;
use crate::config::{ControlView, SwitcherConfig};
use crate::error::StoreError;
use crate::global;
use crate::store::PreferenceStore;
use crate::switcher::{toggle_handler, SharedSwitcher, ThemeSwitcher};
use crate::system::{SystemListener, SystemPreference};

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// A switcher wired to the browser.
pub type WebSwitcher = SharedSwitcher<LocalStorage, MediaQuerySystem, WebDocument>;

thread_local! {
    static INSTALLED: RefCell<Option<WebSwitcher>> = const { RefCell::new(None) };
}

/// `window.localStorage`, tolerating browsers that disable it.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn from_window(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            warn!("localStorage unavailable, theme choices last for this page only");
        }
        Self { storage }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("no localStorage".to_string()))?;
        storage.set_item(key, value).map_err(store_error)
    }
}

fn store_error(err: JsValue) -> StoreError {
    match err.dyn_ref::<DomException>() {
        Some(ex) if ex.name() == "QuotaExceededError" => StoreError::QuotaExceeded,
        _ => StoreError::Unavailable(format!("{err:?}")),
    }
}

/// The `(prefers-color-scheme: dark)` media query.
pub struct MediaQuerySystem {
    query: Option<MediaQueryList>,
}

impl MediaQuerySystem {
    pub fn from_window(window: &Window) -> Self {
        Self {
            query: window.match_media(DARK_QUERY).ok().flatten(),
        }
    }
}

impl SystemPreference for MediaQuerySystem {
    fn prefers_dark(&self) -> Option<bool> {
        self.query.as_ref().map(MediaQueryList::matches)
    }

    fn watch(&self, mut listener: SystemListener) -> bool {
        let Some(query) = self.query.as_ref() else {
            return false;
        };
        let closure = Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
            listener(event.matches());
        });
        match query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref()) {
            Ok(()) => {
                // Registered for the lifetime of the document.
                closure.forget();
                true
            }
            Err(err) => {
                warn!(error = ?err, "could not listen for color scheme changes");
                false
            }
        }
    }
}

/// The live DOM: a class on `<html>` and the toggle control found by id.
///
/// The class always goes on the document element, which exists before
/// `<body>` is parsed, so one element carries the flag for the page's life.
pub struct WebDocument {
    document: web_sys::Document,
    dark_class: String,
    control_id: String,
    indicator_selector: String,
}

impl WebDocument {
    pub fn new(document: web_sys::Document, config: &SwitcherConfig) -> Self {
        Self {
            document,
            dark_class: config.dark_class.clone(),
            control_id: config.control_id.clone(),
            indicator_selector: config.indicator_selector.clone(),
        }
    }
}

impl Document for WebDocument {
    fn set_dark(&mut self, dark: bool) {
        let Some(root) = self.document.document_element() else {
            return;
        };
        if let Err(err) = root.class_list().toggle_with_force(&self.dark_class, dark) {
            warn!(error = ?err, "could not set theme class");
        }
    }

    fn update_control(&mut self, view: &ControlView) -> bool {
        let Some(control) = self.document.get_element_by_id(&self.control_id) else {
            return false;
        };
        if let Some(icon) = control.query_selector(&self.indicator_selector).ok().flatten() {
            icon.set_text_content(Some(&view.icon));
        }
        let _ = control.set_attribute("aria-label", &view.label);
        let _ = control.set_attribute("title", &view.title);
        true
    }
}

/// Installs a switcher for the current page.
///
/// Applies the theme immediately, follows `prefers-color-scheme` while no
/// explicit choice exists, exposes `window.toggleTheme`, and binds the
/// toggle control once the document structure is ready.
pub fn install(config: SwitcherConfig) -> Result<WebSwitcher, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let switcher = ThemeSwitcher::new(
        LocalStorage::from_window(&window),
        MediaQuerySystem::from_window(&window),
        WebDocument::new(document.clone(), &config),
        config,
    )
    .install();

    expose_toggle(&window)?;
    when_ready(&document, &switcher)?;

    INSTALLED.with(|installed| *installed.borrow_mut() = Some(switcher.clone()));
    Ok(switcher)
}

/// Installs a switcher with the default configuration.
#[wasm_bindgen(js_name = initTheme)]
pub fn init_theme() -> Result<(), JsValue> {
    install(SwitcherConfig::default()).map(|_| ())
}

/// Toggles the installed switcher, if any.
#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() {
    global::toggle();
}

fn expose_toggle(window: &Window) -> Result<(), JsValue> {
    let closure = Closure::<dyn Fn()>::new(|| {
        global::toggle();
    });
    js_sys::Reflect::set(window, &JsValue::from_str("toggleTheme"), closure.as_ref())?;
    closure.forget();
    Ok(())
}

fn when_ready(document: &web_sys::Document, switcher: &WebSwitcher) -> Result<(), JsValue> {
    if document.ready_state() != DocumentReadyState::Loading {
        return bind_control(document, switcher);
    }

    let doc = document.clone();
    let target = switcher.clone();
    let closure = Closure::<dyn FnMut()>::new(move || {
        if let Err(err) = bind_control(&doc, &target) {
            warn!(error = ?err, "could not bind theme toggle");
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn bind_control(document: &web_sys::Document, switcher: &WebSwitcher) -> Result<(), JsValue> {
    let control_id = switcher.borrow().config().control_id.clone();
    let Some(control) = document.get_element_by_id(&control_id) else {
        debug!(control = %control_id, "no theme toggle control on this page");
        return Ok(());
    };

    let handler = toggle_handler(switcher);
    let closure = Closure::<dyn FnMut()>::new(move || handler());
    control.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();

    switcher.borrow_mut().ready();
    Ok(())
}
