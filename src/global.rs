//! The global toggle entry point.
//!
//! Declarative bindings outside a switcher's own wiring (inline `onclick`
//! attributes, keyboard shortcuts) need one ambient function to call. The
//! most recently installed switcher on the current thread is its target.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

thread_local! {
    static TOGGLE_TARGET: RefCell<Option<Rc<dyn Fn()>>> = const { RefCell::new(None) };
}

/// Makes `handler` the target of [`toggle`], replacing any previous one.
pub fn register(handler: impl Fn() + 'static) {
    TOGGLE_TARGET.with(|target| {
        *target.borrow_mut() = Some(Rc::new(handler));
    });
}

/// Removes the current target.
pub fn unregister() {
    TOGGLE_TARGET.with(|target| target.borrow_mut().take());
}

/// Toggles the installed switcher.
///
/// Returns `false` if no switcher has been installed on this thread.
pub fn toggle() -> bool {
    let handler = TOGGLE_TARGET.with(|target| target.borrow().clone());
    match handler {
        Some(handler) => {
            handler();
            true
        }
        None => {
            debug!("toggle requested before any switcher was installed");
            false
        }
    }
}
