//! In-memory stand-ins for the browser, a page's DOM and the popup.
//!
//! They behave like the real extension APIs where the delivery chains can
//! observe a difference: restricted pages refuse scripting, messages to a
//! tab without a listening agent fail, and every call is counted.

mod browser;
mod dom;
mod host;
mod surface;

pub use browser::{SimBrowser, SimCalls, SimTab, SIM_EXTENSION_ORIGIN};
pub use dom::{SimDocument, SimElement};
pub use host::{SimHost, SimNode};
pub use surface::{SimSurface, SurfaceLog};

use std::sync::{Mutex, MutexGuard};

/// Lock a sim mutex, recovering from poisoning by a panicked test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
