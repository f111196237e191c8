// ── Reactive session store ──
//
// Lock-free storage keyed by client IP with push-based change
// notification.

mod collection;
mod session_store;

pub use session_store::SessionStore;
