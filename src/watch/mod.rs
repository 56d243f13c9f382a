//! Long-poll change watches
//!
//! Turns the store's blocking-query semantics into a push-like stream of
//! entries:
//!
//! ```text
//! IndexTracker ──seed──▶ ChangeWatcher task ──fetch(key, wait_index)──▶ Store
//!       ▲                        │
//!       └──────── set ───────────┤
//!                                ▼
//!                  mpsc (single slot) ──▶ WatchHandle (one consumer)
//! ```

mod index_tracker;
mod watcher;

pub use index_tracker::*;
pub use watcher::*;
