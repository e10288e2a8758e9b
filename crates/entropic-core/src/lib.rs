//! Core systems for Entropic.
//!
//! This crate provides the change-notification fabric that every Entropic
//! model is built on:
//!
//! - **Signal/Slot System**: Ordered, synchronous callbacks
//! - **Listeners**: The single-method `refresh()` contract views implement
//! - **Notifier**: Per-model listener list with a same-thread reentrancy guard and batching
//! - **Model**: The `add_listener` / `refresh` capability shared by all models
//! - **Refresh Groups**: Explicit sets of models refreshed together
//!
//! # Signal Example
//!
//! ```
//! use entropic_core::Signal;
//!
//! let value_changed = Signal::new();
//!
//! let conn_id = value_changed.connect(|| {
//!     println!("Value changed");
//! });
//!
//! value_changed.emit();
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Model Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use entropic_core::{Listener, ListenerId, Model, Notifier};
//!
//! struct Counter {
//!     value: AtomicUsize,
//!     notifier: Notifier,
//! }
//!
//! impl Counter {
//!     fn increment(&self) {
//!         self.value.fetch_add(1, Ordering::SeqCst);
//!         self.refresh();
//!     }
//! }
//!
//! impl Model for Counter {
//!     fn add_listener(&self, listener: Arc<dyn Listener>) -> ListenerId {
//!         self.notifier.add_listener(listener)
//!     }
//!
//!     fn remove_listener(&self, id: ListenerId) -> entropic_core::Result<()> {
//!         self.notifier.remove_listener(id)
//!     }
//!
//!     fn refresh(&self) {
//!         self.notifier.notify();
//!     }
//! }
//!
//! let counter = Counter { value: AtomicUsize::new(0), notifier: Notifier::new("counter") };
//! let seen = Arc::new(AtomicUsize::new(0));
//! let seen_clone = seen.clone();
//! counter.add_listener(Arc::new(move || {
//!     seen_clone.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! counter.increment();
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

mod error;
mod group;
pub mod listener;
pub mod logging;
pub mod signal;

pub use error::{CoreError, Result, SignalError};
pub use group::RefreshGroup;
pub use listener::{Listener, ListenerId, Model, Notifier};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
