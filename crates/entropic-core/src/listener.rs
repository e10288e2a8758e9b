//! Listener and model capabilities.
//!
//! Every Entropic model exposes the same two-sided contract:
//!
//! - Views implement [`Listener`], a single `refresh()` callback invoked
//!   whenever an observed model changes.
//! - Models implement [`Model`], which registers listeners and fans a
//!   refresh out to all of them.
//!
//! Models keep their listeners in a [`Notifier`]. A notification runs
//! synchronously in the call stack of the mutation that caused it, visiting
//! listeners in registration order.
//!
//! # Registration does not refresh
//!
//! [`Model::add_listener`] only registers. A listener that must render as
//! soon as it is attached should use [`Model::attach`], which registers and
//! then refreshes that single listener.
//!
//! # Reentrancy
//!
//! A listener may read the model that is notifying it but must not mutate
//! it. Each [`Notifier`] records which threads are fanning out: a refresh
//! requested by a listener running on the notifying thread is dropped with a
//! warning instead of recursing. Mutations on other threads still notify.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use crate::error::Result;
use crate::logging::targets;
use crate::signal::{ConnectionId, Signal};

/// Identifier of a registered listener.
pub type ListenerId = ConnectionId;

/// An observer of a model.
///
/// Closures implement this trait, so `Arc::new(|| ...)` can be passed
/// wherever an `Arc<dyn Listener>` is expected.
pub trait Listener: Send + Sync {
    /// Called whenever the observed model's state has changed.
    fn refresh(&self);
}

impl<F> Listener for F
where
    F: Fn() + Send + Sync,
{
    fn refresh(&self) {
        self()
    }
}

/// The capability shared by every observable model.
pub trait Model: Send + Sync {
    /// Register a listener. The listener is not refreshed immediately.
    fn add_listener(&self, listener: Arc<dyn Listener>) -> ListenerId;

    /// Unregister a listener previously returned by `add_listener`.
    fn remove_listener(&self, id: ListenerId) -> Result<()>;

    /// Notify every registered listener, in registration order.
    ///
    /// Safe to call without a state change; composed views use it to force
    /// a re-check.
    fn refresh(&self);

    /// Register a listener and refresh it once right away.
    fn attach(&self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = self.add_listener(listener.clone());
        listener.refresh();
        id
    }
}

/// Listener list owned by a single model.
pub struct Notifier {
    refreshed: Signal,
    activity: Mutex<Activity>,
    source: &'static str,
}

/// Threads currently inside `notify` or `batch`, one entry per nesting level.
#[derive(Default)]
struct Activity {
    notifying: Vec<ThreadId>,
    batching: Vec<ThreadId>,
}

impl Activity {
    fn notifying(&mut self) -> &mut Vec<ThreadId> {
        &mut self.notifying
    }

    fn batching(&mut self) -> &mut Vec<ThreadId> {
        &mut self.batching
    }
}

/// Removes one entry for `thread` when dropped, even if a listener panics.
struct Entered<'a> {
    activity: &'a Mutex<Activity>,
    list: fn(&mut Activity) -> &mut Vec<ThreadId>,
    thread: ThreadId,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        let mut activity = self.activity.lock();
        let list = (self.list)(&mut *activity);
        if let Some(pos) = list.iter().rposition(|&t| t == self.thread) {
            list.swap_remove(pos);
        }
    }
}

impl Notifier {
    /// Create an empty notifier. `source` names the owning model in logs.
    pub fn new(source: &'static str) -> Self {
        Self {
            refreshed: Signal::new(),
            activity: Mutex::new(Activity::default()),
            source,
        }
    }

    /// Register a listener.
    pub fn add_listener(&self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = self.refreshed.connect(move || listener.refresh());
        tracing::trace!(target: targets::LISTENER, source = self.source, ?id, "listener added");
        id
    }

    /// Unregister a listener.
    pub fn remove_listener(&self, id: ListenerId) -> Result<()> {
        self.refreshed.try_disconnect(id)?;
        tracing::trace!(target: targets::LISTENER, source = self.source, ?id, "listener removed");
        Ok(())
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.refreshed.connection_count()
    }

    /// Refresh every listener in registration order.
    ///
    /// Only a refresh from the thread already notifying is dropped; other
    /// threads fan out concurrently.
    pub fn notify(&self) {
        let thread = thread::current().id();
        {
            let mut activity = self.activity.lock();
            if activity.batching.contains(&thread) {
                tracing::trace!(target: targets::LISTENER, source = self.source, "refresh deferred to batch end");
                return;
            }
            if activity.notifying.contains(&thread) {
                tracing::warn!(
                    target: targets::LISTENER,
                    source = self.source,
                    "refresh requested while already notifying; dropped"
                );
                return;
            }
            activity.notifying.push(thread);
        }
        let _entered = Entered {
            activity: &self.activity,
            list: Activity::notifying,
            thread,
        };
        self.refreshed.emit();
    }

    /// Run `f` with this thread's notifications suppressed, then notify once.
    ///
    /// Batches nest: only the outermost batch notifies.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        let thread = thread::current().id();
        self.activity.lock().batching.push(thread);
        let result = {
            let _entered = Entered {
                activity: &self.activity,
                list: Activity::batching,
                thread,
            };
            f()
        };
        let outermost = !self.activity.lock().batching.contains(&thread);
        if outermost {
            self.notify();
        }
        result
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new("model")
    }
}

static_assertions::assert_impl_all!(Notifier: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, SignalError};
    use std::sync::mpsc;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Listener for Recorder {
        fn refresh(&self) {
            self.log.lock().push(self.name);
        }
    }

    #[test]
    fn test_notify_in_registration_order() {
        let notifier = Notifier::new("test");
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["a", "b", "c"] {
            notifier.add_listener(Arc::new(Recorder {
                name,
                log: log.clone(),
            }));
        }

        notifier.notify();
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_listener() {
        let notifier = Notifier::new("test");
        let log = Arc::new(Mutex::new(Vec::new()));

        let id = notifier.add_listener(Arc::new(Recorder {
            name: "a",
            log: log.clone(),
        }));
        assert_eq!(notifier.listener_count(), 1);

        notifier.remove_listener(id).unwrap();
        notifier.notify();
        assert!(log.lock().is_empty());
        assert_eq!(
            notifier.remove_listener(id),
            Err(CoreError::Signal(SignalError::InvalidConnection))
        );
    }

    #[test]
    fn test_closure_listener() {
        let notifier = Notifier::new("test");
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        notifier.add_listener(Arc::new(move || *count_clone.lock() += 1));

        notifier.notify();
        notifier.notify();
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_reentrant_notify_is_dropped() {
        let notifier = Arc::new(Notifier::new("test"));
        let count = Arc::new(Mutex::new(0));

        let notifier_clone = notifier.clone();
        let count_clone = count.clone();
        notifier.add_listener(Arc::new(move || {
            *count_clone.lock() += 1;
            notifier_clone.notify();
        }));

        notifier.notify();
        assert_eq!(*count.lock(), 1);

        notifier.notify();
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_batch_notifies_once() {
        let notifier = Notifier::new("test");
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        notifier.add_listener(Arc::new(move || *count_clone.lock() += 1));

        let value = notifier.batch(|| {
            notifier.notify();
            notifier.batch(|| notifier.notify());
            notifier.notify();
            7
        });

        assert_eq!(value, 7);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_notify_from_other_thread_while_notifying() {
        let notifier = Arc::new(Notifier::new("test"));
        let count = Arc::new(Mutex::new(0));
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);

        let count_clone = count.clone();
        notifier.add_listener(Arc::new(move || {
            let first = {
                let mut count = count_clone.lock();
                *count += 1;
                *count == 1
            };
            if first {
                entered_tx.send(()).unwrap();
                release_rx.lock().recv().unwrap();
            }
        }));

        let notifier_clone = notifier.clone();
        let worker = thread::spawn(move || notifier_clone.notify());
        entered_rx.recv().unwrap();

        // The worker is parked inside its own fan-out.
        notifier.notify();
        release_tx.send(()).unwrap();
        worker.join().unwrap();

        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_batch_on_other_thread_still_notifies() {
        let notifier = Arc::new(Notifier::new("test"));
        let count = Arc::new(Mutex::new(0));

        let count_clone = count.clone();
        notifier.add_listener(Arc::new(move || *count_clone.lock() += 1));

        notifier.batch(|| {
            let notifier_clone = notifier.clone();
            thread::spawn(move || notifier_clone.batch(|| notifier_clone.notify()))
                .join()
                .unwrap();
            assert_eq!(*count.lock(), 1);
        });

        assert_eq!(*count.lock(), 2);
    }
}
