//! Groups of models refreshed together.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::listener::Model;
use crate::logging::targets;

/// A set of models that can be refreshed in one call.
///
/// Page-level code uses a group to force every diagram to re-render, for
/// example after a layout change. The group only holds weak references:
/// models that have been dropped are skipped and pruned.
#[derive(Default)]
pub struct RefreshGroup {
    models: Mutex<Vec<Weak<dyn Model>>>,
}

impl RefreshGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model to the group.
    pub fn add<M: Model + 'static>(&self, model: &Arc<M>) {
        let weak: Weak<dyn Model> = Arc::downgrade(model) as Weak<dyn Model>;
        self.models.lock().push(weak);
    }

    /// Number of models still alive.
    pub fn len(&self) -> usize {
        self.models
            .lock()
            .iter()
            .filter(|model| model.strong_count() > 0)
            .count()
    }

    /// Returns `true` if no live model is in the group.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refresh every live model in insertion order.
    ///
    /// Returns the number of models refreshed.
    pub fn refresh_all(&self) -> usize {
        let live: Vec<Arc<dyn Model>> = {
            let mut models = self.models.lock();
            models.retain(|model| model.strong_count() > 0);
            models.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::debug!(target: targets::LISTENER, count = live.len(), "refreshing group");
        for model in &live {
            model.refresh();
        }
        live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{Listener, ListenerId, Notifier};
    use parking_lot::Mutex as PlMutex;

    struct Probe {
        notifier: Notifier,
    }

    impl Model for Probe {
        fn add_listener(&self, listener: Arc<dyn Listener>) -> ListenerId {
            self.notifier.add_listener(listener)
        }

        fn remove_listener(&self, id: ListenerId) -> crate::Result<()> {
            self.notifier.remove_listener(id)
        }

        fn refresh(&self) {
            self.notifier.notify();
        }
    }

    #[test]
    fn test_refresh_all_skips_dropped_models() {
        let group = RefreshGroup::new();
        let log = Arc::new(PlMutex::new(Vec::new()));

        let first = Arc::new(Probe {
            notifier: Notifier::new("first"),
        });
        let second = Arc::new(Probe {
            notifier: Notifier::new("second"),
        });
        for (name, model) in [("first", &first), ("second", &second)] {
            let log_clone = log.clone();
            model.add_listener(Arc::new(move || log_clone.lock().push(name)));
            group.add(model);
        }

        assert_eq!(group.refresh_all(), 2);
        assert_eq!(*log.lock(), vec!["first", "second"]);

        drop(first);
        assert_eq!(group.len(), 1);
        assert_eq!(group.refresh_all(), 1);
        assert_eq!(*log.lock(), vec!["first", "second", "second"]);
    }

    #[test]
    fn test_empty_group() {
        let group = RefreshGroup::new();
        assert!(group.is_empty());
        assert_eq!(group.refresh_all(), 0);
    }
}
