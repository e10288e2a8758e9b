//! Signal/slot system for Entropic.
//!
//! A [`Signal`] is an ordered list of callbacks invoked synchronously when
//! it is emitted. Models use one signal each to reach their listeners.
//!
//! # Key Types
//!
//! - [`Signal`] - The ordered slot list
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! # Ordering
//!
//! Slots are always invoked in the order they were connected. Disconnecting
//! a slot never reorders the remaining ones.
//!
//! # Reentrancy
//!
//! The connection list is snapshotted before any slot runs, so a slot may
//! connect or disconnect other slots on the same signal. Connections made
//! during an emission first fire on the next emission.
//!
//! # Example
//!
//! ```
//! use entropic_core::Signal;
//!
//! let changed = Signal::new();
//!
//! let conn_id = changed.connect(|| {
//!     println!("changed");
//! });
//!
//! changed.emit();
//! changed.disconnect(conn_id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot = Arc<dyn Fn() + Send + Sync>;

/// Slot storage plus the connection order.
struct Connections {
    slots: SlotMap<ConnectionId, Slot>,
    order: Vec<ConnectionId>,
}

impl Connections {
    fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    fn snapshot(&self) -> Vec<Slot> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(*id).cloned())
            .collect()
    }
}

/// A signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked synchronously,
/// in connection order.
pub struct Signal {
    connections: Mutex<Connections>,
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl Signal {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections::new()),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Arc::new(slot));
        connections.order.push(id);
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_some() {
            connections.order.retain(|&other| other != id);
            true
        } else {
            false
        }
    }

    /// Disconnect a slot, reporting an unknown ID as an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// The lock guarding the connection list is released before any slot runs.
    #[tracing::instrument(skip_all, target = "entropic_core::signal", level = "trace")]
    pub fn emit(&self) {
        let slots = self.connections.lock().snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot();
        }
    }
}

static_assertions::assert_impl_all!(Signal: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::new();
        let received = Arc::new(Mutex::new(0));

        let received_clone = received.clone();
        signal.connect(move || {
            *received_clone.lock() += 1;
        });

        signal.emit();
        signal.emit();

        assert_eq!(*received.lock(), 2);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::new();
        let received = Arc::new(Mutex::new(0));

        let received_clone = received.clone();
        let conn_id = signal.connect(move || {
            *received_clone.lock() += 1;
        });

        signal.emit();
        assert!(signal.disconnect(conn_id));
        signal.emit();

        assert_eq!(*received.lock(), 1);
        assert!(!signal.disconnect(conn_id));
        assert_eq!(
            signal.try_disconnect(conn_id),
            Err(SignalError::InvalidConnection)
        );
    }

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut ids = Vec::new();
        for n in 0..5 {
            let order_clone = order.clone();
            ids.push(signal.connect(move || order_clone.lock().push(n)));
        }

        // Freeing a slot and connecting again must not reuse the old position.
        signal.disconnect(ids[1]);
        let order_clone = order.clone();
        signal.connect(move || order_clone.lock().push(5));

        signal.emit();
        assert_eq!(*order.lock(), vec![0, 2, 3, 4, 5]);
        assert_eq!(signal.connection_count(), 5);
    }

    #[test]
    fn test_connect_during_emit() {
        let signal = Arc::new(Signal::new());
        let count = Arc::new(Mutex::new(0));

        let signal_clone = signal.clone();
        let count_clone = count.clone();
        signal.connect(move || {
            let inner = count_clone.clone();
            signal_clone.connect(move || *inner.lock() += 1);
        });

        signal.emit();
        assert_eq!(*count.lock(), 0);
        assert_eq!(signal.connection_count(), 2);

        signal.emit();
        assert_eq!(*count.lock(), 1);
    }
}
