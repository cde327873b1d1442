//! Viewport resize fan-out.
//!
//! The shell publishes window size changes on a bus; the active host holds
//! a subscription and forwards drained sizes to the widget on each pump.
//! Dropping the subscription removes the listener, so a deactivated host
//! never hears another resize.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Viewport size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    queues: HashMap<u64, Vec<Size>>,
}

/// Fan-out bus for viewport sizes.
#[derive(Clone, Default)]
pub struct ResizeBus {
    listeners: Rc<RefCell<ListenerTable>>,
}

impl ResizeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a size to every current listener.
    pub fn publish(&self, size: Size) {
        let mut table = self.listeners.borrow_mut();
        for queue in table.queues.values_mut() {
            queue.push(size);
        }
    }

    /// Register a listener. The subscription unregisters itself on drop.
    pub fn subscribe(&self) -> ResizeSubscription {
        let mut table = self.listeners.borrow_mut();
        let id = table.next_id;
        table.next_id += 1;
        table.queues.insert(id, Vec::new());

        ResizeSubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().queues.len()
    }
}

/// RAII listener registration.
pub struct ResizeSubscription {
    id: u64,
    listeners: Weak<RefCell<ListenerTable>>,
}

impl ResizeSubscription {
    /// Drain sizes published since the last drain.
    pub fn drain(&self) -> Vec<Size> {
        let Some(listeners) = self.listeners.upgrade() else {
            return Vec::new();
        };
        let mut table = listeners.borrow_mut();
        table
            .queues
            .get_mut(&self.id)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().queues.remove(&self.id);
        }
    }
}
