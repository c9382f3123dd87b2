use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::foundation::core::{FormatId, Point, Vec2};

/// Drag state of one format surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragPhase {
    /// Not dragging.
    #[default]
    Idle,
    /// Dragging; `last` is the most recent pointer position in surface coordinates.
    Dragging {
        /// Last observed pointer position.
        last: Point,
    },
}

#[derive(Debug, Default)]
struct BrokerInner {
    next_id: u64,
    listeners: BTreeMap<u64, Rc<Cell<DragPhase>>>,
}

/// Single source of pointer-release events shared by every drag controller.
///
/// A release observed anywhere ends every active drag. Controllers register on construction and
/// deregister when dropped.
#[derive(Clone, Debug, Default)]
pub struct InputBroker {
    inner: Rc<RefCell<BrokerInner>>,
}

impl InputBroker {
    /// Broker with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribe(&self, phase: Rc<Cell<DragPhase>>) -> ReleaseSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, phase);
        ReleaseSubscription {
            broker: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver a global pointer release. Returns how many drags it ended.
    pub fn release_all(&self) -> usize {
        let inner = self.inner.borrow();
        let mut ended = 0;
        for phase in inner.listeners.values() {
            if matches!(phase.get(), DragPhase::Dragging { .. }) {
                ended += 1;
            }
            phase.set(DragPhase::Idle);
        }
        ended
    }

    /// Number of registered controllers.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Registration handle; deregisters from the broker on drop.
#[derive(Debug)]
pub struct ReleaseSubscription {
    broker: Weak<RefCell<BrokerInner>>,
    id: u64,
}

impl Drop for ReleaseSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.broker.upgrade() {
            inner.borrow_mut().listeners.remove(&self.id);
        }
    }
}

/// Turns pointer input on one format surface into pan deltas.
#[derive(Debug)]
pub struct DragController {
    id: FormatId,
    phase: Rc<Cell<DragPhase>>,
    _subscription: ReleaseSubscription,
}

impl DragController {
    /// Controller for `id`, registered with `broker` for global releases.
    pub fn new(id: FormatId, broker: &InputBroker) -> Self {
        let phase = Rc::new(Cell::new(DragPhase::Idle));
        let subscription = broker.subscribe(Rc::clone(&phase));
        Self {
            id,
            phase,
            _subscription: subscription,
        }
    }

    /// Format this controller drives.
    pub fn format_id(&self) -> &FormatId {
        &self.id
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        self.phase.get()
    }

    /// `true` while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase.get(), DragPhase::Dragging { .. })
    }

    /// Pointer pressed at `at`. Starts a drag only when a photo is set.
    pub fn press(&self, at: Point, has_photo: bool) -> bool {
        if !has_photo {
            return false;
        }
        self.phase.set(DragPhase::Dragging { last: at });
        true
    }

    /// Pointer moved to `at`. Returns the delta since the last position while dragging.
    pub fn motion(&self, at: Point) -> Option<Vec2> {
        match self.phase.get() {
            DragPhase::Idle => None,
            DragPhase::Dragging { last } => {
                self.phase.set(DragPhase::Dragging { last: at });
                Some(at - last)
            }
        }
    }

    /// End the drag locally.
    pub fn release(&self) {
        self.phase.set(DragPhase::Idle);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;
