//! Observer lists for the two process-wide notification streams.

use crate::action::InputAction;
use crate::device::InputControl;
use crate::user::InputUser;

/// What changed about a user. Delivered with every `on_change` notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserChange {
    Added,
    Removed,
    NameChanged,
    HandleChanged,
    DevicesChanged,
    ControlSchemeChanged,
}

/// Token returned on subscription; pass it back to unsubscribe.
pub type ObserverId = u64;

type ChangeFn = Box<dyn FnMut(&InputUser, UserChange)>;
type UnassignedDeviceFn = Box<dyn FnMut(&InputUser, &InputAction, &InputControl)>;

struct Entry<F> {
    id: ObserverId,
    enabled: bool,
    callback: F,
}

/// Synchronous observer lists. Delivery is in subscription order; handlers
/// run on the caller's thread before the triggering operation returns.
#[derive(Default)]
pub struct UserEventBus {
    next_id: ObserverId,
    change: Vec<Entry<ChangeFn>>,
    unassigned: Vec<Entry<UnassignedDeviceFn>>,
}

impl UserEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> ObserverId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Subscribes to user change notifications.
    pub fn on_change(&mut self, callback: impl FnMut(&InputUser, UserChange) + 'static) -> ObserverId {
        let id = self.alloc_id();
        self.change.push(Entry { id, enabled: true, callback: Box::new(callback) });
        id
    }

    /// Subscribes to unassigned-device-use notifications.
    pub fn on_unassigned_device_used(
        &mut self,
        callback: impl FnMut(&InputUser, &InputAction, &InputControl) + 'static,
    ) -> ObserverId {
        let id = self.alloc_id();
        self.unassigned.push(Entry { id, enabled: true, callback: Box::new(callback) });
        id
    }

    /// Unsubscribes from either stream. Returns false if the id is unknown.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.change.len() + self.unassigned.len();
        self.change.retain(|e| e.id != id);
        self.unassigned.retain(|e| e.id != id);
        before != self.change.len() + self.unassigned.len()
    }

    /// Mutes an observer without removing it.
    pub fn disable(&mut self, id: ObserverId) {
        self.set_enabled(id, false);
    }

    /// Re-enables a previously muted observer.
    pub fn enable(&mut self, id: ObserverId) {
        self.set_enabled(id, true);
    }

    fn set_enabled(&mut self, id: ObserverId, enabled: bool) {
        for entry in &mut self.change {
            if entry.id == id {
                entry.enabled = enabled;
            }
        }
        for entry in &mut self.unassigned {
            if entry.id == id {
                entry.enabled = enabled;
            }
        }
    }

    pub(crate) fn notify_change(&mut self, user: &InputUser, change: UserChange) {
        for entry in &mut self.change {
            if entry.enabled {
                (entry.callback)(user, change);
            }
        }
    }

    pub(crate) fn notify_unassigned_device_used(
        &mut self,
        user: &InputUser,
        action: &InputAction,
        control: &InputControl,
    ) {
        for entry in &mut self.unassigned {
            if entry.enabled {
                (entry.callback)(user, action, control);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivery_follows_subscription_order() {
        let mut bus = UserEventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = order.clone();
        bus.on_change(move |_, _| first.borrow_mut().push(1));
        let second = order.clone();
        bus.on_change(move |_, _| second.borrow_mut().push(2));

        bus.notify_change(&InputUser::new(), UserChange::Added);

        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn removed_and_disabled_observers_stay_silent() {
        let mut bus = UserEventBus::new();
        let hits = Rc::new(RefCell::new(0));

        let counter = hits.clone();
        let id = bus.on_change(move |_, _| *counter.borrow_mut() += 1);
        let counter = hits.clone();
        let muted = bus.on_change(move |_, _| *counter.borrow_mut() += 1);

        bus.disable(muted);
        bus.notify_change(&InputUser::new(), UserChange::Added);
        assert_eq!(*hits.borrow(), 1);

        bus.enable(muted);
        assert!(bus.remove(id));
        assert!(!bus.remove(id));
        bus.notify_change(&InputUser::new(), UserChange::Added);
        assert_eq!(*hits.borrow(), 2);
    }
}
