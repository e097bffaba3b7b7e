//! The input runtime collaborator.
//!
//! [`InputRuntime`] stands in for the engine's low-level input layer: it owns
//! the device table, accepts queued control-value changes, and pumps them
//! once per [`update`](InputRuntime::update) tick. The registry itself never
//! talks to hardware; everything it knows about devices arrives through this
//! type.
//!
//! `update` is also where unassigned-device-use detection happens: a queued
//! change that lands on an active user's action, but originates from a device
//! that user does not own, raises the registry's `on_unassigned_device_used`
//! stream instead of triggering the action.

use log::trace;
use std::time::Instant;

use crate::action::InputAction;
use crate::device::{ControlKind, DeviceId, DeviceKind, InputControl, InputDevice};
use crate::error::UserError;
use crate::event::ControlChange;
use crate::registry::UserRegistry;
use crate::user::InputUser;

pub struct InputRuntime {
    devices: Vec<InputDevice>,
    next_device_id: u32,
    queue: Vec<ControlChange>,
}

impl InputRuntime {
    pub fn new() -> Self {
        Self { devices: Vec::new(), next_device_id: 1, queue: Vec::new() }
    }

    /// Adds a device of the given kind with a generated name ("Gamepad1",
    /// "Gamepad2", ...).
    pub fn add_device(&mut self, kind: DeviceKind) -> InputDevice {
        let ordinal = self
            .devices
            .iter()
            .filter(|d| d.kind() == kind)
            .count()
            + 1;
        self.add_device_named(kind, format!("{}{}", kind.as_str(), ordinal))
    }

    /// Adds a device with an explicit display name.
    pub fn add_device_named(&mut self, kind: DeviceKind, name: impl Into<String>) -> InputDevice {
        let id = DeviceId(self.next_device_id);
        self.next_device_id += 1;
        let device = InputDevice::new(id, kind, name.into());
        trace!("runtime added {:?}", device);
        self.devices.push(device.clone());
        device
    }

    /// All known devices, in addition order.
    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }

    /// Queues a control-value change for delivery on the next update tick.
    /// The control name must exist on the device.
    pub fn queue_control_change(
        &mut self,
        device: &InputDevice,
        control: &str,
        value: f32,
    ) -> Result<(), UserError> {
        if device.control(control).is_none() {
            return Err(UserError::unknown("control", control));
        }
        self.queue.push(ControlChange {
            device: device.clone(),
            control: control.to_string(),
            value,
            at: Instant::now(),
        });
        Ok(())
    }

    /// Number of changes waiting for the next tick.
    pub fn pending_changes(&self) -> usize {
        self.queue.len()
    }

    /// Processes every queued change against the registry's active users.
    ///
    /// Only actuations count: a button release (value `0.0`) or an axis
    /// returning to neutral is dropped without inspection. For each actuated
    /// change and each active user, every enabled action on the user's stack
    /// whose live bindings claim the change is considered:
    /// - originating device assigned to that user → the action triggers
    ///   normally;
    /// - originating device not assigned to that user → one
    ///   `on_unassigned_device_used` notification fires instead.
    ///
    /// Changes claimed by no user's actions are dropped without notification,
    /// whatever device they came from.
    pub fn update(&mut self, registry: &mut UserRegistry) {
        let changes = std::mem::take(&mut self.queue);
        let users: Vec<InputUser> = registry.all().to_vec();

        let mut notifications: Vec<(InputUser, InputAction, InputControl)> = Vec::new();
        for change in &changes {
            // Validated at queue time; a miss here means the change was
            // forged, so skip it.
            let Some(control) = change.device.control(&change.control) else {
                continue;
            };
            let actuated = match control.kind() {
                ControlKind::Button => change.is_pressed(),
                ControlKind::Axis => change.value != 0.0,
            };
            if !actuated {
                continue;
            }
            for user in &users {
                if !user.is_input_active() {
                    continue;
                }
                for action in user.actions() {
                    if !action.enabled() || !action.matches(&change.device, &change.control) {
                        continue;
                    }
                    if user.assigned_devices().contains(&change.device) {
                        trace!("{:?} triggers {:?} via {}", user.id(), action, control.path());
                    } else {
                        notifications.push((user.clone(), action.clone(), control.clone()));
                    }
                }
            }
        }

        for (user, action, control) in &notifications {
            registry.notify_unassigned_device_used(user, action, control);
        }
    }
}

impl Default for InputRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_names_count_per_kind() {
        let mut runtime = InputRuntime::new();
        let pad1 = runtime.add_device(DeviceKind::Gamepad);
        let keyboard = runtime.add_device(DeviceKind::Keyboard);
        let pad2 = runtime.add_device(DeviceKind::Gamepad);

        assert_eq!(pad1.name(), "Gamepad1");
        assert_eq!(keyboard.name(), "Keyboard1");
        assert_eq!(pad2.name(), "Gamepad2");
        assert_ne!(pad1, pad2);
    }

    #[test]
    fn queueing_an_unknown_control_is_an_error() {
        let mut runtime = InputRuntime::new();
        let pad = runtime.add_device(DeviceKind::Gamepad);

        assert!(runtime.queue_control_change(&pad, "buttonSouth", 1.0).is_ok());
        assert!(runtime.queue_control_change(&pad, "flightStick", 1.0).is_err());
        assert_eq!(runtime.pending_changes(), 1);
    }

    #[test]
    fn update_drains_the_queue() {
        let mut runtime = InputRuntime::new();
        let mut registry = UserRegistry::new();
        let pad = runtime.add_device(DeviceKind::Gamepad);

        runtime.queue_control_change(&pad, "buttonSouth", 1.0).unwrap();
        runtime.update(&mut registry);

        assert_eq!(runtime.pending_changes(), 0);
    }
}
