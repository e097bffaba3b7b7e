//! The user registry.
//!
//! [`UserRegistry`] owns the ordered sequence of registered users, their
//! device assignments, action stacks, control schemes, and activation state,
//! and fires change notifications through an embedded
//! [`UserEventBus`](crate::eventbus::UserEventBus).
//!
//! The registry is an explicit owned object: create one with
//! [`UserRegistry::new`] and pass it by reference. There is no ambient global
//! instance.
//!
//! Every mutation completes before its notification is dispatched, so a
//! handler always observes the post-transition state and may re-entrantly
//! read any user or action handle it holds.

use log::debug;

use crate::action::{InputAction, InputActionMap};
use crate::device::{InputControl, InputDevice};
use crate::error::UserError;
use crate::eventbus::{ObserverId, UserChange, UserEventBus};
use crate::runtime::InputRuntime;
use crate::scheme::ControlScheme;
use crate::user::{InputUser, UserHandle, UserId};

pub struct UserRegistry {
    users: Vec<InputUser>,
    next_id: u64,
    bus: UserEventBus,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self { users: Vec::new(), next_id: 1, bus: UserEventBus::new() }
    }

    /// All registered users, in registration order.
    pub fn all(&self) -> &[InputUser] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    fn position_of(&self, user: &InputUser) -> Option<usize> {
        self.users.iter().position(|u| u == user)
    }

    fn require_registered(&self, user: &InputUser) -> Result<(), UserError> {
        if self.position_of(user).is_some() {
            Ok(())
        } else {
            Err(UserError::InvalidOperation("user is not added to the registry"))
        }
    }

    /// Appends the user to the registry, allocating a fresh id and assigning
    /// the next index. Emits [`UserChange::Added`]. Returns false (and does
    /// nothing) if the user is already registered.
    pub fn add(&mut self, user: &InputUser) -> bool {
        if self.position_of(user).is_some() {
            return false;
        }

        let id = UserId(self.next_id);
        self.next_id += 1;
        {
            let mut state = user.state.borrow_mut();
            state.id = Some(id);
            state.index = Some(self.users.len());
        }
        self.users.push(user.clone());
        debug!("added user {:?} at index {}", id, self.users.len() - 1);

        self.bus.notify_change(user, UserChange::Added);
        true
    }

    /// Removes the user, shifting the indices of every later user down by
    /// one. All of the removed user's device/action/scheme/handle state is
    /// cleared and its id and index become invalid. Emits exactly one
    /// [`UserChange::Removed`]. Returns false if the user was not registered.
    pub fn remove(&mut self, user: &InputUser) -> bool {
        let Some(pos) = self.position_of(user) else {
            return false;
        };

        self.users.remove(pos);
        for (offset, later) in self.users[pos..].iter().enumerate() {
            later.state.borrow_mut().index = Some(pos + offset);
        }

        {
            let mut state = user.state.borrow_mut();
            debug!("removed user {:?} from index {}", state.id, pos);
            state.id = None;
            state.index = None;
            state.handle = None;
            state.devices.clear();
            state.actions.clear();
            state.scheme = None;
            state.active = false;
        }

        self.bus.notify_change(user, UserChange::Removed);
        true
    }

    /// Assigns a single device to the user. Re-assigning a device the user
    /// already has is a silent no-op. A device may be assigned to several
    /// users at once.
    pub fn assign_device(&mut self, user: &InputUser, device: &InputDevice) -> Result<(), UserError> {
        self.assign_devices(user, std::slice::from_ref(device))
    }

    /// Assigns several devices in one step. Emits at most one
    /// [`UserChange::DevicesChanged`] for the whole batch, and none if every
    /// device was already assigned.
    pub fn assign_devices(&mut self, user: &InputUser, devices: &[InputDevice]) -> Result<(), UserError> {
        self.require_registered(user)?;

        let mut changed = false;
        {
            let mut state = user.state.borrow_mut();
            for device in devices {
                if !state.devices.contains(device) {
                    state.devices.push(device.clone());
                    changed = true;
                }
            }
        }
        if changed {
            debug!("assigned {} device(s) to user {:?}", devices.len(), user.id());
            self.bus.notify_change(user, UserChange::DevicesChanged);
        }
        Ok(())
    }

    /// Empties the user's assigned-device set. Emits
    /// [`UserChange::DevicesChanged`] only if the set was non-empty.
    ///
    /// Unlike the assignment mutators, this also accepts unregistered users:
    /// they have nothing assigned, so clearing is a harmless no-op.
    pub fn clear_assigned_devices(&mut self, user: &InputUser) -> Result<(), UserError> {
        let changed = {
            let mut state = user.state.borrow_mut();
            let had_any = !state.devices.is_empty();
            state.devices.clear();
            had_any
        };
        if changed {
            self.bus.notify_change(user, UserChange::DevicesChanged);
        }
        Ok(())
    }

    /// Snapshot of every runtime device not assigned to any registered user.
    /// The returned vector is caller-owned and unaffected by later registry
    /// mutations.
    pub fn unassigned_devices(&self, runtime: &InputRuntime) -> Vec<InputDevice> {
        runtime
            .devices()
            .iter()
            .filter(|d| self.find_user_for_device(d).is_none())
            .cloned()
            .collect()
    }

    /// First user (in registry order) with the device assigned, if any.
    pub fn find_user_for_device(&self, device: &InputDevice) -> Option<InputUser> {
        self.users
            .iter()
            .find(|u| u.state.borrow().devices.contains(device))
            .cloned()
    }

    /// Sets the user's display name. Emits [`UserChange::NameChanged`] only
    /// when the value actually changes.
    pub fn set_user_name(&mut self, user: &InputUser, name: impl Into<String>) -> Result<(), UserError> {
        self.require_registered(user)?;

        let name = name.into();
        let changed = {
            let mut state = user.state.borrow_mut();
            if state.name.as_deref() == Some(name.as_str()) {
                false
            } else {
                state.name = Some(name);
                true
            }
        };
        if changed {
            self.bus.notify_change(user, UserChange::NameChanged);
        }
        Ok(())
    }

    /// Sets or clears the user's platform handle. Compared by value; setting
    /// an equal handle emits nothing.
    pub fn set_user_handle(&mut self, user: &InputUser, handle: Option<UserHandle>) -> Result<(), UserError> {
        self.require_registered(user)?;

        let changed = {
            let mut state = user.state.borrow_mut();
            if state.handle == handle {
                false
            } else {
                state.handle = handle;
                true
            }
        };
        if changed {
            self.bus.notify_change(user, UserChange::HandleChanged);
        }
        Ok(())
    }

    /// Sets the user's control scheme. Schemes compare by name; re-assigning
    /// the scheme the user already has emits nothing and keeps the existing
    /// value. Returns a builder for the two optional follow-up resolution
    /// steps.
    pub fn assign_control_scheme(
        &mut self,
        user: &InputUser,
        scheme: ControlScheme,
    ) -> Result<SchemeAssignment<'_>, UserError> {
        self.require_registered(user)?;

        let changed = {
            let mut state = user.state.borrow_mut();
            if state.scheme.as_ref() == Some(&scheme) {
                false
            } else {
                debug!("user {:?} now on scheme '{}'", state.id, scheme.name());
                state.scheme = Some(scheme);
                true
            }
        };
        if changed {
            self.bus.notify_change(user, UserChange::ControlSchemeChanged);
        }
        Ok(SchemeAssignment { registry: self, user: user.clone() })
    }

    /// Clears the user's control scheme. Emits
    /// [`UserChange::ControlSchemeChanged`] only if one was set. Assigned
    /// devices are left untouched.
    pub fn clear_control_scheme(&mut self, user: &InputUser) -> Result<(), UserError> {
        self.require_registered(user)?;

        let changed = {
            let mut state = user.state.borrow_mut();
            state.scheme.take().is_some()
        };
        if changed {
            self.bus.notify_change(user, UserChange::ControlSchemeChanged);
        }
        Ok(())
    }

    /// Pushes one action onto the user's action stack.
    pub fn push_action(&mut self, user: &InputUser, action: &InputAction) -> Result<(), UserError> {
        self.require_registered(user)?;
        user.state.borrow_mut().actions.push(action.clone());
        Ok(())
    }

    /// Pushes every action of the map onto the user's action stack, in map
    /// order.
    pub fn push_actions(&mut self, user: &InputUser, map: &InputActionMap) -> Result<(), UserError> {
        self.require_registered(user)?;
        user.state.borrow_mut().actions.extend(map.actions().iter().cloned());
        Ok(())
    }

    /// Replaces the user's action stack with the actions of the map.
    pub fn set_actions(&mut self, user: &InputUser, map: &InputActionMap) -> Result<(), UserError> {
        self.require_registered(user)?;
        let mut state = user.state.borrow_mut();
        state.actions.clear();
        state.actions.extend(map.actions().iter().cloned());
        Ok(())
    }

    /// Empties the user's action stack. Enabled state of the removed actions
    /// is left as-is.
    pub fn clear_actions(&mut self, user: &InputUser) -> Result<(), UserError> {
        self.require_registered(user)?;
        user.state.borrow_mut().actions.clear();
        Ok(())
    }

    /// Enables every action currently on the user's stack and marks the user
    /// active. Users start passive.
    pub fn activate_input(&mut self, user: &InputUser) -> Result<(), UserError> {
        self.require_registered(user)?;
        let actions = {
            let mut state = user.state.borrow_mut();
            state.active = true;
            state.actions.clone()
        };
        for action in &actions {
            action.enable();
        }
        debug!("activated input for user {:?}", user.id());
        Ok(())
    }

    /// Disables every action currently on the user's stack and marks the user
    /// passive.
    pub fn passivate_input(&mut self, user: &InputUser) -> Result<(), UserError> {
        self.require_registered(user)?;
        let actions = {
            let mut state = user.state.borrow_mut();
            state.active = false;
            state.actions.clone()
        };
        for action in &actions {
            action.disable();
        }
        debug!("passivated input for user {:?}", user.id());
        Ok(())
    }

    /// Subscribes to the user change stream.
    pub fn on_change(&mut self, callback: impl FnMut(&InputUser, UserChange) + 'static) -> ObserverId {
        self.bus.on_change(callback)
    }

    /// Subscribes to the unassigned-device-use stream.
    pub fn on_unassigned_device_used(
        &mut self,
        callback: impl FnMut(&InputUser, &InputAction, &InputControl) + 'static,
    ) -> ObserverId {
        self.bus.on_unassigned_device_used(callback)
    }

    /// Unsubscribes an observer from either stream.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.bus.remove(id)
    }

    pub(crate) fn notify_unassigned_device_used(
        &mut self,
        user: &InputUser,
        action: &InputAction,
        control: &InputControl,
    ) {
        self.bus.notify_unassigned_device_used(user, action, control);
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Chainable follow-up steps after [`UserRegistry::assign_control_scheme`].
///
/// The two steps are independent and compose in either order:
///
/// ```no_run
/// # use usermux::{UserRegistry, InputUser, InputRuntime, ControlScheme, DeviceKind};
/// # let mut registry = UserRegistry::new();
/// # let runtime = InputRuntime::new();
/// # let user = InputUser::new();
/// # registry.add(&user);
/// let scheme = ControlScheme::new("Gamepad").with_required_device(DeviceKind::Gamepad);
/// registry
///     .assign_control_scheme(&user, scheme)?
///     .and_assign_matching_devices(&runtime)
///     .and_mask_bindings_from_other_control_schemes(&runtime);
/// # Ok::<(), usermux::UserError>(())
/// ```
pub struct SchemeAssignment<'a> {
    registry: &'a mut UserRegistry,
    user: InputUser,
}

impl<'a> SchemeAssignment<'a> {
    /// Walks the scheme's requirement slots in order, greedily taking
    /// matching devices from the unassigned pool and assigning them to the
    /// user. The user's previously assigned devices are released back to the
    /// pool first; devices held by *other* users are never taken. Slots with
    /// no matching device are skipped silently.
    pub fn and_assign_matching_devices(self, runtime: &InputRuntime) -> Self {
        let Some(scheme) = self.user.control_scheme() else {
            return self;
        };

        let (before, picked) = {
            let before = {
                let mut state = self.user.state.borrow_mut();
                std::mem::take(&mut state.devices)
            };
            let pool = self.registry.unassigned_devices(runtime);
            let picked = scheme.pick_devices(&pool);
            self.user.state.borrow_mut().devices = picked.clone();
            (before, picked)
        };

        if before != picked {
            debug!(
                "scheme '{}' matched {}/{} device(s) for user {:?}",
                scheme.name(),
                picked.len(),
                scheme.requirements().len(),
                self.user.id()
            );
            self.registry
                .bus
                .notify_change(&self.user, UserChange::DevicesChanged);
        }
        self
    }

    /// Applies the scheme's binding group as a binding mask to every action
    /// on the user's stack and re-resolves their controls, so that only
    /// bindings tagged with this scheme remain live. Device assignments are
    /// untouched.
    pub fn and_mask_bindings_from_other_control_schemes(self, runtime: &InputRuntime) -> Self {
        let Some(scheme) = self.user.control_scheme() else {
            return self;
        };

        for action in self.user.actions() {
            action.set_binding_mask(Some(scheme.binding_group()));
            action.resolve_controls(runtime);
        }
        self
    }

    /// The user this assignment is operating on.
    pub fn user(&self) -> &InputUser {
        &self.user
    }
}
