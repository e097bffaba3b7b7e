//! Actions, action maps, and bindings.
//!
//! An [`InputAction`] is a named intent ("jump", "fire") with a list of
//! bindings, each pointing at a control on some kind of device. Binding paths
//! use `<Kind>/control` syntax, e.g. `"<Gamepad>/buttonSouth"`.
//!
//! Bindings may carry a **group** tag (conventionally the name of a control
//! scheme). An action's **binding mask** restricts which bindings are live: a
//! mask of `Some("Gamepad")` makes only bindings in the `"Gamepad"` group
//! match and resolve. With no mask, every binding is live.
//!
//! Actions are cheap cloneable handles; pushing an action onto a user's stack
//! and holding on to it yourself observe the same enabled flag.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::device::{InputControl, InputDevice};
use crate::error::UserError;
use crate::runtime::InputRuntime;
use crate::scheme::{parse_device_matcher, DeviceRequirement};

/// Parsed `<Kind>/control` binding path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingPath {
    pub device: DeviceRequirement,
    pub control: String,
}

impl BindingPath {
    /// Parses e.g. `"<Gamepad>/buttonSouth"`. The control part is not checked
    /// against any concrete device layout here; an unknown control simply
    /// never resolves.
    pub fn parse(path: &str) -> Result<Self, UserError> {
        let (device_part, control_part) = path
            .split_once('/')
            .ok_or_else(|| UserError::unknown("binding path", path))?;
        if control_part.is_empty() {
            return Err(UserError::unknown("binding path", path));
        }
        Ok(Self {
            device: parse_device_matcher(device_part)?,
            control: control_part.to_string(),
        })
    }

    /// Whether this path points at the given control on the given device.
    pub fn matches(&self, device: &InputDevice, control: &str) -> bool {
        self.device.matches(device) && self.control == control
    }
}

/// One binding on an action: a path plus an optional scheme-group tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputBinding {
    pub path: BindingPath,
    pub group: Option<String>,
}

#[derive(Default)]
struct ActionState {
    name: Option<String>,
    bindings: Vec<InputBinding>,
    enabled: bool,
    mask: Option<String>,
    controls: Vec<InputControl>,
}

impl ActionState {
    fn binding_is_live(&self, binding: &InputBinding) -> bool {
        match (&self.mask, &binding.group) {
            (None, _) => true,
            (Some(mask), Some(group)) => mask == group,
            (Some(_), None) => false,
        }
    }
}

/// A bindable input intent. Cheap to clone; equality is handle identity.
#[derive(Clone)]
pub struct InputAction {
    state: Rc<RefCell<ActionState>>,
}

impl InputAction {
    pub fn new() -> Self {
        Self { state: Rc::new(RefCell::new(ActionState::default())) }
    }

    /// Creates an action with a single ungrouped binding.
    pub fn with_binding(path: &str) -> Result<Self, UserError> {
        let action = Self::new();
        action.add_binding(path, None)?;
        Ok(action)
    }

    pub(crate) fn set_name(&self, name: impl Into<String>) {
        self.state.borrow_mut().name = Some(name.into());
    }

    pub fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    /// Appends a binding. `group` tags the binding with a scheme group name.
    pub fn add_binding(&self, path: &str, group: Option<&str>) -> Result<(), UserError> {
        let path = BindingPath::parse(path)?;
        self.state.borrow_mut().bindings.push(InputBinding {
            path,
            group: group.map(str::to_string),
        });
        Ok(())
    }

    pub fn bindings(&self) -> Vec<InputBinding> {
        self.state.borrow().bindings.clone()
    }

    pub fn enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn enable(&self) {
        self.state.borrow_mut().enabled = true;
    }

    pub fn disable(&self) {
        self.state.borrow_mut().enabled = false;
    }

    /// The current binding mask (a scheme-group name), if any.
    pub fn binding_mask(&self) -> Option<String> {
        self.state.borrow().mask.clone()
    }

    /// Restricts live bindings to the given group (`None` lifts the mask).
    /// Call [`resolve_controls`](Self::resolve_controls) afterwards to refresh
    /// the resolved-control list.
    pub fn set_binding_mask(&self, group: Option<&str>) {
        self.state.borrow_mut().mask = group.map(str::to_string);
    }

    /// Whether the given control change is claimed by a live binding.
    pub fn matches(&self, device: &InputDevice, control: &str) -> bool {
        let state = self.state.borrow();
        state
            .bindings
            .iter()
            .any(|b| state.binding_is_live(b) && b.path.matches(device, control))
    }

    /// Re-resolves live bindings against every device the runtime knows,
    /// in device order, and stores the result for [`controls`](Self::controls).
    pub fn resolve_controls(&self, runtime: &InputRuntime) {
        let mut resolved = Vec::new();
        {
            let state = self.state.borrow();
            for device in runtime.devices() {
                for binding in &state.bindings {
                    if !state.binding_is_live(binding) || !binding.path.device.matches(device) {
                        continue;
                    }
                    if let Some(control) = device.control(&binding.path.control) {
                        if !resolved.contains(&control) {
                            resolved.push(control);
                        }
                    }
                }
            }
        }
        self.state.borrow_mut().controls = resolved;
    }

    /// Controls found by the last [`resolve_controls`](Self::resolve_controls)
    /// pass. Empty until the action has been resolved at least once.
    pub fn controls(&self) -> Vec<InputControl> {
        self.state.borrow().controls.clone()
    }
}

impl Default for InputAction {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for InputAction {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for InputAction {}

impl fmt::Debug for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("InputAction")
            .field("name", &state.name)
            .field("enabled", &state.enabled)
            .field("bindings", &state.bindings.len())
            .finish()
    }
}

/// Named collection of actions, expanded into the member actions when pushed
/// onto a user's stack.
#[derive(Clone, Default)]
pub struct InputActionMap {
    name: String,
    actions: Vec<InputAction>,
}

impl InputActionMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), actions: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a named action in this map and returns its handle.
    pub fn add_action(&mut self, name: impl Into<String>) -> InputAction {
        let action = InputAction::new();
        action.set_name(name);
        self.actions.push(action.clone());
        action
    }

    /// Looks up a member action by name.
    pub fn action(&self, name: &str) -> Result<InputAction, UserError> {
        self.actions
            .iter()
            .find(|a| a.name().as_deref() == Some(name))
            .cloned()
            .ok_or_else(|| UserError::unknown("action", name))
    }

    pub fn actions(&self) -> &[InputAction] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceKind;

    #[test]
    fn binding_path_parses_kind_and_control() {
        let path = BindingPath::parse("<Gamepad>/buttonSouth").unwrap();
        assert_eq!(path.device.kind, DeviceKind::Gamepad);
        assert_eq!(path.control, "buttonSouth");

        assert!(BindingPath::parse("buttonSouth").is_err());
        assert!(BindingPath::parse("<Gamepad>/").is_err());
        assert!(BindingPath::parse("<NoSuchDevice>/x").is_err());
    }

    #[test]
    fn mask_restricts_live_bindings() {
        let action = InputAction::new();
        action.add_binding("<Gamepad>/buttonSouth", Some("Gamepad")).unwrap();
        action.add_binding("<Mouse>/leftButton", Some("KeyboardMouse")).unwrap();

        let mut runtime = InputRuntime::new();
        let pad = runtime.add_device(DeviceKind::Gamepad);
        let mouse = runtime.add_device(DeviceKind::Mouse);

        assert!(action.matches(&pad, "buttonSouth"));
        assert!(action.matches(&mouse, "leftButton"));

        action.set_binding_mask(Some("Gamepad"));

        assert!(action.matches(&pad, "buttonSouth"));
        assert!(!action.matches(&mouse, "leftButton"));
    }

    #[test]
    fn ungrouped_bindings_drop_out_under_a_mask() {
        let action = InputAction::with_binding("<Gamepad>/buttonSouth").unwrap();
        action.set_binding_mask(Some("Gamepad"));

        let mut runtime = InputRuntime::new();
        let pad = runtime.add_device(DeviceKind::Gamepad);

        assert!(!action.matches(&pad, "buttonSouth"));
    }

    #[test]
    fn resolve_walks_devices_in_order() {
        let mut runtime = InputRuntime::new();
        let pad1 = runtime.add_device(DeviceKind::Gamepad);
        let pad2 = runtime.add_device(DeviceKind::Gamepad);

        let action = InputAction::with_binding("<Gamepad>/buttonSouth").unwrap();
        action.resolve_controls(&runtime);

        assert_eq!(
            action.controls(),
            vec![
                pad1.control("buttonSouth").unwrap(),
                pad2.control("buttonSouth").unwrap(),
            ]
        );
    }

    #[test]
    fn map_lookup_by_name() {
        let mut map = InputActionMap::new("gameplay");
        let jump = map.add_action("jump");
        map.add_action("fire");

        assert_eq!(map.action("jump").unwrap(), jump);
        assert!(map.action("crouch").is_err());
    }
}
