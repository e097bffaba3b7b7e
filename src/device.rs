//! Devices and their controls.
//!
//! A device here is an opaque, identity-comparable handle delivered by the
//! [`InputRuntime`](crate::runtime::InputRuntime). The registry never creates
//! devices itself; it only tracks which users own which handles.
//!
//! ## Conventions
//! - `InputDevice` is cheap to clone; equality is handle identity, not value
//!   equality. Two gamepads of the same model are still two distinct devices.
//! - Every device exposes a fixed set of named controls determined by its
//!   [`DeviceKind`] (e.g. `"buttonSouth"` on a gamepad). Control names are the
//!   unit that bindings and queued state changes refer to.
//! - `DeviceUsage` is an optional handedness tag for devices that can be held
//!   in either hand.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::UserError;

/// Broad classification of an input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Gamepad,
    Joystick,
    Touchscreen,
    Gyroscope,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "Keyboard",
            DeviceKind::Mouse => "Mouse",
            DeviceKind::Gamepad => "Gamepad",
            DeviceKind::Joystick => "Joystick",
            DeviceKind::Touchscreen => "Touchscreen",
            DeviceKind::Gyroscope => "Gyroscope",
        }
    }
}

impl FromStr for DeviceKind {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Keyboard" => Ok(DeviceKind::Keyboard),
            "Mouse" => Ok(DeviceKind::Mouse),
            "Gamepad" => Ok(DeviceKind::Gamepad),
            "Joystick" => Ok(DeviceKind::Joystick),
            "Touchscreen" => Ok(DeviceKind::Touchscreen),
            "Gyroscope" => Ok(DeviceKind::Gyroscope),
            other => Err(UserError::unknown("device kind", other)),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handedness tag for devices that can be held either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceUsage {
    LeftHand,
    RightHand,
}

impl DeviceUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceUsage::LeftHand => "LeftHand",
            DeviceUsage::RightHand => "RightHand",
        }
    }
}

impl FromStr for DeviceUsage {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LeftHand" => Ok(DeviceUsage::LeftHand),
            "RightHand" => Ok(DeviceUsage::RightHand),
            other => Err(UserError::unknown("device usage", other)),
        }
    }
}

/// Category of a control channel on a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    Button,
    Axis,
}

/// Describes one named control exposed by a device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlDesc {
    pub name: &'static str,
    pub kind: ControlKind,
}

const fn button(name: &'static str) -> ControlDesc {
    ControlDesc { name, kind: ControlKind::Button }
}

const fn axis(name: &'static str) -> ControlDesc {
    ControlDesc { name, kind: ControlKind::Axis }
}

// Control layouts per device kind. Deliberately small; enough surface for
// bindings and state-change routing, not a full descriptor model.

static KEYBOARD_CONTROLS: [ControlDesc; 3] =
    [button("space"), button("enter"), button("escape")];

static MOUSE_CONTROLS: [ControlDesc; 4] = [
    button("leftButton"),
    button("rightButton"),
    axis("deltaX"),
    axis("deltaY"),
];

static GAMEPAD_CONTROLS: [ControlDesc; 8] = [
    button("buttonSouth"),
    button("buttonNorth"),
    button("buttonEast"),
    button("buttonWest"),
    axis("leftStickX"),
    axis("leftStickY"),
    axis("leftTrigger"),
    axis("rightTrigger"),
];

static JOYSTICK_CONTROLS: [ControlDesc; 3] =
    [button("trigger"), axis("stickX"), axis("stickY")];

static TOUCHSCREEN_CONTROLS: [ControlDesc; 3] =
    [button("press"), axis("positionX"), axis("positionY")];

static GYROSCOPE_CONTROLS: [ControlDesc; 3] = [
    axis("angularVelocityX"),
    axis("angularVelocityY"),
    axis("angularVelocityZ"),
];

fn controls_for(kind: DeviceKind) -> &'static [ControlDesc] {
    match kind {
        DeviceKind::Keyboard => &KEYBOARD_CONTROLS,
        DeviceKind::Mouse => &MOUSE_CONTROLS,
        DeviceKind::Gamepad => &GAMEPAD_CONTROLS,
        DeviceKind::Joystick => &JOYSTICK_CONTROLS,
        DeviceKind::Touchscreen => &TOUCHSCREEN_CONTROLS,
        DeviceKind::Gyroscope => &GYROSCOPE_CONTROLS,
    }
}

/// Stable numeric id assigned by the runtime when a device is added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u32);

#[derive(Debug)]
struct DeviceInfo {
    id: DeviceId,
    kind: DeviceKind,
    name: String,
    usage: Cell<Option<DeviceUsage>>,
}

/// Identity-comparable handle to a physical or virtual input source.
#[derive(Clone)]
pub struct InputDevice {
    info: Rc<DeviceInfo>,
}

impl InputDevice {
    pub(crate) fn new(id: DeviceId, kind: DeviceKind, name: String) -> Self {
        Self {
            info: Rc::new(DeviceInfo { id, kind, name, usage: Cell::new(None) }),
        }
    }

    pub fn id(&self) -> DeviceId {
        self.info.id
    }

    pub fn kind(&self) -> DeviceKind {
        self.info.kind
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn usage(&self) -> Option<DeviceUsage> {
        self.info.usage.get()
    }

    /// Tags the device with a handedness usage (or clears the tag).
    pub fn set_usage(&self, usage: Option<DeviceUsage>) {
        self.info.usage.set(usage);
    }

    /// All controls this device exposes.
    pub fn controls(&self) -> &'static [ControlDesc] {
        controls_for(self.info.kind)
    }

    /// Looks up a control by name.
    pub fn control(&self, name: &str) -> Option<InputControl> {
        self.controls()
            .iter()
            .find(|c| c.name == name)
            .map(|c| InputControl { device: self.clone(), desc: c.clone() })
    }
}

impl PartialEq for InputDevice {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.info, &other.info)
    }
}

impl Eq for InputDevice {}

impl fmt::Debug for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputDevice({} #{})", self.info.name, self.info.id.0)
    }
}

/// A specific control on a specific device, e.g. `buttonSouth` on gamepad #2.
#[derive(Clone, Debug)]
pub struct InputControl {
    device: InputDevice,
    desc: ControlDesc,
}

impl InputControl {
    pub fn device(&self) -> &InputDevice {
        &self.device
    }

    pub fn name(&self) -> &str {
        self.desc.name
    }

    pub fn kind(&self) -> ControlKind {
        self.desc.kind
    }

    /// Full path in `DeviceName/control` form, for logging and diagnostics.
    pub fn path(&self) -> String {
        format!("{}/{}", self.device.name(), self.desc.name)
    }
}

impl PartialEq for InputControl {
    fn eq(&self, other: &Self) -> bool {
        self.device == other.device && self.desc.name == other.desc.name
    }
}

impl Eq for InputControl {}
