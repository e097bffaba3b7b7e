//! Control schemes.
//!
//! A [`ControlScheme`] is a named, ordered list of device requirements, e.g.
//! "DualGamepad = one gamepad + one gamepad". Assigning a scheme to a user
//! lets the registry auto-match devices from the unassigned pool and mask
//! action bindings down to the scheme's group.
//!
//! Scheme equality is **by name only**: two schemes with the same name are
//! considered the same scheme even if their requirement lists differ. This is
//! what makes "assigning the scheme the user already has" a silent no-op.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::device::{DeviceKind, DeviceUsage, InputDevice};
use crate::error::UserError;

/// One slot in a scheme: a device of the given kind must be found.
/// An optional usage tag narrows the slot to devices tagged with that
/// handedness.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRequirement {
    pub kind: DeviceKind,
    #[serde(default)]
    pub usage: Option<DeviceUsage>,
}

impl DeviceRequirement {
    /// Whether the given device satisfies this requirement.
    pub fn matches(&self, device: &InputDevice) -> bool {
        if device.kind() != self.kind {
            return false;
        }
        match self.usage {
            None => true,
            Some(usage) => device.usage() == Some(usage),
        }
    }
}

/// Parses a device matcher in `<Kind>` form with an optional usage suffix,
/// e.g. `"<Gamepad>"` or `"<Joystick>{LeftHand}"`.
///
/// The angle brackets are optional; `"Gamepad"` parses the same way.
pub fn parse_device_matcher(s: &str) -> Result<DeviceRequirement, UserError> {
    let (kind_part, usage) = match s.split_once('{') {
        Some((kind_part, rest)) => {
            let tag = rest
                .strip_suffix('}')
                .ok_or_else(|| UserError::unknown("device matcher", s))?;
            (kind_part, Some(DeviceUsage::from_str(tag)?))
        }
        None => (s, None),
    };
    let inner = kind_part
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(kind_part);
    let kind = DeviceKind::from_str(inner)?;
    Ok(DeviceRequirement { kind, usage })
}

/// Named, ordered set of device requirements.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControlScheme {
    name: String,
    requirements: Vec<DeviceRequirement>,
}

impl ControlScheme {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), requirements: Vec::new() }
    }

    /// Appends a required-device slot. Slots are matched in insertion order.
    pub fn with_required_device(self, kind: DeviceKind) -> Self {
        self.with_requirement(DeviceRequirement { kind, usage: None })
    }

    /// Appends a required-device slot restricted to devices tagged with the
    /// given usage.
    pub fn with_required_device_usage(self, kind: DeviceKind, usage: DeviceUsage) -> Self {
        self.with_requirement(DeviceRequirement { kind, usage: Some(usage) })
    }

    /// Appends an already-built requirement slot.
    pub fn with_requirement(mut self, requirement: DeviceRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &[DeviceRequirement] {
        &self.requirements
    }

    /// The binding group this scheme selects when masking. Same as the name.
    pub fn binding_group(&self) -> &str {
        &self.name
    }

    /// Greedily picks one device per requirement slot out of `pool`, in slot
    /// order. Each pool device is consumed at most once. Slots that find no
    /// match are skipped; a partial (or empty) pick is not an error.
    pub fn pick_devices(&self, pool: &[InputDevice]) -> Vec<InputDevice> {
        let mut picked: Vec<InputDevice> = Vec::new();
        for req in &self.requirements {
            let found = pool
                .iter()
                .find(|d| req.matches(d) && !picked.contains(d));
            if let Some(device) = found {
                picked.push(device.clone());
            }
        }
        picked
    }
}

// Equality by name only; see module docs.
impl PartialEq for ControlScheme {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ControlScheme {}
