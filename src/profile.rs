//! Serialized control-scheme and action-map profiles.
//!
//! Profiles let schemes and action maps live in asset files instead of code.
//! Both TOML and JSON are supported; the on-disk shape uses the same
//! `<Kind>/control` path syntax as
//! [`InputAction::add_binding`](crate::action::InputAction::add_binding).
//!
//! ```toml
//! name = "gameplay"
//!
//! [[actions]]
//! name = "jump"
//! bindings = [
//!     { path = "<Gamepad>/buttonSouth", group = "Gamepad" },
//!     { path = "<Keyboard>/space", group = "KeyboardMouse" },
//! ]
//! ```
//!
//! Converting a profile into live objects validates every device matcher and
//! binding path; an unknown device kind fails with
//! [`UserError::InvalidArgument`].

use serde::{Deserialize, Serialize};

use crate::action::InputActionMap;
use crate::error::UserError;
use crate::scheme::{parse_device_matcher, ControlScheme};

/// On-disk shape of a control scheme.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SchemeProfile {
    pub name: String,
    /// Required-device matchers, in slot order, e.g. `["<Gamepad>", "<Gamepad>"]`.
    #[serde(default)]
    pub devices: Vec<String>,
}

impl SchemeProfile {
    /// Validates the matchers and builds the scheme.
    pub fn into_scheme(self) -> Result<ControlScheme, UserError> {
        let mut scheme = ControlScheme::new(self.name);
        for matcher in &self.devices {
            scheme = scheme.with_requirement(parse_device_matcher(matcher)?);
        }
        Ok(scheme)
    }
}

/// On-disk shape of one binding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BindingProfile {
    pub path: String,
    #[serde(default)]
    pub group: Option<String>,
}

/// On-disk shape of one action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionProfile {
    pub name: String,
    #[serde(default)]
    pub bindings: Vec<BindingProfile>,
}

/// On-disk shape of an action map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionMapProfile {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ActionProfile>,
}

impl ActionMapProfile {
    /// Validates every binding path and builds the live map.
    pub fn into_map(self) -> Result<InputActionMap, UserError> {
        let mut map = InputActionMap::new(self.name);
        for action_profile in self.actions {
            let action = map.add_action(action_profile.name);
            for binding in &action_profile.bindings {
                action.add_binding(&binding.path, binding.group.as_deref())?;
            }
        }
        Ok(map)
    }
}

/// Parses a scheme from TOML text.
pub fn scheme_from_toml(text: &str) -> Result<ControlScheme, UserError> {
    let profile: SchemeProfile =
        toml::from_str(text).map_err(|e| UserError::InvalidArgument(e.to_string()))?;
    profile.into_scheme()
}

/// Parses a scheme from JSON text.
pub fn scheme_from_json(text: &str) -> Result<ControlScheme, UserError> {
    let profile: SchemeProfile =
        serde_json::from_str(text).map_err(|e| UserError::InvalidArgument(e.to_string()))?;
    profile.into_scheme()
}

/// Parses an action map from TOML text.
pub fn action_map_from_toml(text: &str) -> Result<InputActionMap, UserError> {
    let profile: ActionMapProfile =
        toml::from_str(text).map_err(|e| UserError::InvalidArgument(e.to_string()))?;
    profile.into_map()
}

/// Parses an action map from JSON text.
pub fn action_map_from_json(text: &str) -> Result<InputActionMap, UserError> {
    let profile: ActionMapProfile =
        serde_json::from_str(text).map_err(|e| UserError::InvalidArgument(e.to_string()))?;
    profile.into_map()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceKind;

    #[test]
    fn scheme_profile_from_toml() {
        let scheme = scheme_from_toml(
            r#"
            name = "DualGamepad"
            devices = ["<Gamepad>", "<Gamepad>"]
            "#,
        )
        .unwrap();

        assert_eq!(scheme.name(), "DualGamepad");
        assert_eq!(scheme.requirements().len(), 2);
        assert!(scheme.requirements().iter().all(|r| r.kind == DeviceKind::Gamepad));
    }

    #[test]
    fn unknown_device_kind_is_rejected() {
        let err = scheme_from_toml(
            r#"
            name = "Broken"
            devices = ["<Hoverboard>"]
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, UserError::InvalidArgument(_)));
    }

    #[test]
    fn action_map_profile_from_json() {
        let map = action_map_from_json(
            r#"{
                "name": "gameplay",
                "actions": [
                    {
                        "name": "jump",
                        "bindings": [
                            { "path": "<Gamepad>/buttonSouth", "group": "Gamepad" },
                            { "path": "<Keyboard>/space", "group": "KeyboardMouse" }
                        ]
                    },
                    { "name": "fire" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(map.name(), "gameplay");
        assert_eq!(map.actions().len(), 2);

        let jump = map.action("jump").unwrap();
        assert_eq!(jump.bindings().len(), 2);
        assert_eq!(jump.bindings()[0].group.as_deref(), Some("Gamepad"));
    }
}
