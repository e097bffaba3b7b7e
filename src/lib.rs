//! usermux — per-player input user management.
//!
//! Tracks logical users ("player 1", "player 2"), which devices they own,
//! which actions are bound for them, and which control scheme they are on,
//! independent of any specific device backend. Device discovery and
//! low-level event delivery live behind [`InputRuntime`]; the
//! [`UserRegistry`] is the single source of truth for ownership and fires
//! synchronous change notifications.
//!
//! Typical flow:
//!
//! ```
//! use usermux::{
//!     ControlScheme, DeviceKind, InputRuntime, InputUser, UserRegistry,
//! };
//!
//! let mut runtime = InputRuntime::new();
//! let mut registry = UserRegistry::new();
//!
//! runtime.add_device(DeviceKind::Gamepad);
//!
//! let player = InputUser::new();
//! registry.add(&player);
//!
//! let scheme = ControlScheme::new("Gamepad").with_required_device(DeviceKind::Gamepad);
//! registry
//!     .assign_control_scheme(&player, scheme)
//!     .unwrap()
//!     .and_assign_matching_devices(&runtime);
//!
//! assert_eq!(player.assigned_devices().len(), 1);
//! ```

pub mod action;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod profile;
pub mod registry;
pub mod runtime;
pub mod scheme;
pub mod user;

pub use action::{BindingPath, InputAction, InputActionMap, InputBinding};
pub use device::{
    ControlDesc, ControlKind, DeviceId, DeviceKind, DeviceUsage, InputControl, InputDevice,
};
pub use error::UserError;
pub use event::ControlChange;
pub use eventbus::{ObserverId, UserChange, UserEventBus};
pub use profile::{ActionMapProfile, ActionProfile, BindingProfile, SchemeProfile};
pub use registry::{SchemeAssignment, UserRegistry};
pub use runtime::InputRuntime;
pub use scheme::{ControlScheme, DeviceRequirement};
pub use user::{InputUser, UserHandle, UserId};
