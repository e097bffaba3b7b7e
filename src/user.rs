//! Users and their per-user state.
//!
//! An [`InputUser`] is a logical participant ("player 1"), distinct from any
//! device. The handle is created detached; it gains an id and an index when
//! added to a [`UserRegistry`](crate::registry::UserRegistry) and loses both
//! again when removed. A caller-held handle to a removed user stays readable
//! and reports the cleared state.
//!
//! All mutation goes through the registry; the handle itself only exposes
//! read accessors.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::action::InputAction;
use crate::device::InputDevice;
use crate::scheme::ControlScheme;

/// Registry-allocated user id. Unique among live users; never reused while
/// the original holder is still registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

/// Opaque platform account identity (e.g. an OS user or gamer profile).
/// Compared by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserHandle {
    pub api: String,
    pub id: u64,
}

impl UserHandle {
    pub fn new(api: impl Into<String>, id: u64) -> Self {
        Self { api: api.into(), id }
    }
}

#[derive(Default)]
pub(crate) struct UserState {
    pub(crate) id: Option<UserId>,
    pub(crate) index: Option<usize>,
    pub(crate) name: Option<String>,
    pub(crate) handle: Option<UserHandle>,
    pub(crate) devices: Vec<InputDevice>,
    pub(crate) actions: Vec<InputAction>,
    pub(crate) scheme: Option<ControlScheme>,
    pub(crate) active: bool,
}

/// Identity-comparable handle to a logical input user.
#[derive(Clone)]
pub struct InputUser {
    pub(crate) state: Rc<RefCell<UserState>>,
}

impl InputUser {
    /// Creates a detached user: no id, no index, nothing assigned.
    pub fn new() -> Self {
        Self { state: Rc::new(RefCell::new(UserState::default())) }
    }

    /// Registry-allocated id, or `None` while not registered.
    pub fn id(&self) -> Option<UserId> {
        self.state.borrow().id
    }

    /// Position in the registry's user sequence, or `None` while not
    /// registered.
    pub fn index(&self) -> Option<usize> {
        self.state.borrow().index
    }

    pub fn user_name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    pub fn user_handle(&self) -> Option<UserHandle> {
        self.state.borrow().handle.clone()
    }

    /// Snapshot of the user's assigned devices, in assignment order.
    pub fn assigned_devices(&self) -> Vec<InputDevice> {
        self.state.borrow().devices.clone()
    }

    /// Snapshot of the user's action stack, oldest first.
    pub fn actions(&self) -> Vec<InputAction> {
        self.state.borrow().actions.clone()
    }

    pub fn control_scheme(&self) -> Option<ControlScheme> {
        self.state.borrow().scheme.clone()
    }

    /// Whether the user's input is currently activated. Freshly added users
    /// are passive.
    pub fn is_input_active(&self) -> bool {
        self.state.borrow().active
    }
}

impl Default for InputUser {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for InputUser {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for InputUser {}

impl fmt::Debug for InputUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("InputUser")
            .field("id", &state.id)
            .field("index", &state.index)
            .field("name", &state.name)
            .field("devices", &state.devices.len())
            .field("active", &state.active)
            .finish()
    }
}
