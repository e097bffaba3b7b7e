//! Queued low-level state changes.
//!
//! A [`ControlChange`] is one device-local value delta waiting in the runtime's
//! queue. The runtime timestamps changes as they are queued and delivers the
//! whole batch on the next [`update`](crate::runtime::InputRuntime::update)
//! tick.
//!
//! ## Value conventions
//! - **Buttons:** `0.0` = released, anything `> 0.0` = pressed.
//! - **Axes:** normalized to `[-1.0, 1.0]` by convention; the runtime does not
//!   enforce this, it forwards the value it was given.

use std::time::Instant;

use crate::device::InputDevice;

/// One queued control-value change on a specific device.
#[derive(Clone, Debug)]
pub struct ControlChange {
    /// Device the change originated from.
    pub device: InputDevice,
    /// Name of the control on that device (e.g. `"buttonSouth"`).
    pub control: String,
    /// New value; see module docs for unit conventions.
    pub value: f32,
    /// Queue time (monotonic). Suitable for ordering within a run.
    pub at: Instant,
}

impl ControlChange {
    /// Whether the value counts as a button press edge.
    pub fn is_pressed(&self) -> bool {
        self.value > 0.0
    }
}
