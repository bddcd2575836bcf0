use crate::domain::device::{Device, DevicePatch};

/// Identifies one connection attempt. Allocated monotonically by the
/// connection supervisor so that late responses and events from a dead
/// connection can be told apart from the live one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SessionId(pub u64);

#[derive(Debug)]
pub enum Event {
    /// Full authoritative device list, replacing prior store content.
    Snapshot { session: SessionId, devices: Vec<Device> },
    /// Incremental patch to one already-known device.
    Update { session: SessionId, patch: DevicePatch },
}
