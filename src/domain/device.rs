use serde_json::Number;
use std::collections::HashMap;

#[derive(Clone, PartialEq, Debug)]
pub struct Device {
    pub id: String,
    pub kind: DeviceKind,
    pub name: String,
    pub state: DeviceState,
    /// Richer parameters such as brightness or temperature, keyed by name.
    pub params: HashMap<String, Number>,
    /// Absent when the backend does not version device records.
    pub revision: Option<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeviceKind {
    Light,
    Fan,
    AirConditioner,
    Lock,
    Sensor,
    Unknown,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeviceState {
    On,
    Off,
}

/// Partial new state for exactly one device. Merged by identity; never adds
/// or removes a device.
#[derive(Clone, PartialEq, Debug)]
pub struct DevicePatch {
    pub id: String,
    pub name: Option<String>,
    pub state: Option<DeviceState>,
    pub params: HashMap<String, Number>,
    pub revision: Option<u64>,
}

impl DevicePatch {
    pub fn state_only(id: impl Into<String>, state: DeviceState) -> Self {
        DevicePatch {
            id: id.into(),
            name: None,
            state: Some(state),
            params: HashMap::new(),
            revision: None,
        }
    }
}
