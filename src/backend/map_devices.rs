use crate::backend::message::{DevicePatchPayload, DevicePayload, KindPayload, StatePayload};
use crate::domain::device::{Device, DeviceKind, DevicePatch, DeviceState};

pub fn map_devices(payload: Vec<DevicePayload>) -> Vec<Device> {
    payload.into_iter().map(map_device).collect()
}

pub fn map_device(payload: DevicePayload) -> Device {
    Device {
        id: payload.id,
        kind: map_kind(payload.kind),
        name: payload.name,
        state: map_state(payload.state),
        params: payload.params,
        revision: payload.revision,
    }
}

pub fn map_device_patch(payload: DevicePatchPayload) -> DevicePatch {
    DevicePatch {
        id: payload.id,
        name: payload.name,
        state: payload.state.map(map_state),
        params: payload.params,
        revision: payload.revision,
    }
}

fn map_kind(kind: KindPayload) -> DeviceKind {
    match kind {
        KindPayload::Light => DeviceKind::Light,
        KindPayload::Fan => DeviceKind::Fan,
        KindPayload::AirConditioner => DeviceKind::AirConditioner,
        KindPayload::Lock => DeviceKind::Lock,
        KindPayload::Sensor => DeviceKind::Sensor,
        KindPayload::Unknown => DeviceKind::Unknown,
    }
}

fn map_state(state: StatePayload) -> DeviceState {
    match state {
        StatePayload::On => DeviceState::On,
        StatePayload::Off => DeviceState::Off,
    }
}
