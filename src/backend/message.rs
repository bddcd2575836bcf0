use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// Inbound payloads, decoded once at the transport boundary. Anything that
/// fails to match a known shape is rejected there.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Full authoritative device list.
    Devices { payload: Vec<DevicePayload> },
    /// Incremental patch to one device.
    DeviceUpdate { payload: DevicePatchPayload },
    #[serde(untagged)]
    Unknown(UnknownMessage),
}

impl InboundMessage {
    pub fn decode(raw: &str) -> Result<InboundMessage, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Deserialize)]
pub struct DevicePayload {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: KindPayload,
    pub state: StatePayload,
    #[serde(default)]
    pub params: HashMap<String, Number>,
    #[serde(default)]
    pub revision: Option<u64>,
}

/// Partial device: everything but the identity is optional.
#[derive(Debug, Deserialize)]
pub struct DevicePatchPayload {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<StatePayload>,
    #[serde(default)]
    pub params: HashMap<String, Number>,
    #[serde(default)]
    pub revision: Option<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindPayload {
    Light,
    Fan,
    AirConditioner,
    Lock,
    Sensor,
    #[serde(other)]
    #[default]
    Unknown,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatePayload {
    On,
    Off,
}

#[derive(Debug)]
pub struct UnknownMessage {
    pub message_type: String,
}

impl<'de> Deserialize<'de> for UnknownMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value.get("type") {
            Some(Value::String(message_type)) => Ok(UnknownMessage {
                message_type: message_type.clone(),
            }),
            _ => Err(serde::de::Error::missing_field("type")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn decodes_a_snapshot_message() -> Result<(), serde_json::Error> {
        let json = r#"
        {
          "type": "devices",
          "payload": [
            { "id": "light_001", "name": "Bedroom light", "type": "light", "state": "off", "params": { "brightness": 70 } },
            { "id": "ac_001", "name": "Living room AC", "type": "air_conditioner", "state": "on", "revision": 3 }
          ]
        }
        "#;

        let message = InboundMessage::decode(json)?;

        let InboundMessage::Devices { payload } = message else {
            panic!("expected a snapshot, got {message:?}");
        };
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[0].id, "light_001");
        assert_eq!(payload[0].kind, KindPayload::Light);
        assert_eq!(payload[0].state, StatePayload::Off);
        assert_eq!(payload[0].params.get("brightness"), Some(&Number::from(70)));
        assert_eq!(payload[1].kind, KindPayload::AirConditioner);
        assert_eq!(payload[1].revision, Some(3));
        Ok(())
    }

    #[test]
    fn decodes_a_device_update_message() -> Result<(), serde_json::Error> {
        let json = r#"{ "type": "device_update", "payload": { "id": "light_001", "state": "on" } }"#;

        let message = InboundMessage::decode(json)?;

        let InboundMessage::DeviceUpdate { payload } = message else {
            panic!("expected an update, got {message:?}");
        };
        assert_eq!(payload.id, "light_001");
        assert_eq!(payload.state, Some(StatePayload::On));
        assert_eq!(payload.name, None);
        Ok(())
    }

    #[test]
    fn an_unknown_message_type_decodes_to_unknown() -> Result<(), serde_json::Error> {
        let json = r#"{ "type": "temperature_alert", "payload": { "value": 31 } }"#;

        let message = InboundMessage::decode(json)?;

        assert!(matches!(message, InboundMessage::Unknown(UnknownMessage { message_type }) if message_type == "temperature_alert"));
        Ok(())
    }

    #[test]
    fn an_unrecognized_device_kind_decodes_to_unknown_kind() -> Result<(), serde_json::Error> {
        let json = r#"{ "type": "devices", "payload": [{ "id": "x", "name": "x", "type": "toaster", "state": "on" }] }"#;

        let message = InboundMessage::decode(json)?;

        let InboundMessage::Devices { payload } = message else {
            panic!("expected a snapshot, got {message:?}");
        };
        assert_eq!(payload[0].kind, KindPayload::Unknown);
        Ok(())
    }

    #[rstest]
    #[case::not_json("not json at all")]
    #[case::no_type_field(r#"{ "payload": [] }"#)]
    #[case::missing_identity(r#"{ "type": "device_update", "payload": { "state": "on" } }"#)]
    #[case::invalid_state(r#"{ "type": "device_update", "payload": { "id": "1", "state": "dimmed" } }"#)]
    fn malformed_payloads_fail_to_decode(#[case] raw: &str) {
        assert!(InboundMessage::decode(raw).is_err());
    }
}
