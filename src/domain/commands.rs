use serde::Serialize;
use serde_json::Value;

/// Action descriptor sent over the request/response path to control a
/// device, addressed to a device identity by the dispatcher.
#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlRequest {
    Toggle,
    Set { payload: Value },
}
