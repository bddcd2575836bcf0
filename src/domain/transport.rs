use crate::backend::BackendError;
use crate::domain::commands::ControlRequest;
use crate::domain::device::Device;
use async_trait::async_trait;
use std::fmt::Debug;

/// Boundary to the backend: a request/response path and a persistent
/// connection. Implementations encode and decode the wire format but own no
/// device semantics beyond that.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Fetches the full authoritative device list in a single round trip.
    async fn fetch_devices(&self) -> Result<Vec<Device>, BackendError>;

    /// Sends a control command addressed to one device and awaits the
    /// backend's verdict.
    async fn control_device(&self, device_id: &str, request: &ControlRequest) -> Result<(), BackendError>;

    /// Opens the persistent connection the backend pushes events on.
    async fn connect(&self) -> Result<Box<dyn EventStream>, BackendError>;
}

/// One open persistent connection, yielding raw inbound payloads until it
/// closes.
#[async_trait]
pub trait EventStream: Send {
    /// Next raw payload; `None` on clean close, `Err` on a broken connection.
    async fn next_payload(&mut self) -> Option<Result<String, BackendError>>;
}
