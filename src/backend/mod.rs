mod client;
mod error;
mod http_transport;
mod map_devices;
pub mod message;

pub use client::{AuthToken, login, new_client};
pub use error::BackendError;
pub use http_transport::HttpTransport;
pub use map_devices::{map_device_patch, map_devices};
