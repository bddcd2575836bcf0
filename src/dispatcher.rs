use crate::backend::BackendError;
use crate::domain::commands::ControlRequest;
use crate::domain::transport::Transport;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Issues user-initiated control commands over the request/response path.
/// Never touches the store: a command has not taken effect until the backend
/// confirms it through the event stream or the next snapshot, because other
/// clients may be mutating the same device concurrently.
#[derive(Debug)]
pub struct CommandDispatcher {
    transport: Arc<dyn Transport>,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        CommandDispatcher { transport }
    }

    /// In-flight commands are independent, including multiple for the same
    /// identity; the last backend response wins.
    #[instrument(skip(self))]
    pub async fn issue(&self, device_id: &str, request: ControlRequest) -> Result<(), BackendError> {
        info!(device_id, "🟢 Issuing {:?} for device '{}'", request, device_id);

        match self.transport.control_device(device_id, &request).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(device_id, "⚠️ Unable to control device '{}': {}", device_id, e);
                Err(e)
            }
        }
    }
}
