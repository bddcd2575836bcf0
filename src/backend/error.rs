use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    /// Network failure or timeout; recovered locally by retry/reconnect.
    #[error("transport error: {0}")]
    Transport(String),
    /// Malformed or unexpected message shape; logged and dropped.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Rejected credential; surfaces to the caller to prompt re-login.
    #[error("authentication rejected")]
    Auth,
    /// The backend refused a request that reached it.
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            BackendError::Auth
        } else if error.is_decode() {
            BackendError::Protocol(error.to_string())
        } else {
            BackendError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(error: serde_json::Error) -> Self {
        BackendError::Protocol(error.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for BackendError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        BackendError::Transport(error.to_string())
    }
}
