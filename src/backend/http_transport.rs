use crate::app_config::AppConfig;
use crate::backend::error::BackendError;
use crate::backend::map_devices::map_devices;
use crate::backend::message::DevicePayload;
use crate::domain::commands::ControlRequest;
use crate::domain::device::Device;
use crate::domain::transport::{EventStream, Transport};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{info, instrument};

/// The real backend boundary: reqwest for the request/response path, a
/// WebSocket for the persistent connection.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    events_url: String,
}

impl HttpTransport {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        HttpTransport {
            client,
            base_url: config.backend().url().to_string(),
            events_url: config.backend().events_url().to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self))]
    async fn fetch_devices(&self) -> Result<Vec<Device>, BackendError> {
        info!("Retrieving devices...");

        let response = self
            .client
            .get(format!("{}/api/devices", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        let payload = response.json::<Vec<DevicePayload>>().await?;
        info!("Retrieving devices... OK, {} found", payload.len());

        Ok(map_devices(payload))
    }

    #[instrument(skip(self, request))]
    async fn control_device(&self, device_id: &str, request: &ControlRequest) -> Result<(), BackendError> {
        let response = self
            .client
            .post(format!("{}/api/devices/{}/control", self.base_url, device_id))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Auth);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    async fn connect(&self) -> Result<Box<dyn EventStream>, BackendError> {
        info!("Connecting to event stream {}...", self.events_url);
        let (socket, _) = connect_async(self.events_url.as_str()).await?;
        info!("Connecting to event stream {}... OK", self.events_url);

        Ok(Box::new(WsEventStream { socket }))
    }
}

struct WsEventStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl EventStream for WsEventStream {
    async fn next_payload(&mut self) -> Option<Result<String, BackendError>> {
        loop {
            match self.socket.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text.as_str().to_owned())),
                Some(Ok(Message::Close(_))) | None => return None,
                Some(Ok(_)) => continue, // Ping/pong/binary frames carry no events
                Some(Err(e)) => return Some(Err(e.into())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::domain::device::{DeviceKind, DeviceState};
    use pretty_assertions::assert_eq;
    use serde_json::Number;

    fn transport(server: &mockito::Server) -> HttpTransport {
        let config = AppConfigBuilder::new().backend_url(server.url()).build();
        HttpTransport::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn fetch_devices_returns_mapped_devices() -> Result<(), BackendError> {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/devices")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(include_str!("../../tests/resources/devices_response.json"))
            .create_async()
            .await;

        let devices = transport(&server).fetch_devices().await?;

        mock.assert();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].id, "light_001");
        assert_eq!(devices[0].kind, DeviceKind::Light);
        assert_eq!(devices[0].state, DeviceState::Off);
        assert_eq!(devices[0].params.get("brightness"), Some(&Number::from(70)));
        assert_eq!(devices[2].kind, DeviceKind::AirConditioner);
        assert_eq!(devices[2].state, DeviceState::On);
        Ok(())
    }

    #[tokio::test]
    async fn control_device_posts_the_action_descriptor() -> Result<(), BackendError> {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/api/devices/light_001/control")
            .with_status(200)
            .match_body(mockito::Matcher::Json(serde_json::json!({ "action": "toggle" })))
            .create_async()
            .await;

        transport(&server).control_device("light_001", &ControlRequest::Toggle).await?;

        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn a_rejected_command_surfaces_status_and_message() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/api/devices/sensor_001/control")
            .with_status(400)
            .with_body(r#"{"error":"sensor could not be controlled"}"#)
            .create_async()
            .await;

        let result = transport(&server).control_device("sensor_001", &ControlRequest::Toggle).await;

        assert!(matches!(
            result,
            Err(BackendError::Rejected { status: 400, ref message }) if message.contains("sensor could not be controlled")
        ));
    }

    #[tokio::test]
    async fn an_expired_token_surfaces_as_an_auth_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/api/devices/light_001/control")
            .with_status(401)
            .create_async()
            .await;

        let result = transport(&server).control_device("light_001", &ControlRequest::Toggle).await;

        assert!(matches!(result, Err(BackendError::Auth)));
    }
}
