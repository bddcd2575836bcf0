use crate::backend::message::InboundMessage;
use crate::backend::{map_device_patch, map_devices};
use crate::domain::events::{Event, SessionId};
use crate::domain::transport::Transport;
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::SendError;
use tokio::sync::watch::Sender as WatchSender;
use tokio::time::timeout;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug)]
pub struct Config {
    pub retry_ms: u64,
    pub retry_max_delay: Duration,
    pub stale_connection_timeout: Duration,
    pub request_timeout: Duration,
}

/// Lifecycle of the persistent connection, observable as the "last sync
/// status" indicator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
}

/// Keeps the event pipeline alive: connect, fetch a fresh snapshot so the
/// reconciler has ground truth, forward decoded events, and reconnect with
/// capped exponential backoff whenever the connection drops. Connection
/// errors are never fatal; the store keeps serving last-known state across
/// reconnect cycles.
#[instrument(skip_all)]
pub async fn supervise(
    transport: &dyn Transport,
    tx: Sender<Event>,
    state_tx: WatchSender<ConnectionState>,
    config: &Config,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let strategy = ExponentialBackoff::from_millis(config.retry_ms)
        .factor(2)
        .max_delay(config.retry_max_delay)
        .map(jitter);

    let next_session = AtomicU64::new(1);

    Retry::spawn(strategy, || async {
        let session = SessionId(next_session.fetch_add(1, Ordering::Relaxed));
        match run_session(transport, &tx, &state_tx, session, config).await {
            Ok(_) => info!("✅ Event stream ended gracefully. Restarting..."),
            Err(e) => warn!(session = session.0, "⚠️ Connection error: {}. Retrying...", e),
        }
        state_tx.send(ConnectionState::Disconnected).unwrap_or_default();
        Err::<(), &str>("connection lost") // Triggers retry
    })
    .await?;

    Ok(())
}

async fn run_session(
    transport: &dyn Transport,
    tx: &Sender<Event>,
    state_tx: &WatchSender<ConnectionState>,
    session: SessionId,
    config: &Config,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    state_tx.send(ConnectionState::Connecting).unwrap_or_default();
    let mut connection = transport.connect().await?;

    // Ground truth before accepting any incremental event: a patch against a
    // stale store would be silently wrong.
    let devices = timeout(config.request_timeout, transport.fetch_devices())
        .await
        .map_err(|_| "snapshot request timed out")??;
    tx.send(Event::Snapshot { session, devices }).await?;

    state_tx.send(ConnectionState::Open).unwrap_or_default();
    info!(session = session.0, "✅ Session open, accepting events");

    loop {
        match timeout(config.stale_connection_timeout, connection.next_payload()).await {
            Ok(Some(Ok(raw))) => forward(&raw, session, tx).await?,
            Ok(Some(Err(e))) => {
                error!("❌ Event stream error: {}", e);
                return Err(Box::new(e));
            }
            Ok(None) => {
                warn!("🔴 Event stream closed");
                return Err("stream closed".into());
            }
            Err(_) => {
                warn!("⏳ No data for {} seconds. Reconnecting...", config.stale_connection_timeout.as_secs());
                return Err("stale connection".into());
            }
        }
    }
}

/// Decodes one raw payload at the boundary and forwards it tagged with the
/// session. Unknown types are ignored; malformed payloads are logged and
/// dropped, never crash the loop.
async fn forward(raw: &str, session: SessionId, tx: &Sender<Event>) -> Result<(), SendError<Event>> {
    match InboundMessage::decode(raw) {
        Ok(InboundMessage::Devices { payload }) => {
            tx.send(Event::Snapshot {
                session,
                devices: map_devices(payload),
            })
            .await?;
        }
        Ok(InboundMessage::DeviceUpdate { payload }) => {
            tx.send(Event::Update {
                session,
                patch: map_device_patch(payload),
            })
            .await?;
        }
        Ok(InboundMessage::Unknown(unknown)) => {
            debug!("🔸 Ignoring message of unknown type '{}'", unknown.message_type);
        }
        Err(e) => {
            warn!("⚠️ Dropping malformed message: {}", e);
        }
    }

    Ok(())
}
