use homesync::app_config::AppConfig;
use homesync::backend::{self, HttpTransport};
use homesync::domain::events::Event;
use homesync::reconciler::Reconciler;
use homesync::store::Store;
use homesync::store_listener::{store_listener, sync_status_listener};
use homesync::supervisor::{self, ConnectionState};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    info!("✅  Loaded configuration");

    let token = backend::login(&config, config.backend().username(), config.backend().password())
        .await
        .expect("Could not log in to the backend");
    let client = backend::new_client(&config, &token)?;
    let transport = HttpTransport::new(client, &config);
    info!("✅  Logged in to the backend");

    let store = Arc::new(Store::new());
    let notifier_rx = store.notifier();
    task::spawn(async move {
        store_listener(notifier_rx).await;
    });
    info!("✅  Initialized store listener");

    let (tx, rx) = mpsc::channel::<Event>(config.core().store_buffer_size());
    let mut reconciler = Reconciler::new(store, rx);
    task::spawn(async move {
        reconciler.listen().await;
    });
    info!("✅  Initialized reconciler");

    let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
    task::spawn(async move {
        sync_status_listener(state_rx).await;
    });

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    let supervisor_config = supervisor::Config {
        retry_ms: config.backend().retry_ms(),
        retry_max_delay: config.backend().retry_max_delay(),
        stale_connection_timeout: config.backend().stale_connection_timeout(),
        request_timeout: config.backend().request_timeout(),
    };
    supervisor::supervise(&transport, tx, state_tx, &supervisor_config)
        .await
        .expect("Could not supervise the event stream");

    Ok(())
}
