use crate::store::StoreView;
use crate::supervisor::ConnectionState;
use tokio::sync::watch::Receiver;
use tracing::{debug, info, instrument};

/// Read-only observer of the store, standing in for the UI binding layer.
#[instrument(skip_all)]
pub async fn store_listener(mut rx: Receiver<StoreView>) {
    while rx.changed().await.is_ok() {
        let view: StoreView = rx.borrow().clone();
        info!("🖥️  Store v{}, {} device(s)", view.version, view.devices.len());
        for device in view.devices.values() {
            debug!(device_id = device.id, "🖥️  '{}' is {:?}", device.name, device.state);
        }
    }
}

/// Surfaces the last sync status to whoever renders it.
#[instrument(skip_all)]
pub async fn sync_status_listener(mut rx: Receiver<ConnectionState>) {
    while rx.changed().await.is_ok() {
        let state = *rx.borrow();
        info!("📡 Sync status: {:?}", state);
    }
}
