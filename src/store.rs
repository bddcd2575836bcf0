use crate::domain::device::{Device, DevicePatch};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio::sync::watch::{self, Receiver as WatchReceiver, Sender as WatchSender};

pub type DeviceMap = HashMap<String, Device>;

/// Immutable view published to subscribers after every mutation. The version
/// is strictly increasing so each mutation stays independently observable
/// even when a slow reader misses intermediate watch values.
#[derive(Clone, Debug)]
pub struct StoreView {
    pub version: u64,
    pub devices: Arc<DeviceMap>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PatchOutcome {
    Applied,
    /// The identity is not in the store; the patch was dropped.
    UnknownDevice,
    /// The patch carried a revision older than the stored one.
    StaleRevision,
}

/// Single source of truth for the device collection. Only the reconciler
/// mutates it; everything else observes through `get`, `list` or the
/// notifier.
#[derive(Debug)]
pub struct Store {
    devices: RwLock<DeviceMap>,
    version: AtomicU64,
    notifier_tx: WatchSender<StoreView>,
    notifier_rx: WatchReceiver<StoreView>,
}

impl Store {
    pub fn new() -> Self {
        let (notifier_tx, notifier_rx) = watch::channel(StoreView {
            version: 0,
            devices: Arc::new(HashMap::new()),
        });

        Store {
            devices: RwLock::new(HashMap::new()),
            version: AtomicU64::new(0),
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn notifier(&self) -> WatchReceiver<StoreView> {
        self.notifier_rx.clone()
    }

    /// Atomically swaps the entire store content. The only operation that
    /// adds or removes devices.
    pub async fn replace_all(&self, devices: Vec<Device>) {
        let mut write_guard = self.devices.write().await;
        write_guard.clear();
        write_guard.extend(devices.into_iter().map(|device| (device.id.clone(), device)));
        self.notify(&write_guard);
    }

    /// Merges a partial update into the existing device. A no-op for absent
    /// identities: membership only changes via `replace_all`.
    pub async fn apply_patch(&self, patch: &DevicePatch) -> PatchOutcome {
        let mut write_guard = self.devices.write().await;

        let Some(device) = write_guard.get_mut(&patch.id) else {
            return PatchOutcome::UnknownDevice;
        };

        if let (Some(patch_revision), Some(stored_revision)) = (patch.revision, device.revision) {
            if patch_revision < stored_revision {
                return PatchOutcome::StaleRevision;
            }
        }

        if let Some(name) = &patch.name {
            device.name = name.clone();
        }
        if let Some(state) = patch.state {
            device.state = state;
        }
        device.params.extend(patch.params.iter().map(|(k, v)| (k.clone(), v.clone())));
        if patch.revision.is_some() {
            device.revision = patch.revision;
        }

        self.notify(&write_guard);
        PatchOutcome::Applied
    }

    pub async fn get(&self, device_id: &str) -> Option<Device> {
        self.devices.read().await.get(device_id).cloned()
    }

    pub async fn list(&self) -> Vec<Device> {
        self.devices.read().await.values().cloned().collect()
    }

    // Called with the write guard held, so views publish in mutation order.
    fn notify(&self, devices: &DeviceMap) {
        let view = StoreView {
            version: self.version.fetch_add(1, Ordering::Relaxed) + 1,
            devices: Arc::new(devices.clone()),
        };
        self.notifier_tx.send(view).unwrap_or_default();
    }
}
