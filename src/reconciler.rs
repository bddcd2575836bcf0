use crate::domain::events::{Event, SessionId};
use crate::store::{PatchOutcome, Store};
use std::sync::Arc;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, instrument, warn};

/// Translates inbound events into store mutations. The only writer of the
/// store: snapshots replace everything, updates patch by identity, and
/// anything from a session other than the adopted one is discarded.
#[derive(Debug)]
pub struct Reconciler {
    store: Arc<Store>,
    rx: Receiver<Event>,
    current_session: Option<SessionId>,
}

impl Reconciler {
    pub fn new(store: Arc<Store>, rx: Receiver<Event>) -> Self {
        Reconciler {
            store,
            rx,
            current_session: None,
        }
    }

    #[instrument(skip(self))]
    pub async fn listen(&mut self) {
        while let Some(event) = self.rx.recv().await {
            debug!("🔵 Received event: {:?}", event);
            self.apply(event).await;
        }
    }

    pub(crate) async fn apply(&mut self, event: Event) {
        match event {
            Event::Snapshot { session, devices } => {
                if self.current_session.is_some_and(|current| session < current) {
                    #[rustfmt::skip]
                    warn!(session = session.0, "⚠️ Dropping snapshot from dead session {:?}, current is {:?}", session, self.current_session);
                    return;
                }

                let num_devices = devices.len();
                self.current_session = Some(session);
                self.store.replace_all(devices).await;
                info!(session = session.0, "🔵 Replaced store content with {} device(s)", num_devices);
            }
            Event::Update { session, patch } => {
                if self.current_session != Some(session) {
                    #[rustfmt::skip]
                    debug!(session = session.0, device_id = patch.id, "🔸 Dropping update outside the active session");
                    return;
                }

                match self.store.apply_patch(&patch).await {
                    PatchOutcome::Applied => {
                        info!(device_id = patch.id, "🟢 Updated device '{}'", patch.id);
                    }
                    PatchOutcome::UnknownDevice => {
                        #[rustfmt::skip]
                        warn!(device_id = patch.id, "⚠️ Received update for unknown device '{}'", patch.id);
                    }
                    PatchOutcome::StaleRevision => {
                        #[rustfmt::skip]
                        warn!(device_id = patch.id, "⚠️ Rejected stale update for device '{}', revision {:?}", patch.id, patch.revision);
                    }
                }
            }
        }
    }
}
