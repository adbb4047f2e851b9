//! Outgoing move publication seam.

use game_core::MoveRecordEntry;
use tracing::info;

use crate::error::PublishError;
use crate::store::SharedMemoryStore;

/// Hands locally constructed move events to the outside world. Success is
/// only ever observed indirectly, through a later store snapshot.
pub trait MovePublisher {
    fn publish(&mut self, entry: MoveRecordEntry) -> Result<(), PublishError>;
}

/// Publishes straight back into a shared store, standing in for a relay
/// round trip in tests and hot-seat play. Re-publishing a known id is a
/// no-op, matching the store's idempotence.
pub struct LoopbackPublisher {
    store: SharedMemoryStore,
}

impl LoopbackPublisher {
    pub fn new(store: SharedMemoryStore) -> Self {
        Self { store }
    }
}

impl MovePublisher for LoopbackPublisher {
    fn publish(&mut self, entry: MoveRecordEntry) -> Result<(), PublishError> {
        self.store.insert_move(entry);
        Ok(())
    }
}

/// Logs the event and drops it. Default for watch-only sessions with no
/// relay connection configured.
pub struct LogPublisher;

impl MovePublisher for LogPublisher {
    fn publish(&mut self, entry: MoveRecordEntry) -> Result<(), PublishError> {
        info!(
            event = %entry.id,
            game = %entry.game_id,
            mv = %entry.content,
            "no relay configured; dropping outgoing move event"
        );
        Ok(())
    }
}
