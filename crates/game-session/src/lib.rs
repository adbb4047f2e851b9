//! Session orchestration over a relay-backed move store: polls snapshots,
//! keeps the resolved head current, and hands outgoing move events to a
//! publisher.

pub mod config;
pub mod error;
pub mod event_log;
pub mod lobby;
pub mod publisher;
pub mod session;
pub mod store;

pub use error::{EventLogError, PublishError, SubmitError};
pub use publisher::{LogPublisher, LoopbackPublisher, MovePublisher};
pub use session::{GameSession, Identity, SessionPhase};
pub use store::{MoveRecordStore, SharedMemoryStore};
