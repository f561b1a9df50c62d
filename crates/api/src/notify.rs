//! # Outbound Notification Port
//!
//! On every successful mark, an event is pushed toward the affected
//! student's live channel. Delivery is fire-and-forget: a send that finds no
//! subscriber (or fails for any other reason) never rolls back or delays the
//! attendance write.

use rollcall_core::models::attendance::{AttendanceStatus, Session};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Payload pushed to a student's channel after a successful mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMarked {
    /// The student's linked login identity; channel key.
    pub user_id: Uuid,
    pub session: Session,
    pub status: AttendanceStatus,
    pub message: String,
}

impl AttendanceMarked {
    pub fn new(user_id: Uuid, session: Session, status: AttendanceStatus) -> Self {
        AttendanceMarked {
            user_id,
            session,
            status,
            message: format!("Attendance marked for {session} session"),
        }
    }
}

/// One-way outbound port for attendance events.
pub trait Notifier: Send + Sync {
    /// Best-effort send; implementations must not block or fail the caller.
    fn attendance_marked(&self, event: AttendanceMarked);
}

/// Broadcast-channel notifier. Delivery consumers (the live-channel bridge)
/// subscribe via [`BroadcastNotifier::subscribe`] and filter by `user_id`.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<AttendanceMarked>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        BroadcastNotifier { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AttendanceMarked> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        BroadcastNotifier::new(256)
    }
}

impl Notifier for BroadcastNotifier {
    fn attendance_marked(&self, event: AttendanceMarked) {
        // A send with no active subscribers returns an error; that is fine
        if self.tx.send(event).is_err() {
            tracing::debug!("attendance-marked event dropped: no subscribers");
        }
    }
}

/// Notifier that discards every event; used in tests.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn attendance_marked(&self, _event: AttendanceMarked) {}
}
