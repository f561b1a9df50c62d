use pretty_assertions::assert_eq;
use uuid::Uuid;

use rollcall_api::notify::{AttendanceMarked, BroadcastNotifier, Notifier};
use rollcall_core::models::attendance::{AttendanceStatus, Session};

#[tokio::test]
async fn test_subscriber_receives_marked_event() {
    let notifier = BroadcastNotifier::default();
    let mut rx = notifier.subscribe();

    let user_id = Uuid::new_v4();
    notifier.attendance_marked(AttendanceMarked::new(
        user_id,
        Session::Forenoon,
        AttendanceStatus::Present,
    ));

    let event = rx.recv().await.expect("event delivered");
    assert_eq!(event.user_id, user_id);
    assert_eq!(event.session, Session::Forenoon);
    assert_eq!(event.status, AttendanceStatus::Present);
    assert_eq!(event.message, "Attendance marked for FN session");
}

#[test]
fn test_send_without_subscribers_is_silently_dropped() {
    let notifier = BroadcastNotifier::default();

    // Fire-and-forget: no receiver exists, nothing panics, nothing blocks
    notifier.attendance_marked(AttendanceMarked::new(
        Uuid::new_v4(),
        Session::Afternoon,
        AttendanceStatus::Late,
    ));
}
