use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    AttendanceRecordDetail, DbAttendanceRecord, DbBrigade, DbEvent, DbEventDay, StudentWithBrigade,
};
use crate::repositories::ScopeFilter;

// Mock repositories for testing
mock! {
    pub StudentRepo {
        pub async fn get_with_brigade(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<StudentWithBrigade>>;

        pub async fn active_by_ids(
            &self,
            ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<StudentWithBrigade>>;

        pub async fn by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<StudentWithBrigade>>;
    }
}

mock! {
    pub EventRepo {
        pub async fn get_event_day(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbEventDay>>;

        pub async fn current_event_day(
            &self,
            today: chrono::NaiveDate,
        ) -> eyre::Result<Option<(DbEvent, DbEventDay)>>;
    }
}

mock! {
    pub BrigadeRepo {
        pub async fn brigades_led_by(
            &self,
            leader_id: Uuid,
        ) -> eyre::Result<Vec<DbBrigade>>;
    }
}

mock! {
    pub AttendanceRepo {
        pub async fn upsert_record(
            &self,
            student_id: Uuid,
            event_day_id: Uuid,
            session: &'static str,
            status: &'static str,
            marked_by: Uuid,
        ) -> eyre::Result<DbAttendanceRecord>;

        pub async fn bulk_upsert_records(
            &self,
            student_ids: Vec<Uuid>,
            event_day_id: Uuid,
            session: &'static str,
            status: &'static str,
            marked_by: Uuid,
        ) -> eyre::Result<Vec<DbAttendanceRecord>>;

        pub async fn get_record_detail(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<AttendanceRecordDetail>>;

        pub async fn day_records(
            &self,
            scope: ScopeFilter,
            event_day_id: Uuid,
            session: Option<&'static str>,
        ) -> eyre::Result<Vec<AttendanceRecordDetail>>;

        pub async fn count_by_status(
            &self,
            scope: ScopeFilter,
            status: Option<&'static str>,
            created_from: Option<DateTime<Utc>>,
            created_to: Option<DateTime<Utc>>,
        ) -> eyre::Result<i64>;
    }
}
