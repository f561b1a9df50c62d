use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table (directory only; credentials live with the
    // external identity provider)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL CHECK (role IN ('ADMIN', 'BRIGADE_LEAD', 'STUDENT')),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create brigades table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS brigades (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL UNIQUE,
            leader_id UUID NULL REFERENCES users(id),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create students table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            temp_roll_number VARCHAR(64) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NULL,
            phone VARCHAR(32) NULL,
            brigade_id UUID NULL REFERENCES brigades(id),
            user_id UUID NULL REFERENCES users(id),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create events table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create event_days table; each day carries its two session windows
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS event_days (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            event_id UUID NOT NULL REFERENCES events(id),
            date DATE NOT NULL,
            fn_enabled BOOLEAN NOT NULL DEFAULT TRUE,
            an_enabled BOOLEAN NOT NULL DEFAULT TRUE,
            fn_start_time TIME NOT NULL DEFAULT '09:00',
            fn_end_time TIME NOT NULL DEFAULT '09:30',
            an_start_time TIME NOT NULL DEFAULT '14:00',
            an_end_time TIME NOT NULL DEFAULT '14:30',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create attendance_records table; the uniqueness constraint on
    // (student_id, event_day_id, session) is what makes marking an upsert
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance_records (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES students(id),
            event_day_id UUID NOT NULL REFERENCES event_days(id),
            session VARCHAR(2) NOT NULL CHECK (session IN ('FN', 'AN')),
            status VARCHAR(16) NOT NULL DEFAULT 'PRESENT'
                CHECK (status IN ('PRESENT', 'ABSENT', 'LATE')),
            marked_by UUID NULL REFERENCES users(id),
            marked_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT attendance_records_student_day_session_key
                UNIQUE (student_id, event_day_id, session)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_students_brigade_id ON students(brigade_id);
        CREATE INDEX IF NOT EXISTS idx_students_user_id ON students(user_id);
        CREATE INDEX IF NOT EXISTS idx_brigades_leader_id ON brigades(leader_id);
        CREATE INDEX IF NOT EXISTS idx_event_days_event_id ON event_days(event_id);
        CREATE INDEX IF NOT EXISTS idx_event_days_date ON event_days(date);
        CREATE INDEX IF NOT EXISTS idx_attendance_records_event_day_id ON attendance_records(event_day_id);
        CREATE INDEX IF NOT EXISTS idx_attendance_records_student_id ON attendance_records(student_id);
        CREATE INDEX IF NOT EXISTS idx_attendance_records_created_at ON attendance_records(created_at);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
