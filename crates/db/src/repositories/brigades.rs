use crate::models::{BrigadeComparisonRow, DbBrigade, LeadBrigadeRow};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn brigades_led_by(pool: &Pool<Postgres>, leader_id: Uuid) -> Result<Vec<DbBrigade>> {
    let brigades = sqlx::query_as::<_, DbBrigade>(
        r#"
        SELECT id, name, leader_id, is_active, created_at, updated_at
        FROM brigades
        WHERE leader_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(leader_id)
    .fetch_all(pool)
    .await?;

    Ok(brigades)
}

pub async fn count_active(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM brigades WHERE is_active = TRUE
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Brigades led by the given user together with their active student counts,
/// for the brigade-lead dashboard.
pub async fn lead_brigades_with_counts(
    pool: &Pool<Postgres>,
    leader_id: Uuid,
) -> Result<Vec<LeadBrigadeRow>> {
    let rows = sqlx::query_as::<_, LeadBrigadeRow>(
        r#"
        SELECT b.id, b.name, COUNT(s.id) AS student_count
        FROM brigades b
        LEFT JOIN students s ON s.brigade_id = b.id AND s.is_active = TRUE
        WHERE b.leader_id = $1
        GROUP BY b.id, b.name
        ORDER BY b.name ASC
        "#,
    )
    .bind(leader_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// One aggregated row per active brigade: active student count plus total
/// and present attendance records across those students.
pub async fn comparison_rows(pool: &Pool<Postgres>) -> Result<Vec<BrigadeComparisonRow>> {
    let rows = sqlx::query_as::<_, BrigadeComparisonRow>(
        r#"
        SELECT b.id, b.name,
               COUNT(DISTINCT s.id) AS total_students,
               COUNT(ar.id) AS total_records,
               COUNT(ar.id) FILTER (WHERE ar.status = 'PRESENT') AS present_records
        FROM brigades b
        LEFT JOIN students s ON s.brigade_id = b.id AND s.is_active = TRUE
        LEFT JOIN attendance_records ar ON ar.student_id = s.id
        WHERE b.is_active = TRUE
        GROUP BY b.id, b.name
        ORDER BY b.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
