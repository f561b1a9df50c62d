use crate::models::StudentWithBrigade;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const STUDENT_WITH_BRIGADE: &str = r#"
    SELECT s.id, s.temp_roll_number, s.name, s.email, s.phone,
           s.brigade_id, b.name AS brigade_name, s.user_id, s.is_active
    FROM students s
    LEFT JOIN brigades b ON b.id = s.brigade_id
"#;

pub async fn get_with_brigade(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<StudentWithBrigade>> {
    let student = sqlx::query_as::<_, StudentWithBrigade>(&format!(
        "{STUDENT_WITH_BRIGADE} WHERE s.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(student)
}

/// Active students among the given ids. Callers compare the result length
/// against the request to detect unknown or inactive students.
pub async fn active_by_ids(
    pool: &Pool<Postgres>,
    ids: &[Uuid],
) -> Result<Vec<StudentWithBrigade>> {
    let students = sqlx::query_as::<_, StudentWithBrigade>(&format!(
        "{STUDENT_WITH_BRIGADE} WHERE s.id = ANY($1) AND s.is_active = TRUE"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(students)
}

pub async fn by_user_id(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Option<StudentWithBrigade>> {
    let student = sqlx::query_as::<_, StudentWithBrigade>(&format!(
        "{STUDENT_WITH_BRIGADE} WHERE s.user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(student)
}

pub async fn count_active(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM students WHERE is_active = TRUE
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
