use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn count_active_brigade_leads(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users WHERE role = 'BRIGADE_LEAD' AND is_active = TRUE
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
