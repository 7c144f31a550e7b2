use crate::models::Profile;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn upsert_profile<'e, E: PgExecutor<'e>>(executor: E, user_id: Uuid) -> Result<Profile, sqlx::Error> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id)
        VALUES ($1)
        ON CONFLICT (id) DO UPDATE SET last_seen_at = NOW()
        RETURNING id, created_at, last_seen_at
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(profile)
}

pub async fn profile_exists<'e, E: PgExecutor<'e>>(executor: E, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)"
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}
