use crate::models::Match;
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

/// Inserts a match for an already-canonical pair. Returns `None` when another
/// transaction won the race on the pair's unique key.
pub async fn insert_match(
    conn: &mut PgConnection,
    user_low: Uuid,
    user_high: Uuid,
) -> Result<Option<Match>, sqlx::Error> {
    let record = sqlx::query_as::<_, Match>(
        r#"
        INSERT INTO matches (user_low, user_high)
        VALUES ($1, $2)
        ON CONFLICT (user_low, user_high) DO NOTHING
        RETURNING id, user_low, user_high, created_at
        "#,
    )
    .bind(user_low)
    .bind(user_high)
    .fetch_optional(conn)
    .await?;

    Ok(record)
}

pub async fn get_match_by_pair<'e, E: PgExecutor<'e>>(
    executor: E,
    user_low: Uuid,
    user_high: Uuid,
) -> Result<Option<Match>, sqlx::Error> {
    let record = sqlx::query_as::<_, Match>(
        r#"
        SELECT id, user_low, user_high, created_at
        FROM matches
        WHERE user_low = $1 AND user_high = $2
        "#,
    )
    .bind(user_low)
    .bind(user_high)
    .fetch_optional(executor)
    .await?;

    Ok(record)
}

pub async fn get_match_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    match_id: Uuid,
) -> Result<Option<Match>, sqlx::Error> {
    let record = sqlx::query_as::<_, Match>(
        r#"
        SELECT id, user_low, user_high, created_at
        FROM matches
        WHERE id = $1
        "#,
    )
    .bind(match_id)
    .fetch_optional(executor)
    .await?;

    Ok(record)
}

pub async fn list_matches_for_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Match>, sqlx::Error> {
    let records = sqlx::query_as::<_, Match>(
        r#"
        SELECT id, user_low, user_high, created_at
        FROM matches
        WHERE user_low = $1 OR user_high = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    Ok(records)
}
