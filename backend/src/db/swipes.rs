use crate::models::{canonical_pair, Decision, SwipeDecision};
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

/// Takes a transaction-scoped advisory lock on the unordered pair. Both
/// directions of a pair hash to the same key, so the reciprocal read that
/// follows always sees a committed decision from the other side.
pub async fn lock_pair(conn: &mut PgConnection, user_a: Uuid, user_b: Uuid) -> Result<(), sqlx::Error> {
    let (low, high) = canonical_pair(user_a, user_b);

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(format!("{low}:{high}"))
        .execute(conn)
        .await?;

    Ok(())
}

/// Inserts the decision unless one exists for the ordered pair. Returns `None`
/// on conflict; the existing row is never overwritten.
pub async fn insert_swipe(
    conn: &mut PgConnection,
    actor_id: Uuid,
    target_id: Uuid,
    decision: Decision,
) -> Result<Option<SwipeDecision>, sqlx::Error> {
    let swipe = sqlx::query_as::<_, SwipeDecision>(
        r#"
        INSERT INTO swipes (actor_id, target_id, decision)
        VALUES ($1, $2, $3)
        ON CONFLICT (actor_id, target_id) DO NOTHING
        RETURNING actor_id, target_id, decision, created_at
        "#,
    )
    .bind(actor_id)
    .bind(target_id)
    .bind(decision.as_str())
    .fetch_optional(conn)
    .await?;

    Ok(swipe)
}

pub async fn get_swipe<'e, E: PgExecutor<'e>>(
    executor: E,
    actor_id: Uuid,
    target_id: Uuid,
) -> Result<Option<SwipeDecision>, sqlx::Error> {
    let swipe = sqlx::query_as::<_, SwipeDecision>(
        r#"
        SELECT actor_id, target_id, decision, created_at
        FROM swipes
        WHERE actor_id = $1 AND target_id = $2
        "#,
    )
    .bind(actor_id)
    .bind(target_id)
    .fetch_optional(executor)
    .await?;

    Ok(swipe)
}
