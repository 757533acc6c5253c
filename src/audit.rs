use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult, state::AppState};

/// One back-office action worth keeping a trace of.
#[derive(Debug)]
pub struct AuditEntry<'a> {
    pub user_id: Uuid,
    pub action: &'a str,
    pub resource: &'a str,
    pub metadata: Value,
}

pub async fn insert_entry(pool: &DbPool, entry: &AuditEntry<'_>) -> AppResult<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(entry.user_id)
    .bind(entry.action)
    .bind(entry.resource)
    .bind(&entry.metadata)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Runs after the main transaction committed; a failed write only warns.
pub async fn record(
    state: &AppState,
    user_id: Uuid,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    let entry = AuditEntry {
        user_id,
        action,
        resource,
        metadata,
    };
    if let Err(err) = insert_entry(&state.pool, &entry).await {
        tracing::warn!(error = %err, action, resource, "audit log failed");
    }
}
