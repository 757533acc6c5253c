use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    dto::users::AuditLogList,
    entity::audit_logs::{Column as AuditCol, Entity as AuditLogs},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::AuditLog,
    response::{ApiResponse, Meta},
    routes::params::AuditListQuery,
    state::AppState,
};

/// Newest audit entries first, optionally narrowed to one action or one actor.
pub async fn list(
    state: &AppState,
    user: &AuthUser,
    query: AuditListQuery,
) -> AppResult<ApiResponse<AuditLogList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(action) = query.action.as_deref().filter(|a| !a.is_empty()) {
        condition = condition.add(AuditCol::Action.eq(action));
    }
    if let Some(user_id) = query.user_id {
        condition = condition.add(AuditCol::UserId.eq(user_id));
    }

    let finder = AuditLogs::find()
        .filter(condition)
        .order_by_desc(AuditCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(AuditLog::from)
        .collect();

    Ok(ApiResponse::success(
        "Journal d'audit",
        AuditLogList { items },
        Some(Meta::new(page, limit, total)),
    ))
}
