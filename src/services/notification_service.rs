use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    dto::notifications::{NotificationList, NotificationQuery, UnreadCount},
    entity::notifications::{Column as NotificationCol, Entity as Notifications},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Notification,
    notify::Recipient,
    response::{Affected, ApiResponse, Meta},
    state::AppState,
};

fn inbox(user: &AuthUser) -> AppResult<Condition> {
    let recipient = Recipient::for_role(user.role, user.user_id).ok_or_else(AppError::forbidden)?;
    Ok(Condition::all()
        .add(NotificationCol::RecipientKind.eq(recipient.kind()))
        .add(NotificationCol::RecipientId.eq(recipient.id())))
}

pub async fn list(
    state: &AppState,
    user: &AuthUser,
    query: NotificationQuery,
) -> AppResult<ApiResponse<NotificationList>> {
    let mut condition = inbox(user)?;
    if let Some(lu) = query.lu {
        condition = condition.add(NotificationCol::Lu.eq(lu));
    }
    let (page, limit, offset) = query.pagination().normalize();

    let finder = Notifications::find()
        .filter(condition)
        .order_by_desc(NotificationCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Notification::from)
        .collect();

    Ok(ApiResponse::success(
        "Notifications",
        NotificationList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn unread_count(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UnreadCount>> {
    let count = Notifications::find()
        .filter(inbox(user)?.add(NotificationCol::Lu.eq(false)))
        .count(&state.orm)
        .await?;
    Ok(ApiResponse::ok("Notifications non lues", UnreadCount { count }))
}

/// Marking an already read notification succeeds and leaves it read.
pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Notification>> {
    let condition = inbox(user)?.add(NotificationCol::Id.eq(id));
    Notifications::update_many()
        .col_expr(NotificationCol::Lu, Expr::value(true))
        .filter(condition.clone())
        .exec(&state.orm)
        .await?;

    let notification = Notifications::find()
        .filter(condition)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Notification"))?;
    Ok(ApiResponse::ok("Notification lue", Notification::from(notification)))
}

pub async fn mark_all_read(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Affected>> {
    let result = Notifications::update_many()
        .col_expr(NotificationCol::Lu, Expr::value(true))
        .filter(inbox(user)?.add(NotificationCol::Lu.eq(false)))
        .exec(&state.orm)
        .await?;
    tracing::debug!(user_id = %user.user_id, count = result.rows_affected, "notifications marked read");
    Ok(ApiResponse::ok(
        "Notifications lues",
        Affected {
            count: result.rows_affected,
        },
    ))
}
