use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        commandes::{CommandeList, CommandeWithProduits},
        users::{
            AdminStats, AuditLogList, CreateUserRequest, UpdateUserRequest, UserList,
            UserStatusRequest,
        },
    },
    error::AppResult,
    extract::{Json, Path, Query},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Commande, User},
    response::{Affected, ApiResponse},
    routes::params::{AuditListQuery, CommandeListQuery, UserListQuery},
    services::{audit_service, commande_service, user_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/export", get(export_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/status", put(set_user_status))
        .route("/stats", get(stats))
        .route("/audit-logs", get(list_audit_logs))
        .route("/commandes", get(list_commandes))
        .route("/commandes/{id}", get(get_commande))
        .route("/commandes/{id}/archive", post(archive_commande))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("role" = Option<String>, Query, description = "client, agent, assistant or admin"),
        ("q" = Option<String>, Query, description = "Search in names and email"),
        ("actif" = Option<bool>, Query, description = "Filter on the active flag"),
    ),
    responses(
        (status = 200, description = "Accounts", body = ApiResponse<UserList>),
        (status = 403, description = "Admin only")
    ),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<User>),
        (status = 400, description = "Invalid fields or email already used")
    ),
    tag = "Admin"
)]
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = user_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/export",
    params(
        ("role" = Option<String>, Query, description = "client, agent, assistant or admin"),
        ("q" = Option<String>, Query, description = "Search in names and email"),
        ("actif" = Option<bool>, Query, description = "Filter on the active flag"),
    ),
    responses(
        (status = 200, description = "CSV export of accounts", content_type = "text/csv")
    ),
    tag = "Admin"
)]
pub async fn export_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<impl IntoResponse> {
    let body = user_service::export_csv(&state, &user, query).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"utilisateurs.csv\"",
            ),
        ],
        body,
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = ApiResponse<User>),
        (status = 404, description = "Unknown account")
    ),
    tag = "Admin"
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::get(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Account id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse<User>),
        (status = 400, description = "Would demote the last admin")
    ),
    tag = "Admin"
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::update(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/status",
    params(("id" = Uuid, Path, description = "Account id")),
    request_body = UserStatusRequest,
    responses(
        (status = 200, description = "Account enabled or disabled", body = ApiResponse<User>),
        (status = 400, description = "Would disable the last admin")
    ),
    tag = "Admin"
)]
pub async fn set_user_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserStatusRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::set_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account deleted", body = ApiResponse<Affected>),
        (status = 400, description = "Own account, last admin, or still referenced")
    ),
    tag = "Admin"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    let resp = user_service::delete(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = ApiResponse<AdminStats>)
    ),
    tag = "Admin"
)]
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminStats>>> {
    let resp = user_service::stats(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("action" = Option<String>, Query, description = "Exact action name, e.g. commande_status"),
        ("user_id" = Option<Uuid>, Query, description = "Only entries written by this account"),
    ),
    responses(
        (status = 200, description = "Audit trail, newest first", body = ApiResponse<AuditLogList>)
    ),
    tag = "Admin"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AuditListQuery>,
) -> AppResult<Json<ApiResponse<AuditLogList>>> {
    let resp = audit_service::list(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/commandes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("statut" = Option<String>, Query, description = "Filter by status label"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<CommandeList>)
    ),
    tag = "Admin"
)]
pub async fn list_commandes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CommandeListQuery>,
) -> AppResult<Json<ApiResponse<CommandeList>>> {
    ensure_admin(&user)?;
    let resp = commande_service::list_all(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/commandes/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail", body = ApiResponse<CommandeWithProduits>)
    ),
    tag = "Admin"
)]
pub async fn get_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CommandeWithProduits>>> {
    ensure_admin(&user)?;
    let resp = commande_service::get_any(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/commandes/{id}/archive",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order archived", body = ApiResponse<Commande>),
        (status = 400, description = "Order is not finished")
    ),
    tag = "Admin"
)]
pub async fn archive_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    ensure_admin(&user)?;
    let resp = commande_service::archive(&state, &user, id).await?;
    Ok(Json(resp))
}
