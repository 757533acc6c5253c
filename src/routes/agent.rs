use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        commandes::{
            AdresseRequest, CommandeList, CommandeWithProduits, RejectRequest, UpdateStatutRequest,
        },
        factures::{CreateFactureRequest, FactureList, FactureWithPaiement},
    },
    error::AppResult,
    extract::{Json, Path, Query, json_or_default},
    middleware::auth::{AuthUser, ensure_role},
    models::{Commande, Facture},
    response::ApiResponse,
    routes::params::{CommandeListQuery, StatusListQuery},
    services::{commande_service, facture_service},
    state::AppState,
    workflow::Role,
};

const ROLES: &[Role] = &[Role::Agent];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commandes", get(list_commandes))
        .route("/commandes/{id}", get(get_commande))
        .route("/commandes/{id}/accept", post(accept_commande))
        .route("/commandes/{id}/reject", post(reject_commande))
        .route("/commandes/{id}/cancel", post(cancel_commande))
        .route("/commandes/{id}/status", put(update_statut))
        .route("/commandes/{id}/adresse", put(update_adresse))
        .route("/factures", get(list_factures).post(create_facture))
        .route("/factures/{id}", get(get_facture))
        .route("/factures/{id}/send", put(send_facture))
        .route("/factures/{id}/overdue", put(overdue_facture))
}

#[utoipa::path(
    get,
    path = "/api/agent/commandes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("statut" = Option<String>, Query, description = "Filter by status label"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
        ("mine" = Option<bool>, Query, description = "Only orders assigned to the caller"),
    ),
    responses(
        (status = 200, description = "Orders", body = ApiResponse<CommandeList>)
    ),
    tag = "Agent"
)]
pub async fn list_commandes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CommandeListQuery>,
) -> AppResult<Json<ApiResponse<CommandeList>>> {
    ensure_role(&user, ROLES)?;
    let resp = commande_service::list_all(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/agent/commandes/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail", body = ApiResponse<CommandeWithProduits>)
    ),
    tag = "Agent"
)]
pub async fn get_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CommandeWithProduits>>> {
    ensure_role(&user, ROLES)?;
    let resp = commande_service::get_any(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/agent/commandes/{id}/accept",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order accepted and assigned to the caller", body = ApiResponse<Commande>),
        (status = 400, description = "Order is not pending")
    ),
    tag = "Agent"
)]
pub async fn accept_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    ensure_role(&user, ROLES)?;
    let resp = commande_service::accept(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/agent/commandes/{id}/reject",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Order rejected", body = ApiResponse<Commande>),
        (status = 400, description = "Missing reason or order is not pending")
    ),
    tag = "Agent"
)]
pub async fn reject_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<Commande>>> {
    ensure_role(&user, ROLES)?;
    let payload: RejectRequest = json_or_default(&body)?;
    let resp = commande_service::reject(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/agent/commandes/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<Commande>),
        (status = 400, description = "Only accepted or in-progress orders can be cancelled here")
    ),
    tag = "Agent"
)]
pub async fn cancel_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    ensure_role(&user, ROLES)?;
    let resp = commande_service::cancel(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/agent/commandes/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateStatutRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Commande>),
        (status = 400, description = "Transition not allowed")
    ),
    tag = "Agent"
)]
pub async fn update_statut(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatutRequest>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    ensure_role(&user, ROLES)?;
    let resp = commande_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/agent/commandes/{id}/adresse",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = AdresseRequest,
    responses(
        (status = 200, description = "Current address updated", body = ApiResponse<Commande>)
    ),
    tag = "Agent"
)]
pub async fn update_adresse(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdresseRequest>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    ensure_role(&user, ROLES)?;
    let resp = commande_service::update_address(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/agent/factures",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
    ),
    responses(
        (status = 200, description = "Invoices issued by the caller", body = ApiResponse<FactureList>)
    ),
    tag = "Agent"
)]
pub async fn list_factures(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatusListQuery>,
) -> AppResult<Json<ApiResponse<FactureList>>> {
    ensure_role(&user, ROLES)?;
    let resp = facture_service::list_all(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/agent/factures",
    request_body = CreateFactureRequest,
    responses(
        (status = 201, description = "Invoice created", body = ApiResponse<Facture>),
        (status = 400, description = "Order cannot be invoiced")
    ),
    tag = "Agent"
)]
pub async fn create_facture(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateFactureRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Facture>>)> {
    ensure_role(&user, ROLES)?;
    let resp = facture_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/agent/factures/{id}",
    params(("id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice with its payment", body = ApiResponse<FactureWithPaiement>),
        (status = 403, description = "Invoice issued by someone else")
    ),
    tag = "Agent"
)]
pub async fn get_facture(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FactureWithPaiement>>> {
    ensure_role(&user, ROLES)?;
    let resp = facture_service::get(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/agent/factures/{id}/send",
    params(("id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice sent", body = ApiResponse<Facture>)
    ),
    tag = "Agent"
)]
pub async fn send_facture(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Facture>>> {
    ensure_role(&user, ROLES)?;
    let resp = facture_service::send(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/agent/factures/{id}/overdue",
    params(("id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice marked overdue", body = ApiResponse<Facture>)
    ),
    tag = "Agent"
)]
pub async fn overdue_facture(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Facture>>> {
    ensure_role(&user, ROLES)?;
    let resp = facture_service::mark_overdue(&state, &user, id).await?;
    Ok(Json(resp))
}
