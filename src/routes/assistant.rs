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
            AdresseRequest, AssignAgentRequest, CommandeList, CommandeWithProduits, RejectRequest,
            UpdateStatutRequest,
        },
        factures::{CreateFactureRequest, FactureList, FactureWithPaiement},
        paiements::{PaiementList, PaiementWithFacture, UpdatePaiementRequest},
        reclamations::{ReclamationList, RespondRequest},
    },
    error::AppResult,
    extract::{Json, Path, Query, json_or_default},
    middleware::auth::{AuthUser, ensure_role},
    models::{Commande, Facture, Reclamation},
    response::ApiResponse,
    routes::params::{CommandeListQuery, StatusListQuery},
    services::{commande_service, facture_service, paiement_service, reclamation_service},
    state::AppState,
    workflow::Role,
};

const ROLES: &[Role] = &[Role::Assistant];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commandes", get(list_commandes))
        .route("/commandes/{id}", get(get_commande))
        .route("/commandes/{id}/accept", post(accept_commande))
        .route("/commandes/{id}/reject", post(reject_commande))
        .route("/commandes/{id}/cancel", post(cancel_commande))
        .route("/commandes/{id}/status", put(update_statut))
        .route("/commandes/{id}/agent", put(assign_agent))
        .route("/commandes/{id}/adresse", put(update_adresse))
        .route("/commandes/{id}/archive", post(archive_commande))
        .route("/factures", get(list_factures).post(create_facture))
        .route("/factures/{id}", get(get_facture))
        .route("/factures/{id}/send", put(send_facture))
        .route("/factures/{id}/overdue", put(overdue_facture))
        .route("/paiements", get(list_paiements))
        .route("/paiements/{id}", put(decide_paiement))
        .route("/reclamations", get(list_reclamations))
        .route("/reclamations/{id}", get(get_reclamation))
        .route("/reclamations/{id}/take", post(take_reclamation))
        .route("/reclamations/{id}/respond", post(respond_reclamation))
        .route("/reclamations/{id}/close", post(close_reclamation))
}

#[utoipa::path(
    get,
    path = "/api/assistant/commandes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("statut" = Option<String>, Query, description = "Filter by status label"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<CommandeList>)
    ),
    tag = "Assistant"
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
    path = "/api/assistant/commandes/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail", body = ApiResponse<CommandeWithProduits>)
    ),
    tag = "Assistant"
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
    path = "/api/assistant/commandes/{id}/accept",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order accepted", body = ApiResponse<Commande>),
        (status = 400, description = "Order is not pending")
    ),
    tag = "Assistant"
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
    path = "/api/assistant/commandes/{id}/reject",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Order rejected", body = ApiResponse<Commande>),
        (status = 400, description = "Missing reason or order is not pending")
    ),
    tag = "Assistant"
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
    path = "/api/assistant/commandes/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<Commande>),
        (status = 400, description = "Only accepted or in-progress orders can be cancelled here")
    ),
    tag = "Assistant"
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
    path = "/api/assistant/commandes/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateStatutRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Commande>),
        (status = 400, description = "Transition not allowed")
    ),
    tag = "Assistant"
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
    path = "/api/assistant/commandes/{id}/agent",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = AssignAgentRequest,
    responses(
        (status = 200, description = "Agent assigned", body = ApiResponse<Commande>),
        (status = 400, description = "Unknown or inactive agent")
    ),
    tag = "Assistant"
)]
pub async fn assign_agent(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignAgentRequest>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    let resp = commande_service::assign_agent(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/assistant/commandes/{id}/adresse",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = AdresseRequest,
    responses(
        (status = 200, description = "Current address updated", body = ApiResponse<Commande>)
    ),
    tag = "Assistant"
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
    post,
    path = "/api/assistant/commandes/{id}/archive",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order archived", body = ApiResponse<Commande>),
        (status = 400, description = "Order is not finished")
    ),
    tag = "Assistant"
)]
pub async fn archive_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    ensure_role(&user, ROLES)?;
    let resp = commande_service::archive(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/assistant/factures",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
    ),
    responses(
        (status = 200, description = "All invoices", body = ApiResponse<FactureList>)
    ),
    tag = "Assistant"
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
    path = "/api/assistant/factures",
    request_body = CreateFactureRequest,
    responses(
        (status = 201, description = "Invoice created", body = ApiResponse<Facture>),
        (status = 400, description = "Order cannot be invoiced")
    ),
    tag = "Assistant"
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
    path = "/api/assistant/factures/{id}",
    params(("id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice with its payment", body = ApiResponse<FactureWithPaiement>)
    ),
    tag = "Assistant"
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
    path = "/api/assistant/factures/{id}/send",
    params(("id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice sent", body = ApiResponse<Facture>)
    ),
    tag = "Assistant"
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
    path = "/api/assistant/factures/{id}/overdue",
    params(("id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice marked overdue", body = ApiResponse<Facture>)
    ),
    tag = "Assistant"
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

#[utoipa::path(
    get,
    path = "/api/assistant/paiements",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
    ),
    responses(
        (status = 200, description = "All payments", body = ApiResponse<PaiementList>)
    ),
    tag = "Assistant"
)]
pub async fn list_paiements(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatusListQuery>,
) -> AppResult<Json<ApiResponse<PaiementList>>> {
    ensure_role(&user, ROLES)?;
    let resp = paiement_service::list_all(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/assistant/paiements/{id}",
    params(("id" = Uuid, Path, description = "Payment id")),
    request_body = UpdatePaiementRequest,
    responses(
        (status = 200, description = "Payment confirmed or refused", body = ApiResponse<PaiementWithFacture>),
        (status = 400, description = "Payment already processed")
    ),
    tag = "Assistant"
)]
pub async fn decide_paiement(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaiementRequest>,
) -> AppResult<Json<ApiResponse<PaiementWithFacture>>> {
    let resp = paiement_service::decide(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/assistant/reclamations",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
    ),
    responses(
        (status = 200, description = "All support tickets", body = ApiResponse<ReclamationList>)
    ),
    tag = "Assistant"
)]
pub async fn list_reclamations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatusListQuery>,
) -> AppResult<Json<ApiResponse<ReclamationList>>> {
    ensure_role(&user, ROLES)?;
    let resp = reclamation_service::list_all(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/assistant/reclamations/{id}",
    params(("id" = Uuid, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket", body = ApiResponse<Reclamation>)
    ),
    tag = "Assistant"
)]
pub async fn get_reclamation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reclamation>>> {
    ensure_role(&user, ROLES)?;
    let resp = reclamation_service::get(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/assistant/reclamations/{id}/take",
    params(("id" = Uuid, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket assigned to the caller", body = ApiResponse<Reclamation>)
    ),
    tag = "Assistant"
)]
pub async fn take_reclamation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reclamation>>> {
    let resp = reclamation_service::take_charge(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/assistant/reclamations/{id}/respond",
    params(("id" = Uuid, Path, description = "Ticket id")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Answer recorded", body = ApiResponse<Reclamation>)
    ),
    tag = "Assistant"
)]
pub async fn respond_reclamation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondRequest>,
) -> AppResult<Json<ApiResponse<Reclamation>>> {
    let resp = reclamation_service::respond(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/assistant/reclamations/{id}/close",
    params(("id" = Uuid, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket closed", body = ApiResponse<Reclamation>)
    ),
    tag = "Assistant"
)]
pub async fn close_reclamation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Reclamation>>> {
    ensure_role(&user, ROLES)?;
    let resp = reclamation_service::close(&state, &user, id).await?;
    Ok(Json(resp))
}
