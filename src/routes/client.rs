use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        commandes::{CommandeList, CommandeRequest, CommandeWithProduits},
        factures::{FactureList, FactureWithPaiement},
        paiements::{
            CreatePaiementRequest, PaiementList, PaiementWithFacture, PaymentMethodList,
            PaymentMethodRequest,
        },
        reclamations::{ReclamationList, ReclamationRequest},
    },
    error::AppResult,
    extract::{Json, Path, Query},
    middleware::auth::{AuthUser, ensure_role},
    models::{Commande, PaymentMethod, Reclamation},
    response::{Affected, ApiResponse},
    routes::params::{CommandeListQuery, StatusListQuery},
    services::{
        commande_service, facture_service, paiement_service, payment_method_service,
        reclamation_service,
    },
    state::AppState,
    workflow::Role,
};

/// Guard for handlers whose service is shared with the back office.
const ROLES: &[Role] = &[Role::Client];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commandes", get(list_commandes).post(create_commande))
        .route("/commandes/{id}", get(get_commande).put(update_commande))
        .route("/commandes/{id}/cancel", post(cancel_commande))
        .route("/factures", get(list_factures))
        .route("/factures/{id}", get(get_facture))
        .route("/paiements", get(list_paiements).post(create_paiement))
        .route(
            "/payment-methods",
            get(list_payment_methods).post(create_payment_method),
        )
        .route("/payment-methods/{id}", delete(delete_payment_method))
        .route("/reclamations", get(list_reclamations).post(create_reclamation))
        .route(
            "/reclamations/{id}",
            get(get_reclamation).put(update_reclamation),
        )
        .route("/reclamations/{id}/close", post(close_reclamation))
}

#[utoipa::path(
    get,
    path = "/api/client/commandes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("statut" = Option<String>, Query, description = "Filter by status label"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "Own orders", body = ApiResponse<CommandeList>)
    ),
    tag = "Client"
)]
pub async fn list_commandes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CommandeListQuery>,
) -> AppResult<Json<ApiResponse<CommandeList>>> {
    let resp = commande_service::list_for_client(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/client/commandes",
    request_body = CommandeRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<CommandeWithProduits>),
        (status = 400, description = "Invalid order")
    ),
    tag = "Client"
)]
pub async fn create_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CommandeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CommandeWithProduits>>)> {
    let resp = commande_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/client/commandes/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with its products", body = ApiResponse<CommandeWithProduits>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown order")
    ),
    tag = "Client"
)]
pub async fn get_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CommandeWithProduits>>> {
    let resp = commande_service::get_for_client(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/client/commandes/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = CommandeRequest,
    responses(
        (status = 200, description = "Order replaced", body = ApiResponse<CommandeWithProduits>),
        (status = 400, description = "Order no longer pending or invalid")
    ),
    tag = "Client"
)]
pub async fn update_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommandeRequest>,
) -> AppResult<Json<ApiResponse<CommandeWithProduits>>> {
    let resp = commande_service::update_by_client(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/client/commandes/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<Commande>),
        (status = 400, description = "Order no longer pending")
    ),
    tag = "Client"
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
    get,
    path = "/api/client/factures",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
    ),
    responses(
        (status = 200, description = "Own invoices", body = ApiResponse<FactureList>)
    ),
    tag = "Client"
)]
pub async fn list_factures(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatusListQuery>,
) -> AppResult<Json<ApiResponse<FactureList>>> {
    let resp = facture_service::list_for_client(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/client/factures/{id}",
    params(("id" = Uuid, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice with its payment", body = ApiResponse<FactureWithPaiement>)
    ),
    tag = "Client"
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
    get,
    path = "/api/client/paiements",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
    ),
    responses(
        (status = 200, description = "Own payments", body = ApiResponse<PaiementList>)
    ),
    tag = "Client"
)]
pub async fn list_paiements(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatusListQuery>,
) -> AppResult<Json<ApiResponse<PaiementList>>> {
    let resp = paiement_service::list_for_client(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/client/paiements",
    request_body = CreatePaiementRequest,
    responses(
        (status = 201, description = "Payment started", body = ApiResponse<PaiementWithFacture>),
        (status = 400, description = "Invoice already paid or already has a payment"),
        (status = 403, description = "Not the invoice owner")
    ),
    tag = "Client"
)]
pub async fn create_paiement(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaiementRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PaiementWithFacture>>)> {
    let resp = paiement_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/client/payment-methods",
    responses(
        (status = 200, description = "Saved payment methods", body = ApiResponse<PaymentMethodList>)
    ),
    tag = "Client"
)]
pub async fn list_payment_methods(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentMethodList>>> {
    let resp = payment_method_service::list(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/client/payment-methods",
    request_body = PaymentMethodRequest,
    responses(
        (status = 201, description = "Payment method saved", body = ApiResponse<PaymentMethod>)
    ),
    tag = "Client"
)]
pub async fn create_payment_method(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PaymentMethodRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PaymentMethod>>)> {
    let resp = payment_method_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/client/payment-methods/{id}",
    params(("id" = Uuid, Path, description = "Payment method id")),
    responses(
        (status = 200, description = "Payment method removed", body = ApiResponse<Affected>),
        (status = 404, description = "Unknown payment method")
    ),
    tag = "Client"
)]
pub async fn delete_payment_method(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    let resp = payment_method_service::delete(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/client/reclamations",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status label"),
    ),
    responses(
        (status = 200, description = "Own support tickets", body = ApiResponse<ReclamationList>)
    ),
    tag = "Client"
)]
pub async fn list_reclamations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StatusListQuery>,
) -> AppResult<Json<ApiResponse<ReclamationList>>> {
    let resp = reclamation_service::list_for_client(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/client/reclamations",
    request_body = ReclamationRequest,
    responses(
        (status = 201, description = "Ticket opened", body = ApiResponse<Reclamation>)
    ),
    tag = "Client"
)]
pub async fn create_reclamation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ReclamationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Reclamation>>)> {
    let resp = reclamation_service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/client/reclamations/{id}",
    params(("id" = Uuid, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket", body = ApiResponse<Reclamation>)
    ),
    tag = "Client"
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
    put,
    path = "/api/client/reclamations/{id}",
    params(("id" = Uuid, Path, description = "Ticket id")),
    request_body = ReclamationRequest,
    responses(
        (status = 200, description = "Ticket updated", body = ApiResponse<Reclamation>),
        (status = 400, description = "Ticket no longer open")
    ),
    tag = "Client"
)]
pub async fn update_reclamation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReclamationRequest>,
) -> AppResult<Json<ApiResponse<Reclamation>>> {
    let resp = reclamation_service::update_by_client(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/client/reclamations/{id}/close",
    params(("id" = Uuid, Path, description = "Ticket id")),
    responses(
        (status = 200, description = "Ticket closed", body = ApiResponse<Reclamation>)
    ),
    tag = "Client"
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
