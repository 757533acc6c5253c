use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::paiements::{CreatePaiementRequest, PaiementList, PaiementWithFacture, UpdatePaiementRequest},
    entity::{
        factures::{ActiveModel as FactureActive, Entity as Factures},
        paiements::{ActiveModel as PaiementActive, Column as PaiementCol, Entity as Paiements},
    },
    error::{AppError, AppResult, PAYMENT_EXISTS},
    middleware::auth::{AuthUser, ensure_role},
    models::{Facture, Paiement},
    notify::{self, NewNotification, NotificationKind, Recipient},
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, StatusListQuery},
    state::AppState,
    workflow::{InvoiceAction, InvoiceStatus, PaymentStatus, Role, invoice_transition},
};

/// Client starts paying an invoice. The facture row stays locked until the
/// payment row and the status change commit together.
pub async fn create(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaiementRequest,
) -> AppResult<ApiResponse<PaiementWithFacture>> {
    ensure_role(user, &[Role::Client])?;

    let txn = state.orm.begin().await?;
    let facture = Factures::find_by_id(payload.id_facture)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Facture"))?;
    if facture.client_id != user.user_id {
        return Err(AppError::Forbidden("Cette facture ne vous appartient pas".into()));
    }

    let status = facture.status.parse::<InvoiceStatus>()?;
    if status == InvoiceStatus::Payee {
        return Err(AppError::BadRequest("Cette facture est déjà payée".into()));
    }
    let existing = Paiements::find()
        .filter(PaiementCol::IdFacture.eq(facture.id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest(PAYMENT_EXISTS.into()));
    }
    let transition = invoice_transition(status, InvoiceAction::StartPayment, user.role)?;

    let now = Utc::now();
    let paiement = PaiementActive {
        id: Set(Uuid::new_v4()),
        id_facture: Set(facture.id),
        client_id: Set(user.user_id),
        montant: Set(facture.montant),
        methode: Set(payload.methode.filter(|m| !m.trim().is_empty())),
        statut: Set(PaymentStatus::EnAttente.as_str().to_string()),
        date_paiement: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let agent_id = facture.id_agent;
    let mut active: FactureActive = facture.into();
    active.status = Set(transition.to.as_str().to_string());
    active.updated_at = Set(now.into());
    let facture = active.update(&txn).await?;

    notify::push(
        &txn,
        NewNotification::new(
            Recipient::Client(user.user_id),
            NotificationKind::Paiement,
            format!(
                "Votre paiement de {:.2} € pour la facture n°{} est en cours de traitement.",
                paiement.montant, facture.numero_facture
            ),
        )
        .facture(facture.id),
    )
    .await?;
    if let Some(agent_id) = agent_id {
        notify::push(
            &txn,
            NewNotification::new(
                Recipient::Agent(agent_id),
                NotificationKind::Paiement,
                format!(
                    "Un paiement a été initié pour la facture n°{}.",
                    facture.numero_facture
                ),
            )
            .facture(facture.id),
        )
        .await?;
    }

    txn.commit().await?;
    tracing::info!(paiement_id = %paiement.id, facture_id = %facture.id, "paiement created");

    Ok(ApiResponse::ok(
        "Paiement enregistré",
        PaiementWithFacture {
            paiement: Paiement::from(paiement),
            facture: Facture::from(facture),
        },
    ))
}

/// Assistant confirms or refuses a pending payment; the invoice follows.
pub async fn decide(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePaiementRequest,
) -> AppResult<ApiResponse<PaiementWithFacture>> {
    ensure_role(user, &[Role::Assistant])?;
    let action = match payload.statut {
        PaymentStatus::Paye => InvoiceAction::ConfirmPayment,
        PaymentStatus::Refuse => InvoiceAction::RefusePayment,
        PaymentStatus::EnAttente => {
            return Err(AppError::field("statut", "Le statut doit être « Payé » ou « Refusé »"));
        }
    };

    let txn = state.orm.begin().await?;
    let paiement = Paiements::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Paiement"))?;
    if paiement.statut.parse::<PaymentStatus>()? != PaymentStatus::EnAttente {
        return Err(AppError::BadRequest("Ce paiement a déjà été traité".into()));
    }
    let facture = Factures::find_by_id(paiement.id_facture)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Facture"))?;
    let transition = invoice_transition(facture.status.parse()?, action, user.role)?;

    let now = Utc::now();
    let mut active: PaiementActive = paiement.into();
    active.statut = Set(payload.statut.as_str().to_string());
    if payload.statut == PaymentStatus::Paye {
        active.date_paiement = Set(Some(now.into()));
    }
    active.updated_at = Set(now.into());
    let paiement = active.update(&txn).await?;

    let mut active: FactureActive = facture.into();
    active.status = Set(transition.to.as_str().to_string());
    active.updated_at = Set(now.into());
    let facture = active.update(&txn).await?;

    let message = match payload.statut {
        PaymentStatus::Paye => format!(
            "Votre paiement pour la facture n°{} a été confirmé.",
            facture.numero_facture
        ),
        _ => format!(
            "Votre paiement pour la facture n°{} a été refusé. La facture reste à régler.",
            facture.numero_facture
        ),
    };
    notify::push(
        &txn,
        NewNotification::new(
            Recipient::Client(facture.client_id),
            NotificationKind::Paiement,
            message,
        )
        .facture(facture.id),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(
        paiement_id = %paiement.id,
        statut = paiement.statut.as_str(),
        facture_status = facture.status.as_str(),
        "paiement processed"
    );
    audit::record(
        state,
        user.user_id,
        "paiement_decision",
        "paiements",
        serde_json::json!({ "paiement_id": paiement.id, "statut": paiement.statut }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Paiement traité",
        PaiementWithFacture {
            paiement: Paiement::from(paiement),
            facture: Facture::from(facture),
        },
    ))
}

pub async fn list_for_client(
    state: &AppState,
    user: &AuthUser,
    query: StatusListQuery,
) -> AppResult<ApiResponse<PaiementList>> {
    ensure_role(user, &[Role::Client])?;
    let condition = Condition::all().add(PaiementCol::ClientId.eq(user.user_id));
    list_with(state, condition, query).await
}

pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    query: StatusListQuery,
) -> AppResult<ApiResponse<PaiementList>> {
    ensure_role(user, &[Role::Assistant, Role::Admin])?;
    list_with(state, Condition::all(), query).await
}

async fn list_with(
    state: &AppState,
    mut condition: Condition,
    query: StatusListQuery,
) -> AppResult<ApiResponse<PaiementList>> {
    let (page, limit, offset) = query.pagination().normalize();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = status
            .parse::<PaymentStatus>()
            .map_err(|_| AppError::BadRequest(format!("Statut inconnu : « {status} »")))?;
        condition = condition.add(PaiementCol::Statut.eq(status.as_str()));
    }

    let mut finder = Paiements::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(PaiementCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(PaiementCol::CreatedAt),
    };
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Paiement::from)
        .collect();

    Ok(ApiResponse::success(
        "Paiements",
        PaiementList { items },
        Some(Meta::new(page, limit, total)),
    ))
}
