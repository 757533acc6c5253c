use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::factures::{CreateFactureRequest, FactureList, FactureWithPaiement},
    entity::{
        commandes::Entity as Commandes,
        factures::{ActiveModel as FactureActive, Column as FactureCol, Entity as Factures, Model as FactureModel},
        paiements::{Column as PaiementCol, Entity as Paiements},
        produits::{Column as ProduitCol, Entity as Produits},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role, ensure_staff},
    models::{Facture, Paiement},
    notify::{self, NewNotification, NotificationKind, Recipient},
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, StatusListQuery},
    state::AppState,
    workflow::{InvoiceAction, InvoiceStatus, OrderStatus, Role, invoice_transition},
};

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFactureRequest,
) -> AppResult<ApiResponse<Facture>> {
    ensure_staff(user)?;
    if let Some(montant) = payload.montant {
        if !montant.is_finite() || montant < 0.0 {
            return Err(AppError::field("montant", "Le montant doit être un nombre positif"));
        }
    }

    let txn = state.orm.begin().await?;
    let commande = Commandes::find_by_id(payload.commande_id)
        .lock(LockType::Share)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Commande"))?;
    let statut = commande.statut.parse::<OrderStatus>()?;
    if matches!(statut, OrderStatus::EnAttente | OrderStatus::Annulee | OrderStatus::Refusee) {
        return Err(AppError::BadRequest(format!(
            "Impossible de facturer une commande au statut « {statut} »"
        )));
    }

    let montant = match payload.montant {
        Some(montant) => montant,
        None => Produits::find()
            .filter(ProduitCol::CommandeId.eq(commande.id))
            .all(&txn)
            .await?
            .iter()
            .map(|p| p.tarif_unitaire * f64::from(p.quantite))
            .sum::<f64>(),
    };

    let status = if payload.envoyer.unwrap_or(true) {
        InvoiceStatus::EnAttente
    } else {
        InvoiceStatus::NonEnvoyee
    };
    let now = Utc::now();
    let facture = FactureActive {
        id: Set(Uuid::new_v4()),
        numero_facture: NotSet,
        montant: Set(montant),
        date_emission: Set(now.into()),
        date_echeance: Set(payload.date_echeance.map(Into::into)),
        status: Set(status.as_str().to_string()),
        document: Set(None),
        commande_id: Set(commande.id),
        client_id: Set(commande.client_id),
        id_agent: Set((user.role == Role::Agent).then_some(user.user_id)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    if status == InvoiceStatus::EnAttente {
        notify::push(&txn, sent_notification(&facture)).await?;
    }
    txn.commit().await?;

    tracing::info!(
        facture_id = %facture.id,
        numero = facture.numero_facture,
        montant = facture.montant,
        "facture created"
    );
    audit::record(
        state,
        user.user_id,
        "facture_create",
        "factures",
        serde_json::json!({ "facture_id": facture.id, "numero": facture.numero_facture }),
    )
    .await;

    Ok(ApiResponse::ok("Facture créée", Facture::from(facture)))
}

pub async fn send(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Facture>> {
    let facture = run_transition(state, user, id, InvoiceAction::Send).await?;
    Ok(ApiResponse::ok("Facture envoyée", Facture::from(facture)))
}

pub async fn mark_overdue(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Facture>> {
    let facture = run_transition(state, user, id, InvoiceAction::MarkOverdue).await?;
    Ok(ApiResponse::ok("Facture en retard", Facture::from(facture)))
}

async fn run_transition(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    action: InvoiceAction,
) -> AppResult<FactureModel> {
    ensure_staff(user)?;
    let txn = state.orm.begin().await?;
    let facture = Factures::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Facture"))?;
    if user.role == Role::Agent && facture.id_agent != Some(user.user_id) {
        return Err(AppError::Forbidden("Cette facture ne vous est pas attribuée".into()));
    }
    let transition = invoice_transition(facture.status.parse()?, action, user.role)?;

    let mut active: FactureActive = facture.into();
    active.status = Set(transition.to.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let facture = active.update(&txn).await?;

    if transition.notify {
        let notification = match action {
            InvoiceAction::MarkOverdue => NewNotification::new(
                Recipient::Client(facture.client_id),
                NotificationKind::Facture,
                format!(
                    "La facture n°{} de {:.2} € est en retard de paiement.",
                    facture.numero_facture, facture.montant
                ),
            )
            .facture(facture.id)
            .commande(facture.commande_id),
            _ => sent_notification(&facture),
        };
        notify::push(&txn, notification).await?;
    }
    txn.commit().await?;

    tracing::info!(
        facture_id = %facture.id,
        from = transition.from.as_str(),
        to = transition.to.as_str(),
        "facture status changed"
    );
    Ok(facture)
}

fn sent_notification(facture: &FactureModel) -> NewNotification {
    NewNotification::new(
        Recipient::Client(facture.client_id),
        NotificationKind::Facture,
        format!(
            "Une nouvelle facture n°{} d'un montant de {:.2} € est disponible.",
            facture.numero_facture, facture.montant
        ),
    )
    .facture(facture.id)
    .commande(facture.commande_id)
}

pub async fn list_for_client(
    state: &AppState,
    user: &AuthUser,
    query: StatusListQuery,
) -> AppResult<ApiResponse<FactureList>> {
    ensure_role(user, &[Role::Client])?;
    // Drafts stay private to the back office.
    let condition = Condition::all()
        .add(FactureCol::ClientId.eq(user.user_id))
        .add(FactureCol::Status.ne(InvoiceStatus::NonEnvoyee.as_str()));
    list_with(state, condition, query).await
}

/// Agents see the invoices they issued, assistants and admins see all.
pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    query: StatusListQuery,
) -> AppResult<ApiResponse<FactureList>> {
    ensure_role(user, &[Role::Assistant, Role::Agent, Role::Admin])?;
    let mut condition = Condition::all();
    if user.role == Role::Agent {
        condition = condition.add(FactureCol::IdAgent.eq(user.user_id));
    }
    list_with(state, condition, query).await
}

async fn list_with(
    state: &AppState,
    mut condition: Condition,
    query: StatusListQuery,
) -> AppResult<ApiResponse<FactureList>> {
    let (page, limit, offset) = query.pagination().normalize();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = status
            .parse::<InvoiceStatus>()
            .map_err(|_| AppError::BadRequest(format!("Statut inconnu : « {status} »")))?;
        condition = condition.add(FactureCol::Status.eq(status.as_str()));
    }

    let mut finder = Factures::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(FactureCol::NumeroFacture),
        SortOrder::Desc => finder.order_by_desc(FactureCol::NumeroFacture),
    };

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Facture::from)
        .collect();

    Ok(ApiResponse::success(
        "Factures",
        FactureList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<FactureWithPaiement>> {
    let facture = Factures::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Facture"))?;

    match user.role {
        Role::Client if facture.client_id != user.user_id => {
            return Err(AppError::Forbidden("Cette facture ne vous appartient pas".into()));
        }
        Role::Client if facture.status == InvoiceStatus::NonEnvoyee.as_str() => {
            return Err(AppError::not_found("Facture"));
        }
        Role::Agent if facture.id_agent != Some(user.user_id) => {
            return Err(AppError::Forbidden("Cette facture ne vous est pas attribuée".into()));
        }
        _ => {}
    }

    let paiement = Paiements::find()
        .filter(PaiementCol::IdFacture.eq(facture.id))
        .one(&state.orm)
        .await?
        .map(Paiement::from);

    Ok(ApiResponse::ok(
        "Facture",
        FactureWithPaiement {
            facture: Facture::from(facture),
            paiement,
        },
    ))
}
