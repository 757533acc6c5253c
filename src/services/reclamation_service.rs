use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::reclamations::{ReclamationList, ReclamationRequest, RespondRequest},
    entity::{
        commandes::Entity as Commandes,
        reclamations::{
            ActiveModel as ReclamationActive, Column as ReclamationCol, Entity as Reclamations,
            Model as ReclamationModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role},
    models::Reclamation,
    notify::{self, NewNotification, NotificationKind, Recipient},
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, StatusListQuery},
    services::commande_service::default_assistant,
    state::AppState,
    workflow::{ReclamationAction, ReclamationStatus, Role, Transition, reclamation_transition},
};

pub async fn list_for_client(
    state: &AppState,
    user: &AuthUser,
    query: StatusListQuery,
) -> AppResult<ApiResponse<ReclamationList>> {
    ensure_role(user, &[Role::Client])?;
    let condition = Condition::all().add(ReclamationCol::ClientId.eq(user.user_id));
    list_with(state, condition, query).await
}

pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    query: StatusListQuery,
) -> AppResult<ApiResponse<ReclamationList>> {
    ensure_role(user, &[Role::Assistant, Role::Admin])?;
    list_with(state, Condition::all(), query).await
}

async fn list_with(
    state: &AppState,
    mut condition: Condition,
    query: StatusListQuery,
) -> AppResult<ApiResponse<ReclamationList>> {
    let (page, limit, offset) = query.pagination().normalize();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = status
            .parse::<ReclamationStatus>()
            .map_err(|_| AppError::BadRequest(format!("Statut inconnu : « {status} »")))?;
        condition = condition.add(ReclamationCol::Status.eq(status.as_str()));
    }

    let mut finder = Reclamations::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(ReclamationCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(ReclamationCol::CreatedAt),
    };
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Reclamation::from)
        .collect();

    Ok(ApiResponse::success(
        "Réclamations",
        ReclamationList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reclamation>> {
    let reclamation = Reclamations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Réclamation"))?;
    match user.role {
        Role::Client => ensure_owner(user, &reclamation)?,
        Role::Assistant | Role::Admin => {}
        Role::Agent => return Err(AppError::forbidden()),
    }
    Ok(ApiResponse::ok("Réclamation", Reclamation::from(reclamation)))
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    payload: ReclamationRequest,
) -> AppResult<ApiResponse<Reclamation>> {
    ensure_role(user, &[Role::Client])?;
    payload.validate()?;

    let txn = state.orm.begin().await?;
    if let Some(commande_id) = payload.commande_id {
        ensure_own_commande(&txn, user, commande_id).await?;
    }
    let assistant_id = default_assistant(&txn, &state.config).await?;

    let now = Utc::now();
    let reclamation = ReclamationActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(user.user_id),
        assistant_id: Set(assistant_id),
        commande_id: Set(payload.commande_id),
        sujet: Set(payload.sujet.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        status: Set(ReclamationStatus::Ouverte.as_str().to_string()),
        response: Set(None),
        documents: Set(documents_json(payload.documents)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    notify::push(
        &txn,
        with_commande(
            NewNotification::new(
                Recipient::Client(user.user_id),
                NotificationKind::Reclamation,
                format!("Votre réclamation « {} » a bien été enregistrée.", reclamation.sujet),
            ),
            &reclamation,
        ),
    )
    .await?;
    if let Some(assistant_id) = assistant_id {
        notify::push(
            &txn,
            with_commande(
                NewNotification::new(
                    Recipient::Assistant(assistant_id),
                    NotificationKind::Reclamation,
                    format!("Nouvelle réclamation : « {} ».", reclamation.sujet),
                ),
                &reclamation,
            ),
        )
        .await?;
    }
    txn.commit().await?;

    tracing::info!(reclamation_id = %reclamation.id, "reclamation created");
    Ok(ApiResponse::ok("Réclamation créée", Reclamation::from(reclamation)))
}

pub async fn update_by_client(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ReclamationRequest,
) -> AppResult<ApiResponse<Reclamation>> {
    ensure_role(user, &[Role::Client])?;
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let reclamation = lock_reclamation(&txn, id).await?;
    ensure_owner(user, &reclamation)?;
    reclamation_transition(reclamation.status.parse()?, ReclamationAction::Edit, user.role)?;
    if let Some(commande_id) = payload.commande_id {
        ensure_own_commande(&txn, user, commande_id).await?;
    }

    let mut active: ReclamationActive = reclamation.into();
    active.sujet = Set(payload.sujet.trim().to_string());
    active.description = Set(payload.description.trim().to_string());
    active.documents = Set(documents_json(payload.documents));
    if payload.commande_id.is_some() {
        active.commande_id = Set(payload.commande_id);
    }
    active.updated_at = Set(Utc::now().into());
    let reclamation = active.update(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::ok("Réclamation mise à jour", Reclamation::from(reclamation)))
}

/// A ticket may only point at one of the caller's own orders.
async fn ensure_own_commande<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    commande_id: Uuid,
) -> AppResult<()> {
    let commande = Commandes::find_by_id(commande_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::field("commandeId", "Commande introuvable"))?;
    if commande.client_id != user.user_id {
        return Err(AppError::Forbidden(
            "Cette commande ne vous appartient pas".into(),
        ));
    }
    Ok(())
}

/// Client or assistant closes the ticket.
pub async fn close(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reclamation>> {
    ensure_role(user, &[Role::Client, Role::Assistant])?;
    let reclamation = run_transition(state, user, id, ReclamationAction::Close, None).await?;
    Ok(ApiResponse::ok("Réclamation fermée", Reclamation::from(reclamation)))
}

pub async fn take_charge(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Reclamation>> {
    ensure_role(user, &[Role::Assistant])?;
    let reclamation = run_transition(state, user, id, ReclamationAction::TakeCharge, None).await?;
    Ok(ApiResponse::ok("Réclamation prise en charge", Reclamation::from(reclamation)))
}

pub async fn respond(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RespondRequest,
) -> AppResult<ApiResponse<Reclamation>> {
    ensure_role(user, &[Role::Assistant])?;
    let response = payload.response.trim().to_string();
    if response.is_empty() {
        return Err(AppError::field("response", "La réponse est requise"));
    }
    let target = payload
        .status
        .parse::<ReclamationStatus>()
        .map_err(|_| AppError::field("status", "Statut de réclamation inconnu"))?;

    let reclamation = run_transition(
        state,
        user,
        id,
        ReclamationAction::Respond(target),
        Some(response),
    )
    .await?;
    Ok(ApiResponse::ok("Réponse envoyée", Reclamation::from(reclamation)))
}

async fn run_transition(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    action: ReclamationAction,
    response: Option<String>,
) -> AppResult<ReclamationModel> {
    let txn = state.orm.begin().await?;
    let reclamation = lock_reclamation(&txn, id).await?;
    if user.role == Role::Client {
        ensure_owner(user, &reclamation)?;
    }
    let transition = reclamation_transition(reclamation.status.parse()?, action, user.role)?;

    let assistant_id = reclamation.assistant_id;
    let mut active: ReclamationActive = reclamation.into();
    active.status = Set(transition.to.as_str().to_string());
    if user.role == Role::Assistant && (assistant_id.is_none() || action == ReclamationAction::TakeCharge) {
        active.assistant_id = Set(Some(user.user_id));
    }
    if let Some(response) = response {
        active.response = Set(Some(response));
    }
    active.updated_at = Set(Utc::now().into());
    let reclamation = active.update(&txn).await?;

    if transition.notify {
        for notification in notifications_for(user, &reclamation, &transition) {
            notify::push(&txn, notification).await?;
        }
    }
    txn.commit().await?;

    tracing::info!(
        reclamation_id = %reclamation.id,
        from = transition.from.as_str(),
        to = transition.to.as_str(),
        "reclamation status changed"
    );
    Ok(reclamation)
}

fn notifications_for(
    user: &AuthUser,
    reclamation: &ReclamationModel,
    transition: &Transition<ReclamationStatus>,
) -> Vec<NewNotification> {
    let mut out = Vec::new();
    if user.role == Role::Client {
        // The client closed it; only the assistant needs to hear about it.
        if let Some(assistant_id) = reclamation.assistant_id {
            out.push(with_commande(
                NewNotification::new(
                    Recipient::Assistant(assistant_id),
                    NotificationKind::Reclamation,
                    format!("La réclamation « {} » a été fermée par le client.", reclamation.sujet),
                ),
                reclamation,
            ));
        }
        return out;
    }

    let message = match transition.to {
        ReclamationStatus::EnCours if transition.from == ReclamationStatus::Ouverte => format!(
            "Votre réclamation « {} » a été prise en charge.",
            reclamation.sujet
        ),
        ReclamationStatus::Fermee => {
            format!("Votre réclamation « {} » a été fermée.", reclamation.sujet)
        }
        status => format!(
            "Votre réclamation « {} » a reçu une réponse (statut : {status}).",
            reclamation.sujet
        ),
    };
    out.push(with_commande(
        NewNotification::new(
            Recipient::Client(reclamation.client_id),
            NotificationKind::Reclamation,
            message,
        ),
        reclamation,
    ));
    out
}

fn with_commande(notification: NewNotification, reclamation: &ReclamationModel) -> NewNotification {
    match reclamation.commande_id {
        Some(id) => notification.commande(id),
        None => notification,
    }
}

fn documents_json(documents: Vec<String>) -> serde_json::Value {
    let documents: Vec<String> = documents
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();
    serde_json::json!(documents)
}

async fn lock_reclamation(
    txn: &sea_orm::DatabaseTransaction,
    id: Uuid,
) -> AppResult<ReclamationModel> {
    Reclamations::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("Réclamation"))
}

fn ensure_owner(user: &AuthUser, reclamation: &ReclamationModel) -> AppResult<()> {
    if reclamation.client_id != user.user_id {
        return Err(AppError::Forbidden(
            "Cette réclamation ne vous appartient pas".into(),
        ));
    }
    Ok(())
}
