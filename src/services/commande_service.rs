use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    config::AppConfig,
    dto::commandes::{
        AdresseRequest, AssignAgentRequest, CommandeList, CommandeRequest, CommandeWithProduits,
        ProduitInput, RejectRequest, UpdateStatutRequest,
    },
    entity::{
        commandes::{
            ActiveModel as CommandeActive, Column as CommandeCol, Entity as Commandes,
            Model as CommandeModel,
        },
        factures::{Column as FactureCol, Entity as Factures},
        produits::{ActiveModel as ProduitActive, Column as ProduitCol, Entity as Produits},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role, ensure_staff},
    models::{Commande, Facture, Produit},
    notify::{self, NewNotification, NotificationKind, Recipient},
    response::{ApiResponse, Meta},
    routes::params::{CommandeListQuery, SortOrder},
    state::AppState,
    workflow::{OrderAction, OrderStatus, Role, Transition, order_transition},
};

pub async fn list_for_client(
    state: &AppState,
    user: &AuthUser,
    query: CommandeListQuery,
) -> AppResult<ApiResponse<CommandeList>> {
    ensure_role(user, &[Role::Client])?;
    let condition = Condition::all().add(CommandeCol::ClientId.eq(user.user_id));
    list_with(state, condition, query).await
}

/// Back-office listing; agents may restrict it to their own assignments.
pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    query: CommandeListQuery,
) -> AppResult<ApiResponse<CommandeList>> {
    ensure_role(user, &[Role::Assistant, Role::Agent, Role::Admin])?;
    let mut condition = Condition::all();
    if user.role == Role::Agent && query.mine.unwrap_or(false) {
        condition = condition.add(CommandeCol::AgentId.eq(user.user_id));
    }
    list_with(state, condition, query).await
}

async fn list_with(
    state: &AppState,
    mut condition: Condition,
    query: CommandeListQuery,
) -> AppResult<ApiResponse<CommandeList>> {
    let (page, limit, offset) = query.pagination().normalize();
    if let Some(statut) = query.statut.as_deref().filter(|s| !s.is_empty()) {
        let statut = statut
            .parse::<OrderStatus>()
            .map_err(|_| AppError::BadRequest(format!("Statut inconnu : « {statut} »")))?;
        condition = condition.add(CommandeCol::Statut.eq(statut.as_str()));
    }

    let mut finder = Commandes::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(CommandeCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(CommandeCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Commande::from)
        .collect();

    Ok(ApiResponse::success(
        "Commandes",
        CommandeList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_for_client(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CommandeWithProduits>> {
    ensure_role(user, &[Role::Client])?;
    let order = find_commande(&state.orm, id).await?;
    ensure_owner(user, &order)?;
    let detail = load_detail(&state.orm, order).await?;
    Ok(ApiResponse::ok("Commande", detail))
}

pub async fn get_any(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CommandeWithProduits>> {
    ensure_role(user, &[Role::Assistant, Role::Agent, Role::Admin])?;
    let order = find_commande(&state.orm, id).await?;
    let detail = load_detail(&state.orm, order).await?;
    Ok(ApiResponse::ok("Commande", detail))
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    payload: CommandeRequest,
) -> AppResult<ApiResponse<CommandeWithProduits>> {
    ensure_role(user, &[Role::Client])?;
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let assistant_id = default_assistant(&txn, &state.config).await?;

    let now = Utc::now();
    let order = CommandeActive {
        id: Set(Uuid::new_v4()),
        nom: Set(payload.nom.trim().to_string()),
        adresse_depart: Set(payload.adresse_depart.clone()),
        adresse_destination: Set(payload.adresse_destination.clone()),
        adresse_actuel: Set(payload.adresse_depart.clone()),
        nom_destinataire: Set(payload.nom_destinataire.clone()),
        telephone_destinataire: Set(payload.telephone_destinataire.clone()),
        email_destinataire: Set(payload.email_destinataire.clone()),
        valeur_marchandise: Set(payload.valeur_marchandise),
        type_transport: Set(payload.type_transport.clone()),
        statut: Set(OrderStatus::EnAttente.as_str().to_string()),
        raison_rejet: Set(None),
        client_id: Set(user.user_id),
        assistant_id: Set(assistant_id),
        agent_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let produits = insert_produits(&txn, order.id, &payload.produits).await?;

    notify::push(
        &txn,
        NewNotification::new(
            Recipient::Client(user.user_id),
            NotificationKind::Commande,
            format!("Votre commande « {} » a bien été enregistrée.", order.nom),
        )
        .commande(order.id),
    )
    .await?;
    if let Some(assistant_id) = assistant_id {
        notify::push(
            &txn,
            NewNotification::new(
                Recipient::Assistant(assistant_id),
                NotificationKind::Commande,
                format!("Nouvelle commande « {} » à traiter.", order.nom),
            )
            .commande(order.id),
        )
        .await?;
    }

    txn.commit().await?;

    tracing::info!(commande_id = %order.id, produits = produits.len(), "commande created");
    audit::record(
        state,
        user.user_id,
        "commande_create",
        "commandes",
        serde_json::json!({ "commande_id": order.id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Commande créée",
        CommandeWithProduits {
            commande: Commande::from(order),
            produits,
            factures: Vec::new(),
        },
    ))
}

/// Full replacement of a pending order, line items included.
pub async fn update_by_client(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CommandeRequest,
) -> AppResult<ApiResponse<CommandeWithProduits>> {
    ensure_role(user, &[Role::Client])?;
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let order = lock_commande(&txn, id).await?;
    ensure_owner(user, &order)?;
    order_transition(statut_of(&order)?, OrderAction::Edit, user.role)?;

    let mut active: CommandeActive = order.into();
    active.nom = Set(payload.nom.trim().to_string());
    active.adresse_depart = Set(payload.adresse_depart.clone());
    active.adresse_destination = Set(payload.adresse_destination.clone());
    active.nom_destinataire = Set(payload.nom_destinataire.clone());
    active.telephone_destinataire = Set(payload.telephone_destinataire.clone());
    active.email_destinataire = Set(payload.email_destinataire.clone());
    active.valeur_marchandise = Set(payload.valeur_marchandise);
    active.type_transport = Set(payload.type_transport.clone());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    Produits::delete_many()
        .filter(ProduitCol::CommandeId.eq(order.id))
        .exec(&txn)
        .await?;
    let produits = insert_produits(&txn, order.id, &payload.produits).await?;

    txn.commit().await?;
    tracing::info!(commande_id = %order.id, "commande updated by client");

    Ok(ApiResponse::ok(
        "Commande mise à jour",
        CommandeWithProduits {
            commande: Commande::from(order),
            produits,
            factures: Vec::new(),
        },
    ))
}

pub async fn cancel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Commande>> {
    let order = run_transition(state, user, id, OrderAction::Cancel, None).await?;
    Ok(ApiResponse::ok("Commande annulée", Commande::from(order)))
}

pub async fn accept(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Commande>> {
    ensure_staff(user)?;
    let order = run_transition(state, user, id, OrderAction::Accept, None).await?;
    Ok(ApiResponse::ok("Commande acceptée", Commande::from(order)))
}

pub async fn reject(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RejectRequest,
) -> AppResult<ApiResponse<Commande>> {
    ensure_staff(user)?;
    let raison = payload.reason()?;
    let order = run_transition(state, user, id, OrderAction::Reject, Some(raison)).await?;
    Ok(ApiResponse::ok("Commande refusée", Commande::from(order)))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStatutRequest,
) -> AppResult<ApiResponse<Commande>> {
    ensure_staff(user)?;
    let order = run_transition(state, user, id, OrderAction::Advance(payload.statut), None).await?;
    Ok(ApiResponse::ok("Statut mis à jour", Commande::from(order)))
}

pub async fn archive(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Commande>> {
    let order = run_transition(state, user, id, OrderAction::Archive, None).await?;
    Ok(ApiResponse::ok("Commande archivée", Commande::from(order)))
}

pub async fn assign_agent(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AssignAgentRequest,
) -> AppResult<ApiResponse<Commande>> {
    ensure_role(user, &[Role::Assistant])?;

    let agent = Users::find_by_id(payload.agent_id)
        .filter(UserCol::Role.eq(Role::Agent.as_str()))
        .filter(UserCol::Actif.eq(true))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::field("agentId", "Agent introuvable ou inactif"))?;

    let txn = state.orm.begin().await?;
    let order = lock_commande(&txn, id).await?;
    let statut = statut_of(&order)?;
    if statut.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "Impossible d'assigner un agent à une commande au statut « {statut} »"
        )));
    }

    let mut active: CommandeActive = order.into();
    active.agent_id = Set(Some(agent.id));
    active.assistant_id = Set(Some(user.user_id));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    notify::push(
        &txn,
        NewNotification::new(
            Recipient::Agent(agent.id),
            NotificationKind::Commande,
            format!("La commande « {} » vous a été assignée.", order.nom),
        )
        .commande(order.id),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(commande_id = %order.id, agent_id = %agent.id, "agent assigned");
    Ok(ApiResponse::ok("Agent assigné", Commande::from(order)))
}

pub async fn update_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AdresseRequest,
) -> AppResult<ApiResponse<Commande>> {
    ensure_staff(user)?;
    let adresse = payload.adresse_actuel.trim().to_string();
    if adresse.is_empty() {
        return Err(AppError::field("adresseActuel", "L'adresse actuelle est requise"));
    }

    let txn = state.orm.begin().await?;
    let order = lock_commande(&txn, id).await?;
    let statut = statut_of(&order)?;
    if statut.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "Impossible de modifier l'adresse d'une commande au statut « {statut} »"
        )));
    }

    let mut active: CommandeActive = order.into();
    active.adresse_actuel = Set(Some(adresse.clone()));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    notify::push(
        &txn,
        NewNotification::new(
            Recipient::Client(order.client_id),
            NotificationKind::Commande,
            format!("Votre commande « {} » se trouve actuellement à : {adresse}", order.nom),
        )
        .commande(order.id),
    )
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::ok("Adresse mise à jour", Commande::from(order)))
}

async fn run_transition(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    action: OrderAction,
    raison: Option<String>,
) -> AppResult<CommandeModel> {
    let txn = state.orm.begin().await?;
    let order = lock_commande(&txn, id).await?;
    if user.role == Role::Client {
        ensure_owner(user, &order)?;
    }

    let transition = order_transition(statut_of(&order)?, action, user.role)?;
    if !transition.changes_status() {
        txn.commit().await?;
        return Ok(order);
    }

    let mut active: CommandeActive = order.into();
    active.statut = Set(transition.to.as_str().to_string());
    if action == OrderAction::Accept {
        match user.role {
            Role::Assistant => active.assistant_id = Set(Some(user.user_id)),
            Role::Agent => active.agent_id = Set(Some(user.user_id)),
            _ => {}
        }
    }
    if let Some(raison) = &raison {
        active.raison_rejet = Set(Some(raison.clone()));
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    if transition.notify {
        notify::push(
            &txn,
            NewNotification::new(
                Recipient::Client(order.client_id),
                NotificationKind::Commande,
                client_message(&order, &transition, raison.as_deref()),
            )
            .commande(order.id),
        )
        .await?;
        if user.role == Role::Client {
            if let Some(assistant_id) = order.assistant_id {
                notify::push(
                    &txn,
                    NewNotification::new(
                        Recipient::Assistant(assistant_id),
                        NotificationKind::Commande,
                        format!("Le client a annulé la commande « {} ».", order.nom),
                    )
                    .commande(order.id),
                )
                .await?;
            }
        }
    }

    txn.commit().await?;

    tracing::info!(
        commande_id = %order.id,
        from = transition.from.as_str(),
        to = transition.to.as_str(),
        role = user.role.as_str(),
        "commande status changed"
    );
    audit::record(
        state,
        user.user_id,
        "commande_status",
        "commandes",
        serde_json::json!({
            "commande_id": order.id,
            "from": transition.from.as_str(),
            "to": transition.to.as_str(),
        }),
    )
    .await;

    Ok(order)
}

fn client_message(
    order: &CommandeModel,
    transition: &Transition<OrderStatus>,
    raison: Option<&str>,
) -> String {
    match transition.to {
        OrderStatus::Acceptee => format!("Votre commande « {} » a été acceptée.", order.nom),
        OrderStatus::Refusee => match raison {
            Some(raison) => format!(
                "Votre commande « {} » a été refusée. Raison : {raison}",
                order.nom
            ),
            None => format!("Votre commande « {} » a été refusée.", order.nom),
        },
        OrderStatus::Annulee => format!("Votre commande « {} » a été annulée.", order.nom),
        to => format!(
            "Le statut de votre commande « {} » est passé à « {to} ».",
            order.nom
        ),
    }
}

async fn insert_produits(
    txn: &DatabaseTransaction,
    commande_id: Uuid,
    inputs: &[ProduitInput],
) -> AppResult<Vec<Produit>> {
    let mut produits = Vec::with_capacity(inputs.len());
    for (position, input) in (0..).zip(inputs) {
        let produit = ProduitActive {
            id: Set(Uuid::new_v4()),
            commande_id: Set(commande_id),
            nom: Set(input.nom.trim().to_string()),
            categorie: Set(input.categorie.clone()),
            tarif_unitaire: Set(input.tarif_unitaire),
            poids: Set(input.poids),
            largeur: Set(input.largeur),
            longueur: Set(input.longueur),
            hauteur: Set(input.hauteur),
            quantite: Set(input.quantite),
            type_conditionnement: Set(input.type_conditionnement.clone()),
            fragile: Set(input.fragile),
            position: Set(position),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        produits.push(Produit::from(produit));
    }
    Ok(produits)
}

pub(crate) async fn default_assistant<C: ConnectionTrait>(
    conn: &C,
    config: &AppConfig,
) -> AppResult<Option<Uuid>> {
    let active_assistants = Users::find()
        .filter(UserCol::Role.eq(Role::Assistant.as_str()))
        .filter(UserCol::Actif.eq(true));

    if let Some(id) = config.default_assistant_id {
        let configured = active_assistants
            .clone()
            .filter(UserCol::Id.eq(id))
            .one(conn)
            .await?;
        if configured.is_some() {
            return Ok(Some(id));
        }
        tracing::warn!(assistant_id = %id, "configured default assistant is missing or inactive");
    }

    let fallback = active_assistants
        .order_by_asc(UserCol::CreatedAt)
        .one(conn)
        .await?;
    Ok(fallback.map(|u| u.id))
}

async fn find_commande<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<CommandeModel> {
    Commandes::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Commande"))
}

async fn lock_commande(txn: &DatabaseTransaction, id: Uuid) -> AppResult<CommandeModel> {
    Commandes::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("Commande"))
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    order: CommandeModel,
) -> AppResult<CommandeWithProduits> {
    let produits = Produits::find()
        .filter(ProduitCol::CommandeId.eq(order.id))
        .order_by_asc(ProduitCol::Position)
        .all(conn)
        .await?
        .into_iter()
        .map(Produit::from)
        .collect();
    let factures = Factures::find()
        .filter(FactureCol::CommandeId.eq(order.id))
        .order_by_desc(FactureCol::NumeroFacture)
        .all(conn)
        .await?
        .into_iter()
        .map(Facture::from)
        .collect();

    Ok(CommandeWithProduits {
        commande: Commande::from(order),
        produits,
        factures,
    })
}

fn ensure_owner(user: &AuthUser, order: &CommandeModel) -> AppResult<()> {
    if order.client_id != user.user_id {
        return Err(AppError::Forbidden(
            "Cette commande ne vous appartient pas".into(),
        ));
    }
    Ok(())
}

fn statut_of(order: &CommandeModel) -> AppResult<OrderStatus> {
    Ok(order.statut.parse::<OrderStatus>()?)
}
