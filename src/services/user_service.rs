use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::users::{
        AdminStats, CountByLabel, CreateUserRequest, UpdateUserRequest, UserList, UserStatusRequest,
    },
    entity::{
        commandes::{Column as CommandeCol, Entity as Commandes},
        factures::{Column as FactureCol, Entity as Factures},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::{Affected, ApiResponse, Meta},
    routes::params::UserListQuery,
    services::auth_service::hash_password,
    state::AppState,
    workflow::{InvoiceStatus, Role},
};

pub const LAST_ADMIN: &str = "Impossible de désactiver/supprimer le dernier administrateur";

pub const CSV_HEADER: [&str; 8] = [
    "ID",
    "Type",
    "Prénom",
    "Nom",
    "Email",
    "Téléphone",
    "Date d'inscription",
    "Statut",
];

fn filters(query: &UserListQuery) -> AppResult<Condition> {
    let mut condition = Condition::all();
    if let Some(role) = query.role.as_deref().filter(|r| !r.is_empty()) {
        let role = role
            .parse::<Role>()
            .map_err(|_| AppError::BadRequest(format!("Rôle inconnu : « {role} »")))?;
        condition = condition.add(UserCol::Role.eq(role.as_str()));
    }
    if let Some(actif) = query.actif {
        condition = condition.add(UserCol::Actif.eq(actif));
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(UserCol::Nom).ilike(pattern.clone()))
                .add(Expr::col(UserCol::Prenom).ilike(pattern.clone()))
                .add(Expr::col(UserCol::Email).ilike(pattern)),
        );
    }
    Ok(condition)
}

pub async fn list(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();
    let finder = Users::find()
        .filter(filters(&query)?)
        .order_by_desc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success(
        "Utilisateurs",
        UserList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let model = find_user(state, id).await?;
    Ok(ApiResponse::ok("Utilisateur", User::from(model)))
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Cet email est déjà utilisé".to_string()));
    }

    let created = UserActive {
        id: Set(Uuid::new_v4()),
        nom: Set(payload.nom.trim().to_string()),
        prenom: Set(payload.prenom.trim().to_string()),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        telephone: Set(payload.telephone.filter(|t| !t.trim().is_empty())),
        role: Set(payload.role.as_str().to_string()),
        actif: Set(true),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %created.id, role = created.role.as_str(), "account created by admin");
    audit::record(
        state,
        user.user_id,
        "admin_user_create",
        "users",
        serde_json::json!({ "user_id": created.id, "role": created.role }),
    )
    .await;

    Ok(ApiResponse::ok("Utilisateur créé", User::from(created)))
}

pub async fn update(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let target = lock_user(&txn, id).await?;
    if let Some(role) = payload.role {
        if role != Role::Admin {
            ensure_not_last_admin(&txn, &target).await?;
        }
    }

    let mut active: UserActive = target.into();
    if let Some(nom) = payload.nom.filter(|v| !v.trim().is_empty()) {
        active.nom = Set(nom.trim().to_string());
    }
    if let Some(prenom) = payload.prenom.filter(|v| !v.trim().is_empty()) {
        active.prenom = Set(prenom.trim().to_string());
    }
    if let Some(telephone) = payload.telephone {
        active.telephone = Set(Some(telephone).filter(|t| !t.trim().is_empty()));
    }
    if let Some(role) = payload.role {
        active.role = Set(role.as_str().to_string());
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "admin_user_update",
        "users",
        serde_json::json!({ "user_id": updated.id, "role": updated.role }),
    )
    .await;

    Ok(ApiResponse::ok("Utilisateur mis à jour", User::from(updated)))
}

pub async fn set_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UserStatusRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let target = lock_user(&txn, id).await?;
    if !payload.actif {
        ensure_not_last_admin(&txn, &target).await?;
    }

    let mut active: UserActive = target.into();
    active.actif = Set(payload.actif);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(user_id = %updated.id, actif = updated.actif, "account status changed");
    audit::record(
        state,
        user.user_id,
        "admin_user_status",
        "users",
        serde_json::json!({ "user_id": updated.id, "actif": updated.actif }),
    )
    .await;

    let message = if updated.actif {
        "Compte activé"
    } else {
        "Compte désactivé"
    };
    Ok(ApiResponse::ok(message, User::from(updated)))
}

pub async fn delete(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Affected>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let target = lock_user(&txn, id).await?;
    ensure_not_last_admin(&txn, &target).await?;
    if id == user.user_id {
        return Err(AppError::BadRequest(
            "Vous ne pouvez pas supprimer votre propre compte".into(),
        ));
    }
    let result = Users::delete_by_id(target.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(user_id = %id, "account deleted");
    audit::record(
        state,
        user.user_id,
        "admin_user_delete",
        "users",
        serde_json::json!({ "user_id": id, "email": target.email }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Utilisateur supprimé",
        Affected {
            count: result.rows_affected,
        },
    ))
}

/// CSV of every account matching the list filters.
pub async fn export_csv(
    state: &AppState,
    user: &AuthUser,
    query: UserListQuery,
) -> AppResult<String> {
    ensure_admin(user)?;
    let users: Vec<User> = Users::find()
        .filter(filters(&query)?)
        .order_by_asc(UserCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();
    tracing::info!(rows = users.len(), "users exported");
    users_to_csv(&users)
}

pub fn users_to_csv(users: &[User]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(anyhow::Error::from)?;
    for u in users {
        let role = u
            .role
            .parse::<Role>()
            .map(|r| r.label().to_string())
            .unwrap_or_else(|_| u.role.clone());
        let date = u.created_at.format("%d/%m/%Y").to_string();
        writer
            .write_record([
                u.id.to_string().as_str(),
                role.as_str(),
                u.prenom.as_str(),
                u.nom.as_str(),
                u.email.as_str(),
                u.telephone.as_deref().unwrap_or(""),
                date.as_str(),
                if u.actif { "Actif" } else { "Inactif" },
            ])
            .map_err(anyhow::Error::from)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {e}"))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.into()))
}

pub async fn stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AdminStats>> {
    ensure_admin(user)?;

    let users = Users::find()
        .select_only()
        .column(UserCol::Role)
        .column_as(Expr::col(UserCol::Id).count(), "count")
        .group_by(UserCol::Role)
        .into_tuple::<(String, i64)>()
        .all(&state.orm)
        .await?;
    let commandes = Commandes::find()
        .select_only()
        .column(CommandeCol::Statut)
        .column_as(Expr::col(CommandeCol::Id).count(), "count")
        .group_by(CommandeCol::Statut)
        .into_tuple::<(String, i64)>()
        .all(&state.orm)
        .await?;
    let factures = Factures::find()
        .select_only()
        .column(FactureCol::Status)
        .column_as(Expr::col(FactureCol::Id).count(), "count")
        .group_by(FactureCol::Status)
        .into_tuple::<(String, i64)>()
        .all(&state.orm)
        .await?;
    let total_paye = Factures::find()
        .select_only()
        .column_as(Expr::col(FactureCol::Montant).sum(), "total")
        .filter(FactureCol::Status.eq(InvoiceStatus::Payee.as_str()))
        .into_tuple::<Option<f64>>()
        .one(&state.orm)
        .await?
        .flatten()
        .unwrap_or(0.0);

    Ok(ApiResponse::ok(
        "Statistiques",
        AdminStats {
            users: to_counts(users),
            commandes: to_counts(commandes),
            factures: to_counts(factures),
            total_paye,
        },
    ))
}

fn to_counts(rows: Vec<(String, i64)>) -> Vec<CountByLabel> {
    rows.into_iter()
        .map(|(label, count)| CountByLabel {
            label,
            count: count.max(0) as u64,
        })
        .collect()
}

async fn find_user(state: &AppState, id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur"))
}

async fn lock_user(txn: &DatabaseTransaction, id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur"))
}

/// Fails when `target` is the only active admin left. Every active admin row
/// is locked so two concurrent demotions cannot both pass.
async fn ensure_not_last_admin(txn: &DatabaseTransaction, target: &UserModel) -> AppResult<()> {
    if target.role != Role::Admin.as_str() || !target.actif {
        return Ok(());
    }
    let admins = Users::find()
        .filter(UserCol::Role.eq(Role::Admin.as_str()))
        .filter(UserCol::Actif.eq(true))
        .lock(LockType::Update)
        .all(txn)
        .await?;
    if admins.iter().all(|a| a.id == target.id) {
        return Err(AppError::BadRequest(LAST_ADMIN.into()));
    }
    Ok(())
}
