use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    dto::paiements::{PaymentMethodList, PaymentMethodRequest},
    entity::payment_methods::{
        ActiveModel as MethodActive, Column as MethodCol, Entity as PaymentMethods,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role},
    models::PaymentMethod,
    response::{Affected, ApiResponse},
    state::AppState,
    workflow::Role,
};

const METHOD_TYPES: &[&str] = &["carte", "virement", "paypal", "especes"];

pub async fn list(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<PaymentMethodList>> {
    ensure_role(user, &[Role::Client])?;
    let items = PaymentMethods::find()
        .filter(MethodCol::ClientId.eq(user.user_id))
        .order_by_desc(MethodCol::ParDefaut)
        .order_by_asc(MethodCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PaymentMethod::from)
        .collect();
    Ok(ApiResponse::ok("Moyens de paiement", PaymentMethodList { items }))
}

pub async fn create(
    state: &AppState,
    user: &AuthUser,
    payload: PaymentMethodRequest,
) -> AppResult<ApiResponse<PaymentMethod>> {
    ensure_role(user, &[Role::Client])?;
    let type_methode = payload.type_methode.trim().to_lowercase();
    if !METHOD_TYPES.contains(&type_methode.as_str()) {
        return Err(AppError::field("typeMethode", "Type de moyen de paiement inconnu"));
    }
    if payload.libelle.trim().is_empty() {
        return Err(AppError::field("libelle", "Le libellé est requis"));
    }
    let last4 = payload.last4.filter(|v| !v.trim().is_empty());
    if let Some(last4) = &last4 {
        if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::field("last4", "Quatre chiffres attendus"));
        }
    }

    let txn = state.orm.begin().await?;
    let has_any = PaymentMethods::find()
        .filter(MethodCol::ClientId.eq(user.user_id))
        .one(&txn)
        .await?
        .is_some();
    // The first method registered becomes the default one.
    let par_defaut = payload.par_defaut.unwrap_or(!has_any);
    if par_defaut {
        PaymentMethods::update_many()
            .col_expr(MethodCol::ParDefaut, Expr::value(false))
            .filter(MethodCol::ClientId.eq(user.user_id))
            .exec(&txn)
            .await?;
    }

    let method = MethodActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(user.user_id),
        type_methode: Set(type_methode),
        libelle: Set(payload.libelle.trim().to_string()),
        last4: Set(last4),
        par_defaut: Set(par_defaut),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::ok("Moyen de paiement ajouté", PaymentMethod::from(method)))
}

pub async fn delete(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Affected>> {
    ensure_role(user, &[Role::Client])?;
    let result = PaymentMethods::delete_many()
        .filter(MethodCol::Id.eq(id))
        .filter(MethodCol::ClientId.eq(user.user_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Moyen de paiement"));
    }
    Ok(ApiResponse::ok(
        "Moyen de paiement supprimé",
        Affected {
            count: result.rows_affected,
        },
    ))
}
