use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    config::AppConfig,
    dto::auth::{
        ChangePasswordRequest, Claims, LoginRequest, LoginResponse, ProfileUpdateRequest,
        RegisterRequest,
    },
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
    workflow::Role,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(config: &AppConfig, user: &UserModel) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.token_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: format!("{} {}", user.prenom, user.nom),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    payload.validate()?;
    let email = payload.email.trim().to_lowercase();

    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Cet email est déjà utilisé".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        nom: Set(payload.nom.trim().to_string()),
        prenom: Set(payload.prenom.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        telephone: Set(payload.telephone),
        role: Set(Role::Client.as_str().to_string()),
        actif: Set(true),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("Compte créé", User::from(user), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let invalid = || AppError::Unauthorized("Email ou mot de passe incorrect".into());
    let user = user.ok_or_else(invalid)?;
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid());
    }
    if !user.actif {
        return Err(AppError::Forbidden("Compte désactivé".into()));
    }

    let token = issue_token(&state.config, &user)?;

    audit::record(
        state,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id, "role": user.role }),
    )
    .await;
    tracing::info!(user_id = %user.id, role = user.role.as_str(), "user logged in");

    Ok(ApiResponse::success(
        "Connecté",
        LoginResponse {
            token,
            user: User::from(user),
        },
        Some(Meta::empty()),
    ))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur"))?;
    Ok(ApiResponse::ok("OK", User::from(model)))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: ProfileUpdateRequest,
) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur"))?;

    let mut active: UserActive = model.into();
    if let Some(nom) = payload.nom.filter(|v| !v.trim().is_empty()) {
        active.nom = Set(nom.trim().to_string());
    }
    if let Some(prenom) = payload.prenom.filter(|v| !v.trim().is_empty()) {
        active.prenom = Set(prenom.trim().to_string());
    }
    if let Some(telephone) = payload.telephone {
        active.telephone = Set(Some(telephone).filter(|t| !t.trim().is_empty()));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::ok("Profil mis à jour", User::from(updated)))
}

pub async fn change_password(
    state: &AppState,
    user: &AuthUser,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.new_password.chars().count() < 8 {
        return Err(AppError::field(
            "newPassword",
            "Le mot de passe doit contenir au moins 8 caractères",
        ));
    }
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Utilisateur"))?;
    if !verify_password(&payload.current_password, &model.password_hash)? {
        return Err(AppError::field("currentPassword", "Mot de passe actuel incorrect"));
    }

    let mut active: UserActive = model.into();
    active.password_hash = Set(hash_password(&payload.new_password)?);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "password_change",
        "users",
        serde_json::json!({ "user_id": user.user_id }),
    )
    .await;

    Ok(ApiResponse::ok("Mot de passe modifié", serde_json::json!({})))
}
