use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{config::AppConfig, dto::auth::Claims, error::AppError, workflow::Role};

pub const AUTH_COOKIE: &str = "auth-token";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

pub fn ensure_role(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if !allowed.contains(&user.role) {
        return Err(AppError::forbidden());
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, &[Role::Admin])
}

pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    if !user.role.is_staff() {
        return Err(AppError::forbidden());
    }
    Ok(())
}

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(token: &str, config: &AppConfig) -> String {
    let max_age = config.token_ttl_hours * 3600;
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!("{AUTH_COOKIE}={token}; HttpOnly; Path=/; Max-Age={max_age}; SameSite=Lax{secure}")
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_cookie(config: &AppConfig) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!("{AUTH_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax{secure}")
}

fn token_from_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn token_from_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn decode_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Session invalide ou expirée".into()))?;

    let claims = decoded.claims;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Session invalide ou expirée".into()))?;
    let role = claims
        .role
        .parse::<Role>()
        .map_err(|_| AppError::Unauthorized("Session invalide ou expirée".into()))?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
        name: claims.name,
        role,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppConfig>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AppConfig>::from_ref(state);
        let token = token_from_cookies(&parts.headers)
            .or_else(|| token_from_bearer(&parts.headers))
            .ok_or_else(AppError::unauthorized)?;

        decode_token(token, &config.jwt_secret)
    }
}
