use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    routing::get,
};
use chrono::Utc;
use logistique_api::{
    config::AppConfig,
    entity::users,
    middleware::auth::{AUTH_COOKIE, AuthUser, decode_token, session_cookie},
    services::auth_service::issue_token,
    workflow::Role,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

async fn whoami(user: AuthUser) -> Json<Value> {
    Json(json!({ "id": user.user_id, "role": user.role, "name": user.name }))
}

fn app(config: AppConfig) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .with_state(Arc::new(config))
}

fn account(role: &str) -> users::Model {
    let now = Utc::now().fixed_offset();
    users::Model {
        id: Uuid::new_v4(),
        nom: "Martin".into(),
        prenom: "Léa".into(),
        email: "lea.martin@exemple.fr".into(),
        password_hash: String::new(),
        telephone: None,
        role: role.into(),
        actif: true,
        created_at: now,
        updated_at: now,
    }
}

async fn call(request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app(AppConfig::for_secret(SECRET)).oneshot(request).await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn session_cookie_authenticates() -> anyhow::Result<()> {
    let user = account("assistant");
    let token = issue_token(&AppConfig::for_secret(SECRET), &user)?;

    let request = Request::builder()
        .uri("/whoami")
        .header(header::COOKIE, format!("theme=dark; {AUTH_COOKIE}={token}"))
        .body(Body::empty())?;
    let (status, body) = call(request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["role"], "assistant");
    assert_eq!(body["name"], "Léa Martin");
    Ok(())
}

#[tokio::test]
async fn bearer_header_authenticates() -> anyhow::Result<()> {
    let user = account("client");
    let token = issue_token(&AppConfig::for_secret(SECRET), &user)?;

    let request = Request::builder()
        .uri("/whoami")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())?;
    let (status, body) = call(request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "client");
    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> anyhow::Result<()> {
    let request = Request::builder().uri("/whoami").body(Body::empty())?;
    let (status, body) = call(request).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Non authentifié");
    Ok(())
}

#[tokio::test]
async fn expired_or_foreign_tokens_are_unauthorized() -> anyhow::Result<()> {
    let mut config = AppConfig::for_secret(SECRET);
    config.token_ttl_hours = -2;
    let expired = issue_token(&config, &account("agent"))?;
    let foreign = issue_token(&AppConfig::for_secret("other-secret"), &account("agent"))?;

    for token in [expired, foreign] {
        let request = Request::builder()
            .uri("/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())?;
        let (status, body) = call(request).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Session invalide ou expirée");
    }
    Ok(())
}

#[test]
fn unknown_role_in_claims_is_rejected() -> anyhow::Result<()> {
    let config = AppConfig::for_secret(SECRET);
    let token = issue_token(&config, &account("superviseur"))?;
    assert!(decode_token(&token, SECRET).is_err());

    let token = issue_token(&config, &account("admin"))?;
    assert_eq!(decode_token(&token, SECRET)?.role, Role::Admin);
    Ok(())
}

#[test]
fn session_cookie_is_http_only() {
    let mut config = AppConfig::for_secret(SECRET);
    let cookie = session_cookie("abc", &config);
    assert!(cookie.starts_with(&format!("{AUTH_COOKIE}=abc;")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(!cookie.contains("Secure"));

    config.cookie_secure = true;
    assert!(session_cookie("abc", &config).ends_with("; Secure"));
}
