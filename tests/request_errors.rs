use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use logistique_api::{
    config::AppConfig,
    entity::users,
    middleware::auth::AUTH_COOKIE,
    routes::{create_api_router, not_found},
    services::auth_service::issue_token,
    state::AppState,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

// Every request below is refused before a query runs, so the pool never connects.
fn app() -> anyhow::Result<(Router, AppConfig)> {
    let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/unused")?;
    let state = AppState::new(pool, AppConfig::for_secret("test-secret"));
    let router = Router::new()
        .nest("/api", create_api_router())
        .fallback(not_found)
        .with_state(state);
    Ok((router, AppConfig::for_secret("test-secret")))
}

fn cookie(config: &AppConfig, role: &str) -> anyhow::Result<String> {
    let now = Utc::now().fixed_offset();
    let account = users::Model {
        id: Uuid::new_v4(),
        nom: "Roux".into(),
        prenom: "Camille".into(),
        email: "camille.roux@exemple.fr".into(),
        password_hash: String::new(),
        telephone: None,
        role: role.into(),
        actif: true,
        created_at: now,
        updated_at: now,
    };
    Ok(format!("{AUTH_COOKIE}={}", issue_token(config, &account)?))
}

async fn send(
    method: Method,
    uri: &str,
    role: &str,
    json: Option<&str>,
) -> anyhow::Result<(StatusCode, Value)> {
    let (router, config) = app()?;
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie(&config, role)?);
    let body = match json {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = router.oneshot(request.body(body)?).await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "{content_type}");
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn reject_without_body_asks_for_a_reason() -> anyhow::Result<()> {
    let uri = format!("/api/assistant/commandes/{}/reject", Uuid::new_v4());
    let (status, body) = send(Method::POST, &uri, "assistant", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["raison"], "La raison du rejet est requise");

    let uri = format!("/api/agent/commandes/{}/reject", Uuid::new_v4());
    let (status, body) = send(Method::POST, &uri, "agent", Some(r#"{"raison":"  "}"#)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["raison"], "La raison du rejet est requise");
    Ok(())
}

#[tokio::test]
async fn unknown_status_is_a_field_error() -> anyhow::Result<()> {
    let uri = format!("/api/assistant/commandes/{}/status", Uuid::new_v4());
    let (status, body) = send(Method::PUT, &uri, "assistant", Some(r#"{"statut":"Foo"}"#)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Données invalides");
    assert!(body["errors"]["statut"].is_string());
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() -> anyhow::Result<()> {
    let (status, body) = send(
        Method::POST,
        "/api/assistant/commandes/not-a-uuid/reject",
        "assistant",
        Some(r#"{"raison":"Adresse incomplète"}"#),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Identifiant invalide");
    Ok(())
}

#[tokio::test]
async fn body_without_json_content_type_is_refused() -> anyhow::Result<()> {
    let (status, body) = send(Method::POST, "/api/client/commandes", "client", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Le corps de la requête doit être au format JSON");
    Ok(())
}

#[tokio::test]
async fn unknown_route_renders_the_error_body() -> anyhow::Result<()> {
    let (status, body) = send(Method::GET, "/api/nulle-part", "client", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route introuvable : /api/nulle-part");
    assert!(body.get("data").is_none());
    Ok(())
}
