#![allow(dead_code)]

use chrono::Utc;
use logistique_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::commandes::{CommandeRequest, CommandeWithProduits},
    entity::{
        notifications::{Column as NotificationCol, Entity as Notifications},
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    services::commande_service,
    state::AppState,
    workflow::Role,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

/// Connects to the test database, or returns `None` so the caller can skip.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;
    Ok(Some(AppState::new(pool, AppConfig::for_secret("test-secret"))))
}

/// Inserts an active account with a unique email and returns its identity.
pub async fn create_user(state: &AppState, role: Role) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let user = UserActive {
        id: Set(id),
        nom: Set("Test".into()),
        prenom: Set(role.label().into()),
        email: Set(format!("{}-{id}@test.local", role.as_str())),
        password_hash: Set("dummy".into()),
        telephone: Set(None),
        role: Set(role.as_str().into()),
        actif: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        name: format!("{} {}", user.prenom, user.nom),
        role,
    })
}

pub fn commande_body(quantite: i32) -> CommandeRequest {
    serde_json::from_value(json!({
        "nom": "Livraison atelier",
        "adresseDepart": "5 rue du Port, Marseille",
        "adresseDestination": "18 avenue Jean Jaurès, Nîmes",
        "nomDestinataire": "Paul Girard",
        "valeurMarchandise": 800,
        "typeTransport": "routier",
        "produits": [{
            "nom": "Palette",
            "categorie": "mobilier",
            "tarifUnitaire": 120,
            "poids": 35,
            "largeur": 80,
            "longueur": 120,
            "hauteur": 100,
            "quantite": quantite,
            "fragile": false
        }]
    }))
    .expect("valid order body")
}

pub async fn create_commande(
    state: &AppState,
    client: &AuthUser,
) -> anyhow::Result<CommandeWithProduits> {
    let resp = commande_service::create(state, client, commande_body(2)).await?;
    Ok(resp.data.expect("commande data"))
}

/// Notifications addressed to `user`, optionally narrowed to one invoice.
pub async fn inbox_count(
    state: &AppState,
    user: &AuthUser,
    facture_id: Option<Uuid>,
) -> anyhow::Result<u64> {
    let mut finder = Notifications::find()
        .filter(NotificationCol::RecipientKind.eq(user.role.as_str()))
        .filter(NotificationCol::RecipientId.eq(user.user_id));
    if let Some(facture_id) = facture_id {
        finder = finder.filter(NotificationCol::FactureId.eq(facture_id));
    }
    Ok(finder.count(&state.orm).await?)
}
