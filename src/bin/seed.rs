use logistique_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::hash_password,
    workflow::{OrderStatus, Role},
};
use uuid::Uuid;

const ACCOUNTS: &[(&str, &str, &str, Role)] = &[
    ("admin@logistique.local", "Admin", "Principal", Role::Admin),
    ("assistant@logistique.local", "Assistant", "Support", Role::Assistant),
    ("agent@logistique.local", "Agent", "Terrain", Role::Agent),
    ("client@logistique.local", "Client", "Démo", Role::Client),
];

const DEMO_PASSWORD: &str = "motdepasse123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    run_migrations(&pool).await?;

    let mut client_id = None;
    let mut assistant_id = None;
    for (email, nom, prenom, role) in ACCOUNTS {
        let id = ensure_account(&pool, email, nom, prenom, *role).await?;
        println!("{:<10} {email} -> {id}", role.as_str());
        match role {
            Role::Client => client_id = Some(id),
            Role::Assistant => assistant_id = Some(id),
            _ => {}
        }
    }

    if let Some(client_id) = client_id {
        seed_commande(&pool, client_id, assistant_id).await?;
    }

    pool.close().await;
    println!("Seed completed. Password for every account: {DEMO_PASSWORD}");
    Ok(())
}

async fn ensure_account(
    pool: &sqlx::PgPool,
    email: &str,
    nom: &str,
    prenom: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(DEMO_PASSWORD).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, nom, prenom, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role, actif = TRUE
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(nom)
    .bind(prenom)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn seed_commande(
    pool: &sqlx::PgPool,
    client_id: Uuid,
    assistant_id: Option<Uuid>,
) -> anyhow::Result<()> {
    let existing: (i64,) = sqlx::query_as("SELECT count(*) FROM commandes WHERE client_id = $1")
        .bind(client_id)
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        println!("Sample order already present");
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let commande_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO commandes (id, nom, adresse_depart, adresse_destination, valeur_marchandise,
                               type_transport, statut, client_id, assistant_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(commande_id)
    .bind("Envoi de démonstration")
    .bind("12 rue des Docks, Marseille")
    .bind("4 avenue du Port, Le Havre")
    .bind(350.0_f64)
    .bind("Routier")
    .bind(OrderStatus::EnAttente.as_str())
    .bind(client_id)
    .bind(assistant_id)
    .execute(&mut *tx)
    .await?;

    let produits = [
        ("Cartons de vaisselle", 12.5_f64, 8.0_f64, 3, true),
        ("Lampe de bureau", 30.0, 2.5, 1, false),
    ];
    for (position, (nom, tarif, poids, quantite, fragile)) in (0_i32..).zip(produits) {
        sqlx::query(
            r#"
            INSERT INTO produits (id, commande_id, nom, tarif_unitaire, poids, largeur, longueur,
                                  hauteur, quantite, type_conditionnement, fragile, position)
            VALUES ($1, $2, $3, $4, $5, 40, 30, 30, $6, 'Carton', $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(commande_id)
        .bind(nom)
        .bind(tarif)
        .bind(poids)
        .bind(quantite)
        .bind(fragile)
        .bind(position)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    println!("Seeded sample order {commande_id}");
    Ok(())
}
