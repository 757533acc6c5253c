mod common;

use common::{commande_body, create_commande, create_user, inbox_count, setup_state};
use logistique_api::{
    dto::commandes::{RejectRequest, UpdateStatutRequest},
    error::AppError,
    services::commande_service,
    workflow::{OrderStatus, Role},
};

// Client creates an order: it starts pending, keeps its line items and notifies the client once.
#[tokio::test]
async fn create_order_records_products_and_notifies_client() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;

    let created = create_commande(&state, &client).await?;
    assert_eq!(created.commande.statut, "En attente");
    assert_eq!(created.commande.client_id, client.user_id);
    assert_eq!(created.produits.len(), 1);
    assert_eq!(created.produits[0].quantite, 2);
    assert_eq!(inbox_count(&state, &client, None).await?, 1);

    let fetched = commande_service::get_for_client(&state, &client, created.commande.id)
        .await?
        .data
        .expect("commande");
    assert_eq!(fetched.produits.len(), 1);

    let stranger = create_user(&state, Role::Client).await?;
    let err = commande_service::get_for_client(&state, &stranger, created.commande.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_) | AppError::NotFound(_)));
    Ok(())
}

// Line items come back in the order they were submitted, not by insertion time.
#[tokio::test]
async fn products_keep_their_submitted_order() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let mut body = commande_body(1);
    let template = body.produits[0].clone();
    body.produits = ["Palette", "Armoire", "Caisse", "Bureau"]
        .into_iter()
        .map(|nom| {
            let mut produit = template.clone();
            produit.nom = nom.into();
            produit
        })
        .collect();

    let created = commande_service::create(&state, &client, body)
        .await?
        .data
        .expect("commande");
    let fetched = commande_service::get_for_client(&state, &client, created.commande.id)
        .await?
        .data
        .expect("commande");
    let noms: Vec<&str> = fetched.produits.iter().map(|p| p.nom.as_str()).collect();
    assert_eq!(noms, ["Palette", "Armoire", "Caisse", "Bureau"]);
    Ok(())
}

// Once accepted, the client can no longer edit the order and its products stay untouched.
#[tokio::test]
async fn accepted_order_cannot_be_edited() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let assistant = create_user(&state, Role::Assistant).await?;
    let created = create_commande(&state, &client).await?;
    let id = created.commande.id;

    let accepted = commande_service::accept(&state, &assistant, id)
        .await?
        .data
        .expect("commande");
    assert_eq!(accepted.statut, "Acceptée");
    assert_eq!(accepted.assistant_id, Some(assistant.user_id));

    let err = commande_service::update_by_client(&state, &client, id, commande_body(9))
        .await
        .unwrap_err();
    match err {
        AppError::BadRequest(msg) => {
            assert_eq!(msg, "Seules les commandes en attente peuvent être modifiées")
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let current = commande_service::get_for_client(&state, &client, id)
        .await?
        .data
        .expect("commande");
    assert_eq!(current.produits.len(), 1);
    assert_eq!(current.produits[0].quantite, 2);

    let err = commande_service::cancel(&state, &client, id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

// Pending orders can be edited in full by their owner.
#[tokio::test]
async fn pending_order_is_replaced_in_full() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let created = create_commande(&state, &client).await?;

    let updated = commande_service::update_by_client(&state, &client, created.commande.id, commande_body(5))
        .await?
        .data
        .expect("commande");
    assert_eq!(updated.commande.statut, "En attente");
    assert_eq!(updated.produits.len(), 1);
    assert_eq!(updated.produits[0].quantite, 5);
    Ok(())
}

// Rejecting needs a reason; without one nothing changes.
#[tokio::test]
async fn reject_requires_reason_and_keeps_status() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let agent = create_user(&state, Role::Agent).await?;
    let created = create_commande(&state, &client).await?;
    let id = created.commande.id;

    let err = commande_service::reject(&state, &agent, id, RejectRequest { raison: None })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref errors) if errors.contains_key("raison")));

    let unchanged = commande_service::get_any(&state, &agent, id)
        .await?
        .data
        .expect("commande");
    assert_eq!(unchanged.commande.statut, "En attente");

    let rejected = commande_service::reject(
        &state,
        &agent,
        id,
        RejectRequest {
            raison: Some("Zone non desservie".into()),
        },
    )
    .await?
    .data
    .expect("commande");
    assert_eq!(rejected.statut, "Refusée");
    assert_eq!(rejected.raison_rejet.as_deref(), Some("Zone non desservie"));
    assert_eq!(inbox_count(&state, &client, None).await?, 2);
    Ok(())
}

// Delivery status only moves forward; repeating the current status is a no-op.
#[tokio::test]
async fn delivery_status_moves_forward_only() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let agent = create_user(&state, Role::Agent).await?;
    let created = create_commande(&state, &client).await?;
    let id = created.commande.id;

    commande_service::accept(&state, &agent, id).await?;
    let shipped = commande_service::update_status(
        &state,
        &agent,
        id,
        UpdateStatutRequest {
            statut: OrderStatus::Expediee,
        },
    )
    .await?
    .data
    .expect("commande");
    assert_eq!(shipped.statut, "Expédiée");
    let notified = inbox_count(&state, &client, None).await?;

    commande_service::update_status(
        &state,
        &agent,
        id,
        UpdateStatutRequest {
            statut: OrderStatus::Expediee,
        },
    )
    .await?;
    assert_eq!(inbox_count(&state, &client, None).await?, notified);

    let err = commande_service::update_status(
        &state,
        &agent,
        id,
        UpdateStatutRequest {
            statut: OrderStatus::EnCours,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = commande_service::update_status(
        &state,
        &client,
        id,
        UpdateStatutRequest {
            statut: OrderStatus::Livree,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    Ok(())
}
