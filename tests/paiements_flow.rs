mod common;

use common::{create_commande, create_user, inbox_count, setup_state};
use logistique_api::{
    dto::{
        factures::CreateFactureRequest,
        paiements::{CreatePaiementRequest, PaymentMethodRequest, UpdatePaiementRequest},
    },
    error::{AppError, PAYMENT_EXISTS},
    middleware::auth::AuthUser,
    models::Facture,
    services::{commande_service, facture_service, paiement_service, payment_method_service},
    state::AppState,
    workflow::{PaymentStatus, Role},
};

struct Parties {
    client: AuthUser,
    assistant: AuthUser,
    facture: Facture,
}

// Client order accepted by an assistant, then invoiced and sent by an agent.
async fn invoiced_order(state: &AppState) -> anyhow::Result<Parties> {
    let client = create_user(state, Role::Client).await?;
    let assistant = create_user(state, Role::Assistant).await?;
    let agent = create_user(state, Role::Agent).await?;

    let commande = create_commande(state, &client).await?.commande;
    commande_service::accept(state, &assistant, commande.id).await?;
    let facture = facture_service::create(
        state,
        &agent,
        CreateFactureRequest {
            commande_id: commande.id,
            montant: None,
            date_echeance: None,
            envoyer: None,
        },
    )
    .await?
    .data
    .expect("facture");

    Ok(Parties {
        client,
        assistant,
        facture,
    })
}

fn pay(facture: &Facture) -> CreatePaiementRequest {
    CreatePaiementRequest {
        id_facture: facture.id,
        methode: Some("carte".into()),
    }
}

#[tokio::test]
async fn invoice_defaults_to_line_item_total() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let Parties { facture, .. } = invoiced_order(&state).await?;
    assert_eq!(facture.montant, 240.0);
    assert_eq!(facture.status, "En attente");
    assert!(facture.numero_facture >= 1000);
    Ok(())
}

// A facture takes a single payment; confirming it settles the invoice with one client notification.
#[tokio::test]
async fn pay_then_confirm_settles_invoice() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let Parties {
        client,
        assistant,
        facture,
    } = invoiced_order(&state).await?;

    let started = paiement_service::create(&state, &client, pay(&facture))
        .await?
        .data
        .expect("paiement");
    assert_eq!(started.paiement.statut, "En attente");
    assert_eq!(started.paiement.montant, facture.montant);
    assert_eq!(started.facture.status, "En cours de paiement");

    let err = paiement_service::create(&state, &client, pay(&facture))
        .await
        .unwrap_err();
    match err {
        AppError::BadRequest(msg) => assert_eq!(msg, PAYMENT_EXISTS),
        other => panic!("unexpected error: {other:?}"),
    }

    let before = inbox_count(&state, &client, Some(facture.id)).await?;
    let decided = paiement_service::decide(
        &state,
        &assistant,
        started.paiement.id,
        UpdatePaiementRequest {
            statut: PaymentStatus::Paye,
        },
    )
    .await?
    .data
    .expect("paiement");
    assert_eq!(decided.paiement.statut, "Payé");
    assert!(decided.paiement.date_paiement.is_some());
    assert_eq!(decided.facture.status, "Payée");
    assert_eq!(inbox_count(&state, &client, Some(facture.id)).await?, before + 1);

    let err = paiement_service::create(&state, &client, pay(&facture))
        .await
        .unwrap_err();
    match err {
        AppError::BadRequest(msg) => assert_eq!(msg, "Cette facture est déjà payée"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = paiement_service::decide(
        &state,
        &assistant,
        started.paiement.id,
        UpdatePaiementRequest {
            statut: PaymentStatus::Refuse,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

// Refusing puts the invoice back to pending; the refused payment still blocks a new one.
#[tokio::test]
async fn refused_payment_reopens_invoice() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let Parties {
        client,
        assistant,
        facture,
    } = invoiced_order(&state).await?;

    let started = paiement_service::create(&state, &client, pay(&facture))
        .await?
        .data
        .expect("paiement");
    let refused = paiement_service::decide(
        &state,
        &assistant,
        started.paiement.id,
        UpdatePaiementRequest {
            statut: PaymentStatus::Refuse,
        },
    )
    .await?
    .data
    .expect("paiement");
    assert_eq!(refused.paiement.statut, "Refusé");
    assert!(refused.paiement.date_paiement.is_none());
    assert_eq!(refused.facture.status, "En attente");

    let err = paiement_service::create(&state, &client, pay(&facture))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == PAYMENT_EXISTS));
    Ok(())
}

#[tokio::test]
async fn only_the_owner_pays_and_only_assistants_decide() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let Parties {
        client, facture, ..
    } = invoiced_order(&state).await?;
    let other_client = create_user(&state, Role::Client).await?;
    let agent = create_user(&state, Role::Agent).await?;

    let err = paiement_service::create(&state, &other_client, pay(&facture))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let started = paiement_service::create(&state, &client, pay(&facture))
        .await?
        .data
        .expect("paiement");
    let err = paiement_service::decide(
        &state,
        &agent,
        started.paiement.id,
        UpdatePaiementRequest {
            statut: PaymentStatus::Paye,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    Ok(())
}

// Saved payment methods: the first becomes the default, a new default demotes the others.
#[tokio::test]
async fn saved_methods_keep_a_single_default() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let other = create_user(&state, Role::Client).await?;

    let card = payment_method_service::create(
        &state,
        &client,
        PaymentMethodRequest {
            type_methode: "Carte".into(),
            libelle: "Visa perso".into(),
            last4: Some("4242".into()),
            par_defaut: None,
        },
    )
    .await?
    .data
    .expect("method");
    assert!(card.par_defaut);
    assert_eq!(card.type_methode, "carte");

    let transfer = payment_method_service::create(
        &state,
        &client,
        PaymentMethodRequest {
            type_methode: "virement".into(),
            libelle: "Compte pro".into(),
            last4: None,
            par_defaut: Some(true),
        },
    )
    .await?
    .data
    .expect("method");

    let items = payment_method_service::list(&state, &client)
        .await?
        .data
        .expect("methods")
        .items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, transfer.id);
    assert_eq!(items.iter().filter(|m| m.par_defaut).count(), 1);

    let err = payment_method_service::create(
        &state,
        &client,
        PaymentMethodRequest {
            type_methode: "carte".into(),
            libelle: "Test".into(),
            last4: Some("42a".into()),
            par_defaut: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref errors) if errors.contains_key("last4")));

    let err = payment_method_service::delete(&state, &other, card.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let removed = payment_method_service::delete(&state, &client, card.id)
        .await?
        .data
        .expect("affected");
    assert_eq!(removed.count, 1);
    Ok(())
}
