mod common;

use common::{create_commande, create_user, inbox_count, setup_state};
use logistique_api::{
    dto::reclamations::{ReclamationRequest, RespondRequest},
    error::AppError,
    services::reclamation_service,
    workflow::Role,
};

fn ticket(commande_id: Option<uuid::Uuid>) -> ReclamationRequest {
    ReclamationRequest {
        sujet: "Colis endommagé".into(),
        description: "Le carton est arrivé ouvert.".into(),
        commande_id,
        documents: vec!["photo-1.jpg".into()],
    }
}

// Ticket lifecycle: opened by the client, taken and answered by an assistant, closed by the client.
#[tokio::test]
async fn ticket_is_taken_answered_and_closed() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let assistant = create_user(&state, Role::Assistant).await?;
    let commande = create_commande(&state, &client).await?.commande;

    let opened = reclamation_service::create(&state, &client, ticket(Some(commande.id)))
        .await?
        .data
        .expect("reclamation");
    assert_eq!(opened.status, "Ouverte");
    assert_eq!(opened.documents, vec!["photo-1.jpg".to_string()]);

    let taken = reclamation_service::take_charge(&state, &assistant, opened.id)
        .await?
        .data
        .expect("reclamation");
    assert_eq!(taken.status, "En cours");
    assert_eq!(taken.assistant_id, Some(assistant.user_id));

    let err = reclamation_service::update_by_client(&state, &client, opened.id, ticket(None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let answered = reclamation_service::respond(
        &state,
        &assistant,
        opened.id,
        RespondRequest {
            response: "Un avoir a été émis.".into(),
            status: "Résolu".into(),
        },
    )
    .await?
    .data
    .expect("reclamation");
    assert_eq!(answered.status, "Résolue");
    assert_eq!(answered.response.as_deref(), Some("Un avoir a été émis."));

    let client_before = inbox_count(&state, &client, None).await?;
    let assistant_before = inbox_count(&state, &assistant, None).await?;
    let closed = reclamation_service::close(&state, &client, opened.id)
        .await?
        .data
        .expect("reclamation");
    assert_eq!(closed.status, "Fermée");
    assert_eq!(inbox_count(&state, &client, None).await?, client_before);
    assert_eq!(inbox_count(&state, &assistant, None).await?, assistant_before + 1);

    let err = reclamation_service::close(&state, &client, opened.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn tickets_stay_with_their_owner() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let other = create_user(&state, Role::Client).await?;
    let assistant = create_user(&state, Role::Assistant).await?;
    let foreign_commande = create_commande(&state, &other).await?.commande;

    let err = reclamation_service::create(&state, &client, ticket(Some(foreign_commande.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let opened = reclamation_service::create(&state, &client, ticket(None))
        .await?
        .data
        .expect("reclamation");
    let err = reclamation_service::get(&state, &other, opened.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err =
        reclamation_service::update_by_client(&state, &client, opened.id, ticket(Some(foreign_commande.id)))
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let unchanged = reclamation_service::get(&state, &client, opened.id)
        .await?
        .data
        .expect("reclamation");
    assert_eq!(unchanged.commande_id, None);

    let err = reclamation_service::respond(
        &state,
        &assistant,
        opened.id,
        RespondRequest {
            response: "   ".into(),
            status: "Résolue".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref errors) if errors.contains_key("response")));
    Ok(())
}
