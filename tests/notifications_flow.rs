mod common;

use common::{create_commande, create_user, setup_state};
use logistique_api::{
    dto::notifications::NotificationQuery,
    error::AppError,
    services::notification_service,
    workflow::Role,
};

fn unread_only() -> NotificationQuery {
    NotificationQuery {
        page: None,
        per_page: None,
        lu: Some(false),
    }
}

// Marking a notification read twice succeeds both times and only affects the caller's inbox.
#[tokio::test]
async fn mark_read_is_idempotent_and_scoped() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let other = create_user(&state, Role::Client).await?;
    create_commande(&state, &client).await?;

    let unread = notification_service::list(&state, &client, unread_only())
        .await?
        .data
        .expect("notifications")
        .items;
    assert_eq!(unread.len(), 1);
    let id = unread[0].id;
    assert_eq!(unread[0].kind, "commande");
    assert!(unread[0].commande_id.is_some());

    for _ in 0..2 {
        let read = notification_service::mark_read(&state, &client, id)
            .await?
            .data
            .expect("notification");
        assert!(read.lu);
    }
    let count = notification_service::unread_count(&state, &client)
        .await?
        .data
        .expect("count");
    assert_eq!(count.count, 0);

    let err = notification_service::mark_read(&state, &other, id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn mark_all_read_reports_touched_rows() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    create_commande(&state, &client).await?;
    create_commande(&state, &client).await?;

    let first = notification_service::mark_all_read(&state, &client)
        .await?
        .data
        .expect("affected");
    assert_eq!(first.count, 2);
    let second = notification_service::mark_all_read(&state, &client)
        .await?
        .data
        .expect("affected");
    assert_eq!(second.count, 0);
    Ok(())
}

#[tokio::test]
async fn admins_have_no_inbox() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = create_user(&state, Role::Admin).await?;

    let err = notification_service::unread_count(&state, &admin)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    Ok(())
}
