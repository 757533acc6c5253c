mod common;

use common::{create_user, setup_state};
use logistique_api::{
    dto::users::{CreateUserRequest, UpdateUserRequest, UserStatusRequest},
    entity::users::{Column as UserCol, Entity as Users},
    error::AppError,
    routes::params::UserListQuery,
    services::user_service::{self, LAST_ADMIN},
    workflow::Role,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};

fn is_last_admin(err: &AppError) -> bool {
    matches!(err, AppError::BadRequest(msg) if msg == LAST_ADMIN)
}

// Admin accounts: the last active admin can be neither disabled, demoted nor deleted,
// and nobody deletes their own account. Kept in one test so no other admin appears midway.
#[tokio::test]
async fn last_admin_and_self_delete_are_guarded() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = create_user(&state, Role::Admin).await?;
    Users::update_many()
        .col_expr(UserCol::Actif, Expr::value(false))
        .filter(UserCol::Role.eq(Role::Admin.as_str()))
        .filter(UserCol::Id.ne(admin.user_id))
        .exec(&state.orm)
        .await?;

    let err = user_service::set_status(&state, &admin, admin.user_id, UserStatusRequest { actif: false })
        .await
        .unwrap_err();
    assert!(is_last_admin(&err));

    let err = user_service::update(
        &state,
        &admin,
        admin.user_id,
        UpdateUserRequest {
            role: Some(Role::Assistant),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(is_last_admin(&err));

    let err = user_service::delete(&state, &admin, admin.user_id)
        .await
        .unwrap_err();
    assert!(is_last_admin(&err));

    // A second admin lifts the guard for the first one.
    let second = user_service::create(
        &state,
        &admin,
        CreateUserRequest {
            nom: "Bernard".into(),
            prenom: "Lucie".into(),
            email: format!("LUCIE.{}@Test.Local", admin.user_id),
            password: "motdepasse123".into(),
            telephone: None,
            role: Role::Admin,
        },
    )
    .await?
    .data
    .expect("user");
    assert_eq!(second.email, format!("lucie.{}@test.local", admin.user_id));

    let found = user_service::list(
        &state,
        &admin,
        UserListQuery {
            q: Some(format!("LUCIE.{}", admin.user_id)),
            role: Some("admin".into()),
            ..Default::default()
        },
    )
    .await?;
    let found = found.data.expect("users").items;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, second.id);

    let err = user_service::delete(&state, &admin, admin.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("propre compte")));

    let disabled = user_service::set_status(&state, &admin, second.id, UserStatusRequest { actif: false })
        .await?
        .data
        .expect("user");
    assert!(!disabled.actif);

    let err = user_service::create(
        &state,
        &admin,
        CreateUserRequest {
            nom: "Bernard".into(),
            prenom: "Lucie".into(),
            email: second.email.clone(),
            password: "motdepasse123".into(),
            telephone: None,
            role: Role::Client,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Cet email est déjà utilisé"));

    let deleted = user_service::delete(&state, &admin, second.id)
        .await?
        .data
        .expect("affected");
    assert_eq!(deleted.count, 1);
    Ok(())
}

#[tokio::test]
async fn non_admin_callers_are_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let client = create_user(&state, Role::Client).await?;
    let assistant = create_user(&state, Role::Assistant).await?;

    let err = user_service::list(&state, &assistant, UserListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = user_service::export_csv(&state, &client, UserListQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    Ok(())
}
