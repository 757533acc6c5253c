use logistique_api::{
    error::AppError,
    workflow::{
        InvoiceAction, InvoiceStatus, OrderAction, OrderStatus, PAYMENT_IN_PROGRESS,
        ReclamationAction, ReclamationStatus, Role, TransitionError, invoice_transition,
        order_transition, reclamation_transition,
    },
};

#[test]
fn client_edits_and_cancels_only_pending_orders() {
    let edit = order_transition(OrderStatus::EnAttente, OrderAction::Edit, Role::Client).unwrap();
    assert_eq!(edit.to, OrderStatus::EnAttente);
    assert!(!edit.notify);

    let cancel =
        order_transition(OrderStatus::EnAttente, OrderAction::Cancel, Role::Client).unwrap();
    assert_eq!(cancel.to, OrderStatus::Annulee);
    assert!(cancel.notify);

    for status in [
        OrderStatus::Acceptee,
        OrderStatus::EnCours,
        OrderStatus::Expediee,
        OrderStatus::Livree,
    ] {
        assert!(matches!(
            order_transition(status, OrderAction::Edit, Role::Client),
            Err(TransitionError::InvalidState(_))
        ));
        assert!(matches!(
            order_transition(status, OrderAction::Cancel, Role::Client),
            Err(TransitionError::InvalidState(_))
        ));
    }
}

#[test]
fn staff_accept_and_reject_pending_orders() {
    for role in [Role::Assistant, Role::Agent] {
        let accepted = order_transition(OrderStatus::EnAttente, OrderAction::Accept, role).unwrap();
        assert_eq!(accepted.to, OrderStatus::Acceptee);
        let rejected = order_transition(OrderStatus::EnAttente, OrderAction::Reject, role).unwrap();
        assert_eq!(rejected.to, OrderStatus::Refusee);
    }

    let err = order_transition(OrderStatus::Livree, OrderAction::Accept, Role::Assistant)
        .unwrap_err();
    assert_eq!(
        err,
        TransitionError::InvalidState(
            "Impossible d'accepter une commande au statut « Livrée »".into()
        )
    );
}

#[test]
fn wrong_role_is_forbidden_not_bad_request() {
    let err = order_transition(OrderStatus::EnAttente, OrderAction::Accept, Role::Client)
        .unwrap_err();
    assert_eq!(err, TransitionError::RoleNotAllowed);
    assert!(matches!(AppError::from(err), AppError::Forbidden(_)));

    let err = order_transition(
        OrderStatus::Acceptee,
        OrderAction::Advance(OrderStatus::EnCours),
        Role::Admin,
    )
    .unwrap_err();
    assert_eq!(err, TransitionError::RoleNotAllowed);

    let err = order_transition(OrderStatus::Livree, OrderAction::Accept, Role::Agent).unwrap_err();
    assert!(matches!(AppError::from(err), AppError::BadRequest(_)));
}

#[test]
fn status_only_moves_forward_along_the_delivery_chain() {
    let t = order_transition(
        OrderStatus::Acceptee,
        OrderAction::Advance(OrderStatus::Expediee),
        Role::Agent,
    )
    .unwrap();
    assert_eq!(t.to, OrderStatus::Expediee);
    assert!(t.notify);
    assert!(t.changes_status());

    assert!(
        order_transition(
            OrderStatus::Expediee,
            OrderAction::Advance(OrderStatus::EnCours),
            Role::Agent,
        )
        .is_err()
    );
    assert!(
        order_transition(
            OrderStatus::EnAttente,
            OrderAction::Advance(OrderStatus::EnCours),
            Role::Assistant,
        )
        .is_err()
    );
    assert!(
        order_transition(
            OrderStatus::Acceptee,
            OrderAction::Advance(OrderStatus::Annulee),
            Role::Assistant,
        )
        .is_err()
    );
}

#[test]
fn advancing_to_the_current_status_is_a_silent_no_op() {
    let t = order_transition(
        OrderStatus::EnCours,
        OrderAction::Advance(OrderStatus::EnCours),
        Role::Assistant,
    )
    .unwrap();
    assert!(!t.changes_status());
    assert!(!t.notify);
}

#[test]
fn only_finished_orders_can_be_archived() {
    for status in [OrderStatus::Livree, OrderStatus::Annulee, OrderStatus::Refusee] {
        for role in [Role::Assistant, Role::Agent, Role::Admin] {
            let t = order_transition(status, OrderAction::Archive, role).unwrap();
            assert_eq!(t.to, OrderStatus::Archivee);
        }
    }
    assert!(order_transition(OrderStatus::EnCours, OrderAction::Archive, Role::Admin).is_err());
    assert_eq!(
        order_transition(OrderStatus::Livree, OrderAction::Archive, Role::Client).unwrap_err(),
        TransitionError::RoleNotAllowed
    );
}

#[test]
fn invoice_payment_cycle() {
    let started =
        invoice_transition(InvoiceStatus::EnAttente, InvoiceAction::StartPayment, Role::Client)
            .unwrap();
    assert_eq!(started.to, InvoiceStatus::EnCoursDePaiement);

    let overdue =
        invoice_transition(InvoiceStatus::EnRetard, InvoiceAction::StartPayment, Role::Client)
            .unwrap();
    assert_eq!(overdue.to, InvoiceStatus::EnCoursDePaiement);

    let paid = invoice_transition(
        InvoiceStatus::EnCoursDePaiement,
        InvoiceAction::ConfirmPayment,
        Role::Assistant,
    )
    .unwrap();
    assert_eq!(paid.to, InvoiceStatus::Payee);

    let refused = invoice_transition(
        InvoiceStatus::EnCoursDePaiement,
        InvoiceAction::RefusePayment,
        Role::Assistant,
    )
    .unwrap();
    assert_eq!(refused.to, InvoiceStatus::EnAttente);
}

#[test]
fn paid_or_busy_invoices_cannot_be_paid_again() {
    assert_eq!(
        invoice_transition(InvoiceStatus::Payee, InvoiceAction::StartPayment, Role::Client)
            .unwrap_err(),
        TransitionError::InvalidState("Cette facture est déjà payée".into())
    );
    assert_eq!(
        invoice_transition(
            InvoiceStatus::EnCoursDePaiement,
            InvoiceAction::StartPayment,
            Role::Client
        )
        .unwrap_err(),
        TransitionError::InvalidState(PAYMENT_IN_PROGRESS.into())
    );
    assert!(
        invoice_transition(InvoiceStatus::NonEnvoyee, InvoiceAction::StartPayment, Role::Client)
            .is_err()
    );
}

#[test]
fn only_assistants_confirm_payments() {
    for role in [Role::Client, Role::Agent, Role::Admin] {
        assert_eq!(
            invoice_transition(
                InvoiceStatus::EnCoursDePaiement,
                InvoiceAction::ConfirmPayment,
                role
            )
            .unwrap_err(),
            TransitionError::RoleNotAllowed
        );
    }
}

#[test]
fn drafts_are_sent_before_they_can_go_overdue() {
    let sent =
        invoice_transition(InvoiceStatus::NonEnvoyee, InvoiceAction::Send, Role::Agent).unwrap();
    assert_eq!(sent.to, InvoiceStatus::EnAttente);
    assert!(
        invoice_transition(InvoiceStatus::NonEnvoyee, InvoiceAction::MarkOverdue, Role::Agent)
            .is_err()
    );
    assert!(
        invoice_transition(InvoiceStatus::EnAttente, InvoiceAction::Send, Role::Assistant).is_err()
    );
}

#[test]
fn reclamation_lifecycle() {
    let taken = reclamation_transition(
        ReclamationStatus::Ouverte,
        ReclamationAction::TakeCharge,
        Role::Assistant,
    )
    .unwrap();
    assert_eq!(taken.to, ReclamationStatus::EnCours);

    let answered = reclamation_transition(
        ReclamationStatus::EnCours,
        ReclamationAction::Respond(ReclamationStatus::Resolue),
        Role::Assistant,
    )
    .unwrap();
    assert_eq!(answered.to, ReclamationStatus::Resolue);

    let closed =
        reclamation_transition(ReclamationStatus::Resolue, ReclamationAction::Close, Role::Client)
            .unwrap();
    assert_eq!(closed.to, ReclamationStatus::Fermee);

    assert!(
        reclamation_transition(ReclamationStatus::EnCours, ReclamationAction::Edit, Role::Client)
            .is_err()
    );
    assert!(
        reclamation_transition(
            ReclamationStatus::EnCours,
            ReclamationAction::Respond(ReclamationStatus::Fermee),
            Role::Assistant,
        )
        .is_err()
    );
    assert!(
        reclamation_transition(ReclamationStatus::Fermee, ReclamationAction::Close, Role::Assistant)
            .is_err()
    );
}

#[test]
fn labels_round_trip_through_their_french_form() {
    assert_eq!("Expédiée".parse::<OrderStatus>().unwrap(), OrderStatus::Expediee);
    assert_eq!(
        "En cours de paiement".parse::<InvoiceStatus>().unwrap(),
        InvoiceStatus::EnCoursDePaiement
    );
    assert_eq!("Résolu".parse::<ReclamationStatus>().unwrap(), ReclamationStatus::Resolue);
    assert!("shipped".parse::<OrderStatus>().is_err());
    assert_eq!(
        serde_json::to_string(&OrderStatus::Acceptee).unwrap(),
        "\"Acceptée\""
    );
    assert_eq!("admin".parse::<Role>().unwrap().label(), "Administrateur");
}
