//! Status vocabularies and the transition tables every handler goes through.
//!
//! Statuses are stored as their French labels. Each table row names the
//! statuses an action may start from, the roles allowed to trigger it, the
//! resulting status and whether the client gets a notification.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Agent,
    Assistant,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Client, Role::Agent, Role::Assistant, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Agent => "agent",
            Role::Assistant => "assistant",
            Role::Admin => "admin",
        }
    }

    /// Label used in exports and messages.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Agent => "Agent",
            Role::Assistant => "Assistant",
            Role::Admin => "Administrateur",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Agent | Role::Assistant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a status or role label that is not part of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "valeur inconnue « {} »", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

impl From<UnknownLabel> for AppError {
    fn from(err: UnknownLabel) -> Self {
        AppError::Internal(anyhow::anyhow!("corrupted status column: {err}"))
    }
}

impl FromStr for Role {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

macro_rules! labelled_status {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_status!(OrderStatus {
    EnAttente => "En attente",
    Acceptee => "Acceptée",
    EnCours => "En cours",
    Expediee => "Expédiée",
    Livree => "Livrée",
    Annulee => "Annulée",
    Refusee => "Refusée",
    Archivee => "Archivée",
});

labelled_status!(InvoiceStatus {
    NonEnvoyee => "Non envoyée",
    EnAttente => "En attente",
    EnCoursDePaiement => "En cours de paiement",
    Payee => "Payée",
    EnRetard => "En retard",
});

labelled_status!(PaymentStatus {
    EnAttente => "En attente",
    Paye => "Payé",
    Refuse => "Refusé",
});

labelled_status!(ReclamationStatus {
    Ouverte => "Ouverte",
    EnCours => "En cours",
    EnAttente => "En attente",
    Resolue => "Résolue",
    Fermee => "Fermée",
});

impl FromStr for OrderStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_label(Self::ALL, s, Self::as_str)
    }
}

impl FromStr for InvoiceStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_label(Self::ALL, s, Self::as_str)
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find_label(Self::ALL, s, Self::as_str)
    }
}

impl FromStr for ReclamationStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Older clients still send the masculine form.
        if s == "Résolu" {
            return Ok(ReclamationStatus::Resolue);
        }
        find_label(Self::ALL, s, Self::as_str)
    }
}

fn find_label<S: Copy>(all: &[S], s: &str, label: fn(&S) -> &'static str) -> Result<S, UnknownLabel> {
    all.iter()
        .copied()
        .find(|v| label(v) == s)
        .ok_or_else(|| UnknownLabel(s.to_string()))
}

impl OrderStatus {
    /// Position along the delivery chain, `None` outside of it.
    pub fn progress_rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Acceptee => Some(1),
            OrderStatus::EnCours => Some(2),
            OrderStatus::Expediee => Some(3),
            OrderStatus::Livree => Some(4),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Annulee | OrderStatus::Refusee | OrderStatus::Archivee
        )
    }
}

/// Outcome of a permitted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: S,
    pub to: S,
    pub notify: bool,
}

impl<S: PartialEq> Transition<S> {
    pub fn changes_status(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The role may never perform this action.
    RoleNotAllowed,
    /// The action exists for this role but not from the current status.
    InvalidState(String),
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::RoleNotAllowed => f.write_str("Action non autorisée pour ce rôle"),
            TransitionError::InvalidState(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for TransitionError {}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::RoleNotAllowed => AppError::Forbidden(err.to_string()),
            TransitionError::InvalidState(msg) => AppError::BadRequest(msg),
        }
    }
}

struct Rule<S: 'static, A> {
    action: A,
    from: &'static [S],
    roles: &'static [Role],
    /// `None` means the caller-requested status.
    to: Option<S>,
    notify: bool,
}

fn lookup<S, A>(
    rules: &'static [Rule<S, A>],
    current: S,
    action: A,
    role: Role,
    refusal: impl FnOnce() -> String,
) -> Result<&'static Rule<S, A>, TransitionError>
where
    S: Copy + PartialEq,
    A: Copy + PartialEq,
{
    let mut candidates = rules
        .iter()
        .filter(|r| r.action == action && r.roles.contains(&role))
        .peekable();
    if candidates.peek().is_none() {
        return Err(TransitionError::RoleNotAllowed);
    }
    candidates
        .find(|r| r.from.contains(&current))
        .ok_or_else(|| TransitionError::InvalidState(refusal()))
}

const STAFF: &[Role] = &[Role::Assistant, Role::Agent];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Edit,
    Cancel,
    Accept,
    Reject,
    Advance(OrderStatus),
    Archive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderActionKind {
    Edit,
    Cancel,
    Accept,
    Reject,
    Advance,
    Archive,
}

impl OrderAction {
    fn kind(&self) -> OrderActionKind {
        match self {
            OrderAction::Edit => OrderActionKind::Edit,
            OrderAction::Cancel => OrderActionKind::Cancel,
            OrderAction::Accept => OrderActionKind::Accept,
            OrderAction::Reject => OrderActionKind::Reject,
            OrderAction::Advance(_) => OrderActionKind::Advance,
            OrderAction::Archive => OrderActionKind::Archive,
        }
    }
}

static ORDER_RULES: &[Rule<OrderStatus, OrderActionKind>] = &[
    Rule {
        action: OrderActionKind::Edit,
        from: &[OrderStatus::EnAttente],
        roles: &[Role::Client],
        to: Some(OrderStatus::EnAttente),
        notify: false,
    },
    Rule {
        action: OrderActionKind::Cancel,
        from: &[OrderStatus::EnAttente],
        roles: &[Role::Client],
        to: Some(OrderStatus::Annulee),
        notify: true,
    },
    Rule {
        action: OrderActionKind::Cancel,
        from: &[OrderStatus::Acceptee, OrderStatus::EnCours],
        roles: STAFF,
        to: Some(OrderStatus::Annulee),
        notify: true,
    },
    Rule {
        action: OrderActionKind::Accept,
        from: &[OrderStatus::EnAttente],
        roles: STAFF,
        to: Some(OrderStatus::Acceptee),
        notify: true,
    },
    Rule {
        action: OrderActionKind::Reject,
        from: &[OrderStatus::EnAttente],
        roles: STAFF,
        to: Some(OrderStatus::Refusee),
        notify: true,
    },
    Rule {
        action: OrderActionKind::Advance,
        from: &[
            OrderStatus::Acceptee,
            OrderStatus::EnCours,
            OrderStatus::Expediee,
        ],
        roles: STAFF,
        to: None,
        notify: true,
    },
    Rule {
        action: OrderActionKind::Archive,
        from: &[
            OrderStatus::Livree,
            OrderStatus::Annulee,
            OrderStatus::Refusee,
        ],
        roles: &[Role::Assistant, Role::Agent, Role::Admin],
        to: Some(OrderStatus::Archivee),
        notify: false,
    },
];

pub fn order_transition(
    current: OrderStatus,
    action: OrderAction,
    role: Role,
) -> Result<Transition<OrderStatus>, TransitionError> {
    if let OrderAction::Advance(target) = action {
        if !STAFF.contains(&role) {
            return Err(TransitionError::RoleNotAllowed);
        }
        if target.progress_rank().is_none() {
            return Err(TransitionError::InvalidState(format!(
                "Statut cible invalide : « {target} »"
            )));
        }
        if target == current {
            return Ok(Transition {
                from: current,
                to: current,
                notify: false,
            });
        }
    }

    let rule = lookup(ORDER_RULES, current, action.kind(), role, || {
        order_refusal(current, action)
    })?;

    let to = match (rule.to, action) {
        (Some(to), _) => to,
        (None, OrderAction::Advance(target)) => {
            let from_rank = current.progress_rank().unwrap_or(0);
            let to_rank = target.progress_rank().unwrap_or(0);
            if to_rank <= from_rank {
                return Err(TransitionError::InvalidState(order_refusal(current, action)));
            }
            target
        }
        (None, _) => current,
    };

    Ok(Transition {
        from: current,
        to,
        notify: rule.notify,
    })
}

fn order_refusal(current: OrderStatus, action: OrderAction) -> String {
    match action {
        OrderAction::Edit => "Seules les commandes en attente peuvent être modifiées".to_string(),
        OrderAction::Cancel => {
            format!("Impossible d'annuler une commande au statut « {current} »")
        }
        OrderAction::Accept => {
            format!("Impossible d'accepter une commande au statut « {current} »")
        }
        OrderAction::Reject => {
            format!("Impossible de refuser une commande au statut « {current} »")
        }
        OrderAction::Advance(target) => {
            format!("Transition de « {current} » vers « {target} » non autorisée")
        }
        OrderAction::Archive => {
            format!("Impossible d'archiver une commande au statut « {current} »")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceAction {
    Send,
    StartPayment,
    MarkOverdue,
    ConfirmPayment,
    RefusePayment,
}

static INVOICE_RULES: &[Rule<InvoiceStatus, InvoiceAction>] = &[
    Rule {
        action: InvoiceAction::Send,
        from: &[InvoiceStatus::NonEnvoyee],
        roles: STAFF,
        to: Some(InvoiceStatus::EnAttente),
        notify: true,
    },
    Rule {
        action: InvoiceAction::StartPayment,
        from: &[InvoiceStatus::EnAttente, InvoiceStatus::EnRetard],
        roles: &[Role::Client],
        to: Some(InvoiceStatus::EnCoursDePaiement),
        notify: true,
    },
    Rule {
        action: InvoiceAction::MarkOverdue,
        from: &[InvoiceStatus::EnAttente],
        roles: STAFF,
        to: Some(InvoiceStatus::EnRetard),
        notify: true,
    },
    Rule {
        action: InvoiceAction::ConfirmPayment,
        from: &[InvoiceStatus::EnCoursDePaiement],
        roles: &[Role::Assistant],
        to: Some(InvoiceStatus::Payee),
        notify: true,
    },
    Rule {
        action: InvoiceAction::RefusePayment,
        from: &[InvoiceStatus::EnCoursDePaiement],
        roles: &[Role::Assistant],
        to: Some(InvoiceStatus::EnAttente),
        notify: true,
    },
];

pub fn invoice_transition(
    current: InvoiceStatus,
    action: InvoiceAction,
    role: Role,
) -> Result<Transition<InvoiceStatus>, TransitionError> {
    let rule = lookup(INVOICE_RULES, current, action, role, || match (action, current) {
        (InvoiceAction::StartPayment, InvoiceStatus::Payee) => {
            "Cette facture est déjà payée".to_string()
        }
        (InvoiceAction::StartPayment, InvoiceStatus::EnCoursDePaiement) => {
            PAYMENT_IN_PROGRESS.to_string()
        }
        _ => format!("Opération impossible sur une facture au statut « {current} »"),
    })?;
    Ok(Transition {
        from: current,
        to: rule.to.unwrap_or(current),
        notify: rule.notify,
    })
}

pub const PAYMENT_IN_PROGRESS: &str = "Un paiement est déjà en cours pour cette facture";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclamationAction {
    Edit,
    TakeCharge,
    Respond(ReclamationStatus),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReclamationActionKind {
    Edit,
    TakeCharge,
    Respond,
    Close,
}

static RECLAMATION_RULES: &[Rule<ReclamationStatus, ReclamationActionKind>] = &[
    Rule {
        action: ReclamationActionKind::Edit,
        from: &[ReclamationStatus::Ouverte],
        roles: &[Role::Client],
        to: Some(ReclamationStatus::Ouverte),
        notify: false,
    },
    Rule {
        action: ReclamationActionKind::TakeCharge,
        from: &[ReclamationStatus::Ouverte],
        roles: &[Role::Assistant],
        to: Some(ReclamationStatus::EnCours),
        notify: true,
    },
    Rule {
        action: ReclamationActionKind::Respond,
        from: &[
            ReclamationStatus::Ouverte,
            ReclamationStatus::EnCours,
            ReclamationStatus::EnAttente,
        ],
        roles: &[Role::Assistant],
        to: None,
        notify: true,
    },
    Rule {
        action: ReclamationActionKind::Close,
        from: &[
            ReclamationStatus::Ouverte,
            ReclamationStatus::EnCours,
            ReclamationStatus::EnAttente,
            ReclamationStatus::Resolue,
        ],
        roles: &[Role::Client, Role::Assistant],
        to: Some(ReclamationStatus::Fermee),
        notify: true,
    },
];

pub fn reclamation_transition(
    current: ReclamationStatus,
    action: ReclamationAction,
    role: Role,
) -> Result<Transition<ReclamationStatus>, TransitionError> {
    let kind = match action {
        ReclamationAction::Edit => ReclamationActionKind::Edit,
        ReclamationAction::TakeCharge => ReclamationActionKind::TakeCharge,
        ReclamationAction::Respond(_) => ReclamationActionKind::Respond,
        ReclamationAction::Close => ReclamationActionKind::Close,
    };
    let rule = lookup(RECLAMATION_RULES, current, kind, role, || match action {
        ReclamationAction::Edit => {
            "Seules les réclamations ouvertes peuvent être modifiées".to_string()
        }
        _ => format!("Opération impossible sur une réclamation au statut « {current} »"),
    })?;

    let to = match (rule.to, action) {
        (Some(to), _) => to,
        (None, ReclamationAction::Respond(target)) => {
            if !matches!(
                target,
                ReclamationStatus::EnCours
                    | ReclamationStatus::EnAttente
                    | ReclamationStatus::Resolue
            ) {
                return Err(TransitionError::InvalidState(format!(
                    "Statut de réponse invalide : « {target} »"
                )));
            }
            target
        }
        (None, _) => current,
    };

    Ok(Transition {
        from: current,
        to,
        notify: rule.notify,
    })
}
