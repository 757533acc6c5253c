use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    entity::notifications::{ActiveModel as NotificationActive, Model as NotificationModel},
    error::AppResult,
    workflow::Role,
};

/// The single account a notification row targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Recipient {
    Client(Uuid),
    Assistant(Uuid),
    Agent(Uuid),
}

impl Recipient {
    /// Admins have no inbox.
    pub fn for_role(role: Role, id: Uuid) -> Option<Self> {
        match role {
            Role::Client => Some(Recipient::Client(id)),
            Role::Assistant => Some(Recipient::Assistant(id)),
            Role::Agent => Some(Recipient::Agent(id)),
            Role::Admin => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Recipient::Client(_) => "client",
            Recipient::Assistant(_) => "assistant",
            Recipient::Agent(_) => "agent",
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            Recipient::Client(id) | Recipient::Assistant(id) | Recipient::Agent(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Commande,
    Facture,
    Paiement,
    Reclamation,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Commande => "commande",
            NotificationKind::Facture => "facture",
            NotificationKind::Paiement => "paiement",
            NotificationKind::Reclamation => "reclamation",
        }
    }
}

/// A notification about to be written.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient: Recipient,
    pub kind: NotificationKind,
    pub message: String,
    pub commande_id: Option<Uuid>,
    pub facture_id: Option<Uuid>,
}

impl NewNotification {
    pub fn new(recipient: Recipient, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            recipient,
            kind,
            message: message.into(),
            commande_id: None,
            facture_id: None,
        }
    }

    pub fn commande(mut self, id: Uuid) -> Self {
        self.commande_id = Some(id);
        self
    }

    pub fn facture(mut self, id: Uuid) -> Self {
        self.facture_id = Some(id);
        self
    }
}

/// Insert a notification on `conn`; pass the open transaction so the row
/// commits or rolls back with the mutation that caused it.
pub async fn push<C>(conn: &C, notification: NewNotification) -> AppResult<NotificationModel>
where
    C: ConnectionTrait,
{
    let row = NotificationActive {
        id: Set(Uuid::new_v4()),
        recipient_kind: Set(notification.recipient.kind().to_string()),
        recipient_id: Set(notification.recipient.id()),
        kind: Set(notification.kind.as_str().to_string()),
        correspond: Set(notification.message),
        lu: Set(false),
        commande_id: Set(notification.commande_id),
        facture_id: Set(notification.facture_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    tracing::debug!(
        recipient = row.recipient_kind.as_str(),
        recipient_id = %row.recipient_id,
        kind = row.kind.as_str(),
        "notification created"
    );
    Ok(row)
}
