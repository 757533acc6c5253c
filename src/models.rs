use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    audit_logs, commandes, factures, notifications, paiements, payment_methods, produits,
    reclamations, users,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub role: String,
    pub actif: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Commande {
    pub id: Uuid,
    pub nom: String,
    pub adresse_depart: Option<String>,
    pub adresse_destination: Option<String>,
    pub adresse_actuel: Option<String>,
    pub nom_destinataire: Option<String>,
    pub telephone_destinataire: Option<String>,
    pub email_destinataire: Option<String>,
    pub valeur_marchandise: f64,
    pub type_transport: Option<String>,
    pub statut: String,
    pub raison_rejet: Option<String>,
    pub client_id: Uuid,
    pub assistant_id: Option<Uuid>,
    pub agent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produit {
    pub id: Uuid,
    pub commande_id: Uuid,
    pub nom: String,
    pub categorie: Option<String>,
    pub tarif_unitaire: f64,
    pub poids: f64,
    pub largeur: f64,
    pub longueur: f64,
    pub hauteur: f64,
    pub quantite: i32,
    pub type_conditionnement: Option<String>,
    pub fragile: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Facture {
    pub id: Uuid,
    pub numero_facture: i64,
    pub montant: f64,
    pub date_emission: DateTime<Utc>,
    pub date_echeance: Option<DateTime<Utc>>,
    pub status: String,
    pub document: Option<String>,
    pub commande_id: Uuid,
    pub client_id: Uuid,
    pub id_agent: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paiement {
    pub id: Uuid,
    pub id_facture: Uuid,
    pub client_id: Uuid,
    pub montant: f64,
    pub methode: Option<String>,
    pub statut: String,
    pub date_paiement: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    pub client_id: Uuid,
    pub type_methode: String,
    pub libelle: String,
    pub last4: Option<String>,
    pub par_defaut: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reclamation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub assistant_id: Option<Uuid>,
    pub commande_id: Option<Uuid>,
    pub sujet: String,
    pub description: String,
    pub status: String,
    pub response: Option<String>,
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_kind: String,
    pub recipient_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub correspond: String,
    pub lu: bool,
    pub commande_id: Option<Uuid>,
    pub facture_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            nom: model.nom,
            prenom: model.prenom,
            email: model.email,
            telephone: model.telephone,
            role: model.role,
            actif: model.actif,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<commandes::Model> for Commande {
    fn from(model: commandes::Model) -> Self {
        Self {
            id: model.id,
            nom: model.nom,
            adresse_depart: model.adresse_depart,
            adresse_destination: model.adresse_destination,
            adresse_actuel: model.adresse_actuel,
            nom_destinataire: model.nom_destinataire,
            telephone_destinataire: model.telephone_destinataire,
            email_destinataire: model.email_destinataire,
            valeur_marchandise: model.valeur_marchandise,
            type_transport: model.type_transport,
            statut: model.statut,
            raison_rejet: model.raison_rejet,
            client_id: model.client_id,
            assistant_id: model.assistant_id,
            agent_id: model.agent_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<produits::Model> for Produit {
    fn from(model: produits::Model) -> Self {
        Self {
            id: model.id,
            commande_id: model.commande_id,
            nom: model.nom,
            categorie: model.categorie,
            tarif_unitaire: model.tarif_unitaire,
            poids: model.poids,
            largeur: model.largeur,
            longueur: model.longueur,
            hauteur: model.hauteur,
            quantite: model.quantite,
            type_conditionnement: model.type_conditionnement,
            fragile: model.fragile,
        }
    }
}

impl From<factures::Model> for Facture {
    fn from(model: factures::Model) -> Self {
        Self {
            id: model.id,
            numero_facture: model.numero_facture,
            montant: model.montant,
            date_emission: model.date_emission.with_timezone(&Utc),
            date_echeance: model.date_echeance.map(|dt| dt.with_timezone(&Utc)),
            status: model.status,
            document: model.document,
            commande_id: model.commande_id,
            client_id: model.client_id,
            id_agent: model.id_agent,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<paiements::Model> for Paiement {
    fn from(model: paiements::Model) -> Self {
        Self {
            id: model.id,
            id_facture: model.id_facture,
            client_id: model.client_id,
            montant: model.montant,
            methode: model.methode,
            statut: model.statut,
            date_paiement: model.date_paiement.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<payment_methods::Model> for PaymentMethod {
    fn from(model: payment_methods::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            type_methode: model.type_methode,
            libelle: model.libelle,
            last4: model.last4,
            par_defaut: model.par_defaut,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<reclamations::Model> for Reclamation {
    fn from(model: reclamations::Model) -> Self {
        let documents = serde_json::from_value(model.documents).unwrap_or_default();
        Self {
            id: model.id,
            client_id: model.client_id,
            assistant_id: model.assistant_id,
            commande_id: model.commande_id,
            sujet: model.sujet,
            description: model.description,
            status: model.status,
            response: model.response,
            documents,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<notifications::Model> for Notification {
    fn from(model: notifications::Model) -> Self {
        Self {
            id: model.id,
            recipient_kind: model.recipient_kind,
            recipient_id: model.recipient_id,
            kind: model.kind,
            correspond: model.correspond,
            lu: model.lu,
            commande_id: model.commande_id,
            facture_id: model.facture_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<audit_logs::Model> for AuditLog {
    fn from(model: audit_logs::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            action: model.action,
            resource: model.resource,
            metadata: model.metadata,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
