use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::de,
    models::{Facture, Paiement},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFactureRequest {
    pub commande_id: Uuid,
    /// Defaults to the sum of the order's line items.
    #[serde(default, deserialize_with = "de::opt_number")]
    pub montant: Option<f64>,
    pub date_echeance: Option<DateTime<Utc>>,
    /// `false` keeps the invoice as a draft ("Non envoyée").
    pub envoyer: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FactureWithPaiement {
    pub facture: Facture,
    pub paiement: Option<Paiement>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FactureList {
    pub items: Vec<Facture>,
}
