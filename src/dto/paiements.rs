use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{Facture, Paiement, PaymentMethod},
    workflow::PaymentStatus,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaiementRequest {
    pub id_facture: Uuid,
    pub methode: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaiementRequest {
    pub statut: PaymentStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaiementWithFacture {
    pub paiement: Paiement,
    pub facture: Facture,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaiementList {
    pub items: Vec<Paiement>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRequest {
    #[serde(default)]
    pub type_methode: String,
    #[serde(default)]
    pub libelle: String,
    pub last4: Option<String>,
    pub par_defaut: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodList {
    pub items: Vec<PaymentMethod>,
}
