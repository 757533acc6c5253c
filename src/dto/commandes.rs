use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::de,
    error::AppError,
    models::{Commande, Facture, Produit},
    workflow::OrderStatus,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProduitInput {
    #[serde(default)]
    pub nom: String,
    pub categorie: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub tarif_unitaire: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub poids: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub largeur: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub longueur: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub hauteur: f64,
    #[serde(default, deserialize_with = "de::integer")]
    pub quantite: i32,
    pub type_conditionnement: Option<String>,
    #[serde(default)]
    pub fragile: bool,
}

/// Body of both order creation and the client's full replacement update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommandeRequest {
    #[serde(default)]
    pub nom: String,
    pub adresse_depart: Option<String>,
    pub adresse_destination: Option<String>,
    pub nom_destinataire: Option<String>,
    pub telephone_destinataire: Option<String>,
    pub email_destinataire: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub valeur_marchandise: f64,
    pub type_transport: Option<String>,
    #[serde(default)]
    pub produits: Vec<ProduitInput>,
}

impl CommandeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = BTreeMap::new();
        if self.nom.trim().is_empty() {
            errors.insert("nom".to_string(), "Le nom de la commande est requis".to_string());
        }
        if !self.valeur_marchandise.is_finite() || self.valeur_marchandise < 0.0 {
            errors.insert(
                "valeurMarchandise".to_string(),
                "La valeur de la marchandise doit être positive".to_string(),
            );
        }
        if self.produits.is_empty() {
            errors.insert(
                "produits".to_string(),
                "Au moins un produit est requis".to_string(),
            );
        }
        for (i, produit) in self.produits.iter().enumerate() {
            if produit.nom.trim().is_empty() {
                errors.insert(
                    format!("produits[{i}].nom"),
                    "Le nom du produit est requis".to_string(),
                );
            }
            if produit.quantite < 1 {
                errors.insert(
                    format!("produits[{i}].quantite"),
                    "La quantité doit être au moins 1".to_string(),
                );
            }
            let measures = [
                ("tarifUnitaire", produit.tarif_unitaire),
                ("poids", produit.poids),
                ("largeur", produit.largeur),
                ("longueur", produit.longueur),
                ("hauteur", produit.hauteur),
            ];
            for (field, value) in measures {
                if !value.is_finite() || value < 0.0 {
                    errors.insert(
                        format!("produits[{i}].{field}"),
                        "La valeur doit être un nombre positif".to_string(),
                    );
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectRequest {
    pub raison: Option<String>,
}

impl RejectRequest {
    /// Returns the trimmed reason or the field error the forms expect.
    pub fn reason(&self) -> Result<String, AppError> {
        match self.raison.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => Ok(r.to_string()),
            _ => Err(AppError::field("raison", "La raison du rejet est requise")),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatutRequest {
    pub statut: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignAgentRequest {
    pub agent_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdresseRequest {
    #[serde(default)]
    pub adresse_actuel: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommandeWithProduits {
    pub commande: Commande,
    pub produits: Vec<Produit>,
    pub factures: Vec<Facture>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommandeList {
    pub items: Vec<Commande>,
}
