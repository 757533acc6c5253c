use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, models::Reclamation};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReclamationRequest {
    #[serde(default)]
    pub sujet: String,
    #[serde(default)]
    pub description: String,
    pub commande_id: Option<Uuid>,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl ReclamationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = BTreeMap::new();
        if self.sujet.trim().is_empty() {
            errors.insert("sujet".to_string(), "Le sujet est requis".to_string());
        }
        if self.description.trim().is_empty() {
            errors.insert(
                "description".to_string(),
                "La description est requise".to_string(),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RespondRequest {
    #[serde(default)]
    pub response: String,
    /// Status label; "Résolu" is accepted for "Résolue".
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReclamationList {
    pub items: Vec<Reclamation>,
}
