use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::auth::looks_like_email,
    error::AppError,
    models::{AuditLog, User},
    workflow::Role,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub telephone: Option<String>,
    pub role: Role,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = BTreeMap::new();
        if self.nom.trim().is_empty() {
            errors.insert("nom".to_string(), "Le nom est requis".to_string());
        }
        if self.prenom.trim().is_empty() {
            errors.insert("prenom".to_string(), "Le prénom est requis".to_string());
        }
        if !looks_like_email(&self.email) {
            errors.insert("email".to_string(), "Email invalide".to_string());
        }
        if self.password.chars().count() < 8 {
            errors.insert(
                "password".to_string(),
                "Le mot de passe doit contenir au moins 8 caractères".to_string(),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub telephone: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserStatusRequest {
    pub actif: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountByLabel {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: Vec<CountByLabel>,
    pub commandes: Vec<CountByLabel>,
    pub factures: Vec<CountByLabel>,
    pub total_paye: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogList {
    pub items: Vec<AuditLog>,
}
