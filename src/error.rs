use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

pub const INTERNAL_MESSAGE: &str = "Erreur interne du serveur";
pub const PAYMENT_EXISTS: &str = "Un paiement existe déjà pour cette facture";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Données invalides")]
    Validation(BTreeMap<String, String>),

    #[error("{error}")]
    Constraint { error: String, details: String },

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Non authentifié".into())
    }

    pub fn forbidden() -> Self {
        AppError::Forbidden("Accès refusé".into())
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} introuvable"))
    }

    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), message.to_string());
        AppError::Validation(errors)
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("id_facture") => {
                AppError::BadRequest(PAYMENT_EXISTS.into())
            }
            Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Constraint {
                error: "Cette valeur existe déjà".into(),
                details: detail,
            },
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => AppError::Constraint {
                error: "Opération impossible : l'enregistrement est référencé par d'autres données"
                    .into(),
                details: detail,
            },
            _ => AppError::OrmError(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "json body rejected");
        match rejection {
            JsonRejection::JsonDataError(err) => data_error(&err.body_text()),
            JsonRejection::MissingJsonContentType(_) => {
                AppError::BadRequest("Le corps de la requête doit être au format JSON".into())
            }
            _ => AppError::BadRequest(crate::extract::INVALID_JSON.into()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "path rejected");
        AppError::BadRequest("Identifiant invalide".into())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "query rejected");
        AppError::BadRequest("Paramètres de requête invalides".into())
    }
}

/// Turns a deserialization failure into a field error when the offending
/// field can be read from the message (`path: reason` or `missing field`).
fn data_error(text: &str) -> AppError {
    let detail = text.split_once("target type: ").map_or(text, |(_, d)| d);
    if let Some(rest) = detail.strip_prefix("missing field `") {
        if let Some(field) = rest.split('`').next() {
            return AppError::field(field, "Ce champ est requis");
        }
    }
    match detail.split_once(": ") {
        Some((path, _)) if !path.is_empty() && !path.contains(' ') => {
            AppError::field(path, "Valeur invalide")
        }
        _ => AppError::BadRequest("Données invalides".into()),
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, plain(message)),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, plain(message)),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, plain(message)),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, plain(message)),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Données invalides".into(),
                    errors: Some(errors),
                    details: None,
                },
            ),
            AppError::Constraint { error, details } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    errors: None,
                    details: Some(details),
                },
            ),
            AppError::DbError(err) => {
                tracing::error!(error = ?err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, plain(INTERNAL_MESSAGE.into()))
            }
            AppError::OrmError(err) => {
                tracing::error!(error = ?err, "orm error");
                (StatusCode::INTERNAL_SERVER_ERROR, plain(INTERNAL_MESSAGE.into()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, plain(INTERNAL_MESSAGE.into()))
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn plain(error: String) -> ErrorBody {
    ErrorBody {
        error,
        errors: None,
        details: None,
    }
}

pub type AppResult<T> = Result<T, AppError>;
