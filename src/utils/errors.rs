//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Nombre del índice parcial que garantiza una sola asignación activa por espacio
pub const ONE_ACTIVE_PER_SPACE_CONSTRAINT: &str = "ux_parking_assignments_one_active_per_space";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Referenced entity not found: {0}")]
    ReferenceNotFound(String),

    #[error("Ownership mismatch: {0}")]
    OwnershipMismatch(String),

    #[error("Parking space {space_id} is already held by assignment {holder_id}")]
    SpaceConflict { space_id: i64, holder_id: i64 },

    #[error("Identifier mismatch: path id {path_id} != body id {body_id}")]
    IdentifierMismatch { path_id: i64, body_id: i64 },

    #[error("Storage conflict: {0}")]
    StorageConflict(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Entity in use: {0}")]
    EntityInUse(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Availability projection failed for parking space {space_id}: {message}")]
    ProjectionFailed { space_id: i64, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Código estable que se expone en el cuerpo de la respuesta
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ReferenceNotFound(_) => "REFERENCE_NOT_FOUND",
            AppError::OwnershipMismatch(_) => "OWNERSHIP_MISMATCH",
            AppError::SpaceConflict { .. } => "SPACE_CONFLICT",
            AppError::IdentifierMismatch { .. } => "IDENTIFIER_MISMATCH",
            AppError::StorageConflict(_) => "STORAGE_CONFLICT",
            AppError::Conflict(_) => "CONFLICT",
            AppError::EntityInUse(_) => "ENTITY_IN_USE",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::ProjectionFailed { .. } => "PROJECTION_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// El llamador puede reintentar la operación tal cual
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageConflict(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::ProjectionFailed { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_)
            | AppError::ReferenceNotFound(_)
            | AppError::OwnershipMismatch(_)
            | AppError::IdentifierMismatch { .. }
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SpaceConflict { .. }
            | AppError::StorageConflict(_)
            | AppError::Conflict(_)
            | AppError::EntityInUse(_) => StatusCode::CONFLICT,
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = Some(self.code().to_string());

        let error_response = match &self {
            AppError::Database(e) => {
                tracing::error!("❌ Database error: {}", e);
                ErrorResponse {
                    error: "Database Error".to_string(),
                    message: "An error occurred while accessing the database".to_string(),
                    details: Some(json!({ "sql_error": e.to_string() })),
                    code,
                }
            }

            AppError::Validation(e) => {
                tracing::warn!("⚠️ Validation error: {}", e);
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "The provided data is invalid".to_string(),
                    details: Some(json!(e)),
                    code,
                }
            }

            AppError::SpaceConflict { space_id, holder_id } => {
                tracing::warn!("🚫 Space conflict on space {}: held by {}", space_id, holder_id);
                ErrorResponse {
                    error: "Space Conflict".to_string(),
                    message: self.to_string(),
                    details: Some(json!({
                        "parking_space_id": space_id,
                        "holder_assignment_id": holder_id,
                        "retryable": false
                    })),
                    code,
                }
            }

            AppError::IdentifierMismatch { path_id, body_id } => {
                tracing::warn!("⚠️ Identifier mismatch: {} vs {}", path_id, body_id);
                ErrorResponse {
                    error: "Identifier Mismatch".to_string(),
                    message: self.to_string(),
                    details: Some(json!({ "path_id": path_id, "body_id": body_id })),
                    code,
                }
            }

            AppError::StorageConflict(msg) => {
                tracing::warn!("🔁 Storage conflict: {}", msg);
                ErrorResponse {
                    error: "Storage Conflict".to_string(),
                    message: msg.clone(),
                    details: Some(json!({ "retryable": true })),
                    code,
                }
            }

            AppError::ProjectionFailed { space_id, message } => {
                tracing::error!("❌ Availability projection failed for space {}: {}", space_id, message);
                ErrorResponse {
                    error: "Projection Failed".to_string(),
                    message: "The assignment was stored but the space availability could not be refreshed".to_string(),
                    details: Some(json!({ "parking_space_id": space_id, "reconcile": format!("/api/parking-spaces/{}/recompute", space_id) })),
                    code,
                }
            }

            AppError::Internal(msg) => {
                tracing::error!("❌ Internal error: {}", msg);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: "An unexpected error occurred".to_string(),
                    details: Some(json!({ "internal_error": msg })),
                    code,
                }
            }

            AppError::NotFound(msg)
            | AppError::ReferenceNotFound(msg)
            | AppError::OwnershipMismatch(msg)
            | AppError::Conflict(msg)
            | AppError::EntityInUse(msg)
            | AppError::BadRequest(msg) => {
                tracing::warn!("⚠️ {}: {}", self.code(), msg);
                ErrorResponse {
                    error: status
                        .canonical_reason()
                        .unwrap_or("Error")
                        .to_string(),
                    message: msg.clone(),
                    details: None,
                    code,
                }
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Clasificar errores de sqlx: las violaciones de unicidad se traducen a conflictos
pub fn map_db_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.code().as_deref() == Some("23505") {
            return match db_error.constraint() {
                Some(ONE_ACTIVE_PER_SPACE_CONSTRAINT) => AppError::StorageConflict(
                    "Parking space became occupied by another active assignment before commit".to_string(),
                ),
                Some(constraint) => AppError::Conflict(format!("Unique constraint '{}' violated", constraint)),
                None => AppError::Conflict(db_error.message().to_string()),
            };
        }
        if db_error.code().as_deref() == Some("23503") {
            return AppError::ReferenceNotFound(db_error.message().to_string());
        }
        if db_error.code().as_deref() == Some("23514") {
            return AppError::BadRequest(db_error.message().to_string());
        }
    }
    AppError::Database(error)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

/// Función helper para rechazar la baja lógica de una entidad con asignación activa
pub fn entity_in_use_error(resource: &str, id: i64) -> AppError {
    AppError::EntityInUse(format!(
        "Cannot deactivate {} '{}': it has active parking assignments",
        resource, id
    ))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
