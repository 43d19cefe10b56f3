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

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Rechazos del flujo de alta de vehículos y dispositivos
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    #[error("La placa del vehículo es obligatoria")]
    EmptyPlate,

    #[error("Ya existe un vehículo registrado con la placa {0}")]
    DuplicatePlate(String),

    #[error("Ya existe un dispositivo registrado con el IMEI {0}")]
    DuplicateImei(String),

    #[error("El IMEI {0} no es válido (se esperan 15 dígitos con checksum Luhn)")]
    InvalidImei(String),

    #[error("Vehículo '{0}' no encontrado")]
    VehicleNotFound(String),

    #[error("Dispositivo '{0}' no encontrado")]
    DeviceNotFound(String),

    #[error("Conductor '{0}' no encontrado")]
    DriverNotFound(String),

    #[error("El dispositivo '{device_id}' ya está vinculado al vehículo '{vehicle_id}'")]
    DeviceAlreadyLinked { device_id: String, vehicle_id: String },

    #[error("El vehículo '{vehicle_id}' ya tiene el dispositivo '{device_id}' vinculado")]
    VehicleAlreadyLinked { vehicle_id: String, device_id: String },
}

/// Rechazos al crear usuarios dentro de la jerarquía
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserCreationError {
    #[error("No tienes permiso para crear nuevos usuarios")]
    NotAllowedToCreate,

    #[error("Completa nombre, e-mail y contraseña para crear el usuario")]
    MissingFields,

    #[error("Tu rol no puede crear usuarios con rol {0}")]
    RoleNotAllowed(String),

    #[error("Ya existe un usuario con el e-mail {0}")]
    DuplicateEmail(String),

    #[error("Selecciona el usuario maestro responsable de este usuario hijo")]
    MissingParent,

    #[error("El usuario '{0}' no es un usuario maestro válido")]
    InvalidParent(String),
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

impl AppError {
    /// Estado HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = match self {
            AppError::Validation(e) => {
                log::warn!("Validation error: {}", e);
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "The provided data is invalid".to_string(),
                    details: Some(json!(e)),
                    code: Some("VALIDATION_ERROR".to_string()),
                }
            }

            AppError::Unauthorized(msg) => {
                log::warn!("Unauthorized access: {}", msg);
                ErrorResponse {
                    error: "Unauthorized".to_string(),
                    message: msg,
                    details: None,
                    code: Some("UNAUTHORIZED".to_string()),
                }
            }

            AppError::Forbidden(msg) => {
                log::warn!("Forbidden access: {}", msg);
                ErrorResponse {
                    error: "Forbidden".to_string(),
                    message: msg,
                    details: None,
                    code: Some("FORBIDDEN".to_string()),
                }
            }

            AppError::NotFound(msg) => {
                log::warn!("Resource not found: {}", msg);
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: msg,
                    details: None,
                    code: Some("NOT_FOUND".to_string()),
                }
            }

            AppError::Conflict(msg) => {
                log::warn!("Conflict: {}", msg);
                ErrorResponse {
                    error: "Conflict".to_string(),
                    message: msg,
                    details: None,
                    code: Some("CONFLICT".to_string()),
                }
            }

            AppError::BadRequest(msg) => {
                log::warn!("Bad request: {}", msg);
                ErrorResponse {
                    error: "Bad Request".to_string(),
                    message: msg,
                    details: None,
                    code: Some("BAD_REQUEST".to_string()),
                }
            }

            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: "An unexpected error occurred".to_string(),
                    details: Some(json!({ "internal_error": msg })),
                    code: Some("INTERNAL_ERROR".to_string()),
                }
            }

            AppError::Jwt(msg) => {
                log::warn!("JWT error: {}", msg);
                ErrorResponse {
                    error: "JWT Error".to_string(),
                    message: msg,
                    details: None,
                    code: Some("JWT_ERROR".to_string()),
                }
            }

            AppError::Config(msg) => {
                log::error!("Configuration error: {}", msg);
                ErrorResponse {
                    error: "Configuration Error".to_string(),
                    message: msg,
                    details: None,
                    code: Some("CONFIG_ERROR".to_string()),
                }
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<ProvisioningError> for AppError {
    fn from(err: ProvisioningError) -> Self {
        match err {
            ProvisioningError::EmptyPlate | ProvisioningError::InvalidImei(_) => {
                AppError::BadRequest(err.to_string())
            }
            ProvisioningError::VehicleNotFound(_)
            | ProvisioningError::DeviceNotFound(_)
            | ProvisioningError::DriverNotFound(_) => AppError::NotFound(err.to_string()),
            ProvisioningError::DuplicatePlate(_)
            | ProvisioningError::DuplicateImei(_)
            | ProvisioningError::DeviceAlreadyLinked { .. }
            | ProvisioningError::VehicleAlreadyLinked { .. } => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<UserCreationError> for AppError {
    fn from(err: UserCreationError) -> Self {
        match err {
            UserCreationError::NotAllowedToCreate | UserCreationError::RoleNotAllowed(_) => {
                AppError::Forbidden(err.to_string())
            }
            UserCreationError::DuplicateEmail(_) => AppError::Conflict(err.to_string()),
            UserCreationError::MissingFields
            | UserCreationError::MissingParent
            | UserCreationError::InvalidParent(_) => AppError::BadRequest(err.to_string()),
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} '{}' no encontrado", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioning_errors_map_to_http_status() {
        let duplicate: AppError = ProvisioningError::DuplicatePlate("ABC1234".into()).into();
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let invalid: AppError = ProvisioningError::InvalidImei("123".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let missing: AppError = ProvisioningError::VehicleNotFound("veh_x".into()).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let driver: AppError = ProvisioningError::DriverNotFound("drv_x".into()).into();
        assert_eq!(driver.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_user_creation_errors_map_to_http_status() {
        let forbidden: AppError = UserCreationError::NotAllowedToCreate.into();
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

        let duplicate: AppError = UserCreationError::DuplicateEmail("a@b.com".into()).into();
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let parent: AppError = UserCreationError::MissingParent.into();
        assert_eq!(parent.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_rejection_messages_are_human_readable() {
        let err = ProvisioningError::DuplicateImei("490154203237518".into());
        assert!(err.to_string().contains("490154203237518"));
    }
}
