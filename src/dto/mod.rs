//! DTOs de la API HTTP
//!
//! Requests con validación (`validator`) y el sobre de respuesta común.

pub mod api_response;
pub mod auth_dto;
pub mod device_dto;
pub mod settings_dto;
pub mod user_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
