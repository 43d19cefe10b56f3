//! Middleware del sistema
//!
//! Extracción de la sesión (token JWT) y configuración de CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
