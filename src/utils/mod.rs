//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! IMEI y JWT.

pub mod errors;
pub mod imei;
pub mod jwt;
pub mod validation;
