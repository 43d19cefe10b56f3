//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno del servicio.

pub mod environment;

pub use environment::*;
