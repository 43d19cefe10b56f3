//! Almacenamiento clave-valor persistente
//!
//! Puerto de persistencia de la configuración (mapa y Traccar). Las
//! entidades de la flota viven sólo en memoria.

pub mod key_value;

pub use key_value::*;

/// Claves persistidas
pub const MAP_CONFIG_KEY: &str = "mapConfig";
pub const MAPS_API_KEY_KEY: &str = "googleMapsApiKey";
pub const TRACCAR_CONFIG_KEY: &str = "traccarConfig";
