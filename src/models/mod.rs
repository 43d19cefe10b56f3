//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos de la flota, la
//! jerarquía de usuarios y la configuración persistida.

use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod device;
pub mod fleet;
pub mod map_config;
pub mod traccar_config;
pub mod vehicle;

/// Deserializar `Option<Option<T>>` distinguiendo `null` (limpiar) de
/// campo ausente (no tocar). Se usa junto con `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
