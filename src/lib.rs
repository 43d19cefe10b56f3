//! Backend de gestión de flotas
//!
//! Alta de vehículos y rastreadores con validación de IMEI, sincronización
//! opcional con Traccar, jerarquía de usuarios por rol y configuración de
//! mapa/Traccar persistida.

pub mod clients;
pub mod config;
pub mod data;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use routes::{create_app, create_router};
pub use state::AppState;
