//! Services module
//!
//! Lógica de negocio: store de la flota, jerarquía de usuarios,
//! autorización por rol y login.

pub mod auth_service;
pub mod authorization_service;
pub mod fleet_store;
pub mod hierarchy_service;

pub use auth_service::{AuthService, AuthSession};
pub use authorization_service::{allowed_views, can_access_view, can_manage_fleet, resolve_view, AppView};
pub use fleet_store::{CreateVehicleResult, FleetStore, ProvisionedVehicle};
pub use hierarchy_service::{can_create, creation_rules, UserDirectory};
