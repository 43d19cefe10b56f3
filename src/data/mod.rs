//! Datos iniciales de la flota y de la jerarquía de usuarios

pub mod fixtures;

pub use fixtures::{seed_fleet, seed_users, FleetFixtures};
