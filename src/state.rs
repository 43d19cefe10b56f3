//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum: el store de
//! la flota y el directorio de usuarios, cada uno detrás de su `RwLock`.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::environment::EnvironmentConfig;
use crate::data::fixtures::{seed_fleet, seed_users};
use crate::services::auth_service::AuthService;
use crate::services::fleet_store::FleetStore;
use crate::services::hierarchy_service::UserDirectory;
use crate::storage::KeyValueStore;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub fleet: Arc<RwLock<FleetStore>>,
    pub users: Arc<RwLock<UserDirectory>>,
    pub auth: AuthService,
}

impl AppState {
    /// Estado sembrado con los datos de demostración
    pub fn new(config: EnvironmentConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        let fleet = FleetStore::new(seed_fleet(), storage).with_traccar_timeout(config.traccar_timeout);
        Self::with_parts(config, fleet, UserDirectory::new(seed_users()))
    }

    pub fn with_parts(config: EnvironmentConfig, fleet: FleetStore, users: UserDirectory) -> Self {
        let auth = AuthService::new(JwtConfig::from(&config));
        Self {
            config,
            fleet: Arc::new(RwLock::new(fleet)),
            users: Arc::new(RwLock::new(users)),
            auth,
        }
    }
}
