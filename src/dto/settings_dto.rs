use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clients::traccar_client::NormalizedTraccarUrls;
use crate::models::map_config::{MapConfiguration, MapProvider, MapProviderId};
use crate::models::traccar_config::TraccarConfig;

#[derive(Debug, Deserialize, Validate)]
pub struct MapApiKeyRequest {
    #[validate(length(min = 1, max = 256))]
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct MapProviderRequest {
    pub provider: MapProviderId,
}

// Configuración del mapa junto con el catálogo de proveedores
#[derive(Debug, Serialize)]
pub struct MapSettingsResponse {
    pub config: MapConfiguration,
    pub providers: &'static [MapProvider],
}

// Configuración de Traccar sin exponer secretos
#[derive(Debug, Serialize)]
pub struct TraccarConfigResponse {
    pub base_url: String,
    pub username: Option<String>,
    pub has_password: bool,
    pub has_token: bool,
    pub urls: NormalizedTraccarUrls,
}

impl TraccarConfigResponse {
    pub fn new(config: &TraccarConfig, urls: NormalizedTraccarUrls) -> Self {
        let present = |value: &Option<String>| value.as_deref().map_or(false, |v| !v.is_empty());
        Self {
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            has_password: present(&config.password),
            has_token: present(&config.token),
            urls,
        }
    }
}
