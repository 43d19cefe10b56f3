//! Configuración del proveedor de mapas

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapProviderId {
    Google,
    Mapbox,
    #[default]
    OpenStreetMap,
}

/// Ficha informativa de cada proveedor
#[derive(Debug, Clone, Serialize)]
pub struct MapProvider {
    pub id: MapProviderId,
    pub name: &'static str,
    pub description: &'static str,
    pub requires_api_key: bool,
    pub features: &'static [&'static str],
    pub pricing: &'static str,
}

const PROVIDERS: [MapProvider; 3] = [
    MapProvider {
        id: MapProviderId::Google,
        name: "Google Maps",
        description: "Mapas de alta calidad con tráfico en tiempo real y cobertura global",
        requires_api_key: true,
        features: &["Tráfico en tiempo real", "Street View", "Geocoding preciso"],
        pricing: "Pay-per-use",
    },
    MapProvider {
        id: MapProviderId::Mapbox,
        name: "Mapbox",
        description: "Mapas personalizables con estilos propios",
        requires_api_key: true,
        features: &["Estilos personalizados", "Mapas offline"],
        pricing: "Freemium + Pay-per-use",
    },
    MapProvider {
        id: MapProviderId::OpenStreetMap,
        name: "OpenStreetMap",
        description: "Mapas open source gratuitos con datos colaborativos",
        requires_api_key: false,
        features: &["Gratuito", "Open source"],
        pricing: "Gratuito",
    },
];

/// Catálogo de proveedores disponibles
pub fn map_providers() -> &'static [MapProvider] {
    &PROVIDERS
}

impl MapProviderId {
    pub fn requires_api_key(&self) -> bool {
        PROVIDERS
            .iter()
            .find(|provider| provider.id == *self)
            .map_or(false, |provider| provider.requires_api_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Los campos ausentes en la configuración guardada toman el valor por defecto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub default_zoom: u8,
    pub default_center: MapCenter,
    pub enable_traffic: bool,
    pub enable_satellite: bool,
    pub enable_terrain: bool,
    pub tile_style: Option<String>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_zoom: 10,
            default_center: MapCenter {
                lat: -16.6799,
                lon: -49.255,
            },
            enable_traffic: false,
            enable_satellite: false,
            enable_terrain: false,
            tile_style: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfiguration {
    pub provider: MapProviderId,
    pub api_key: Option<String>,
    pub settings: MapSettings,
}

/// Actualización parcial de `MapSettings`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapSettingsPatch {
    pub default_zoom: Option<u8>,
    pub default_center: Option<MapCenter>,
    pub enable_traffic: Option<bool>,
    pub enable_satellite: Option<bool>,
    pub enable_terrain: Option<bool>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub tile_style: Option<Option<String>>,
}

impl MapSettingsPatch {
    pub fn apply(self, settings: &mut MapSettings) {
        if let Some(zoom) = self.default_zoom {
            settings.default_zoom = zoom;
        }
        if let Some(center) = self.default_center {
            settings.default_center = center;
        }
        if let Some(traffic) = self.enable_traffic {
            settings.enable_traffic = traffic;
        }
        if let Some(satellite) = self.enable_satellite {
            settings.enable_satellite = satellite;
        }
        if let Some(terrain) = self.enable_terrain {
            settings.enable_terrain = terrain;
        }
        if let Some(tile_style) = self.tile_style {
            settings.tile_style = tile_style;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_config_is_openstreetmap() {
        let config = MapConfiguration::default();
        assert_eq!(config.provider, MapProviderId::OpenStreetMap);
        assert!(config.api_key.is_none());
        assert_eq!(config.settings.default_zoom, 10);
    }

    #[test]
    fn test_partial_json_is_merged_over_defaults() {
        let config: MapConfiguration =
            serde_json::from_str(r#"{"provider":"google","api_key":"AIza","settings":{"enable_traffic":true}}"#).unwrap();
        assert_eq!(config.provider, MapProviderId::Google);
        assert_eq!(config.api_key.as_deref(), Some("AIza"));
        assert!(config.settings.enable_traffic);
        assert_eq!(config.settings.default_zoom, 10);
        assert_eq!(config.settings, MapSettings { enable_traffic: true, ..MapSettings::default() });
    }

    #[test]
    fn test_provider_api_key_requirement() {
        assert!(MapProviderId::Google.requires_api_key());
        assert!(!MapProviderId::OpenStreetMap.requires_api_key());
    }

    #[test]
    fn test_settings_patch_merges() {
        let mut settings = MapSettings::default();
        MapSettingsPatch {
            enable_traffic: Some(true),
            default_zoom: Some(14),
            ..Default::default()
        }
        .apply(&mut settings);

        assert!(settings.enable_traffic);
        assert_eq!(settings.default_zoom, 14);
        assert!(!settings.enable_satellite);
    }
}
