//! Configuración de la integración con Traccar

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraccarConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

/// Credencial efectiva: el token tiene prioridad sobre usuario/contraseña
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraccarCredentials<'a> {
    Token(&'a str),
    Basic { username: &'a str, password: &'a str },
    None,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl TraccarConfig {
    pub fn credentials(&self) -> TraccarCredentials<'_> {
        if let Some(token) = non_empty(&self.token) {
            return TraccarCredentials::Token(token);
        }
        match (non_empty(&self.username), non_empty(&self.password)) {
            (Some(username), Some(password)) => TraccarCredentials::Basic { username, password },
            _ => TraccarCredentials::None,
        }
    }
}

/// Actualización parcial de `TraccarConfig`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraccarConfigPatch {
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub token: Option<Option<String>>,
}

impl TraccarConfigPatch {
    pub fn apply(self, config: &mut TraccarConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(username) = self.username {
            config.username = username;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        if let Some(token) = self.token {
            config.token = token;
        }
    }
}
