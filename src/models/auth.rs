use serde::{Deserialize, Serialize};

/// Roles de la jerarquía de usuarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthRole {
    SuperAdmin,
    MasterAdmin,
    ChildUser,
}

impl AuthRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthRole::SuperAdmin => "super_admin",
            AuthRole::MasterAdmin => "master_admin",
            AuthRole::ChildUser => "child_user",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(AuthRole::SuperAdmin),
            "master_admin" => Some(AuthRole::MasterAdmin),
            "child_user" => Some(AuthRole::ChildUser),
            _ => None,
        }
    }

    /// Etiqueta legible para mensajes
    pub fn label(&self) -> &'static str {
        match self {
            AuthRole::SuperAdmin => "Admin general",
            AuthRole::MasterAdmin => "Usuario maestro",
            AuthRole::ChildUser => "Usuario hijo",
        }
    }
}

/// Usuario con credenciales (contraseña en texto plano, nivel mock)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AuthRole,
    pub password: String,
    pub parent_id: Option<String>,
}

/// Usuario de la sesión activa: `AuthUser` sin contraseña
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AuthRole,
    pub parent_id: Option<String>,
}

impl From<&AuthUser> for SessionUser {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            parent_id: user.parent_id.clone(),
        }
    }
}

/// Request de login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Datos para crear un usuario dentro de la jerarquía
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<AuthRole>,
    pub parent_id: Option<String>,
}
