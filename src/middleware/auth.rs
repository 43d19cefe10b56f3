//! Autenticación por token de sesión
//!
//! `CurrentUser` resuelve el `SessionUser` del header `Authorization` y los
//! guards comprueban el rol antes de cada operación de gestión.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    models::auth::SessionUser,
    services::authorization_service::{can_access_view, can_manage_fleet, AppView},
    state::AppState,
    utils::errors::AppError,
};

/// Usuario de la sesión activa
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

        let user = state.auth.session_from_header(auth_header)?;
        log::debug!("🔑 Sesión de {} ({})", user.email, user.role.as_str());
        Ok(CurrentUser(user))
    }
}

/// Sólo admin general y usuarios maestros gestionan la flota
pub fn require_fleet_manager(user: &SessionUser) -> Result<(), AppError> {
    if can_manage_fleet(user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "El rol {} no puede realizar esta operación",
            user.role.label()
        )))
    }
}

pub fn require_view(user: &SessionUser, view: AppView) -> Result<(), AppError> {
    if can_access_view(user.role, view) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "El rol {} no tiene acceso a la sección {}",
            user.role.label(),
            view.as_str()
        )))
    }
}
