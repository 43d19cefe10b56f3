//! Servicio de autenticación
//!
//! Login mock contra el directorio de usuarios y emisión del token de sesión.

use serde::Serialize;

use crate::models::auth::{LoginCredentials, SessionUser};
use crate::services::authorization_service::{allowed_views, AppView};
use crate::services::hierarchy_service::UserDirectory;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, generate_token, verify_token, JwtConfig};

/// Sesión emitida tras un login correcto
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: SessionUser,
    pub views: Vec<AppView>,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(jwt_config: JwtConfig) -> Self {
        Self { jwt_config }
    }

    pub fn login(&self, directory: &UserDirectory, credentials: &LoginCredentials) -> Result<AuthSession, AppError> {
        let user = directory.authenticate(credentials).ok_or_else(|| {
            log::warn!("❌ Login fallido para {}", credentials.email.trim());
            AppError::Unauthorized("Credenciales inválidas".to_string())
        })?;

        let token = generate_token(&user, &self.jwt_config)?;
        log::info!("🔐 Login correcto: {} ({})", user.email, user.role.as_str());

        Ok(AuthSession {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_config.expiration,
            views: allowed_views(user.role).to_vec(),
            user,
        })
    }

    /// Resolver la sesión a partir del header `Authorization`
    pub fn session_from_header(&self, auth_header: &str) -> Result<SessionUser, AppError> {
        let token = extract_token_from_header(auth_header)?;
        let claims = verify_token(token, &self.jwt_config)?;
        Ok(SessionUser::from(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::seed_users;
    use crate::models::auth::AuthRole;

    fn service() -> AuthService {
        AuthService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        })
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let directory = UserDirectory::new(seed_users());
        let session = service()
            .login(
                &directory,
                &LoginCredentials { email: "carla.ribeiro@empresa.com".into(), password: "user123".into() },
            )
            .unwrap();

        assert_eq!(session.user.role, AuthRole::ChildUser);
        assert!(!session.views.contains(&AppView::Admin));

        let header = format!("Bearer {}", session.token);
        let user = service().session_from_header(&header).unwrap();
        assert_eq!(user.id, "user-3");
        assert_eq!(user.parent_id.as_deref(), Some("user-2"));
    }

    #[test]
    fn test_wrong_password_is_unauthorized() {
        let directory = UserDirectory::new(seed_users());
        let err = service()
            .login(&directory, &LoginCredentials { email: "ana.souza@linka.com".into(), password: "nope".into() })
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        assert!(service().session_from_header("Token abc").is_err());
        assert!(service().session_from_header("Bearer not-a-jwt").is_err());
    }
}
