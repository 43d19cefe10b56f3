//! Jerarquía de usuarios
//!
//! Tabla fija de quién puede crear a quién y resolución del usuario padre.
//! `UserDirectory` es la única vía de escritura sobre la colección de usuarios.

use uuid::Uuid;

use crate::models::auth::{AuthRole, AuthUser, LoginCredentials, NewUserRequest, SessionUser};
use crate::utils::errors::UserCreationError;
use crate::utils::validation::normalize_email;

/// Roles que puede crear cada rol
pub fn creation_rules(role: AuthRole) -> &'static [AuthRole] {
    match role {
        AuthRole::SuperAdmin => &[AuthRole::MasterAdmin, AuthRole::ChildUser],
        AuthRole::MasterAdmin => &[AuthRole::ChildUser],
        AuthRole::ChildUser => &[],
    }
}

pub fn can_create(actor: AuthRole, target: AuthRole) -> bool {
    creation_rules(actor).contains(&target)
}

#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<AuthUser>,
}

impl UserDirectory {
    pub fn new(users: Vec<AuthUser>) -> Self {
        let orphans = users
            .iter()
            .filter(|user| user.role == AuthRole::MasterAdmin && user.parent_id.is_none())
            .count();
        if orphans > 0 {
            log::warn!("⚠️ {} usuario(s) maestro(s) sin admin general asignado", orphans);
        }
        Self { users }
    }

    pub fn users(&self) -> &[AuthUser] {
        &self.users
    }

    pub fn find(&self, id: &str) -> Option<&AuthUser> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Login de nivel mock: e-mail sin distinguir mayúsculas y contraseña en claro
    pub fn authenticate(&self, credentials: &LoginCredentials) -> Option<SessionUser> {
        let email = normalize_email(&credentials.email);
        self.users
            .iter()
            .find(|user| normalize_email(&user.email) == email && user.password == credentials.password)
            .map(SessionUser::from)
    }

    pub fn masters(&self) -> Vec<&AuthUser> {
        self.users
            .iter()
            .filter(|user| user.role == AuthRole::MasterAdmin)
            .collect()
    }

    /// Usuarios maestros sin admin general (se toleran, pero no se crean)
    pub fn orphan_masters(&self) -> Vec<&AuthUser> {
        self.users
            .iter()
            .filter(|user| user.role == AuthRole::MasterAdmin && user.parent_id.is_none())
            .collect()
    }

    pub fn children_of(&self, parent_id: &str) -> Vec<&AuthUser> {
        self.users
            .iter()
            .filter(|user| user.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    /// Usuarios que el actor puede ver en el listado de la jerarquía
    pub fn visible_users(&self, actor: &SessionUser) -> Vec<&AuthUser> {
        match actor.role {
            AuthRole::SuperAdmin => self.users.iter().collect(),
            AuthRole::MasterAdmin => self
                .users
                .iter()
                .filter(|user| user.id == actor.id || user.parent_id.as_deref() == Some(actor.id.as_str()))
                .collect(),
            AuthRole::ChildUser => self.users.iter().filter(|user| user.id == actor.id).collect(),
        }
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users.iter().any(|user| normalize_email(&user.email) == email)
    }

    fn resolve_parent(&self, actor: &SessionUser, role: AuthRole, requested: Option<&str>) -> Result<String, UserCreationError> {
        match (role, actor.role) {
            (AuthRole::MasterAdmin, _) => Ok(actor.id.clone()),
            (AuthRole::ChildUser, AuthRole::MasterAdmin) => Ok(actor.id.clone()),
            (AuthRole::ChildUser, _) => {
                let parent_id = requested
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .ok_or(UserCreationError::MissingParent)?;
                match self.find(parent_id) {
                    Some(parent) if parent.role == AuthRole::MasterAdmin => Ok(parent.id.clone()),
                    _ => Err(UserCreationError::InvalidParent(parent_id.to_string())),
                }
            }
            (AuthRole::SuperAdmin, _) => Err(UserCreationError::RoleNotAllowed(role.as_str().to_string())),
        }
    }

    /// Crear un usuario como `actor`. Todo o nada: ante cualquier rechazo el
    /// directorio queda intacto.
    pub fn create_user(&mut self, actor: &SessionUser, request: NewUserRequest) -> Result<AuthUser, UserCreationError> {
        let allowed = creation_rules(actor.role);
        let default_role = *allowed.first().ok_or(UserCreationError::NotAllowedToCreate)?;

        let name = request.name.trim();
        let email = normalize_email(&request.email);
        if name.is_empty() || email.is_empty() || request.password.trim().is_empty() {
            return Err(UserCreationError::MissingFields);
        }

        let role = request.role.unwrap_or(default_role);
        if !allowed.contains(&role) {
            return Err(UserCreationError::RoleNotAllowed(role.as_str().to_string()));
        }

        if self.email_taken(&email) {
            return Err(UserCreationError::DuplicateEmail(email));
        }

        let parent_id = self.resolve_parent(actor, role, request.parent_id.as_deref())?;

        let user = AuthUser {
            id: format!("user-{}", Uuid::new_v4()),
            name: name.to_string(),
            email,
            role,
            password: request.password,
            parent_id: Some(parent_id),
        };

        log::info!(
            "👤 Usuario {} ({}) creado por {} bajo {:?}",
            user.email,
            role.as_str(),
            actor.id,
            user.parent_id
        );

        self.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::seed_users;

    fn directory() -> UserDirectory {
        UserDirectory::new(seed_users())
    }

    fn session(directory: &UserDirectory, id: &str) -> SessionUser {
        SessionUser::from(directory.find(id).unwrap())
    }

    fn request(name: &str, email: &str, role: Option<AuthRole>) -> NewUserRequest {
        NewUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            role,
            parent_id: None,
        }
    }

    #[test]
    fn test_creation_rule_table() {
        assert_eq!(creation_rules(AuthRole::SuperAdmin), &[AuthRole::MasterAdmin, AuthRole::ChildUser]);
        assert_eq!(creation_rules(AuthRole::MasterAdmin), &[AuthRole::ChildUser]);
        assert!(creation_rules(AuthRole::ChildUser).is_empty());
        assert!(!can_create(AuthRole::MasterAdmin, AuthRole::MasterAdmin));
    }

    #[test]
    fn test_super_admin_creates_master_under_itself() {
        let mut directory = directory();
        let actor = session(&directory, "user-1");

        let bruno = directory
            .create_user(&actor, request("Bruno", "bruno.novo@empresa.com", Some(AuthRole::MasterAdmin)))
            .unwrap();

        assert_eq!(bruno.role, AuthRole::MasterAdmin);
        assert_eq!(bruno.parent_id.as_deref(), Some("user-1"));
        assert!(bruno.id.starts_with("user-"));
    }

    #[test]
    fn test_duplicate_email_is_rejected_without_mutation() {
        let mut directory = directory();
        let actor = session(&directory, "user-2");
        let before = directory.users().len();

        let err = directory
            .create_user(&actor, request("Carla", " Carla.Ribeiro@Empresa.com ", Some(AuthRole::ChildUser)))
            .unwrap_err();

        assert_eq!(err, UserCreationError::DuplicateEmail("carla.ribeiro@empresa.com".into()));
        assert_eq!(directory.users().len(), before);
    }

    #[test]
    fn test_child_user_can_never_create() {
        let mut directory = directory();
        let actor = session(&directory, "user-3");

        for role in [None, Some(AuthRole::ChildUser), Some(AuthRole::MasterAdmin), Some(AuthRole::SuperAdmin)] {
            let err = directory.create_user(&actor, request("X", "x@y.com", role)).unwrap_err();
            assert_eq!(err, UserCreationError::NotAllowedToCreate);
        }
        let err = directory.create_user(&actor, NewUserRequest::default()).unwrap_err();
        assert_eq!(err, UserCreationError::NotAllowedToCreate);
    }

    #[test]
    fn test_master_admin_forces_itself_as_parent() {
        let mut directory = directory();
        let actor = session(&directory, "user-2");

        let mut req = request("Diego", "diego@empresa.com", None);
        req.parent_id = Some("user-1".into());
        let diego = directory.create_user(&actor, req).unwrap();

        assert_eq!(diego.role, AuthRole::ChildUser);
        assert_eq!(diego.parent_id.as_deref(), Some("user-2"));
    }

    #[test]
    fn test_master_admin_cannot_create_master() {
        let mut directory = directory();
        let actor = session(&directory, "user-2");

        let err = directory
            .create_user(&actor, request("Eva", "eva@empresa.com", Some(AuthRole::MasterAdmin)))
            .unwrap_err();
        assert_eq!(err, UserCreationError::RoleNotAllowed("master_admin".into()));
    }

    #[test]
    fn test_super_admin_child_requires_existing_master_parent() {
        let mut directory = directory();
        let actor = session(&directory, "user-1");

        let err = directory
            .create_user(&actor, request("Fabio", "fabio@empresa.com", Some(AuthRole::ChildUser)))
            .unwrap_err();
        assert_eq!(err, UserCreationError::MissingParent);

        let mut req = request("Fabio", "fabio@empresa.com", Some(AuthRole::ChildUser));
        req.parent_id = Some("user-3".into());
        let err = directory.create_user(&actor, req).unwrap_err();
        assert_eq!(err, UserCreationError::InvalidParent("user-3".into()));

        let mut req = request("Fabio", "fabio@empresa.com", Some(AuthRole::ChildUser));
        req.parent_id = Some("user-2".into());
        let fabio = directory.create_user(&actor, req).unwrap();
        assert_eq!(fabio.parent_id.as_deref(), Some("user-2"));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut directory = directory();
        let actor = session(&directory, "user-1");
        let mut req = request("  ", "nobody@empresa.com", None);
        req.password = "pw".into();

        assert_eq!(directory.create_user(&actor, req).unwrap_err(), UserCreationError::MissingFields);
    }

    #[test]
    fn test_password_is_stored_as_entered() {
        let mut directory = directory();
        let actor = session(&directory, "user-1");
        let mut req = request("Hugo", "hugo@empresa.com", None);
        req.password = " pw ".into();
        directory.create_user(&actor, req).unwrap();

        let login = |password: &str| LoginCredentials {
            email: "hugo@empresa.com".into(),
            password: password.into(),
        };
        assert!(directory.authenticate(&login(" pw ")).is_some());
        assert!(directory.authenticate(&login("pw")).is_none());

        let mut req = request("Iris", "iris@empresa.com", None);
        req.password = "   ".into();
        assert_eq!(directory.create_user(&actor, req).unwrap_err(), UserCreationError::MissingFields);
    }

    #[test]
    fn test_super_admin_default_role_is_master() {
        let mut directory = directory();
        let actor = session(&directory, "user-1");
        let user = directory.create_user(&actor, request("Gil", "gil@empresa.com", None)).unwrap();
        assert_eq!(user.role, AuthRole::MasterAdmin);
    }

    #[test]
    fn test_authenticate_ignores_email_case() {
        let directory = directory();
        let session = directory
            .authenticate(&LoginCredentials {
                email: "  ANA.SOUZA@linka.com ".into(),
                password: "admin123".into(),
            })
            .unwrap();
        assert_eq!(session.role, AuthRole::SuperAdmin);

        assert!(directory
            .authenticate(&LoginCredentials { email: "ana.souza@linka.com".into(), password: "wrong".into() })
            .is_none());
    }

    #[test]
    fn test_orphan_masters_are_listed() {
        let mut users = seed_users();
        users.push(AuthUser {
            id: "user-9".into(),
            name: "Orfão".into(),
            email: "orfao@empresa.com".into(),
            role: AuthRole::MasterAdmin,
            password: "x".into(),
            parent_id: None,
        });
        let directory = UserDirectory::new(users);

        let orphans: Vec<&str> = directory.orphan_masters().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(orphans, vec!["user-9"]);
        assert_eq!(directory.masters().len(), 2);
        assert_eq!(directory.children_of("user-2").len(), 1);
    }

    #[test]
    fn test_visible_users_by_role() {
        let directory = directory();
        assert_eq!(directory.visible_users(&session(&directory, "user-1")).len(), 3);
        assert_eq!(directory.visible_users(&session(&directory, "user-2")).len(), 2);
        assert_eq!(directory.visible_users(&session(&directory, "user-3")).len(), 1);
    }
}
