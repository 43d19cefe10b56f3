use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::{AuthRole, NewUserRequest, SessionUser};

// Request para crear un usuario en la jerarquía
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 128))]
    pub password: String,
    pub role: Option<AuthRole>,
    pub parent_id: Option<String>,
}

impl From<CreateUserRequest> for NewUserRequest {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
            parent_id: request.parent_id,
        }
    }
}

// Listado de la jerarquía visible para el actor
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<SessionUser>,
    pub orphan_masters: Vec<SessionUser>,
    pub creatable_roles: Vec<AuthRole>,
}
