use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::LoginCredentials;
use crate::services::authorization_service::AppView;
use crate::utils::validation::validate_not_empty;

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_not_empty")]
    pub password: String,
}

impl From<LoginRequest> for LoginCredentials {
    fn from(request: LoginRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
        }
    }
}

// Vista pedida por la interfaz
#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub view: Option<AppView>,
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub views: Vec<AppView>,
    pub current: AppView,
}
