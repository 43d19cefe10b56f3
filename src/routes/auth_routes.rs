use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, ViewQuery, ViewsResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::CurrentUser;
use crate::models::auth::{LoginCredentials, SessionUser};
use crate::services::auth_service::AuthSession;
use crate::services::authorization_service::{allowed_views, resolve_view, AppView};
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Configura las rutas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/views", get(views))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthSession>>> {
    request.validate()?;
    let credentials = LoginCredentials::from(request);

    let users = state.users.read().await;
    let session = state.auth.login(&users, &credentials)?;
    Ok(Json(ApiResponse::success_with_message(session, "Login correcto")))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<SessionUser>> {
    Json(ApiResponse::success(user))
}

async fn views(
    CurrentUser(user): CurrentUser,
    Query(query): Query<ViewQuery>,
) -> Json<ApiResponse<ViewsResponse>> {
    let current = resolve_view(user.role, query.view.unwrap_or(AppView::Dashboard));
    Json(ApiResponse::success(ViewsResponse {
        views: allowed_views(user.role).to_vec(),
        current,
    }))
}
