use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, UserListResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_view, CurrentUser};
use crate::models::auth::{AuthRole, SessionUser};
use crate::services::authorization_service::AppView;
use crate::services::hierarchy_service::creation_rules;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_user_router() -> Router<AppState> {
    Router::new().route("/", get(list_users).post(create_user))
}

async fn list_users(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<UserListResponse>>> {
    require_view(&user, AppView::Admin)?;

    let users = state.users.read().await;
    let orphan_masters = if user.role == AuthRole::SuperAdmin {
        users.orphan_masters().into_iter().map(SessionUser::from).collect()
    } else {
        Vec::new()
    };

    Ok(Json(ApiResponse::success(UserListResponse {
        users: users.visible_users(&user).into_iter().map(SessionUser::from).collect(),
        orphan_masters,
        creatable_roles: creation_rules(user.role).to_vec(),
    })))
}

async fn create_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SessionUser>>)> {
    require_view(&user, AppView::Admin)?;
    request.validate()?;

    let mut users = state.users.write().await;
    let created = users.create_user(&user, request.into())?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            SessionUser::from(&created),
            format!("Usuario {} creado", created.name),
        )),
    ))
}
