use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::dto::device_dto::{LinkDeviceRequest, RegisterDeviceRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_fleet_manager, CurrentUser};
use crate::models::device::Device;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_device_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_devices).post(register_device))
        .route("/:id/link", post(link_device))
}

async fn list_devices(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Json<ApiResponse<Vec<Device>>> {
    let fleet = state.fleet.read().await;
    Json(ApiResponse::success(fleet.devices().to_vec()))
}

async fn register_device(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<RegisterDeviceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Device>>)> {
    require_fleet_manager(&user)?;
    request.validate()?;

    let mut fleet = state.fleet.write().await;
    let device = fleet.register_device(request.into())?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(device, "Dispositivo registrado")),
    ))
}

async fn link_device(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<LinkDeviceRequest>,
) -> AppResult<Json<ApiResponse<Device>>> {
    require_fleet_manager(&user)?;

    let mut fleet = state.fleet.write().await;
    fleet.link_device(&id, &request.vehicle_id)?;
    let device = fleet
        .device(&id)
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("Dispositivo {} desaparecido tras vincular", id)))?;
    Ok(Json(ApiResponse::success_with_message(device, "Dispositivo vinculado")))
}
