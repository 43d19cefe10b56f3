use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use validator::Validate;

use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_fleet_manager, CurrentUser};
use crate::models::vehicle::{Vehicle, VehiclePatch};
use crate::services::fleet_store::CreateVehicleResult;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).patch(update_vehicle).delete(delete_vehicle))
}

async fn list_vehicles(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Json<ApiResponse<Vec<Vehicle>>> {
    let fleet = state.fleet.read().await;
    Json(ApiResponse::success(fleet.vehicles().to_vec()))
}

async fn get_vehicle(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let fleet = state.fleet.read().await;
    let vehicle = fleet
        .vehicle(&id)
        .cloned()
        .ok_or_else(|| not_found_error("Vehículo", &id))?;
    Ok(Json(ApiResponse::success(vehicle)))
}

/// Guardado local bajo el lock de escritura; el push a Traccar se hace
/// después de soltarlo
async fn create_vehicle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreateVehicleResult>>)> {
    require_fleet_manager(&user)?;
    request.validate()?;

    let (provisioned, client) = {
        let mut fleet = state.fleet.write().await;
        let provisioned = fleet.provision_vehicle(request.into())?;
        (provisioned, fleet.traccar_client())
    };

    let result = provisioned.sync_with_traccar(&client).await;
    let message = match &result.traccar {
        Some(traccar) if traccar.is_success() => "Vehículo guardado y sincronizado con Traccar".to_string(),
        Some(traccar) => {
            log::warn!("⚠️ Vehículo {} guardado sin sincronizar: {}", result.vehicle.plate, traccar.message());
            format!("Vehículo guardado; la sincronización con Traccar falló: {}", traccar.message())
        }
        None => "Vehículo guardado".to_string(),
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::success_with_message(result, message))))
}

async fn update_vehicle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<VehiclePatch>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    require_fleet_manager(&user)?;

    let mut fleet = state.fleet.write().await;
    let vehicle = fleet.update_vehicle(&id, patch)?;
    Ok(Json(ApiResponse::success_with_message(vehicle, "Vehículo actualizado")))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_fleet_manager(&user)?;

    let mut fleet = state.fleet.write().await;
    let removed = fleet.delete_vehicle(&id)?;
    Ok(Json(ApiResponse::message(format!("Vehículo {} eliminado", removed.plate))))
}
