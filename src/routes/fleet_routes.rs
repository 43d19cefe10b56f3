use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::dto::device_dto::{ImeiQuery, ImeiValidationResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::CurrentUser;
use crate::models::fleet::{Alert, Driver, Geofence, Trip};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::imei::{format_imei, is_duplicate_imei, normalize_imei, validate_imei};

/// Colecciones de sólo lectura, alertas y validación de IMEI
pub fn create_fleet_router() -> Router<AppState> {
    Router::new()
        .route("/drivers", get(list_drivers))
        .route("/trips", get(list_trips))
        .route("/geofences", get(list_geofences))
        .route("/alerts", get(list_alerts))
        .route("/alerts/:id/ack", post(acknowledge_alert))
        .route("/imei/validate", get(validate_imei_handler))
}

#[derive(Debug, Deserialize)]
struct AlertQuery {
    #[serde(default)]
    pending: bool,
}

async fn list_drivers(State(state): State<AppState>, CurrentUser(_user): CurrentUser) -> Json<ApiResponse<Vec<Driver>>> {
    let fleet = state.fleet.read().await;
    Json(ApiResponse::success(fleet.drivers().to_vec()))
}

async fn list_trips(State(state): State<AppState>, CurrentUser(_user): CurrentUser) -> Json<ApiResponse<Vec<Trip>>> {
    let fleet = state.fleet.read().await;
    Json(ApiResponse::success(fleet.trips().to_vec()))
}

async fn list_geofences(State(state): State<AppState>, CurrentUser(_user): CurrentUser) -> Json<ApiResponse<Vec<Geofence>>> {
    let fleet = state.fleet.read().await;
    Json(ApiResponse::success(fleet.geofences().to_vec()))
}

async fn list_alerts(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<AlertQuery>,
) -> Json<ApiResponse<Vec<Alert>>> {
    let fleet = state.fleet.read().await;
    let alerts = if query.pending {
        fleet.pending_alerts().into_iter().cloned().collect()
    } else {
        fleet.alerts().to_vec()
    };
    Json(ApiResponse::success(alerts))
}

async fn acknowledge_alert(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Alert>>> {
    let mut fleet = state.fleet.write().await;
    let alert = fleet
        .acknowledge_alert(&id, &user.id)
        .ok_or_else(|| not_found_error("Alerta", &id))?;
    log::info!("🔔 Alerta {} reconocida por {}", alert.id, user.id);
    Ok(Json(ApiResponse::success(alert)))
}

async fn validate_imei_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<ImeiQuery>,
) -> Json<ApiResponse<ImeiValidationResponse>> {
    let fleet = state.fleet.read().await;
    Json(ApiResponse::success(ImeiValidationResponse {
        normalized: normalize_imei(&query.imei),
        formatted: format_imei(&query.imei),
        valid: validate_imei(&query.imei),
        duplicate: is_duplicate_imei(&query.imei, fleet.devices(), None),
        imei: query.imei,
    }))
}
