use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use validator::Validate;

use crate::clients::traccar_client::{
    NormalizedTraccarUrls, TraccarRegistrationResult, TraccarStreamHandlers,
};
use crate::dto::settings_dto::{
    MapApiKeyRequest, MapProviderRequest, MapSettingsResponse, TraccarConfigResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_fleet_manager, CurrentUser};
use crate::models::map_config::{map_providers, MapConfiguration, MapSettingsPatch};
use crate::models::traccar_config::TraccarConfigPatch;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_coordinates;

pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/map", get(get_map_settings).put(update_map_settings))
        .route("/map/provider", put(set_map_provider))
        .route("/map/api-key", put(save_map_api_key).delete(clear_map_api_key))
        .route("/traccar", get(get_traccar_config).put(update_traccar_config))
        .route("/traccar/urls", get(get_traccar_urls))
        .route("/traccar/test", post(test_traccar_connection))
        .route("/traccar/stream-test", post(test_traccar_stream))
}

// === Mapa ===

async fn get_map_settings(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Json<ApiResponse<MapSettingsResponse>> {
    let fleet = state.fleet.read().await;
    Json(ApiResponse::success(MapSettingsResponse {
        config: fleet.map_config().clone(),
        providers: map_providers(),
    }))
}

async fn update_map_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(patch): Json<MapSettingsPatch>,
) -> AppResult<Json<ApiResponse<MapConfiguration>>> {
    require_fleet_manager(&user)?;
    if let Some(center) = &patch.default_center {
        validate_coordinates(center.lat, center.lon)
            .map_err(|e| AppError::BadRequest(format!("Centro del mapa inválido: {}", e.code)))?;
    }
    let mut fleet = state.fleet.write().await;
    Ok(Json(ApiResponse::success(fleet.update_map_settings(patch))))
}

async fn set_map_provider(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<MapProviderRequest>,
) -> AppResult<Json<ApiResponse<MapConfiguration>>> {
    require_fleet_manager(&user)?;
    let mut fleet = state.fleet.write().await;
    Ok(Json(ApiResponse::success(fleet.set_map_provider(request.provider))))
}

async fn save_map_api_key(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<MapApiKeyRequest>,
) -> AppResult<Json<ApiResponse<MapConfiguration>>> {
    require_fleet_manager(&user)?;
    request.validate()?;
    let mut fleet = state.fleet.write().await;
    Ok(Json(ApiResponse::success_with_message(
        fleet.save_map_api_key(&request.api_key),
        "API key guardada",
    )))
}

async fn clear_map_api_key(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<MapConfiguration>>> {
    require_fleet_manager(&user)?;
    let mut fleet = state.fleet.write().await;
    Ok(Json(ApiResponse::success_with_message(fleet.clear_map_api_key(), "API key eliminada")))
}

// === Traccar ===

async fn get_traccar_config(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<TraccarConfigResponse>>> {
    require_fleet_manager(&user)?;
    let fleet = state.fleet.read().await;
    Ok(Json(ApiResponse::success(TraccarConfigResponse::new(
        fleet.traccar_config(),
        fleet.traccar_base_urls(),
    ))))
}

async fn update_traccar_config(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(patch): Json<TraccarConfigPatch>,
) -> AppResult<Json<ApiResponse<TraccarConfigResponse>>> {
    require_fleet_manager(&user)?;
    let mut fleet = state.fleet.write().await;
    let config = fleet.update_traccar_config(patch);
    Ok(Json(ApiResponse::success_with_message(
        TraccarConfigResponse::new(&config, fleet.traccar_base_urls()),
        "Configuración de Traccar guardada",
    )))
}

async fn get_traccar_urls(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<NormalizedTraccarUrls>>> {
    require_fleet_manager(&user)?;
    let fleet = state.fleet.read().await;
    Ok(Json(ApiResponse::success(fleet.traccar_base_urls())))
}

/// La prueba corre fuera del lock del store
async fn test_traccar_connection(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<TraccarRegistrationResult>>> {
    require_fleet_manager(&user)?;
    let client = state.fleet.read().await.traccar_client();
    let result = client.test_connection().await;
    let message = result.message().to_string();
    Ok(Json(ApiResponse::success_with_message(result, message)))
}

/// Abre el socket pidiendo un solo evento y lo cierra en cuanto se abre.
/// Sólo la apertura pasa por el lock; la espera corre fuera.
async fn test_traccar_stream(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<ApiResponse<TraccarRegistrationResult>>> {
    require_fleet_manager(&user)?;
    let (handlers, outcome) = TraccarStreamHandlers::for_connection_check();
    let stream = state.fleet.read().await.open_traccar_stream(Some(handlers));

    let result = match stream {
        Some(stream) => {
            stream
                .finish_connection_check(outcome, state.config.traccar_timeout)
                .await
        }
        None => TraccarRegistrationResult::failure(
            "Configura la URL de Traccar para probar la conexión en tiempo real.",
        ),
    };
    let message = result.message().to_string();
    Ok(Json(ApiResponse::success_with_message(result, message)))
}
