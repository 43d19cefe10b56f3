//! Store en memoria de la flota
//!
//! Única vía de escritura sobre vehículos, dispositivos, alertas y la
//! configuración de mapa/Traccar. La configuración se persiste en el
//! `KeyValueStore` inyectado después de cada cambio.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::clients::traccar_client::{
    NormalizedTraccarUrls, TraccarClient, TraccarRegistrationPayload, TraccarRegistrationResult,
    TraccarStream, TraccarStreamHandlers,
};
use crate::data::fixtures::{FleetFixtures, DEFAULT_TENANT_ID};
use crate::models::device::{Device, DeviceStatus, RegisterDeviceInput};
use crate::models::fleet::{Alert, Driver, Geofence, Trip};
use crate::models::map_config::{MapConfiguration, MapProviderId, MapSettingsPatch};
use crate::models::traccar_config::{TraccarConfig, TraccarConfigPatch};
use crate::models::vehicle::{CreateVehicleInput, Vehicle, VehiclePatch};
use crate::storage::{
    load_json, persist_json, remove_key, KeyValueStore, MAPS_API_KEY_KEY, MAP_CONFIG_KEY,
    TRACCAR_CONFIG_KEY,
};
use crate::utils::errors::ProvisioningError;
use crate::utils::imei::{is_duplicate_imei, normalize_imei, validate_imei};
use crate::utils::validation::normalize_plate;

pub const DEFAULT_PROTOCOL: &str = "GT06";

/// Resultado del alta de un vehículo
#[derive(Debug, Clone, Serialize)]
pub struct CreateVehicleResult {
    pub vehicle: Vehicle,
    pub device: Option<Device>,
    pub traccar: Option<TraccarRegistrationResult>,
}

/// Vehículo ya guardado localmente, pendiente de sincronizar con Traccar
#[derive(Debug, Clone)]
pub struct ProvisionedVehicle {
    pub vehicle: Vehicle,
    pub device: Option<Device>,
    traccar_payload: Option<TraccarRegistrationPayload>,
}

impl ProvisionedVehicle {
    pub fn wants_traccar_sync(&self) -> bool {
        self.traccar_payload.is_some()
    }

    /// Empujar a Traccar si se pidió. El estado local nunca se revierte.
    pub async fn sync_with_traccar(self, client: &TraccarClient) -> CreateVehicleResult {
        let traccar = match &self.traccar_payload {
            Some(payload) => Some(client.register_vehicle(payload).await),
            None => None,
        };

        CreateVehicleResult {
            vehicle: self.vehicle,
            device: self.device,
            traccar,
        }
    }
}

pub struct FleetStore {
    vehicles: Vec<Vehicle>,
    devices: Vec<Device>,
    drivers: Vec<Driver>,
    alerts: Vec<Alert>,
    trips: Vec<Trip>,
    geofences: Vec<Geofence>,
    map_config: MapConfiguration,
    traccar_config: TraccarConfig,
    traccar_client: TraccarClient,
    storage: Arc<dyn KeyValueStore>,
}

impl FleetStore {
    /// Crear el store con los datos iniciales y cargar la configuración
    /// persistida (valores ausentes o corruptos vuelven a los defaults)
    pub fn new(fixtures: FleetFixtures, storage: Arc<dyn KeyValueStore>) -> Self {
        let mut map_config: MapConfiguration =
            load_json(storage.as_ref(), MAP_CONFIG_KEY).unwrap_or_default();
        if map_config.api_key.is_none() {
            map_config.api_key = load_json::<String>(storage.as_ref(), MAPS_API_KEY_KEY)
                .filter(|key| !key.trim().is_empty());
        }

        let traccar_config: TraccarConfig =
            load_json(storage.as_ref(), TRACCAR_CONFIG_KEY).unwrap_or_default();
        let traccar_client = TraccarClient::new(traccar_config.clone());

        log::info!(
            "🚚 Fleet store inicializado: {} vehículos, {} dispositivos, proveedor de mapa {:?}",
            fixtures.vehicles.len(),
            fixtures.devices.len(),
            map_config.provider
        );

        Self {
            vehicles: fixtures.vehicles,
            devices: fixtures.devices,
            drivers: fixtures.drivers,
            alerts: fixtures.alerts,
            trips: fixtures.trips,
            geofences: fixtures.geofences,
            map_config,
            traccar_config,
            traccar_client,
            storage,
        }
    }

    pub fn with_traccar_timeout(mut self, timeout: Duration) -> Self {
        self.traccar_client = self.traccar_client.with_timeout(timeout);
        self
    }

    // === Lecturas ===

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.id == id)
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn pending_alerts(&self) -> Vec<&Alert> {
        self.alerts.iter().filter(|alert| !alert.acknowledged).collect()
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn geofences(&self) -> &[Geofence] {
        &self.geofences
    }

    pub fn map_config(&self) -> &MapConfiguration {
        &self.map_config
    }

    pub fn traccar_config(&self) -> &TraccarConfig {
        &self.traccar_config
    }

    /// Copia del cliente para usar fuera del lock del store
    pub fn traccar_client(&self) -> TraccarClient {
        self.traccar_client.clone()
    }

    fn plate_taken(&self, plate: &str, exclude_id: Option<&str>) -> bool {
        self.vehicles
            .iter()
            .filter(|vehicle| Some(vehicle.id.as_str()) != exclude_id)
            .any(|vehicle| normalize_plate(&vehicle.plate) == plate)
    }

    fn ensure_driver(&self, driver_id: Option<&str>) -> Result<(), ProvisioningError> {
        match driver_id {
            Some(id) if !self.drivers.iter().any(|driver| driver.id == id) => {
                Err(ProvisioningError::DriverNotFound(id.to_string()))
            }
            _ => Ok(()),
        }
    }

    // === Alta de vehículos ===

    /// Validar y guardar localmente el vehículo (y su dispositivo).
    ///
    /// No toca la red. Si se pidió sincronizar con Traccar, el resultado
    /// lleva el payload listo para `sync_with_traccar`.
    pub fn provision_vehicle(&mut self, input: CreateVehicleInput) -> Result<ProvisionedVehicle, ProvisioningError> {
        let plate = normalize_plate(&input.plate);
        if plate.is_empty() {
            return Err(ProvisioningError::EmptyPlate);
        }
        if self.plate_taken(&plate, None) {
            return Err(ProvisioningError::DuplicatePlate(plate));
        }

        self.ensure_driver(input.driver_id.as_deref())?;

        let device_imei = input.device.as_ref().map(|device| normalize_imei(&device.imei));
        if let Some(imei) = &device_imei {
            if is_duplicate_imei(imei, &self.devices, None) {
                return Err(ProvisioningError::DuplicateImei(imei.clone()));
            }
        }

        let tenant_id = input.tenant_id.unwrap_or_else(|| DEFAULT_TENANT_ID.to_string());
        let vehicle_id = format!("veh_{}", Uuid::new_v4());

        let device = match (input.device, device_imei) {
            (Some(device_input), Some(imei)) => Some(Device {
                id: format!("dev_{}", Uuid::new_v4()),
                tenant_id: tenant_id.clone(),
                imei,
                iccid: device_input.iccid.unwrap_or_default(),
                model: device_input.model,
                protocol: device_input.protocol.unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
                driver_id: input.driver_id.clone(),
                vehicle_id: Some(vehicle_id.clone()),
                status: DeviceStatus::Inactive,
                last_update: Utc::now(),
                position: None,
            }),
            _ => None,
        };

        let vehicle = Vehicle {
            id: vehicle_id,
            tenant_id,
            client_id: input.client_id,
            plate,
            brand: input.brand,
            model: input.model,
            year: input.year,
            color: input.color,
            chassis_number: input.chassis_number,
            fuel_type: input.fuel_type,
            vehicle_type: input.vehicle_type,
            status: input.status.unwrap_or_default(),
            odometer: input.odometer.unwrap_or(0.0),
            next_maintenance: input.next_maintenance.unwrap_or(0.0),
            driver_id: input.driver_id,
            device_id: device.as_ref().map(|device| device.id.clone()),
            photo: input.photo,
        };

        self.vehicles.push(vehicle.clone());
        if let Some(device) = &device {
            self.devices.push(device.clone());
        }

        log::info!(
            "✅ Vehículo {} creado ({}){}",
            vehicle.plate,
            vehicle.id,
            device
                .as_ref()
                .map(|d| format!(" con dispositivo {}", d.imei))
                .unwrap_or_default()
        );

        let traccar_payload = input.push_to_traccar.then(|| TraccarRegistrationPayload {
            vehicle: vehicle.clone(),
            device: device.clone(),
            device_alias: input.traccar_device_name.filter(|name| !name.trim().is_empty()),
            vehicle_alias: input.traccar_vehicle_name.filter(|name| !name.trim().is_empty()),
            group_id: input.traccar_group_id,
        });

        Ok(ProvisionedVehicle {
            vehicle,
            device,
            traccar_payload,
        })
    }

    /// Alta completa: guardado local y, si se pidió, sincronización con Traccar
    pub async fn create_vehicle(&mut self, input: CreateVehicleInput) -> Result<CreateVehicleResult, ProvisioningError> {
        let provisioned = self.provision_vehicle(input)?;
        let client = self.traccar_client.clone();
        Ok(provisioned.sync_with_traccar(&client).await)
    }

    pub fn update_vehicle(&mut self, id: &str, mut patch: VehiclePatch) -> Result<Vehicle, ProvisioningError> {
        if let Some(raw_plate) = patch.plate.take() {
            let plate = normalize_plate(&raw_plate);
            if plate.is_empty() {
                return Err(ProvisioningError::EmptyPlate);
            }
            if self.plate_taken(&plate, Some(id)) {
                return Err(ProvisioningError::DuplicatePlate(plate));
            }
            patch.plate = Some(plate);
        }
        if let Some(driver_id) = &patch.driver_id {
            self.ensure_driver(driver_id.as_deref())?;
        }

        let vehicle = self
            .vehicles
            .iter_mut()
            .find(|vehicle| vehicle.id == id)
            .ok_or_else(|| ProvisioningError::VehicleNotFound(id.to_string()))?;

        patch.apply(vehicle);
        log::info!("✏️ Vehículo {} actualizado", vehicle.id);
        Ok(vehicle.clone())
    }

    /// Eliminar un vehículo. Sus dispositivos quedan desvinculados e inactivos.
    pub fn delete_vehicle(&mut self, id: &str) -> Result<Vehicle, ProvisioningError> {
        let index = self
            .vehicles
            .iter()
            .position(|vehicle| vehicle.id == id)
            .ok_or_else(|| ProvisioningError::VehicleNotFound(id.to_string()))?;
        let removed = self.vehicles.remove(index);

        for device in self
            .devices
            .iter_mut()
            .filter(|device| device.vehicle_id.as_deref() == Some(id))
        {
            device.vehicle_id = None;
            device.status = DeviceStatus::Inactive;
            log::info!("🔌 Dispositivo {} desvinculado del vehículo {}", device.id, id);
        }

        log::info!("🗑️ Vehículo {} eliminado", removed.plate);
        Ok(removed)
    }

    // === Dispositivos ===

    /// Alta independiente de un rastreador, opcionalmente vinculado a un
    /// vehículo sin dispositivo
    pub fn register_device(&mut self, input: RegisterDeviceInput) -> Result<Device, ProvisioningError> {
        let imei = normalize_imei(&input.imei);
        if !validate_imei(&imei) {
            return Err(ProvisioningError::InvalidImei(input.imei));
        }
        if is_duplicate_imei(&imei, &self.devices, None) {
            return Err(ProvisioningError::DuplicateImei(imei));
        }

        if let Some(vehicle_id) = &input.vehicle_id {
            let vehicle = self
                .vehicle(vehicle_id)
                .ok_or_else(|| ProvisioningError::VehicleNotFound(vehicle_id.clone()))?;
            if let Some(device_id) = &vehicle.device_id {
                return Err(ProvisioningError::VehicleAlreadyLinked {
                    vehicle_id: vehicle_id.clone(),
                    device_id: device_id.clone(),
                });
            }
        }

        let device = Device {
            id: format!("dev_{}", Uuid::new_v4()),
            tenant_id: input.tenant_id.unwrap_or_else(|| DEFAULT_TENANT_ID.to_string()),
            imei,
            iccid: input.iccid.unwrap_or_default(),
            model: input.model,
            protocol: input.protocol.unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
            driver_id: None,
            vehicle_id: input.vehicle_id.clone(),
            status: DeviceStatus::Inactive,
            last_update: Utc::now(),
            position: None,
        };

        if let Some(vehicle_id) = &input.vehicle_id {
            if let Some(vehicle) = self.vehicles.iter_mut().find(|v| &v.id == vehicle_id) {
                vehicle.device_id = Some(device.id.clone());
            }
        }

        self.devices.push(device.clone());
        log::info!("📟 Dispositivo {} registrado ({})", device.imei, device.id);
        Ok(device)
    }

    /// Vincular un dispositivo a un vehículo (relación 1:1)
    pub fn link_device(&mut self, device_id: &str, vehicle_id: &str) -> Result<(), ProvisioningError> {
        let device = self
            .device(device_id)
            .ok_or_else(|| ProvisioningError::DeviceNotFound(device_id.to_string()))?;
        if let Some(current) = device.vehicle_id.as_deref().filter(|current| *current != vehicle_id) {
            return Err(ProvisioningError::DeviceAlreadyLinked {
                device_id: device_id.to_string(),
                vehicle_id: current.to_string(),
            });
        }

        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| ProvisioningError::VehicleNotFound(vehicle_id.to_string()))?;
        if let Some(current) = vehicle.device_id.as_deref().filter(|current| *current != device_id) {
            return Err(ProvisioningError::VehicleAlreadyLinked {
                vehicle_id: vehicle_id.to_string(),
                device_id: current.to_string(),
            });
        }

        if let Some(vehicle) = self.vehicles.iter_mut().find(|v| v.id == vehicle_id) {
            vehicle.device_id = Some(device_id.to_string());
        }
        if let Some(device) = self.devices.iter_mut().find(|d| d.id == device_id) {
            device.vehicle_id = Some(vehicle_id.to_string());
        }

        log::info!("🔗 Dispositivo {} vinculado al vehículo {}", device_id, vehicle_id);
        Ok(())
    }

    // === Alertas ===

    pub fn acknowledge_alert(&mut self, id: &str, acknowledged_by: &str) -> Option<Alert> {
        let alert = self.alerts.iter_mut().find(|alert| alert.id == id)?;
        alert.acknowledged = true;
        alert.acknowledged_by = Some(acknowledged_by.to_string());
        alert.acknowledged_at = Some(Utc::now());
        Some(alert.clone())
    }

    /// Las alertas nuevas van al principio
    pub fn add_alert(&mut self, alert: Alert) {
        self.alerts.insert(0, alert);
    }

    // === Configuración de mapa ===

    fn persist_map_config(&self) {
        let storage = self.storage.as_ref();
        persist_json(storage, MAP_CONFIG_KEY, &self.map_config);
        match &self.map_config.api_key {
            Some(api_key) => persist_json(storage, MAPS_API_KEY_KEY, api_key),
            None => remove_key(storage, MAPS_API_KEY_KEY),
        }
    }

    pub fn save_map_api_key(&mut self, api_key: &str) -> MapConfiguration {
        let trimmed = api_key.trim();
        self.map_config.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.persist_map_config();
        log::info!("🗺️ API key del mapa actualizada");
        self.map_config.clone()
    }

    pub fn clear_map_api_key(&mut self) -> MapConfiguration {
        self.map_config.api_key = None;
        self.persist_map_config();
        log::info!("🗺️ API key del mapa eliminada");
        self.map_config.clone()
    }

    pub fn update_map_settings(&mut self, patch: MapSettingsPatch) -> MapConfiguration {
        patch.apply(&mut self.map_config.settings);
        self.persist_map_config();
        self.map_config.clone()
    }

    pub fn set_map_provider(&mut self, provider: MapProviderId) -> MapConfiguration {
        self.map_config.provider = provider;
        if provider.requires_api_key() && self.map_config.api_key.is_none() {
            log::warn!("⚠️ El proveedor {:?} necesita una API key", provider);
        }
        self.persist_map_config();
        self.map_config.clone()
    }

    // === Configuración de Traccar ===

    pub fn update_traccar_config(&mut self, patch: TraccarConfigPatch) -> TraccarConfig {
        patch.apply(&mut self.traccar_config);
        self.traccar_client.update_config(self.traccar_config.clone());
        persist_json(self.storage.as_ref(), TRACCAR_CONFIG_KEY, &self.traccar_config);
        log::info!("🛰️ Configuración de Traccar actualizada");
        self.traccar_config.clone()
    }

    pub fn traccar_base_urls(&self) -> NormalizedTraccarUrls {
        self.traccar_client.normalized_urls()
    }

    pub async fn test_traccar_connection(&self) -> TraccarRegistrationResult {
        self.traccar_client.test_connection().await
    }

    pub fn open_traccar_stream(&self, handlers: Option<TraccarStreamHandlers>) -> Option<TraccarStream> {
        self.traccar_client.connect_to_events_stream(handlers)
    }
}
