//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, el input del flujo de alta y el
//! patch explícito para actualizaciones parciales.

use serde::{Deserialize, Serialize};

/// Estado operativo del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Truck,
    Motorcycle,
    Machine,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Truck => "truck",
            VehicleType::Motorcycle => "motorcycle",
            VehicleType::Machine => "machine",
        }
    }
}

/// Vehicle principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub tenant_id: String,
    pub client_id: Option<String>,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub chassis_number: Option<String>,
    pub fuel_type: FuelType,
    pub vehicle_type: Option<VehicleType>,
    pub status: VehicleStatus,
    pub odometer: f64,
    pub next_maintenance: f64,
    pub driver_id: Option<String>,
    pub device_id: Option<String>,
    pub photo: Option<String>,
}

/// Dispositivo solicitado junto con el vehículo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleDeviceInput {
    pub imei: String,
    pub model: String,
    pub protocol: Option<String>,
    pub iccid: Option<String>,
}

/// Input del flujo de alta de vehículos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleInput {
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: FuelType,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
    #[serde(default)]
    pub odometer: Option<f64>,
    #[serde(default)]
    pub next_maintenance: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub chassis_number: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub device: Option<CreateVehicleDeviceInput>,
    #[serde(default)]
    pub push_to_traccar: bool,
    #[serde(default)]
    pub traccar_device_name: Option<String>,
    #[serde(default)]
    pub traccar_vehicle_name: Option<String>,
    #[serde(default)]
    pub traccar_group_id: Option<i64>,
}

impl CreateVehicleInput {
    /// Input mínimo; el resto de campos queda con sus valores por defecto
    pub fn new(plate: &str, brand: &str, model: &str, year: i32, fuel_type: FuelType) -> Self {
        Self {
            plate: plate.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            year,
            fuel_type,
            vehicle_type: None,
            tenant_id: None,
            client_id: None,
            driver_id: None,
            status: None,
            odometer: None,
            next_maintenance: None,
            color: None,
            chassis_number: None,
            photo: None,
            device: None,
            push_to_traccar: false,
            traccar_device_name: None,
            traccar_vehicle_name: None,
            traccar_group_id: None,
        }
    }
}

/// Actualización parcial de un vehículo.
///
/// Los campos opcionales anidados (`Option<Option<_>>`) distinguen entre
/// "no tocar" y "limpiar".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehiclePatch {
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub fuel_type: Option<FuelType>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub vehicle_type: Option<Option<VehicleType>>,
    pub status: Option<VehicleStatus>,
    pub odometer: Option<f64>,
    pub next_maintenance: Option<f64>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub client_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub driver_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub photo: Option<Option<String>>,
}

impl VehiclePatch {
    /// Aplicar el patch sobre un vehículo. La placa llega ya normalizada.
    pub fn apply(self, vehicle: &mut Vehicle) {
        if let Some(plate) = self.plate {
            vehicle.plate = plate;
        }
        if let Some(brand) = self.brand {
            vehicle.brand = brand;
        }
        if let Some(model) = self.model {
            vehicle.model = model;
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
        if let Some(fuel_type) = self.fuel_type {
            vehicle.fuel_type = fuel_type;
        }
        if let Some(vehicle_type) = self.vehicle_type {
            vehicle.vehicle_type = vehicle_type;
        }
        if let Some(status) = self.status {
            vehicle.status = status;
        }
        if let Some(odometer) = self.odometer {
            vehicle.odometer = odometer;
        }
        if let Some(next_maintenance) = self.next_maintenance {
            vehicle.next_maintenance = next_maintenance;
        }
        if let Some(color) = self.color {
            vehicle.color = color;
        }
        if let Some(client_id) = self.client_id {
            vehicle.client_id = client_id;
        }
        if let Some(driver_id) = self.driver_id {
            vehicle.driver_id = driver_id;
        }
        if let Some(photo) = self.photo {
            vehicle.photo = photo;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truck() -> Vehicle {
        Vehicle {
            id: "v_001".into(),
            tenant_id: "t_001".into(),
            client_id: Some("client_001".into()),
            plate: "ABC1234".into(),
            brand: "Scania".into(),
            model: "R450".into(),
            year: 2022,
            color: Some("Branco".into()),
            chassis_number: None,
            fuel_type: FuelType::Diesel,
            vehicle_type: Some(VehicleType::Truck),
            status: VehicleStatus::Active,
            odometer: 45872.0,
            next_maintenance: 50000.0,
            driver_id: Some("drv_001".into()),
            device_id: Some("d_001".into()),
            photo: None,
        }
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut vehicle = truck();
        VehiclePatch {
            status: Some(VehicleStatus::Maintenance),
            odometer: Some(46000.0),
            ..Default::default()
        }
        .apply(&mut vehicle);

        assert_eq!(vehicle.status, VehicleStatus::Maintenance);
        assert_eq!(vehicle.odometer, 46000.0);
        assert_eq!(vehicle.plate, "ABC1234");
        assert_eq!(vehicle.color.as_deref(), Some("Branco"));
    }

    #[test]
    fn test_patch_can_clear_optional_fields() {
        let mut vehicle = truck();
        VehiclePatch {
            driver_id: Some(None),
            color: Some(None),
            ..Default::default()
        }
        .apply(&mut vehicle);

        assert!(vehicle.driver_id.is_none());
        assert!(vehicle.color.is_none());
        assert_eq!(vehicle.client_id.as_deref(), Some("client_001"));
    }

    #[test]
    fn test_patch_json_distinguishes_null_from_missing() {
        let patch: VehiclePatch = serde_json::from_value(serde_json::json!({
            "driver_id": null,
            "status": "inactive"
        }))
        .unwrap();

        assert_eq!(patch.driver_id, Some(None));
        assert!(patch.color.is_none());
        assert_eq!(patch.status, Some(VehicleStatus::Inactive));
    }

    #[test]
    fn test_create_input_defaults_from_json() {
        let input: CreateVehicleInput = serde_json::from_value(serde_json::json!({
            "plate": "xyz9876",
            "brand": "Fiat",
            "model": "Strada",
            "year": 2024,
            "fuel_type": "gasoline"
        }))
        .unwrap();

        assert!(!input.push_to_traccar);
        assert!(input.device.is_none());
        assert!(input.status.is_none());
    }
}
