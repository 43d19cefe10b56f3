use serde::Deserialize;
use validator::Validate;

use crate::models::vehicle::{
    CreateVehicleDeviceInput, CreateVehicleInput, FuelType, VehicleStatus, VehicleType,
};
use crate::utils::validation::{validate_imei_field, validate_license_plate};

// Dispositivo a crear junto con el vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleDeviceRequest {
    #[validate(custom = "validate_imei_field")]
    pub imei: String,
    #[validate(length(min = 1, max = 60))]
    pub model: String,
    pub protocol: Option<String>,
    #[validate(length(max = 22))]
    pub iccid: Option<String>,
}

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub plate: String,
    #[validate(length(min = 1, max = 60))]
    pub brand: String,
    #[validate(length(min = 1, max = 60))]
    pub model: String,
    #[validate(range(min = 1950, max = 2100))]
    pub year: i32,
    pub fuel_type: FuelType,
    pub vehicle_type: Option<VehicleType>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub driver_id: Option<String>,
    pub status: Option<VehicleStatus>,
    #[validate(range(min = 0.0))]
    pub odometer: Option<f64>,
    #[validate(range(min = 0.0))]
    pub next_maintenance: Option<f64>,
    pub color: Option<String>,
    pub chassis_number: Option<String>,
    #[validate(url)]
    pub photo: Option<String>,
    #[validate]
    pub device: Option<CreateVehicleDeviceRequest>,
    #[serde(default)]
    pub push_to_traccar: bool,
    pub traccar_device_name: Option<String>,
    pub traccar_vehicle_name: Option<String>,
    pub traccar_group_id: Option<i64>,
}

impl From<CreateVehicleRequest> for CreateVehicleInput {
    fn from(request: CreateVehicleRequest) -> Self {
        Self {
            plate: request.plate,
            brand: request.brand,
            model: request.model,
            year: request.year,
            fuel_type: request.fuel_type,
            vehicle_type: request.vehicle_type,
            tenant_id: request.tenant_id,
            client_id: request.client_id,
            driver_id: request.driver_id,
            status: request.status,
            odometer: request.odometer,
            next_maintenance: request.next_maintenance,
            color: request.color,
            chassis_number: request.chassis_number,
            photo: request.photo,
            device: request.device.map(|device| CreateVehicleDeviceInput {
                imei: device.imei,
                model: device.model,
                protocol: device.protocol,
                iccid: device.iccid,
            }),
            push_to_traccar: request.push_to_traccar,
            traccar_device_name: request.traccar_device_name,
            traccar_vehicle_name: request.traccar_vehicle_name,
            traccar_group_id: request.traccar_group_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateVehicleRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_invalid_device_imei_fails_validation() {
        let req = request(json!({
            "plate": "XYZ9876",
            "brand": "Fiat",
            "model": "Strada",
            "year": 2024,
            "fuel_type": "gasoline",
            "device": { "imei": "490154203237519", "model": "GT06N" }
        }));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_valid_request_converts_to_input() {
        let req = request(json!({
            "plate": "xyz9876",
            "brand": "Fiat",
            "model": "Strada",
            "year": 2024,
            "fuel_type": "gasoline",
            "push_to_traccar": true,
            "device": { "imei": "490154203237518", "model": "GT06N" }
        }));
        assert!(req.validate().is_ok());

        let input = CreateVehicleInput::from(req);
        assert!(input.push_to_traccar);
        assert_eq!(input.device.unwrap().imei, "490154203237518");
    }
}
