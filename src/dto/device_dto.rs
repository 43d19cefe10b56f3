use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::device::RegisterDeviceInput;
use crate::utils::validation::validate_imei_field;

// Request para registrar un rastreador sin vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterDeviceRequest {
    #[validate(custom = "validate_imei_field")]
    pub imei: String,
    #[validate(length(min = 1, max = 60))]
    pub model: String,
    pub protocol: Option<String>,
    #[validate(length(max = 22))]
    pub iccid: Option<String>,
    pub tenant_id: Option<String>,
    pub vehicle_id: Option<String>,
}

impl From<RegisterDeviceRequest> for RegisterDeviceInput {
    fn from(request: RegisterDeviceRequest) -> Self {
        Self {
            imei: request.imei,
            model: request.model,
            protocol: request.protocol,
            iccid: request.iccid,
            tenant_id: request.tenant_id,
            vehicle_id: request.vehicle_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LinkDeviceRequest {
    pub vehicle_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ImeiQuery {
    pub imei: String,
}

// Resultado de validar un IMEI
#[derive(Debug, Serialize)]
pub struct ImeiValidationResponse {
    pub imei: String,
    pub normalized: String,
    pub formatted: String,
    pub valid: bool,
    pub duplicate: bool,
}
