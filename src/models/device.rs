//! Modelo de Device (rastreador GPS)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estado de conexión del rastreador
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Inactive,
}

/// Última posición reportada por el rastreador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub speed: f64,
    pub heading: f64,
    pub ignition: bool,
    pub odometer: f64,
    pub fuel: Option<f64>,
    pub altitude: Option<f64>,
    pub satellites: Option<u32>,
    pub hdop: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub tenant_id: String,
    pub imei: String,
    pub iccid: String,
    pub model: String,
    pub protocol: String,
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub status: DeviceStatus,
    pub last_update: DateTime<Utc>,
    pub position: Option<Position>,
}

/// Alta independiente de un dispositivo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDeviceInput {
    pub imei: String,
    pub model: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub iccid: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
}
