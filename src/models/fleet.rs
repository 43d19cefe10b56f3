//! Colecciones auxiliares de la flota: conductores, alertas, viajes y
//! geocercas. Se cargan desde fixtures y sólo las alertas se modifican.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub license: String,
    pub badge: Option<String>,
    pub rfid: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub score: u8,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Speeding,
    Geofence,
    Idle,
    Fuel,
    Maintenance,
    Fatigue,
    HarshDriving,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub tenant_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub timestamp: DateTime<Utc>,
    pub device_id: String,
    pub driver_id: Option<String>,
    pub message: String,
    pub location: Option<Location>,
    pub acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPoint {
    pub lat: f64,
    pub lon: f64,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub device_id: String,
    pub driver_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub start_location: TripPoint,
    pub end_location: Option<TripPoint>,
    pub distance: f64,
    pub duration: u64,
    pub max_speed: f64,
    pub avg_speed: f64,
    pub score: u8,
    pub fuel_consumption: Option<f64>,
    pub status: TripStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeofenceShape {
    Polygon,
    Circle,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceRuleType {
    Enter,
    Exit,
    SpeedLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceRule {
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: GeofenceRuleType,
    pub value: Option<f64>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub shape: GeofenceShape,
    /// Pares `[lon, lat]`
    pub coordinates: Vec<[f64; 2]>,
    pub radius: Option<f64>,
    pub rules: Vec<GeofenceRule>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
