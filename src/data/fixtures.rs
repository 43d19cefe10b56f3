//! Fixtures de arranque
//!
//! El store se siembra con estos datos en cada inicio; sólo la
//! configuración (mapa y Traccar) sobrevive a un reinicio.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::collections::HashMap;

use crate::models::auth::{AuthRole, AuthUser};
use crate::models::device::{Device, DeviceStatus, Position};
use crate::models::fleet::{
    Alert, AlertSeverity, AlertType, Driver, DriverStatus, Geofence, GeofenceRule, GeofenceRuleType,
    GeofenceShape, Location, Trip, TripPoint, TripStatus,
};
use crate::models::vehicle::{FuelType, Vehicle, VehicleStatus, VehicleType};

pub const DEFAULT_TENANT_ID: &str = "t_001";

/// Colecciones iniciales de la flota
#[derive(Debug, Clone, Default)]
pub struct FleetFixtures {
    pub vehicles: Vec<Vehicle>,
    pub devices: Vec<Device>,
    pub drivers: Vec<Driver>,
    pub alerts: Vec<Alert>,
    pub trips: Vec<Trip>,
    pub geofences: Vec<Geofence>,
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn ago(seconds: i64) -> DateTime<Utc> {
    Utc::now() - Duration::seconds(seconds)
}

fn context(entries: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Usuarios de la jerarquía: un admin general, un maestro y un hijo
pub fn seed_users() -> Vec<AuthUser> {
    vec![
        AuthUser {
            id: "user-1".to_string(),
            name: "Ana Souza".to_string(),
            email: "ana.souza@linka.com".to_string(),
            role: AuthRole::SuperAdmin,
            password: "admin123".to_string(),
            parent_id: None,
        },
        AuthUser {
            id: "user-2".to_string(),
            name: "Bruno Lima".to_string(),
            email: "bruno.lima@empresa.com".to_string(),
            role: AuthRole::MasterAdmin,
            password: "master123".to_string(),
            parent_id: Some("user-1".to_string()),
        },
        AuthUser {
            id: "user-3".to_string(),
            name: "Carla Ribeiro".to_string(),
            email: "carla.ribeiro@empresa.com".to_string(),
            role: AuthRole::ChildUser,
            password: "user123".to_string(),
            parent_id: Some("user-2".to_string()),
        },
    ]
}

struct SeedDevice {
    id: &'static str,
    imei: &'static str,
    iccid: &'static str,
    model: &'static str,
    protocol: &'static str,
    index: u8,
    status: DeviceStatus,
    age_secs: i64,
    lat: f64,
    lon: f64,
    speed: f64,
    heading: f64,
    ignition: bool,
    odometer: f64,
    fuel: f64,
    satellites: u32,
    hdop: f64,
}

fn build_device(seed: SeedDevice) -> Device {
    let last_update = ago(seed.age_secs);
    Device {
        id: seed.id.to_string(),
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        imei: seed.imei.to_string(),
        iccid: seed.iccid.to_string(),
        model: seed.model.to_string(),
        protocol: seed.protocol.to_string(),
        driver_id: Some(format!("drv_00{}", seed.index)),
        vehicle_id: Some(format!("v_00{}", seed.index)),
        status: seed.status,
        last_update,
        position: Some(Position {
            id: format!("pos_00{}", seed.index),
            device_id: seed.id.to_string(),
            timestamp: last_update,
            lat: seed.lat,
            lon: seed.lon,
            speed: seed.speed,
            heading: seed.heading,
            ignition: seed.ignition,
            odometer: seed.odometer,
            fuel: Some(seed.fuel),
            altitude: None,
            satellites: Some(seed.satellites),
            hdop: Some(seed.hdop),
        }),
    }
}

fn seed_devices() -> Vec<Device> {
    vec![
        build_device(SeedDevice {
            id: "d_001",
            imei: "860123456789012",
            iccid: "89551234567890123456",
            model: "GT06N",
            protocol: "GT06",
            index: 1,
            status: DeviceStatus::Online,
            age_secs: 30,
            lat: -16.6799,
            lon: -49.255,
            speed: 45.0,
            heading: 132.0,
            ignition: true,
            odometer: 45872.4,
            fuel: 56.0,
            satellites: 12,
            hdop: 0.7,
        }),
        build_device(SeedDevice {
            id: "d_002",
            imei: "860123456789013",
            iccid: "89551234567890123457",
            model: "JT808",
            protocol: "JT808",
            index: 2,
            status: DeviceStatus::Online,
            age_secs: 45,
            lat: -16.6850,
            lon: -49.2600,
            speed: 0.0,
            heading: 90.0,
            ignition: false,
            odometer: 32145.8,
            fuel: 78.0,
            satellites: 10,
            hdop: 0.9,
        }),
        build_device(SeedDevice {
            id: "d_003",
            imei: "860123456789014",
            iccid: "89551234567890123458",
            model: "Teltonika FMB920",
            protocol: "Codec8",
            index: 3,
            status: DeviceStatus::Offline,
            age_secs: 3600,
            lat: -16.6900,
            lon: -49.2700,
            speed: 0.0,
            heading: 270.0,
            ignition: false,
            odometer: 28934.2,
            fuel: 23.0,
            satellites: 8,
            hdop: 1.2,
        }),
    ]
}

fn seed_drivers() -> Vec<Driver> {
    let driver = |id: &str, name: &str, license: &str, badge: &str, rfid: Option<&str>, phone: &str, email: &str, score: u8, created_at: DateTime<Utc>| Driver {
        id: id.to_string(),
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        name: name.to_string(),
        license: license.to_string(),
        badge: Some(badge.to_string()),
        rfid: rfid.map(str::to_string),
        phone: Some(phone.to_string()),
        email: Some(email.to_string()),
        score,
        status: DriverStatus::Active,
        created_at,
    };

    vec![
        driver("drv_001", "João Silva", "ABC123456", "B001", Some("RF001"), "+5511999888777", "joao.silva@email.com", 87, at(2024, 1, 15, 10, 0)),
        driver("drv_002", "Maria Santos", "DEF789012", "B002", Some("RF002"), "+5511888777666", "maria.santos@email.com", 92, at(2024, 2, 20, 14, 30)),
        driver("drv_003", "Carlos Oliveira", "GHI345678", "B003", None, "+5511777666555", "carlos.oliveira@email.com", 76, at(2024, 3, 10, 9, 15)),
    ]
}

fn seed_vehicles() -> Vec<Vehicle> {
    const PHOTO: &str = "https://images.pexels.com/photos/1118448/pexels-photo-1118448.jpeg?auto=compress&cs=tinysrgb&w=400";

    let truck = |index: u8, client: &str, plate: &str, brand: &str, model: &str, year: i32, status: VehicleStatus, odometer: f64, next_maintenance: f64, color: &str, chassis: &str, photo: Option<&str>| Vehicle {
        id: format!("v_00{}", index),
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        client_id: Some(client.to_string()),
        plate: plate.to_string(),
        brand: brand.to_string(),
        model: model.to_string(),
        year,
        color: Some(color.to_string()),
        chassis_number: Some(chassis.to_string()),
        fuel_type: FuelType::Diesel,
        vehicle_type: Some(VehicleType::Truck),
        status,
        odometer,
        next_maintenance,
        driver_id: Some(format!("drv_00{}", index)),
        device_id: Some(format!("d_00{}", index)),
        photo: photo.map(str::to_string),
    };

    vec![
        truck(1, "client_001", "ABC1234", "Scania", "Scania R450", 2022, VehicleStatus::Active, 45872.0, 50000.0, "Branco", "9BSC4X2008R123456", Some(PHOTO)),
        truck(2, "client_001", "DEF5678", "Volvo", "Volvo FH540", 2023, VehicleStatus::Active, 32145.0, 35000.0, "Azul", "9BVF4X2009R654321", Some(PHOTO)),
        truck(3, "client_002", "GHI9012", "Mercedes", "Mercedes Actros", 2021, VehicleStatus::Maintenance, 28934.0, 30000.0, "Vermelho", "9BME4X2007R789012", None),
    ]
}

fn seed_trips() -> Vec<Trip> {
    let point = |lat: f64, lon: f64, address: &str| TripPoint {
        lat,
        lon,
        address: Some(address.to_string()),
    };

    vec![
        Trip {
            id: "trip_001".to_string(),
            device_id: "d_001".to_string(),
            driver_id: Some("drv_001".to_string()),
            start_time: at(2025, 1, 15, 8, 0),
            end_time: Some(at(2025, 1, 15, 14, 30)),
            start_location: point(-16.6799, -49.255, "Goiânia, GO"),
            end_location: Some(point(-16.7000, -49.2800, "Aparecida de Goiânia, GO")),
            distance: 45.2,
            duration: 390,
            max_speed: 85.0,
            avg_speed: 42.0,
            score: 88,
            fuel_consumption: Some(18.5),
            status: TripStatus::Completed,
        },
        Trip {
            id: "trip_002".to_string(),
            device_id: "d_002".to_string(),
            driver_id: Some("drv_002".to_string()),
            start_time: at(2025, 1, 15, 6, 30),
            end_time: Some(at(2025, 1, 15, 16, 45)),
            start_location: point(-16.6850, -49.2600, "Setor Central, Goiânia"),
            end_location: Some(point(-16.7200, -49.3000, "Setor Oeste, Goiânia")),
            distance: 78.9,
            duration: 615,
            max_speed: 92.0,
            avg_speed: 38.0,
            score: 76,
            fuel_consumption: Some(32.1),
            status: TripStatus::Completed,
        },
        Trip {
            id: "trip_003".to_string(),
            device_id: "d_001".to_string(),
            driver_id: Some("drv_001".to_string()),
            start_time: Utc::now(),
            end_time: None,
            start_location: point(-16.6799, -49.255, "Goiânia, GO"),
            end_location: None,
            distance: 12.3,
            duration: 0,
            max_speed: 65.0,
            avg_speed: 32.0,
            score: 85,
            fuel_consumption: None,
            status: TripStatus::Active,
        },
    ]
}

fn seed_alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: "alrt_001".to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            alert_type: AlertType::Speeding,
            severity: AlertSeverity::High,
            timestamp: ago(300),
            device_id: "d_002".to_string(),
            driver_id: Some("drv_002".to_string()),
            message: "Velocidade de 92 km/h em zona de 80 km/h".to_string(),
            location: Some(Location { lat: -16.6850, lon: -49.2600 }),
            acknowledged: false,
            acknowledged_by: None,
            acknowledged_at: None,
            context: context(&[("speed", json!(92)), ("limit", json!(80)), ("roadClass", json!("urban"))]),
        },
        Alert {
            id: "alrt_002".to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            alert_type: AlertType::Geofence,
            severity: AlertSeverity::Medium,
            timestamp: ago(600),
            device_id: "d_001".to_string(),
            driver_id: Some("drv_001".to_string()),
            message: "Veículo saiu da área autorizada".to_string(),
            location: Some(Location { lat: -16.6799, lon: -49.255 }),
            acknowledged: true,
            acknowledged_by: Some("user_001".to_string()),
            acknowledged_at: Some(ago(300)),
            context: HashMap::new(),
        },
        Alert {
            id: "alrt_003".to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            alert_type: AlertType::Maintenance,
            severity: AlertSeverity::Low,
            timestamp: ago(1200),
            device_id: "d_003".to_string(),
            driver_id: None,
            message: "Manutenção preventiva em 1.066 km".to_string(),
            location: None,
            acknowledged: false,
            acknowledged_by: None,
            acknowledged_at: None,
            context: context(&[("currentOdo", json!(28934)), ("nextMaintenance", json!(30000))]),
        },
    ]
}

fn seed_geofences() -> Vec<Geofence> {
    vec![
        Geofence {
            id: "geo_001".to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            name: "Centro de Distribuição Principal".to_string(),
            shape: GeofenceShape::Polygon,
            coordinates: vec![
                [-49.2500, -16.6750],
                [-49.2550, -16.6750],
                [-49.2550, -16.6800],
                [-49.2500, -16.6800],
                [-49.2500, -16.6750],
            ],
            radius: None,
            rules: vec![GeofenceRule {
                id: "rule_001".to_string(),
                rule_type: GeofenceRuleType::SpeedLimit,
                value: Some(30.0),
                actions: vec!["alert".to_string(), "notify".to_string()],
            }],
            is_active: true,
            created_at: at(2024, 1, 1, 0, 0),
        },
        Geofence {
            id: "geo_002".to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            name: "Zona de Entrega Norte".to_string(),
            shape: GeofenceShape::Circle,
            coordinates: vec![[-49.2400, -16.6700]],
            radius: Some(2000.0),
            rules: vec![GeofenceRule {
                id: "rule_002".to_string(),
                rule_type: GeofenceRuleType::Enter,
                value: None,
                actions: vec!["webhook".to_string(), "log".to_string()],
            }],
            is_active: true,
            created_at: at(2024, 1, 15, 0, 0),
        },
    ]
}

/// Flota de demostración completa
pub fn seed_fleet() -> FleetFixtures {
    FleetFixtures {
        vehicles: seed_vehicles(),
        devices: seed_devices(),
        drivers: seed_drivers(),
        alerts: seed_alerts(),
        trips: seed_trips(),
        geofences: seed_geofences(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_fleet_is_consistently_linked() {
        let fleet = seed_fleet();
        assert_eq!(fleet.vehicles.len(), 3);
        assert_eq!(fleet.devices.len(), 3);

        for vehicle in &fleet.vehicles {
            let device_id = vehicle.device_id.as_deref().unwrap();
            let device = fleet.devices.iter().find(|d| d.id == device_id).unwrap();
            assert_eq!(device.vehicle_id.as_deref(), Some(vehicle.id.as_str()));
        }
    }

    #[test]
    fn test_seed_users_form_a_hierarchy() {
        let users = seed_users();
        assert_eq!(users[0].role, AuthRole::SuperAdmin);
        assert_eq!(users[1].parent_id.as_deref(), Some("user-1"));
        assert_eq!(users[2].parent_id.as_deref(), Some("user-2"));
    }

    #[test]
    fn test_only_two_alerts_pending() {
        let pending = seed_fleet().alerts.iter().filter(|a| !a.acknowledged).count();
        assert_eq!(pending, 2);
    }
}
