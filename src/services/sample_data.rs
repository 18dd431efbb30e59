//! Dataset inicial
//!
//! Conjunto fijo con el que arranca el store: dos conductores y dos rutas,
//! con la ruta `route1` ya asignada al conductor `3`. Las fechas son
//! literales para que los tests sean deterministas.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Driver, DriverId, Priority, Route, RouteId, RouteStatus, VehicleType};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("literal sample date is valid")
}

/// Conductores iniciales
///
/// El conductor `1` conduce un sedán a propósito: así no es candidato para
/// la ruta de camión `route1` y su asignación a `route2` (furgoneta) muestra
/// que `assign` no compara tipos de vehículo.
pub fn drivers() -> Vec<Driver> {
    vec![
        Driver {
            id: DriverId::from("1"),
            name: "Marcus Bell".to_string(),
            email: "marcus.bell@fleet.example".to_string(),
            phone: "+1 555 0101".to_string(),
            license_number: "DL-482910".to_string(),
            is_available: true,
            assigned_routes: vec![],
            experience: 6,
            vehicle_type: VehicleType::Sedan,
            rating: 4.7,
            join_date: at(2021, 3, 15, 8, 0),
        },
        Driver {
            id: DriverId::from("3"),
            name: "Priya Nair".to_string(),
            email: "priya.nair@fleet.example".to_string(),
            phone: "+1 555 0103".to_string(),
            license_number: "DL-661274".to_string(),
            is_available: false,
            assigned_routes: vec![RouteId::from("route1")],
            experience: 11,
            vehicle_type: VehicleType::Truck,
            rating: 4.9,
            join_date: at(2019, 7, 1, 8, 0),
        },
    ]
}

pub fn routes() -> Vec<Route> {
    vec![
        Route {
            id: RouteId::from("route1"),
            name: "Harbor Freight Run".to_string(),
            start_location: "North Depot".to_string(),
            end_location: "Port Terminal 4".to_string(),
            distance: 42.5,
            estimated_duration: 95,
            assigned_driver_id: Some(DriverId::from("3")),
            assigned_driver_name: Some("Priya Nair".to_string()),
            status: RouteStatus::Assigned,
            priority: Priority::High,
            scheduled_date: at(2025, 1, 15, 9, 0),
            vehicle_type: VehicleType::Truck,
            description: Some("Container pickup, dock 7".to_string()),
            created_at: at(2025, 1, 10, 14, 30),
        },
        Route {
            id: RouteId::from("route2"),
            name: "Downtown Parcel Loop".to_string(),
            start_location: "Central Depot".to_string(),
            end_location: "Market Street".to_string(),
            distance: 18.2,
            estimated_duration: 60,
            assigned_driver_id: None,
            assigned_driver_name: None,
            status: RouteStatus::Unassigned,
            priority: Priority::Medium,
            scheduled_date: at(2025, 1, 16, 13, 30),
            vehicle_type: VehicleType::Van,
            description: None,
            created_at: at(2025, 1, 11, 9, 15),
        },
    ]
}
