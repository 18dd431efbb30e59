//! Consultas y filtros
//!
//! Funciones puras sobre snapshots. Ninguna reordena: el resultado conserva
//! el orden relativo de la colección de entrada.

use serde::Serialize;

use crate::models::{Driver, DriverStatusFilter, Route, RouteStatus, RouteStatusFilter};

/// Contadores del panel principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FleetStats {
    pub total_drivers: usize,
    pub available_drivers: usize,
    pub total_routes: usize,
    pub unassigned_routes: usize,
    /// Rutas `assigned` o `in-progress`
    pub assigned_routes: usize,
}

pub fn available_drivers(drivers: &[Driver]) -> Vec<Driver> {
    drivers.iter().filter(|driver| driver.is_available).cloned().collect()
}

pub fn unassigned_routes(routes: &[Route]) -> Vec<Route> {
    routes
        .iter()
        .filter(|route| route.status == RouteStatus::Unassigned)
        .cloned()
        .collect()
}

/// Conductores compatibles con una ruta: disponibles, mismo tipo de
/// vehículo y sin esa ruta ya asignada
pub fn candidate_drivers(route: &Route, drivers: &[Driver]) -> Vec<Driver> {
    drivers
        .iter()
        .filter(|driver| {
            driver.is_available
                && driver.vehicle_type == route.vehicle_type
                && !driver.holds_route(&route.id)
        })
        .cloned()
        .collect()
}

/// Búsqueda por nombre, email o teléfono, y luego filtro de estado
pub fn filter_drivers(drivers: &[Driver], search: &str, status: DriverStatusFilter) -> Vec<Driver> {
    let query = normalized_query(search);
    drivers
        .iter()
        .filter(|driver| match &query {
            Some(query) => contains_any(query, &[&driver.name, &driver.email, &driver.phone]),
            None => true,
        })
        .filter(|driver| status.matches(driver))
        .cloned()
        .collect()
}

/// Búsqueda por nombre, origen o destino, y luego filtro de estado exacto
pub fn filter_routes(routes: &[Route], search: &str, status: RouteStatusFilter) -> Vec<Route> {
    let query = normalized_query(search);
    routes
        .iter()
        .filter(|route| match &query {
            Some(query) => contains_any(
                query,
                &[&route.name, &route.start_location, &route.end_location],
            ),
            None => true,
        })
        .filter(|route| status.matches(route))
        .cloned()
        .collect()
}

pub fn fleet_stats(drivers: &[Driver], routes: &[Route]) -> FleetStats {
    FleetStats {
        total_drivers: drivers.len(),
        available_drivers: drivers.iter().filter(|d| d.is_available).count(),
        total_routes: routes.len(),
        unassigned_routes: routes
            .iter()
            .filter(|r| r.status == RouteStatus::Unassigned)
            .count(),
        assigned_routes: routes.iter().filter(|r| r.status.requires_driver()).count(),
    }
}

/// Texto vacío o solo espacios no filtra nada
fn normalized_query(search: &str) -> Option<String> {
    if search.trim().is_empty() {
        None
    } else {
        Some(search.to_lowercase())
    }
}

fn contains_any(query: &str, fields: &[&String]) -> bool {
    fields.iter().any(|field| field.to_lowercase().contains(query))
}
