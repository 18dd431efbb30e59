//! Modelo de Route
//!
//! Este módulo contiene el struct Route, sus requests de creación y
//! actualización parcial, y el filtro de estado usado en los listados.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::models::{DriverId, VehicleType};
use crate::utils::validation::validate_not_blank;

/// Identificador opaco de una ruta, inmutable tras la creación
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RouteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Estado de la ruta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStatus {
    Unassigned,
    Assigned,
    InProgress,
    Completed,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Unassigned => "unassigned",
            RouteStatus::Assigned => "assigned",
            RouteStatus::InProgress => "in-progress",
            RouteStatus::Completed => "completed",
        }
    }

    /// Estados que exigen un conductor asignado
    pub fn requires_driver(&self) -> bool {
        matches!(self, RouteStatus::Assigned | RouteStatus::InProgress)
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "unassigned" => Ok(RouteStatus::Unassigned),
            "assigned" => Ok(RouteStatus::Assigned),
            "in-progress" => Ok(RouteStatus::InProgress),
            "completed" => Ok(RouteStatus::Completed),
            _ => Err(()),
        }
    }
}

/// Prioridad de la ruta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(()),
        }
    }
}

/// Route principal
///
/// `assigned_driver_id` / `assigned_driver_name` solo los escribe el motor
/// de asignación. El nombre se captura al asignar, no se sincroniza después.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub start_location: String,
    pub end_location: String,
    pub distance: f64,
    pub estimated_duration: u32,
    pub assigned_driver_id: Option<DriverId>,
    pub assigned_driver_name: Option<String>,
    pub status: RouteStatus,
    pub priority: Priority,
    pub scheduled_date: DateTime<Utc>,
    pub vehicle_type: VehicleType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Verificar si la ruta está asignada al conductor indicado
    pub fn is_assigned_to(&self, driver_id: &DriverId) -> bool {
        self.assigned_driver_id.as_ref() == Some(driver_id)
    }
}

/// Request para crear una nueva ruta
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 3, max = 100), custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(min = 3, max = 500), custom = "validate_not_blank")]
    pub start_location: String,

    #[validate(length(min = 3, max = 500), custom = "validate_not_blank")]
    pub end_location: String,

    #[validate(range(min = 0.1, max = 1000.0))]
    pub distance: f64,

    #[validate(range(min = 5, max = 480))]
    pub estimated_duration: u32,

    pub priority: Priority,

    pub scheduled_date: DateTime<Utc>,

    pub vehicle_type: VehicleType,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Request para actualizar una ruta existente
///
/// Los cambios de `status` se validan contra el vínculo de asignación en el
/// store; los campos de conductor no son editables por esta vía.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 3, max = 100), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[validate(length(min = 3, max = 500), custom = "validate_not_blank")]
    pub start_location: Option<String>,

    #[validate(length(min = 3, max = 500), custom = "validate_not_blank")]
    pub end_location: Option<String>,

    #[validate(range(min = 0.1, max = 1000.0))]
    pub distance: Option<f64>,

    #[validate(range(min = 5, max = 480))]
    pub estimated_duration: Option<u32>,

    pub status: Option<RouteStatus>,

    pub priority: Option<Priority>,

    pub scheduled_date: Option<DateTime<Utc>>,

    pub vehicle_type: Option<VehicleType>,

    /// `None` no toca la descripción; `Some(None)` (un `null` en JSON) la borra
    #[serde(default, deserialize_with = "present_field")]
    #[validate(length(max = 1000))]
    pub description: Option<Option<String>>,
}

/// Distingue un campo ausente de uno enviado como `null`
fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateRouteRequest {
    /// Fusionar los campos presentes sobre una copia de la ruta
    pub fn apply_to(&self, current: &Route) -> Route {
        let mut route = current.clone();
        if let Some(name) = &self.name {
            route.name = name.clone();
        }
        if let Some(start_location) = &self.start_location {
            route.start_location = start_location.clone();
        }
        if let Some(end_location) = &self.end_location {
            route.end_location = end_location.clone();
        }
        if let Some(distance) = self.distance {
            route.distance = distance;
        }
        if let Some(estimated_duration) = self.estimated_duration {
            route.estimated_duration = estimated_duration;
        }
        if let Some(status) = self.status {
            route.status = status;
        }
        if let Some(priority) = self.priority {
            route.priority = priority;
        }
        if let Some(scheduled_date) = self.scheduled_date {
            route.scheduled_date = scheduled_date;
        }
        if let Some(vehicle_type) = self.vehicle_type {
            route.vehicle_type = vehicle_type;
        }
        if let Some(description) = &self.description {
            route.description = description.clone();
        }
        route
    }
}

/// Filtro de estado para listados de rutas: `all` o coincidencia exacta
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteStatusFilter {
    #[default]
    All,
    Status(RouteStatus),
}

impl RouteStatusFilter {
    /// Verificar si una ruta pasa el filtro
    pub fn matches(&self, route: &Route) -> bool {
        match self {
            RouteStatusFilter::All => true,
            RouteStatusFilter::Status(status) => route.status == *status,
        }
    }
}

impl FromStr for RouteStatusFilter {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("all") {
            return Ok(RouteStatusFilter::All);
        }
        value.parse::<RouteStatus>().map(RouteStatusFilter::Status)
    }
}
