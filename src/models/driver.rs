//! Modelo de Driver
//!
//! Este módulo contiene el struct Driver, sus requests de creación y
//! actualización parcial, y el filtro de estado usado en los listados.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::models::RouteId;
use crate::utils::validation::{validate_not_blank, PHONE_REGEX};

/// Identificador opaco de un conductor, inmutable tras la creación
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub String);

impl DriverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DriverId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DriverId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Tipo de vehículo - compartido por conductores y rutas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Sedan,
    Suv,
    Van,
    Truck,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Sedan => "sedan",
            VehicleType::Suv => "suv",
            VehicleType::Van => "van",
            VehicleType::Truck => "truck",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sedan" => Ok(VehicleType::Sedan),
            "suv" => Ok(VehicleType::Suv),
            "van" => Ok(VehicleType::Van),
            "truck" => Ok(VehicleType::Truck),
            _ => Err(()),
        }
    }
}

/// Driver principal
///
/// `assigned_routes` y `is_available` solo cambian a través del motor de
/// asignación; las actualizaciones parciales no pueden tocar las rutas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub is_available: bool,
    pub assigned_routes: Vec<RouteId>,
    pub experience: u32,
    pub vehicle_type: VehicleType,
    pub rating: f64,
    pub join_date: DateTime<Utc>,
}

impl Driver {
    /// Verificar si el conductor tiene asignada la ruta indicada
    pub fn holds_route(&self, route_id: &RouteId) -> bool {
        self.assigned_routes.contains(route_id)
    }
}

/// Request para crear un nuevo conductor
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 2, max = 100), custom = "validate_not_blank")]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: String,

    #[validate(length(min = 6, max = 50), custom = "validate_not_blank")]
    pub license_number: String,

    #[validate(range(min = 0, max = 50))]
    pub experience: u32,

    pub vehicle_type: VehicleType,
}

/// Request para actualizar un conductor existente
///
/// Solo los campos presentes se fusionan sobre el registro actual.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 2, max = 100), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: Option<String>,

    #[validate(length(min = 6, max = 50), custom = "validate_not_blank")]
    pub license_number: Option<String>,

    pub is_available: Option<bool>,

    #[validate(range(min = 0, max = 50))]
    pub experience: Option<u32>,

    pub vehicle_type: Option<VehicleType>,

    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: Option<f64>,
}

impl UpdateDriverRequest {
    /// Fusionar los campos presentes sobre una copia del conductor
    pub fn apply_to(&self, current: &Driver) -> Driver {
        let mut driver = current.clone();
        if let Some(name) = &self.name {
            driver.name = name.clone();
        }
        if let Some(email) = &self.email {
            driver.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            driver.phone = phone.clone();
        }
        if let Some(license_number) = &self.license_number {
            driver.license_number = license_number.clone();
        }
        if let Some(is_available) = self.is_available {
            driver.is_available = is_available;
        }
        if let Some(experience) = self.experience {
            driver.experience = experience;
        }
        if let Some(vehicle_type) = self.vehicle_type {
            driver.vehicle_type = vehicle_type;
        }
        if let Some(rating) = self.rating {
            driver.rating = rating;
        }
        driver
    }
}

/// Filtro de estado para listados de conductores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatusFilter {
    #[default]
    All,
    Available,
    Busy,
}

impl DriverStatusFilter {
    /// Verificar si un conductor pasa el filtro
    pub fn matches(&self, driver: &Driver) -> bool {
        match self {
            DriverStatusFilter::All => true,
            DriverStatusFilter::Available => driver.is_available,
            DriverStatusFilter::Busy => !driver.is_available,
        }
    }
}

impl FromStr for DriverStatusFilter {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "all" => Ok(DriverStatusFilter::All),
            "available" => Ok(DriverStatusFilter::Available),
            "busy" => Ok(DriverStatusFilter::Busy),
            _ => Err(()),
        }
    }
}
