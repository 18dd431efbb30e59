//! Modelo de celda de calendario

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Driver, Route};

/// Un día de la cuadrícula mensual
///
/// `drivers` es la lista de conductores disponibles en el momento de generar
/// la cuadrícula; es la misma para todas las celdas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub routes: Vec<Route>,
    pub drivers: Vec<Driver>,
    pub is_current_month: bool,
    pub is_today: bool,
}
