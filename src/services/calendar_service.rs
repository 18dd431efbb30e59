//! Proyección de calendario
//!
//! Agrupa las rutas por día programado en una cuadrícula mensual alineada a
//! semanas completas (domingo a sábado). La comparación de fechas usa solo
//! año/mes/día en UTC, ignorando la hora.

use chrono::{Datelike, Duration, Months, NaiveDate, Utc};
use std::collections::HashMap;

use crate::models::{DayCell, Driver, Route};
use crate::services::query_service::available_drivers;

/// Construir la cuadrícula del mes que contiene `reference`
///
/// Empieza el domingo anterior (o igual) al día 1 y termina el sábado
/// posterior (o igual) al último día del mes, así que su longitud es
/// siempre múltiplo de 7.
pub fn build_calendar(
    reference: NaiveDate,
    routes: &[Route],
    drivers: &[Driver],
    today: NaiveDate,
) -> Vec<DayCell> {
    let Some((start, end)) = grid_bounds(reference) else {
        return Vec::new();
    };

    let mut routes_by_day: HashMap<NaiveDate, Vec<Route>> = HashMap::new();
    for route in routes {
        let day = route.scheduled_date.date_naive();
        if day >= start && day <= end {
            routes_by_day.entry(day).or_default().push(route.clone());
        }
    }

    let available = available_drivers(drivers);
    let mut cells = Vec::new();
    let mut current = start;
    while current <= end {
        cells.push(DayCell {
            date: current,
            routes: routes_by_day.remove(&current).unwrap_or_default(),
            drivers: available.clone(),
            is_current_month: current.month() == reference.month() && current.year() == reference.year(),
            is_today: current == today,
        });
        current += Duration::days(1);
    }
    cells
}

/// Primer y último día visibles de la cuadrícula
fn grid_bounds(reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = reference.with_day(1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;

    let leading = first.weekday().num_days_from_sunday() as i64;
    let trailing = 6 - last.weekday().num_days_from_sunday() as i64;

    let start = first.checked_sub_signed(Duration::days(leading))?;
    let end = last.checked_add_signed(Duration::days(trailing))?;
    Some((start, end))
}

/// Estado de navegación del calendario
///
/// Guarda siempre el día 1 del mes de referencia, así que avanzar o
/// retroceder nunca desborda en meses cortos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    reference_month: NaiveDate,
}

impl CalendarView {
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            reference_month: first_of_month(reference),
        }
    }

    /// Vista del mes actual
    pub fn current() -> Self {
        Self::new(Utc::now().date_naive())
    }

    pub fn reference_month(&self) -> NaiveDate {
        self.reference_month
    }

    pub fn previous_month(&mut self) {
        if let Some(previous) = self.reference_month.checked_sub_months(Months::new(1)) {
            self.reference_month = previous;
        }
    }

    pub fn next_month(&mut self) {
        if let Some(next) = self.reference_month.checked_add_months(Months::new(1)) {
            self.reference_month = next;
        }
    }

    pub fn go_to_today(&mut self) {
        self.go_to(Utc::now().date_naive());
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.reference_month = first_of_month(date);
    }

    /// Título de la vista, p. ej. "October 2026"
    pub fn month_label(&self) -> String {
        self.reference_month.format("%B %Y").to_string()
    }

    /// Generar la cuadrícula marcando el día actual según el reloj
    pub fn build(&self, routes: &[Route], drivers: &[Driver]) -> Vec<DayCell> {
        self.build_at(routes, drivers, Utc::now().date_naive())
    }

    pub fn build_at(&self, routes: &[Route], drivers: &[Driver], today: NaiveDate) -> Vec<DayCell> {
        build_calendar(self.reference_month, routes, drivers, today)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
