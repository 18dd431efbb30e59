//! Motor de planificación de conductores y rutas
//!
//! Store en memoria de conductores y rutas, motor de asignación que mantiene
//! el vínculo bidireccional entre ambos, vistas derivadas (disponibles, sin
//! asignar, candidatos, búsquedas) y proyección mensual de calendario.

pub mod config;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;

pub use models::*;
pub use services::{
    build_calendar, Assignment, CalendarView, EntityStore, FleetStats, SchedulingService,
    StoreEvent, SubscriptionId,
};
pub use utils::errors::{SchedulingError, SchedulingResult};
