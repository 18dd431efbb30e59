//! Services module
//!
//! Este módulo contiene la lógica de negocio: el store de entidades con su
//! notificador de cambios, el motor de asignación, las consultas derivadas
//! y la proyección de calendario.

pub mod calendar_service;
pub mod change_notifier;
pub mod entity_store;
pub mod query_service;
pub mod sample_data;
pub mod scheduling_service;

pub use calendar_service::{build_calendar, CalendarView};
pub use change_notifier::{ChangeNotifier, StoreEvent, SubscriptionId};
pub use entity_store::EntityStore;
pub use query_service::FleetStats;
pub use scheduling_service::{Assignment, SchedulingService};
