//! Modelos del sistema
//!
//! Este módulo contiene las entidades del motor de planificación
//! (conductores y rutas) y las vistas derivadas que se entregan a la
//! capa de presentación.

pub mod calendar;
pub mod driver;
pub mod route;

pub use calendar::DayCell;
pub use driver::{
    CreateDriverRequest, Driver, DriverId, DriverStatusFilter, UpdateDriverRequest, VehicleType,
};
pub use route::{
    CreateRouteRequest, Priority, Route, RouteId, RouteStatus, RouteStatusFilter,
    UpdateRouteRequest,
};
