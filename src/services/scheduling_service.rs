//! Servicio de planificación
//!
//! Motor de asignación conductor↔ruta construido sobre el `EntityStore`.
//! Es el punto de entrada de la capa de presentación: expone el CRUD del
//! store, las transiciones assign/unassign y las vistas derivadas calculadas
//! sobre el snapshot más reciente.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::models::{
    CreateDriverRequest, CreateRouteRequest, DayCell, Driver, DriverId, DriverStatusFilter,
    Route, RouteId, RouteStatus, RouteStatusFilter, UpdateDriverRequest, UpdateRouteRequest,
};
use crate::services::calendar_service::CalendarView;
use crate::services::change_notifier::{StoreEvent, SubscriptionId};
use crate::services::entity_store::EntityStore;
use crate::services::query_service::{self, FleetStats};
use crate::utils::errors::{not_found_error, precondition_error, SchedulingResult};

/// Estado de conductor y ruta tras una transición exitosa
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub driver: Driver,
    pub route: Route,
}

pub struct SchedulingService {
    store: EntityStore,
}

impl SchedulingService {
    pub fn new(store: EntityStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Asignar una ruta a un conductor
    ///
    /// Precondiciones: ambos existen, el conductor está disponible y la ruta
    /// está `unassigned`. El tipo de vehículo no se verifica aquí; el
    /// despachador puede forzar una asignación que el matching no sugeriría.
    pub fn assign(&mut self, driver_id: &DriverId, route_id: &RouteId) -> SchedulingResult<Assignment> {
        let (driver, route) = self.load_pair("assign", driver_id, route_id)?;

        if !driver.is_available {
            warn!("⚠️ Asignación rechazada: conductor {} no disponible", driver_id);
            return Err(precondition_error(
                "assign",
                &format!("driver '{}' is not available", driver_id),
            ));
        }
        if route.status != RouteStatus::Unassigned {
            warn!("⚠️ Asignación rechazada: ruta {} en estado {}", route_id, route.status);
            return Err(precondition_error(
                "assign",
                &format!("route '{}' is {}", route_id, route.status),
            ));
        }

        let mut driver = driver;
        driver.is_available = false;
        driver.assigned_routes.push(route_id.clone());

        let mut route = route;
        route.status = RouteStatus::Assigned;
        route.assigned_driver_id = Some(driver_id.clone());
        route.assigned_driver_name = Some(driver.name.clone());

        self.store.commit_pair(driver.clone(), route.clone())?;
        info!("🔗 Ruta {} asignada a {} ({})", route.name, driver.name, driver_id);
        Ok(Assignment { driver, route })
    }

    /// Desasignar una ruta de su conductor
    ///
    /// La ruta debe estar asignada exactamente a `driver_id`. El conductor
    /// vuelve a estar disponible y la ruta queda `unassigned`.
    pub fn unassign(&mut self, driver_id: &DriverId, route_id: &RouteId) -> SchedulingResult<Assignment> {
        let (driver, route) = self.load_pair("unassign", driver_id, route_id)?;

        if !route.is_assigned_to(driver_id) {
            warn!("⚠️ Desasignación rechazada: ruta {} no pertenece a {}", route_id, driver_id);
            return Err(precondition_error(
                "unassign",
                &format!("route '{}' is not assigned to driver '{}'", route_id, driver_id),
            ));
        }

        let mut driver = driver;
        driver.is_available = true;
        driver.assigned_routes.retain(|id| id != route_id);

        let mut route = route;
        route.status = RouteStatus::Unassigned;
        route.assigned_driver_id = None;
        route.assigned_driver_name = None;

        self.store.commit_pair(driver.clone(), route.clone())?;
        info!("✂️ Ruta {} desasignada de {} ({})", route.name, driver.name, driver_id);
        Ok(Assignment { driver, route })
    }

    /// Desasignar una ruta buscando su conductor actual
    pub fn unassign_route(&mut self, route_id: &RouteId) -> SchedulingResult<Assignment> {
        let route = self
            .store
            .get_route(route_id)
            .ok_or_else(|| precondition_error("unassign", &format!("route '{}' does not exist", route_id)))?;
        let driver_id = route.assigned_driver_id.ok_or_else(|| {
            precondition_error("unassign", &format!("route '{}' has no assigned driver", route_id))
        })?;
        self.unassign(&driver_id, route_id)
    }

    /// Cambiar la disponibilidad de un conductor desde el panel
    pub fn set_driver_availability(&mut self, driver_id: &DriverId, is_available: bool) -> SchedulingResult<Driver> {
        let request = UpdateDriverRequest {
            is_available: Some(is_available),
            ..Default::default()
        };
        self.store.update_driver(driver_id, &request)
    }

    fn load_pair(
        &self,
        operation: &str,
        driver_id: &DriverId,
        route_id: &RouteId,
    ) -> SchedulingResult<(Driver, Route)> {
        let driver = self.store.get_driver(driver_id).ok_or_else(|| {
            warn!("⚠️ {}: conductor {} no existe", operation, driver_id);
            precondition_error(operation, &format!("driver '{}' does not exist", driver_id))
        })?;
        let route = self.store.get_route(route_id).ok_or_else(|| {
            warn!("⚠️ {}: ruta {} no existe", operation, route_id);
            precondition_error(operation, &format!("route '{}' does not exist", route_id))
        })?;
        Ok((driver, route))
    }

    // ------------------------------------------------------------------
    // CRUD delegado al store
    // ------------------------------------------------------------------

    pub fn create_driver(&mut self, request: CreateDriverRequest) -> SchedulingResult<Driver> {
        self.store.create_driver(request)
    }

    pub fn create_route(&mut self, request: CreateRouteRequest) -> SchedulingResult<Route> {
        self.store.create_route(request)
    }

    pub fn update_driver(&mut self, id: &DriverId, request: &UpdateDriverRequest) -> SchedulingResult<Driver> {
        self.store.update_driver(id, request)
    }

    pub fn update_route(&mut self, id: &RouteId, request: &UpdateRouteRequest) -> SchedulingResult<Route> {
        self.store.update_route(id, request)
    }

    pub fn delete_driver(&mut self, id: &DriverId) -> bool {
        self.store.delete_driver(id)
    }

    pub fn delete_route(&mut self, id: &RouteId) -> bool {
        self.store.delete_route(id)
    }

    pub fn get_driver(&self, id: &DriverId) -> Option<Driver> {
        self.store.get_driver(id)
    }

    pub fn get_route(&self, id: &RouteId) -> Option<Route> {
        self.store.get_route(id)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn subscribe_channel(&mut self) -> (SubscriptionId, UnboundedReceiver<StoreEvent>) {
        self.store.subscribe_channel()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Vistas derivadas (pull sobre el snapshot actual)
    // ------------------------------------------------------------------

    pub fn available_drivers(&self) -> Vec<Driver> {
        query_service::available_drivers(self.store.drivers())
    }

    pub fn unassigned_routes(&self) -> Vec<Route> {
        query_service::unassigned_routes(self.store.routes())
    }

    /// Conductores sugeridos para una ruta existente
    pub fn candidate_drivers(&self, route_id: &RouteId) -> SchedulingResult<Vec<Driver>> {
        let route = self
            .store
            .get_route(route_id)
            .ok_or_else(|| not_found_error("Route", route_id.as_str()))?;
        Ok(query_service::candidate_drivers(&route, self.store.drivers()))
    }

    pub fn filter_drivers(&self, search: &str, status: DriverStatusFilter) -> Vec<Driver> {
        query_service::filter_drivers(self.store.drivers(), search, status)
    }

    pub fn filter_routes(&self, search: &str, status: RouteStatusFilter) -> Vec<Route> {
        query_service::filter_routes(self.store.routes(), search, status)
    }

    pub fn stats(&self) -> FleetStats {
        query_service::fleet_stats(self.store.drivers(), self.store.routes())
    }

    /// Regenerar la cuadrícula del calendario con el estado actual
    pub fn calendar(&self, view: &CalendarView) -> Vec<DayCell> {
        view.build(self.store.routes(), self.store.drivers())
    }
}
