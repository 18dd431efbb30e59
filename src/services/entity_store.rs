//! Store de entidades
//!
//! Dueño exclusivo de las colecciones de conductores y rutas. Toda mutación
//! exitosa publica la colección completa afectada a los suscriptores antes
//! de retornar. Los lectores solo reciben copias (snapshots).

use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use validator::Validate;

use crate::models::{
    CreateDriverRequest, CreateRouteRequest, Driver, DriverId, Route, RouteId, RouteStatus,
    UpdateDriverRequest, UpdateRouteRequest,
};
use crate::repositories::{DriverRepository, RouteRepository};
use crate::services::change_notifier::{ChangeNotifier, StoreEvent, SubscriptionId};
use crate::utils::errors::{not_found_error, precondition_error, SchedulingResult};
use crate::utils::validation::ensure_finite;

/// Valores por defecto de un conductor recién creado
const DEFAULT_DRIVER_RATING: f64 = 5.0;

#[derive(Default)]
pub struct EntityStore {
    drivers: DriverRepository,
    routes: RouteRepository,
    notifier: ChangeNotifier,
}

impl EntityStore {
    /// Crear un store vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Crear un store con un dataset inicial
    ///
    /// El dataset debe ser consistente (ids únicos, vínculos simétricos);
    /// si no lo es se rechaza completo.
    pub fn seeded(drivers: Vec<Driver>, routes: Vec<Route>) -> SchedulingResult<Self> {
        let mut store = Self::new();

        for driver in drivers {
            let id = driver.id.clone();
            if !store.drivers.insert(driver) {
                return Err(precondition_error("seed store", &format!("duplicate driver id '{}'", id)));
            }
        }
        for route in routes {
            let id = route.id.clone();
            if !store.routes.insert(route) {
                return Err(precondition_error("seed store", &format!("duplicate route id '{}'", id)));
            }
        }

        let violations = store.consistency_violations();
        if !violations.is_empty() {
            return Err(precondition_error("seed store", &violations.join("; ")));
        }

        info!(
            "🌱 Store inicializado con {} conductores y {} rutas",
            store.drivers.len(),
            store.routes.len()
        );
        Ok(store)
    }

    // ------------------------------------------------------------------
    // Suscripciones
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn subscribe_channel(&mut self) -> (SubscriptionId, UnboundedReceiver<StoreEvent>) {
        self.notifier.subscribe_channel()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Lecturas
    // ------------------------------------------------------------------

    pub fn drivers(&self) -> &[Driver] {
        self.drivers.all()
    }

    pub fn routes(&self) -> &[Route] {
        self.routes.all()
    }

    pub fn drivers_snapshot(&self) -> Vec<Driver> {
        self.drivers.snapshot()
    }

    pub fn routes_snapshot(&self) -> Vec<Route> {
        self.routes.snapshot()
    }

    pub fn get_driver(&self, id: &DriverId) -> Option<Driver> {
        self.drivers.find_by_id(id).cloned()
    }

    pub fn get_route(&self, id: &RouteId) -> Option<Route> {
        self.routes.find_by_id(id).cloned()
    }

    // ------------------------------------------------------------------
    // Conductores
    // ------------------------------------------------------------------

    pub fn create_driver(&mut self, request: CreateDriverRequest) -> SchedulingResult<Driver> {
        request.validate()?;

        let driver = Driver {
            id: self.drivers.next_id(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            license_number: request.license_number,
            is_available: true,
            assigned_routes: Vec::new(),
            experience: request.experience,
            vehicle_type: request.vehicle_type,
            rating: DEFAULT_DRIVER_RATING,
            join_date: Utc::now(),
        };

        self.drivers.insert(driver.clone());
        info!("✅ Conductor creado: {} ({})", driver.name, driver.id);
        self.publish_drivers();
        Ok(driver)
    }

    pub fn update_driver(
        &mut self,
        id: &DriverId,
        request: &UpdateDriverRequest,
    ) -> SchedulingResult<Driver> {
        request.validate()?;
        if let Some(rating) = request.rating {
            ensure_finite("rating", rating)?;
        }

        let current = self
            .drivers
            .find_by_id(id)
            .ok_or_else(|| not_found_error("Driver", id.as_str()))?;
        let updated = request.apply_to(current);

        if !updated.is_available && updated.assigned_routes.is_empty() {
            warn!("⚠️ Conductor {} sin rutas no puede quedar no disponible", id);
            return Err(precondition_error(
                "update driver",
                "a driver holding no route cannot be marked unavailable",
            ));
        }

        self.drivers.replace(updated.clone());
        info!("✏️ Conductor actualizado: {}", id);
        self.publish_drivers();
        Ok(updated)
    }

    /// Borrar un conductor, liberando las rutas que tenía asignadas
    pub fn delete_driver(&mut self, id: &DriverId) -> bool {
        let Some(driver) = self.drivers.delete(id) else {
            return false;
        };

        let mut released = 0;
        for route_id in &driver.assigned_routes {
            if let Some(route) = self.routes.find_by_id(route_id) {
                let mut route = route.clone();
                release_route(&mut route);
                self.routes.replace(route);
                released += 1;
            }
        }

        info!("🗑️ Conductor eliminado: {} ({} rutas liberadas)", id, released);
        self.publish_drivers();
        if released > 0 {
            self.publish_routes();
        }
        true
    }

    // ------------------------------------------------------------------
    // Rutas
    // ------------------------------------------------------------------

    pub fn create_route(&mut self, request: CreateRouteRequest) -> SchedulingResult<Route> {
        request.validate()?;
        ensure_finite("distance", request.distance)?;

        let route = Route {
            id: self.routes.next_id(),
            name: request.name,
            start_location: request.start_location,
            end_location: request.end_location,
            distance: request.distance,
            estimated_duration: request.estimated_duration,
            assigned_driver_id: None,
            assigned_driver_name: None,
            status: RouteStatus::Unassigned,
            priority: request.priority,
            scheduled_date: request.scheduled_date,
            vehicle_type: request.vehicle_type,
            description: request.description,
            created_at: Utc::now(),
        };

        self.routes.insert(route.clone());
        info!("✅ Ruta creada: {} ({})", route.name, route.id);
        self.publish_routes();
        Ok(route)
    }

    /// Actualizar campos de una ruta
    ///
    /// Los cambios de estado no pueden contradecir el vínculo con el conductor:
    /// `unassigned` exige que no haya conductor y `assigned`/`in-progress` lo
    /// exigen. `completed` se acepta siempre y no libera al conductor.
    pub fn update_route(
        &mut self,
        id: &RouteId,
        request: &UpdateRouteRequest,
    ) -> SchedulingResult<Route> {
        request.validate()?;
        if let Some(distance) = request.distance {
            ensure_finite("distance", distance)?;
        }

        let current = self
            .routes
            .find_by_id(id)
            .ok_or_else(|| not_found_error("Route", id.as_str()))?;
        let updated = request.apply_to(current);

        let has_driver = updated.assigned_driver_id.is_some();
        if updated.status == RouteStatus::Unassigned && has_driver {
            warn!("⚠️ Ruta {} tiene conductor, se debe desasignar", id);
            return Err(precondition_error(
                "update route",
                "route has an assigned driver, use unassign instead",
            ));
        }
        if updated.status.requires_driver() && !has_driver {
            warn!("⚠️ Ruta {} sin conductor no puede pasar a {}", id, updated.status);
            return Err(precondition_error(
                "update route",
                &format!("status '{}' requires an assigned driver, use assign instead", updated.status),
            ));
        }

        self.routes.replace(updated.clone());
        info!("✏️ Ruta actualizada: {} ({})", id, updated.status);
        self.publish_routes();
        Ok(updated)
    }

    /// Borrar una ruta, quitándola de su conductor
    ///
    /// Si el conductor queda sin rutas vuelve a estar disponible.
    pub fn delete_route(&mut self, id: &RouteId) -> bool {
        let Some(route) = self.routes.delete(id) else {
            return false;
        };

        let mut driver_changed = false;
        if let Some(driver_id) = &route.assigned_driver_id {
            if let Some(driver) = self.drivers.find_by_id(driver_id) {
                let mut driver = driver.clone();
                driver.assigned_routes.retain(|route_id| route_id != id);
                if driver.assigned_routes.is_empty() {
                    driver.is_available = true;
                }
                self.drivers.replace(driver);
                driver_changed = true;
            }
        }

        info!("🗑️ Ruta eliminada: {}", id);
        self.publish_routes();
        if driver_changed {
            self.publish_drivers();
        }
        true
    }

    // ------------------------------------------------------------------
    // Transacciones del motor de asignación
    // ------------------------------------------------------------------

    /// Reemplazar un conductor y una ruta como una sola transacción
    ///
    /// Ambos registros deben existir; si falta alguno no se modifica nada.
    /// Las notificaciones se emiten solo después de aplicar los dos cambios.
    pub(crate) fn commit_pair(&mut self, driver: Driver, route: Route) -> SchedulingResult<()> {
        if self.drivers.find_by_id(&driver.id).is_none() {
            return Err(not_found_error("Driver", driver.id.as_str()));
        }
        if self.routes.find_by_id(&route.id).is_none() {
            return Err(not_found_error("Route", route.id.as_str()));
        }

        self.drivers.replace(driver);
        self.routes.replace(route);

        debug_assert!(
            self.consistency_violations().is_empty(),
            "assignment left the store inconsistent: {:?}",
            self.consistency_violations()
        );

        self.publish_drivers();
        self.publish_routes();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Invariantes
    // ------------------------------------------------------------------

    /// Listar todas las violaciones de los invariantes conductor↔ruta
    ///
    /// Vacío en cualquier estado alcanzable a través de la API pública.
    pub fn consistency_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for driver in self.drivers.all() {
            let mut seen = HashSet::new();
            for route_id in &driver.assigned_routes {
                if !seen.insert(route_id) {
                    violations.push(format!("driver {} lists route {} twice", driver.id, route_id));
                }
                match self.routes.find_by_id(route_id) {
                    Some(route) if route.is_assigned_to(&driver.id) => {}
                    Some(_) => violations.push(format!(
                        "driver {} lists route {} which points elsewhere",
                        driver.id, route_id
                    )),
                    None => violations.push(format!(
                        "driver {} lists missing route {}",
                        driver.id, route_id
                    )),
                }
            }
            if !driver.is_available && driver.assigned_routes.is_empty() {
                violations.push(format!("driver {} is unavailable without routes", driver.id));
            }
        }

        for route in self.routes.all() {
            match &route.assigned_driver_id {
                Some(driver_id) => {
                    if route.status == RouteStatus::Unassigned {
                        violations.push(format!("route {} is unassigned but has a driver", route.id));
                    }
                    let held = self
                        .drivers
                        .find_by_id(driver_id)
                        .map(|driver| driver.holds_route(&route.id))
                        .unwrap_or(false);
                    if !held {
                        violations.push(format!(
                            "route {} points to driver {} which does not hold it",
                            route.id, driver_id
                        ));
                    }
                }
                None => {
                    if route.status.requires_driver() {
                        violations.push(format!(
                            "route {} is {} without a driver",
                            route.id, route.status
                        ));
                    }
                    if route.assigned_driver_name.is_some() {
                        violations.push(format!("route {} keeps a stale driver name", route.id));
                    }
                }
            }
        }

        violations
    }

    fn publish_drivers(&mut self) {
        let snapshot = Arc::new(self.drivers.snapshot());
        self.notifier.publish(StoreEvent::Drivers(snapshot));
    }

    fn publish_routes(&mut self) {
        let snapshot = Arc::new(self.routes.snapshot());
        self.notifier.publish(StoreEvent::Routes(snapshot));
    }
}

/// Quitar el conductor de una ruta; las rutas activas vuelven a `unassigned`
fn release_route(route: &mut Route) {
    route.assigned_driver_id = None;
    route.assigned_driver_name = None;
    if route.status != RouteStatus::Completed {
        route.status = RouteStatus::Unassigned;
    }
}
