use anyhow::Result;
use chrono::{Duration, Utc};
use dotenvy::dotenv;
use tracing::{error, info};

use driver_scheduling::config::SchedulingConfig;
use driver_scheduling::state::AppState;
use driver_scheduling::utils::validation::parse_enum;
use driver_scheduling::{
    CalendarView, CreateRouteRequest, DriverStatusFilter, Priority, RouteStatusFilter, StoreEvent,
    VehicleType,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = SchedulingConfig::from_env();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚚 Driver Scheduling - motor de asignación en memoria");
    info!("====================================================");

    let mut state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Error inicializando el store: {}", e);
            return Err(anyhow::anyhow!("Error de inicialización: {}", e));
        }
    };

    // Los eventos se encolan y se procesan después de cada mutación
    let (subscription, mut events) = state.scheduling.subscribe_channel();

    let route = state.scheduling.create_route(CreateRouteRequest {
        name: "Airport Shuttle".to_string(),
        start_location: "Central Depot".to_string(),
        end_location: "Terminal B".to_string(),
        distance: 27.4,
        estimated_duration: 45,
        priority: Priority::High,
        scheduled_date: Utc::now() + Duration::days(1),
        vehicle_type: VehicleType::Sedan,
        description: Some("Morning run".to_string()),
    })?;

    let candidates = state.scheduling.candidate_drivers(&route.id)?;
    info!("🔍 {} candidatos para {}", candidates.len(), route.name);
    if let Some(driver) = candidates.first() {
        state.scheduling.assign(&driver.id, &route.id)?;
    }

    // Al cancelar la suscripción se cierra el canal y `recv` termina tras vaciar la cola
    state.scheduling.unsubscribe(subscription);
    while let Some(event) = events.recv().await {
        match event {
            StoreEvent::Drivers(drivers) => info!("📣 drivers: {} registros", drivers.len()),
            StoreEvent::Routes(routes) => info!("📣 routes: {} registros", routes.len()),
        }
    }

    let stats = state.scheduling.stats();
    info!("📊 Estadísticas: {}", serde_json::to_string(&stats)?);

    // Los filtros llegan como texto desde la presentación
    let driver_filter: DriverStatusFilter = parse_enum("status", "busy")?;
    let route_filter: RouteStatusFilter = parse_enum("status", "all")?;

    let busy = state.scheduling.filter_drivers("", driver_filter);
    info!("🚛 Conductores ocupados: {}", busy.len());
    let depot_routes = state.scheduling.filter_routes("depot", route_filter);
    info!("📍 Rutas desde/hacia depósitos: {}", depot_routes.len());

    let view = CalendarView::current();
    let cells = state.scheduling.calendar(&view);
    let scheduled: usize = cells.iter().map(|cell| cell.routes.len()).sum();
    info!(
        "📅 {}: {} días en la cuadrícula, {} rutas programadas",
        view.month_label(),
        cells.len(),
        scheduled
    );

    if state.config.is_development() {
        info!(
            "🧾 Snapshot de rutas: {}",
            serde_json::to_string_pretty(&state.scheduling.store().routes_snapshot())?
        );
    }

    info!("👋 Fin");
    Ok(())
}
