//! Estado de la aplicación
//!
//! El store ya no es un singleton global: cada `AppState` construye el suyo,
//! así que los tests pueden crear tantas instancias aisladas como necesiten.

use crate::config::SchedulingConfig;
use crate::services::{sample_data, EntityStore, SchedulingService};
use crate::utils::errors::SchedulingResult;

pub struct AppState {
    pub config: SchedulingConfig,
    pub scheduling: SchedulingService,
}

impl AppState {
    pub fn new(config: SchedulingConfig) -> SchedulingResult<Self> {
        let store = if config.seed_sample_data {
            EntityStore::seeded(sample_data::drivers(), sample_data::routes())?
        } else {
            EntityStore::new()
        };

        Ok(Self {
            config,
            scheduling: SchedulingService::new(store),
        })
    }
}
