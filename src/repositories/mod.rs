//! Repositories
//!
//! Este módulo contiene las colecciones en memoria de conductores y rutas.

pub mod memory_repository;

pub use memory_repository::{DriverRepository, Entity, MemoryRepository, RouteRepository};
