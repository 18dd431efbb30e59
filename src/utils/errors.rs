//! Sistema de manejo de errores
//!
//! Este módulo define los errores del motor de planificación. Todos son
//! locales y recuperables: el store sigue siendo utilizable después de
//! cualquier operación rechazada.

use thiserror::Error;

/// Errores principales del motor de planificación
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl SchedulingError {
    /// Código estable para mostrar en la capa de presentación
    pub fn code(&self) -> &'static str {
        match self {
            SchedulingError::NotFound(_) => "NOT_FOUND",
            SchedulingError::PreconditionFailed(_) => "PRECONDITION_FAILED",
            SchedulingError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &str) -> SchedulingError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("field".into(), &field);
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    SchedulingError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> SchedulingError {
    SchedulingError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de precondición
pub fn precondition_error(operation: &str, reason: &str) -> SchedulingError {
    SchedulingError::PreconditionFailed(format!("Cannot {}: {}", operation, reason))
}
