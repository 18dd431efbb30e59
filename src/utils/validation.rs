//! Utilidades de validación
//!
//! Validadores custom para los requests de creación y actualización,
//! y conversión de strings a los enums cerrados del modelo.

use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use validator::ValidationError;

use crate::utils::errors::{validation_error, SchedulingError};

lazy_static! {
    /// Teléfono: dígitos, espacios, guiones y paréntesis, con `+` opcional
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9\s\-()]+$").unwrap();
}

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un número sea finito
///
/// Las reglas `range` no rechazan NaN, por eso se verifica aparte.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<(), SchedulingError> {
    if !value.is_finite() {
        return Err(validation_error(field, "value must be a finite number"));
    }
    Ok(())
}

/// Convertir un string al enum cerrado correspondiente
///
/// Un valor fuera del conjunto permitido se reporta como error de
/// validación sobre `field`, nunca como pánico.
pub fn parse_enum<T: FromStr>(field: &'static str, value: &str) -> Result<T, SchedulingError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| validation_error(field, &format!("unsupported value '{}'", value)))
}
