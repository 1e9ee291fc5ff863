//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! del dominio de reservas.

use validator::ValidationError;

/// Validar un número de asiento contra la capacidad del bus.
///
/// El asiento viaja como string (el esquema lo guarda así) pero debe ser
/// numérico y estar en el rango 1..=total_seats.
pub fn validate_seat_number(seat_number: &str, total_seats: i32) -> Result<u32, ValidationError> {
    let trimmed = seat_number.trim();

    let seat: u32 = trimmed.parse().map_err(|_| {
        let mut error = ValidationError::new("seat_number");
        error.add_param("value".into(), &trimmed.to_string());
        error
    })?;

    if seat == 0 || seat as i64 > total_seats as i64 {
        let mut error = ValidationError::new("seat_number_range");
        error.add_param("value".into(), &seat);
        error.add_param("max".into(), &total_seats);
        return Err(error);
    }

    Ok(seat)
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Normalizar un nombre de ciudad para comparaciones.
///
/// La deduplicación de rutas es case-insensitive; la BD usa LOWER() en SQL
/// y este helper mantiene la misma regla del lado Rust (tests y previews).
pub fn normalize_city(city: &str) -> String {
    city.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_number_valid() {
        assert_eq!(validate_seat_number("5", 40).unwrap(), 5);
        assert_eq!(validate_seat_number(" 40 ", 40).unwrap(), 40);
        assert_eq!(validate_seat_number("1", 1).unwrap(), 1);
    }

    #[test]
    fn test_seat_number_out_of_range() {
        assert!(validate_seat_number("0", 40).is_err());
        assert!(validate_seat_number("41", 40).is_err());
    }

    #[test]
    fn test_seat_number_not_numeric() {
        assert!(validate_seat_number("A5", 40).is_err());
        assert!(validate_seat_number("", 40).is_err());
        assert!(validate_seat_number("-3", 40).is_err());
    }

    #[test]
    fn test_normalize_city_case_insensitive() {
        assert_eq!(normalize_city("Phnom Penh"), normalize_city("phnom penh"));
        assert_eq!(normalize_city("  Siem Reap "), "siem reap");
        assert_ne!(normalize_city("Kandal"), normalize_city("Kampot"));
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Kandal").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }
}
