//! Modelo de Booking y su máquina de estados
//!
//! Una reserva nace CONFIRMED, pasa a CANCELLED (devolviendo el asiento
//! exactamente una vez) y solo estando CANCELLED puede borrarse de forma
//! permanente. El status se persiste como TEXT; `BookingStatus` es el tipo
//! en la costura Rust.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Estados del ciclo de vida de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub const CONFIRMED: &'static str = "CONFIRMED";
    pub const CANCELLED: &'static str = "CANCELLED";

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => Self::CONFIRMED,
            BookingStatus::Cancelled => Self::CANCELLED,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            Self::CONFIRMED => Some(BookingStatus::Confirmed),
            Self::CANCELLED => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// Booking plano - fila de la tabla bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub schedule_id: Uuid,
    pub seat_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub booking_date: DateTime<Utc>,
}

/// Booking reconstruido via JOIN (schedule, bus, ruta y cliente)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingDetails {
    pub id: Uuid,
    pub seat_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub booking_date: DateTime<Utc>,
    pub user_id: Uuid,
    pub full_name: String,
    pub schedule_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub ticket_price: Decimal,
    pub bus_number: String,
    pub source_city: String,
    pub destination_city: String,
}

/// Quién dispara una transición del ciclo de vida.
///
/// El modo self-service exige que el actor sea dueño de la reserva; el modo
/// administrativo no verifica propiedad pero toma el mismo row lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
    Customer(Uuid),
    Admin,
}

impl BookingActor {
    /// Dueño requerido para la transición, si aplica
    pub fn required_owner(&self) -> Option<Uuid> {
        match self {
            BookingActor::Customer(user_id) => Some(*user_id),
            BookingActor::Admin => None,
        }
    }
}

/// Resultado tipado de la creación de una reserva
#[derive(Debug)]
pub enum BookingOutcome {
    /// Reserva creada y confirmada
    Confirmed(Booking),
    /// El decremento condicional no afectó filas: sin asientos
    SoldOut,
    /// El schedule ya partió; no se mutó nada
    ScheduleDeparted,
}

/// Resultado tipado de una cancelación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Status CONFIRMED -> CANCELLED y asiento devuelto
    Cancelled,
    /// La reserva no existe (o no pertenece al actor en modo self-service)
    NotFound,
    /// Ya estaba CANCELLED; el contador no se toca
    AlreadyCancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(BookingStatus::parse("CONFIRMED"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::parse("CANCELLED"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("confirmed"), None);
        assert_eq!(BookingStatus::Confirmed.as_str(), "CONFIRMED");
    }

    #[test]
    fn test_actor_owner() {
        let user = Uuid::new_v4();
        assert_eq!(BookingActor::Customer(user).required_owner(), Some(user));
        assert_eq!(BookingActor::Admin.required_owner(), None);
    }
}
