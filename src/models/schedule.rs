//! Modelo de Schedule
//!
//! Mapea a la tabla schedules. Invariante del contador:
//! `0 <= available_seats <= bus.total_seats`. Fuera de las ediciones de
//! administración, available_seats solo lo mutan el decremento condicional
//! de reserva y el incremento bajo lock de la cancelación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Schedule plano - fila de la tabla schedules
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: Uuid,
    pub bus_id: Uuid,
    pub route_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub ticket_price: Decimal,
    pub available_seats: i32,
}

/// Schedule reconstruido via JOIN con buses y routes.
///
/// Un solo tipo de fila joined reutilizado por todos los caminos de
/// consulta; nada de reconstrucción ad-hoc fila-a-objeto por camino.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScheduleDetails {
    pub id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub ticket_price: Decimal,
    pub available_seats: i32,
    pub bus_id: Uuid,
    pub bus_number: String,
    pub total_seats: i32,
    pub bus_type: String,
    pub is_operational: bool,
    pub route_id: Uuid,
    pub source_city: String,
    pub destination_city: String,
    pub distance_km: f64,
    pub estimated_duration: String,
}

impl ScheduleDetails {
    /// Un schedule ya partido no admite reservas nuevas
    pub fn has_departed(&self, now: DateTime<Utc>) -> bool {
        self.departure_time < now
    }
}

/// Columnas SELECT compartidas por todas las consultas joined de schedules
pub const SCHEDULE_DETAILS_COLUMNS: &str = "s.id, s.departure_time, s.arrival_time, s.ticket_price, s.available_seats, \
     b.id AS bus_id, b.bus_number, b.total_seats, b.type AS bus_type, b.is_operational, \
     r.id AS route_id, r.source_city, r.destination_city, r.distance_km, r.estimated_duration";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(departure: DateTime<Utc>) -> ScheduleDetails {
        ScheduleDetails {
            id: Uuid::new_v4(),
            departure_time: departure,
            arrival_time: departure + Duration::hours(6),
            ticket_price: Decimal::new(1250, 2),
            available_seats: 40,
            bus_id: Uuid::new_v4(),
            bus_number: "BUS-001".to_string(),
            total_seats: 40,
            bus_type: "VIP".to_string(),
            is_operational: true,
            route_id: Uuid::new_v4(),
            source_city: "Phnom Penh".to_string(),
            destination_city: "Siem Reap".to_string(),
            distance_km: 314.0,
            estimated_duration: "6h".to_string(),
        }
    }

    #[test]
    fn test_has_departed() {
        let now = Utc::now();
        assert!(sample(now - Duration::minutes(1)).has_departed(now));
        assert!(!sample(now + Duration::hours(1)).has_departed(now));
    }
}
