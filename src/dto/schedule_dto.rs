use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::models::schedule::ScheduleDetails;

// Request para crear un schedule
#[derive(Debug, Deserialize, Validate)]
pub struct CreateScheduleRequest {
    pub bus_id: Uuid,
    pub route_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub ticket_price: Decimal,
    /// Asientos iniciales; por defecto la capacidad total del bus
    pub available_seats: Option<i32>,
}

// Request para actualizar un schedule
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateScheduleRequest {
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub ticket_price: Option<Decimal>,
    pub available_seats: Option<i32>,
}

// Query para búsqueda de viajes
#[derive(Debug, Deserialize)]
pub struct TripSearchQuery {
    pub from: String,
    pub to: String,
}

// Response de schedule con bus y ruta reconstruidos
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub ticket_price: Decimal,
    pub available_seats: i32,
    pub bus_id: Uuid,
    pub bus_number: String,
    pub total_seats: i32,
    #[serde(rename = "bus_type")]
    pub bus_type: String,
    pub is_operational: bool,
    pub route_id: Uuid,
    pub source_city: String,
    pub destination_city: String,
    pub distance_km: f64,
    pub estimated_duration: String,
}

impl From<ScheduleDetails> for ScheduleResponse {
    fn from(s: ScheduleDetails) -> Self {
        Self {
            id: s.id,
            departure_time: s.departure_time,
            arrival_time: s.arrival_time,
            ticket_price: s.ticket_price,
            available_seats: s.available_seats,
            bus_id: s.bus_id,
            bus_number: s.bus_number,
            total_seats: s.total_seats,
            bus_type: s.bus_type,
            is_operational: s.is_operational,
            route_id: s.route_id,
            source_city: s.source_city,
            destination_city: s.destination_city,
            distance_km: s.distance_km,
            estimated_duration: s.estimated_duration,
        }
    }
}
