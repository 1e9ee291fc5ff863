use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bus::Bus;

// Request para registrar un bus
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBusRequest {
    #[validate(length(min = 1, max = 50))]
    pub bus_number: String,

    #[validate(range(min = 1, max = 200))]
    pub total_seats: i32,

    #[serde(rename = "type")]
    pub bus_type: String,

    pub is_operational: Option<bool>,
}

// Request para actualizar un bus
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBusRequest {
    #[validate(length(min = 1, max = 50))]
    pub bus_number: Option<String>,

    #[validate(range(min = 1, max = 200))]
    pub total_seats: Option<i32>,

    #[serde(rename = "type")]
    pub bus_type: Option<String>,

    pub is_operational: Option<bool>,
}

// Response de bus
#[derive(Debug, Serialize)]
pub struct BusResponse {
    pub id: Uuid,
    pub bus_number: String,
    pub total_seats: i32,
    #[serde(rename = "type")]
    pub bus_type: String,
    pub is_operational: bool,
}

impl From<Bus> for BusResponse {
    fn from(bus: Bus) -> Self {
        Self {
            id: bus.id,
            bus_number: bus.bus_number,
            total_seats: bus.total_seats,
            bus_type: bus.bus_type,
            is_operational: bus.is_operational,
        }
    }
}

/// Resumen del borrado en cascada de un bus
#[derive(Debug, Serialize, Deserialize)]
pub struct BusCascadeResponse {
    pub bus_removed: bool,
    pub bookings_removed: u64,
    pub schedules_removed: u64,
    pub orphan_routes_removed: u64,
}
