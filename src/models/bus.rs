//! Modelo de Bus
//!
//! Mapea exactamente a la tabla buses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bus de la flota - referenciado por schedules
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bus {
    pub id: Uuid,
    pub bus_number: String,
    pub total_seats: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub bus_type: String,
    pub is_operational: bool,
    pub created_at: DateTime<Utc>,
}
