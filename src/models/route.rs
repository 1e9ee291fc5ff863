//! Modelo de Route
//!
//! Mapea exactamente a la tabla routes. La pareja
//! (source_city, destination_city) es única de forma case-insensitive,
//! regla aplicada por el guard de deduplicación antes de cada escritura.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ruta entre dos ciudades
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub source_city: String,
    pub destination_city: String,
    pub distance_km: f64,
    pub estimated_duration: String,
    pub created_at: DateTime<Utc>,
}
