use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::route::Route;

// Request para crear una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub source_city: String,

    #[validate(length(min = 1, max = 100))]
    pub destination_city: String,

    #[validate(range(min = 0.1))]
    pub distance_km: f64,

    #[validate(length(min = 1, max = 50))]
    pub estimated_duration: String,
}

// Request para actualizar una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub source_city: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub destination_city: Option<String>,

    #[validate(range(min = 0.1))]
    pub distance_km: Option<f64>,

    #[validate(length(min = 1, max = 50))]
    pub estimated_duration: Option<String>,
}

// Query para el check de duplicados
#[derive(Debug, Deserialize)]
pub struct RouteExistsQuery {
    pub source: String,
    pub destination: String,
    pub exclude_id: Option<Uuid>,
}

// Response de ruta
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: Uuid,
    pub source_city: String,
    pub destination_city: String,
    pub distance_km: f64,
    pub estimated_duration: String,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            source_city: route.source_city,
            destination_city: route.destination_city,
            distance_km: route.distance_km,
            estimated_duration: route.estimated_duration,
        }
    }
}

/// Conteos previos al borrado destructivo de una ruta.
///
/// Se exponen antes de la cascada para que el caller pueda confirmar.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteCascadePreview {
    pub schedules_attached: i64,
    pub bookings_attached: i64,
}

/// Resumen del borrado en cascada de una ruta
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteCascadeResponse {
    pub bookings_removed: u64,
    pub schedules_removed: u64,
    pub route_removed: bool,
}
