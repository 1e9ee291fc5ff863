//! Backend de reservas de tickets de bus
//!
//! Los clientes buscan schedules y reservan asientos; la administración
//! gestiona buses, rutas, schedules y reservas. El núcleo duro es el core
//! transaccional de inventario: reserva atómica de asientos, cancelación
//! bajo row lock con devolución exactly-once, y cascadas de borrado
//! ordenadas sin reglas nativas de la base de datos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Construir el router completo de la API
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/booking", routes::booking_routes::create_booking_router())
        .nest("/api/bus", routes::bus_routes::create_bus_router())
        .nest("/api/route", routes::route_routes::create_route_router())
        .nest("/api/schedule", routes::schedule_routes::create_schedule_router())
        .layer(cors_middleware())
        .with_state(state)
}

/// Health check simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "bus-booking",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
