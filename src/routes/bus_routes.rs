use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::bus_controller::BusController;
use crate::dto::bus_dto::{BusCascadeResponse, BusResponse, CreateBusRequest, UpdateBusRequest};
use crate::dto::common::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_bus_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_bus))
        .route("/", get(list_buses))
        .route("/number/:bus_number", get(get_bus_by_number))
        .route("/:id", get(get_bus))
        .route("/:id", put(update_bus))
        .route("/:id", delete(delete_bus))
}

async fn create_bus(
    State(state): State<AppState>,
    Json(request): Json<CreateBusRequest>,
) -> Result<Json<ApiResponse<BusResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BusResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_bus_by_number(
    State(state): State<AppState>,
    Path(bus_number): Path<String>,
) -> Result<Json<ApiResponse<BusResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.get_by_number(&bus_number).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_buses(
    State(state): State<AppState>,
) -> Result<Json<Vec<BusResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn update_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBusRequest>,
) -> Result<Json<ApiResponse<BusResponse>>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

/// Borrado en cascada del bus: reservas, schedules, bus y rutas huérfanas
async fn delete_bus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BusCascadeResponse>, AppError> {
    let controller = BusController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
