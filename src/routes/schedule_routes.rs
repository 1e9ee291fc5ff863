use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::controllers::schedule_controller::ScheduleController;
use crate::dto::common::ApiResponse;
use crate::dto::schedule_dto::{
    CreateScheduleRequest, ScheduleResponse, TripSearchQuery, UpdateScheduleRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_schedule_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_schedule))
        .route("/", get(list_schedules))
        .route("/search", get(search_trips))
        .route("/route/:route_id", get(list_by_route))
        .route("/:id", get(get_schedule))
        .route("/:id", put(update_schedule))
        .route("/:id", delete(delete_schedule))
}

async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<CreateScheduleRequest>,
) -> Result<Json<ApiResponse<ScheduleResponse>>, AppError> {
    let controller = ScheduleController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ScheduleResponse>>, AppError> {
    let controller = ScheduleController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let controller = ScheduleController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

/// Búsqueda de viajes por origen/destino, case-insensitive
async fn search_trips(
    State(state): State<AppState>,
    Query(query): Query<TripSearchQuery>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let controller = ScheduleController::new(state.pool.clone());
    let response = controller.search_trips(&query.from, &query.to).await?;
    Ok(Json(response))
}

async fn list_by_route(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let controller = ScheduleController::new(state.pool.clone());
    let response = controller.list_by_route(route_id).await?;
    Ok(Json(response))
}

async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateScheduleRequest>,
) -> Result<Json<ApiResponse<ScheduleResponse>>, AppError> {
    let controller = ScheduleController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = ScheduleController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Schedule eliminado junto con sus reservas",
    })))
}
