use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::common::ApiResponse;
use crate::dto::route_dto::{
    CreateRouteRequest, RouteCascadePreview, RouteCascadeResponse, RouteExistsQuery,
    RouteResponse, UpdateRouteRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route))
        .route("/", get(list_routes))
        .route("/exists", get(route_exists))
        .route("/:id", get(get_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
        .route("/:id/cascade-preview", get(cascade_preview))
        .route("/:id/reassign/:to_route_id", post(reassign_schedules))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

/// Check del guard de deduplicación (case-insensitive en ambas ciudades)
async fn route_exists(
    State(state): State<AppState>,
    Query(query): Query<RouteExistsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let exists = controller
        .exists(&query.source, &query.destination, query.exclude_id)
        .await?;
    Ok(Json(json!({ "exists": exists })))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

/// Conteos de schedules y reservas que caerían con la ruta
async fn cascade_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteCascadePreview>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.cascade_preview(id).await?;
    Ok(Json(response))
}

/// Cascada destructiva confirmada por el caller
async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteCascadeResponse>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn reassign_schedules(
    State(state): State<AppState>,
    Path((id, to_route_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let moved = controller.reassign_schedules(id, to_route_id).await?;
    Ok(Json(json!({
        "success": true,
        "schedules_moved": moved,
    })))
}
