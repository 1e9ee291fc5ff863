//! Rutas HTTP de reservas
//!
//! Los outcomes de negocio se traducen a HTTP aquí: el controller devuelve
//! tipos, nunca status codes. La identidad del actor llega en el body
//! (`user_id`) mientras no exista middleware de autenticación; las rutas
//! `/admin` representan el modo administrativo.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingActorRequest, BookingDetailsResponse, BookingResponse, CreateBookingRequest,
    TakenSeatsResponse,
};
use crate::dto::common::ApiResponse;
use crate::models::booking::{BookingActor, BookingOutcome, CancelOutcome};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/user/:user_id", get(list_user_bookings))
        .route("/schedule/:schedule_id/taken-seats", get(taken_seats))
        .route("/:id", get(get_booking))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/cancel/admin", post(cancel_booking_admin))
        .route("/:id", delete(purge_booking))
        .route("/:id/admin", delete(purge_booking_admin))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let controller = BookingController::new(state.pool.clone());

    match controller.create(request).await? {
        BookingOutcome::Confirmed(booking) => Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Reserva confirmada",
                "data": BookingResponse::from(booking),
            })),
        )),
        BookingOutcome::SoldOut => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "code": "SOLD_OUT",
                "message": "No quedan asientos disponibles",
            })),
        )),
        BookingOutcome::ScheduleDeparted => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "code": "SCHEDULE_DEPARTED",
                "message": "El schedule ya partió; no admite reservas",
            })),
        )),
    }
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BookingActorRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let controller = BookingController::new(state.pool.clone());
    let outcome = controller
        .cancel(id, BookingActor::Customer(request.user_id))
        .await?;
    Ok(cancel_outcome_response(outcome))
}

async fn cancel_booking_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let controller = BookingController::new(state.pool.clone());
    let outcome = controller.cancel(id, BookingActor::Admin).await?;
    Ok(cancel_outcome_response(outcome))
}

fn cancel_outcome_response(outcome: CancelOutcome) -> (StatusCode, Json<serde_json::Value>) {
    match outcome {
        CancelOutcome::Cancelled => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Reserva cancelada; asiento devuelto al inventario",
            })),
        ),
        CancelOutcome::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "code": "NOT_FOUND",
                "message": "Reserva no encontrada",
            })),
        ),
        CancelOutcome::AlreadyCancelled => (
            StatusCode::CONFLICT,
            Json(json!({
                "success": false,
                "code": "ALREADY_CANCELLED",
                "message": "La reserva ya estaba cancelada",
            })),
        ),
    }
}

async fn purge_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BookingActorRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    controller
        .purge(id, BookingActor::Customer(request.user_id))
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Reserva eliminada permanentemente",
    })))
}

async fn purge_booking_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    controller.purge(id, BookingActor::Admin).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Reserva eliminada permanentemente",
    })))
}

async fn taken_seats(
    State(state): State<AppState>,
    Path(schedule_id): Path<Uuid>,
) -> Result<Json<TakenSeatsResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.taken_seats(schedule_id).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingDetailsResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<BookingDetailsResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list_for_user(user_id).await?;
    Ok(Json(response))
}

async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingDetailsResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list_all().await?;
    Ok(Json(response))
}
