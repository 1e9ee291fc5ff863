use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{Booking, BookingDetails};

// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub customer_id: Uuid,
    pub schedule_id: Uuid,

    #[validate(length(min = 1, max = 10))]
    pub seat_number: String,

    pub total_amount: Decimal,
}

// Request para cancelar/purgar en modo self-service
#[derive(Debug, Deserialize)]
pub struct BookingActorRequest {
    pub user_id: Uuid,
}

// Response de reserva plana (creación)
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub schedule_id: Uuid,
    pub seat_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub booking_date: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            schedule_id: b.schedule_id,
            seat_number: b.seat_number,
            status: b.status,
            total_amount: b.total_amount,
            booking_date: b.booking_date,
        }
    }
}

// Response de reserva con contexto completo (listados)
#[derive(Debug, Serialize)]
pub struct BookingDetailsResponse {
    pub id: Uuid,
    pub seat_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub booking_date: DateTime<Utc>,
    pub user_id: Uuid,
    pub full_name: String,
    pub schedule_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub ticket_price: Decimal,
    pub bus_number: String,
    pub source_city: String,
    pub destination_city: String,
}

impl From<BookingDetails> for BookingDetailsResponse {
    fn from(b: BookingDetails) -> Self {
        Self {
            id: b.id,
            seat_number: b.seat_number,
            status: b.status,
            total_amount: b.total_amount,
            booking_date: b.booking_date,
            user_id: b.user_id,
            full_name: b.full_name,
            schedule_id: b.schedule_id,
            departure_time: b.departure_time,
            arrival_time: b.arrival_time,
            ticket_price: b.ticket_price,
            bus_number: b.bus_number,
            source_city: b.source_city,
            destination_city: b.destination_city,
        }
    }
}

/// Asientos ocupados de un schedule
#[derive(Debug, Serialize, Deserialize)]
pub struct TakenSeatsResponse {
    pub schedule_id: Uuid,
    pub taken_seats: Vec<String>,
}
