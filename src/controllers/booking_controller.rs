//! Controller de reservas
//!
//! Orquesta el servicio de reserva de inventario y la máquina de estados
//! del ciclo de vida. La concurrencia se resuelve entera en la base de
//! datos (decremento condicional y row locks); aquí no hay mutex alguno.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{BookingDetailsResponse, CreateBookingRequest, TakenSeatsResponse};
use crate::models::booking::{BookingActor, BookingOutcome, CancelOutcome};
use crate::repositories::booking_repository::{BookingRepository, ReservationResult};
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_seat_number;

pub struct BookingController {
    bookings: BookingRepository,
    schedules: ScheduleRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            schedules: ScheduleRepository::new(pool),
        }
    }

    /// Crear una reserva CONFIRMED.
    ///
    /// Precondiciones fuera de la transacción: el schedule existe y no ha
    /// partido, y el asiento es numérico dentro de 1..=total_seats. El
    /// control de admisión real (SoldOut) lo decide el decremento
    /// condicional dentro de la transacción.
    pub async fn create(
        &self,
        request: CreateBookingRequest,
    ) -> Result<BookingOutcome, AppError> {
        request.validate()?;

        self.bookings
            .find_customer(request.customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

        let schedule = self
            .schedules
            .find_by_id(request.schedule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule no encontrado".to_string()))?;

        if schedule.has_departed(Utc::now()) {
            tracing::warn!(schedule_id = %schedule.id, "Reserva rechazada: schedule ya partió");
            return Ok(BookingOutcome::ScheduleDeparted);
        }

        validate_seat_number(&request.seat_number, schedule.total_seats).map_err(|_| {
            AppError::BadRequest(format!(
                "Número de asiento inválido: '{}' (rango 1..{})",
                request.seat_number, schedule.total_seats
            ))
        })?;

        match self
            .bookings
            .create_confirmed(
                request.customer_id,
                request.schedule_id,
                request.seat_number.trim(),
                request.total_amount,
            )
            .await?
        {
            ReservationResult::Created(booking) => Ok(BookingOutcome::Confirmed(booking)),
            ReservationResult::SoldOut => Ok(BookingOutcome::SoldOut),
        }
    }

    /// Cancelar una reserva. Ambos modos (self-service y administrativo)
    /// toman el row lock; el modo self-service además exige propiedad.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        actor: BookingActor,
    ) -> Result<CancelOutcome, AppError> {
        self.bookings.cancel(booking_id, actor.required_owner()).await
    }

    /// Borrado permanente de una reserva ya CANCELLED
    pub async fn purge(&self, booking_id: Uuid, actor: BookingActor) -> Result<(), AppError> {
        let removed = self
            .bookings
            .purge_cancelled(booking_id, actor.required_owner())
            .await?;

        if removed {
            return Ok(());
        }

        // Distinguir "no existe" de "existe pero sigue CONFIRMED"
        match self.bookings.find_by_id(booking_id).await? {
            Some(details) => {
                let visible = match actor {
                    BookingActor::Admin => true,
                    BookingActor::Customer(user_id) => details.user_id == user_id,
                };
                if visible {
                    Err(AppError::Conflict(
                        "Solo las reservas canceladas pueden eliminarse".to_string(),
                    ))
                } else {
                    Err(AppError::NotFound("Reserva no encontrada".to_string()))
                }
            }
            None => Err(AppError::NotFound("Reserva no encontrada".to_string())),
        }
    }

    pub async fn taken_seats(&self, schedule_id: Uuid) -> Result<TakenSeatsResponse, AppError> {
        let taken_seats = self.bookings.taken_seats(schedule_id).await?;
        Ok(TakenSeatsResponse {
            schedule_id,
            taken_seats,
        })
    }

    pub async fn get_by_id(&self, booking_id: Uuid) -> Result<BookingDetailsResponse, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        Ok(booking.into())
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BookingDetailsResponse>, AppError> {
        let bookings = self.bookings.find_by_user(user_id).await?;
        Ok(bookings.into_iter().map(Into::into).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<BookingDetailsResponse>, AppError> {
        let bookings = self.bookings.find_all().await?;
        Ok(bookings.into_iter().map(Into::into).collect())
    }
}
