//! Repositorio de bookings - núcleo transaccional de reservas
//!
//! Aquí vive la única pieza de estado compartido mutable del sistema:
//! el contador available_seats. Solo lo tocan dos sentencias, el decremento
//! condicional (creación) y el incremento bajo row lock (cancelación).
//! Nunca read-then-blind-write.

use sqlx::types::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use chrono::Utc;

use crate::models::booking::{Booking, BookingDetails, BookingStatus, CancelOutcome};
use crate::models::user::User;
use crate::utils::errors::{AppError, AppResult};

/// Resultado interno de la creación (el controller agrega ScheduleDeparted)
#[derive(Debug)]
pub enum ReservationResult {
    Created(Booking),
    SoldOut,
}

/// Columnas de la reconstrucción joined Booking -> Schedule -> Bus/Route + User
const BOOKING_DETAILS_SQL: &str = "SELECT bk.id, bk.seat_number, bk.status, bk.total_amount, bk.booking_date, \
     bk.user_id, u.full_name, \
     bk.schedule_id, s.departure_time, s.arrival_time, s.ticket_price, \
     b.bus_number, r.source_city, r.destination_city \
     FROM bookings bk \
     JOIN schedules s ON bk.schedule_id = s.id \
     JOIN buses b ON s.bus_id = b.id \
     JOIN routes r ON s.route_id = r.id \
     JOIN users u ON bk.user_id = u.id";

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear una reserva CONFIRMED con control de admisión atómico.
    ///
    /// Una sola transacción:
    /// 1. Decremento condicional del contador. Cero filas afectadas
    ///    significa agotado: rollback y `SoldOut`.
    /// 2. Verificación procedural de asiento único entre CONFIRMED
    ///    (las canceladas pueden reutilizar el número).
    /// 3. INSERT de la reserva y commit.
    ///
    /// Cualquier fallo intermedio revierte el decremento; un decremento
    /// a medias sin fila de booking sería un bug de correctitud.
    pub async fn create_confirmed(
        &self,
        user_id: Uuid,
        schedule_id: Uuid,
        seat_number: &str,
        total_amount: Decimal,
    ) -> AppResult<ReservationResult> {
        let mut tx = self.pool.begin().await?;

        // Puerta de admisión: exactamente un escritor gana el row lock
        let updated = sqlx::query(
            "UPDATE schedules SET available_seats = available_seats - 1 \
             WHERE id = $1 AND available_seats > 0",
        )
        .bind(schedule_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(ReservationResult::SoldOut);
        }

        // Asiento único entre reservas CONFIRMED, verificado bajo el lock
        // que el decremento acaba de ganar
        let seat_taken: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM bookings \
             WHERE schedule_id = $1 AND seat_number = $2 AND status = $3 \
             LIMIT 1",
        )
        .bind(schedule_id)
        .bind(seat_number)
        .bind(BookingStatus::CONFIRMED)
        .fetch_optional(&mut *tx)
        .await?;

        if seat_taken.is_some() {
            tx.rollback().await?;
            return Err(AppError::Conflict(format!(
                "El asiento {} ya está reservado para este schedule",
                seat_number
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, schedule_id, seat_number, status, total_amount, booking_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(schedule_id)
        .bind(seat_number)
        .bind(BookingStatus::CONFIRMED)
        .bind(total_amount)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            booking_id = %booking.id,
            schedule_id = %schedule_id,
            seat = %seat_number,
            "Reserva confirmada"
        );
        Ok(ReservationResult::Created(booking))
    }

    /// Cancelar una reserva devolviendo el asiento exactamente una vez.
    ///
    /// `owner` es `Some(user_id)` en modo self-service (la reserva debe
    /// pertenecer al usuario) y `None` en modo administrativo. Ambos modos
    /// toman el row lock: dos cancelaciones concurrentes sobre la misma
    /// reserva verían ambas CONFIRMED sin él y el asiento se devolvería
    /// dos veces.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        owner: Option<Uuid>,
    ) -> AppResult<CancelOutcome> {
        let mut tx = self.pool.begin().await?;

        // SELECT ... FOR UPDATE serializa cancelaciones sobre la misma fila
        let locked: Option<(Uuid, String)> = match owner {
            Some(user_id) => {
                sqlx::query_as(
                    "SELECT schedule_id, status FROM bookings \
                     WHERE id = $1 AND user_id = $2 FOR UPDATE",
                )
                .bind(booking_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT schedule_id, status FROM bookings WHERE id = $1 FOR UPDATE",
                )
                .bind(booking_id)
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let Some((schedule_id, status)) = locked else {
            tx.rollback().await?;
            return Ok(CancelOutcome::NotFound);
        };

        // Releer el status bajo el lock: el ganador de una carrera lo ve
        // CONFIRMED, el perdedor lo ve CANCELLED y no reembolsa
        if BookingStatus::parse(&status) != Some(BookingStatus::Confirmed) {
            tx.rollback().await?;
            return Ok(CancelOutcome::AlreadyCancelled);
        }

        let flipped = sqlx::query(
            "UPDATE bookings SET status = $2 WHERE id = $1 AND status = $3",
        )
        .bind(booking_id)
        .bind(BookingStatus::Cancelled.as_str())
        .bind(BookingStatus::Confirmed.as_str())
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            // Imposible bajo el lock; si pasa, no reembolsar
            tx.rollback().await?;
            return Ok(CancelOutcome::AlreadyCancelled);
        }

        sqlx::query("UPDATE schedules SET available_seats = available_seats + 1 WHERE id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(booking_id = %booking_id, schedule_id = %schedule_id, "Reserva cancelada");
        Ok(CancelOutcome::Cancelled)
    }

    /// Borrado permanente de una reserva ya cancelada.
    ///
    /// Sin efecto sobre el inventario: el reembolso ocurrió al cancelar.
    /// Devuelve true si la fila se eliminó.
    pub async fn purge_cancelled(
        &self,
        booking_id: Uuid,
        owner: Option<Uuid>,
    ) -> AppResult<bool> {
        let removed = match owner {
            Some(user_id) => {
                sqlx::query(
                    "DELETE FROM bookings WHERE id = $1 AND user_id = $2 AND status = $3",
                )
                .bind(booking_id)
                .bind(user_id)
                .bind(BookingStatus::CANCELLED)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query("DELETE FROM bookings WHERE id = $1 AND status = $2")
                    .bind(booking_id)
                    .bind(BookingStatus::CANCELLED)
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(removed.rows_affected() > 0)
    }

    /// Cliente referenciado por una reserva (las reservas exigen que el
    /// usuario exista antes de tocar el inventario)
    pub async fn find_customer(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Asientos ocupados por reservas CONFIRMED de un schedule
    pub async fn taken_seats(&self, schedule_id: Uuid) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT seat_number FROM bookings WHERE schedule_id = $1 AND status = $2",
        )
        .bind(schedule_id)
        .bind(BookingStatus::CONFIRMED)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(seat,)| seat).collect())
    }

    pub async fn find_by_id(&self, booking_id: Uuid) -> AppResult<Option<BookingDetails>> {
        let booking = sqlx::query_as::<_, BookingDetails>(
            &format!("{} WHERE bk.id = $1", BOOKING_DETAILS_SQL),
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(
            &format!(
                "{} WHERE bk.user_id = $1 ORDER BY bk.booking_date DESC",
                BOOKING_DETAILS_SQL
            ),
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn find_all(&self) -> AppResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(
            &format!("{} ORDER BY bk.booking_date DESC", BOOKING_DETAILS_SQL),
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }
}
