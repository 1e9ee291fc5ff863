//! Repositorio de schedules
//!
//! Todas las consultas joined comparten el mismo tipo de fila
//! (`ScheduleDetails`) y la misma lista de columnas, en lugar de
//! reconstruir objetos ad-hoc en cada camino.

use sqlx::types::Decimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::schedule::{Schedule, ScheduleDetails, SCHEDULE_DETAILS_COLUMNS};
use crate::utils::errors::AppResult;

const SCHEDULE_JOIN: &str = "FROM schedules s \
     JOIN buses b ON s.bus_id = b.id \
     JOIN routes r ON s.route_id = r.id";

pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        bus_id: Uuid,
        route_id: Uuid,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        ticket_price: Decimal,
        available_seats: i32,
    ) -> AppResult<Schedule> {
        let schedule = sqlx::query_as::<_, Schedule>(
            "INSERT INTO schedules (id, bus_id, route_id, departure_time, arrival_time, ticket_price, available_seats) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(bus_id)
        .bind(route_id)
        .bind(departure_time)
        .bind(arrival_time)
        .bind(ticket_price)
        .bind(available_seats)
        .fetch_one(&self.pool)
        .await?;

        Ok(schedule)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ScheduleDetails>> {
        let schedule = sqlx::query_as::<_, ScheduleDetails>(&format!(
            "SELECT {} {} WHERE s.id = $1",
            SCHEDULE_DETAILS_COLUMNS, SCHEDULE_JOIN
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(schedule)
    }

    pub async fn find_all(&self) -> AppResult<Vec<ScheduleDetails>> {
        let schedules = sqlx::query_as::<_, ScheduleDetails>(&format!(
            "SELECT {} {} ORDER BY s.departure_time",
            SCHEDULE_DETAILS_COLUMNS, SCHEDULE_JOIN
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    /// Buscar viajes por origen y destino, case-insensitive
    pub async fn search_trips(
        &self,
        from: &str,
        to: &str,
    ) -> AppResult<Vec<ScheduleDetails>> {
        let schedules = sqlx::query_as::<_, ScheduleDetails>(&format!(
            "SELECT {} {} \
             WHERE LOWER(r.source_city) = LOWER($1) AND LOWER(r.destination_city) = LOWER($2) \
             ORDER BY s.departure_time",
            SCHEDULE_DETAILS_COLUMNS, SCHEDULE_JOIN
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    pub async fn find_by_route(&self, route_id: Uuid) -> AppResult<Vec<ScheduleDetails>> {
        let schedules = sqlx::query_as::<_, ScheduleDetails>(&format!(
            "SELECT {} {} WHERE r.id = $1 ORDER BY s.departure_time",
            SCHEDULE_DETAILS_COLUMNS, SCHEDULE_JOIN
        ))
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schedules)
    }

    /// Update de administración. El contador solo se escribe cuando el
    /// caller lo pide explícitamente (COALESCE con NULL): un cambio de
    /// precio u horario no puede pisar el decremento de una reserva
    /// concurrente. El override queda bajo el invariante
    /// `0 <= available_seats <= total_seats`, validado por el controller.
    pub async fn update(
        &self,
        id: Uuid,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        ticket_price: Decimal,
        available_seats: Option<i32>,
    ) -> AppResult<Schedule> {
        let schedule = sqlx::query_as::<_, Schedule>(
            "UPDATE schedules \
             SET departure_time = $2, arrival_time = $3, ticket_price = $4, \
                 available_seats = COALESCE($5, available_seats) \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(departure_time)
        .bind(arrival_time)
        .bind(ticket_price)
        .bind(available_seats)
        .fetch_one(&self.pool)
        .await?;

        Ok(schedule)
    }

    /// Borrar un schedule individual con sus reservas, en una transacción.
    ///
    /// Mismo principio que las cascadas grandes: bookings antes que
    /// schedules, todo o nada.
    pub async fn delete_with_bookings(&self, schedule_id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM bookings WHERE schedule_id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        tx.commit().await?;

        Ok(removed)
    }
}
