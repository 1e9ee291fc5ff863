//! Repositorio de buses
//!
//! CRUD de flota más el borrado en cascada multi-paso. El schema no tiene
//! ON DELETE CASCADE: el orden de borrado vive aquí, en código de
//! aplicación, y es obligatorio (bookings -> schedules -> bus -> rutas
//! huérfanas).

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::bus::Bus;
use crate::utils::errors::{AppError, AppResult};

/// Resumen del borrado en cascada de un bus
#[derive(Debug)]
pub struct BusCascade {
    pub bus_removed: bool,
    pub bookings_removed: u64,
    pub schedules_removed: u64,
    pub orphan_routes_removed: u64,
}

pub struct BusRepository {
    pool: PgPool,
}

impl BusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        bus_number: String,
        total_seats: i32,
        bus_type: String,
        is_operational: bool,
    ) -> AppResult<Bus> {
        let bus = sqlx::query_as::<_, Bus>(
            "INSERT INTO buses (id, bus_number, total_seats, type, is_operational, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(bus_number)
        .bind(total_seats)
        .bind(bus_type)
        .bind(is_operational)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(bus)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bus>> {
        let bus = sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bus)
    }

    pub async fn find_by_number(&self, bus_number: &str) -> AppResult<Option<Bus>> {
        let bus = sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE bus_number = $1")
            .bind(bus_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bus)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Bus>> {
        let buses = sqlx::query_as::<_, Bus>("SELECT * FROM buses ORDER BY bus_number")
            .fetch_all(&self.pool)
            .await?;

        Ok(buses)
    }

    pub async fn bus_number_exists(
        &self,
        bus_number: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let result: (bool,) = match exclude_id {
            Some(id) => {
                sqlx::query_as(
                    "SELECT EXISTS(SELECT 1 FROM buses WHERE bus_number = $1 AND id <> $2)",
                )
                .bind(bus_number)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM buses WHERE bus_number = $1)")
                    .bind(bus_number)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        bus_number: Option<String>,
        total_seats: Option<i32>,
        bus_type: Option<String>,
        is_operational: Option<bool>,
    ) -> AppResult<Bus> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bus no encontrado".to_string()))?;

        let bus = sqlx::query_as::<_, Bus>(
            "UPDATE buses \
             SET bus_number = $2, total_seats = $3, type = $4, is_operational = $5 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(bus_number.unwrap_or(current.bus_number))
        .bind(total_seats.unwrap_or(current.total_seats))
        .bind(bus_type.unwrap_or(current.bus_type))
        .bind(is_operational.unwrap_or(current.is_operational))
        .fetch_one(&self.pool)
        .await?;

        Ok(bus)
    }

    /// Borrar un bus con todo lo que depende de él, en una transacción.
    ///
    /// Orden de la cascada:
    /// 1. Capturar las rutas referenciadas por los schedules del bus.
    /// 2. Borrar las reservas de esos schedules.
    /// 3. Borrar los schedules del bus.
    /// 4. Borrar el bus.
    /// 5. Borrar cada ruta capturada solo si ningún schedule la referencia
    ///    todavía (check de orfandad via NOT EXISTS).
    ///
    /// Con este orden ninguna FK puede violarse. Todo o nada: cualquier
    /// fallo revierte los pasos ya ejecutados.
    pub async fn delete_cascade(&self, bus_id: Uuid) -> AppResult<BusCascade> {
        let mut tx = self.pool.begin().await?;

        // Rutas atadas a los schedules de este bus, para limpiar huérfanas después
        let route_ids: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT DISTINCT route_id FROM schedules WHERE bus_id = $1",
        )
        .bind(bus_id)
        .fetch_all(&mut *tx)
        .await?;

        let bookings_removed = sqlx::query(
            "DELETE FROM bookings \
             WHERE schedule_id IN (SELECT id FROM schedules WHERE bus_id = $1)",
        )
        .bind(bus_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let schedules_removed = sqlx::query("DELETE FROM schedules WHERE bus_id = $1")
            .bind(bus_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let bus_removed = sqlx::query("DELETE FROM buses WHERE id = $1")
            .bind(bus_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        // Rutas que quedaron sin schedules: elegibles para borrado automático
        let mut orphan_routes_removed = 0u64;
        for (route_id,) in route_ids {
            orphan_routes_removed += sqlx::query(
                "DELETE FROM routes WHERE id = $1 \
                 AND NOT EXISTS (SELECT 1 FROM schedules WHERE route_id = $1)",
            )
            .bind(route_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;

        tracing::info!(
            bus_id = %bus_id,
            bookings_removed,
            schedules_removed,
            orphan_routes_removed,
            "Cascada de borrado de bus completada"
        );

        Ok(BusCascade {
            bus_removed,
            bookings_removed,
            schedules_removed,
            orphan_routes_removed,
        })
    }
}
