//! Repositorio de rutas
//!
//! Incluye el guard de deduplicación (pareja origen/destino única
//! case-insensitive) y la cascada de borrado de rutas con sus conteos
//! previos. El orden de la cascada es obligatorio: las reservas referencian
//! schedules y los schedules referencian rutas.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::route::Route;
use crate::utils::errors::{AppError, AppResult};

/// Conteos de dependencias de una ruta, previos a la cascada
#[derive(Debug)]
pub struct RouteCascadePreview {
    pub schedules_attached: i64,
    pub bookings_attached: i64,
}

/// Resumen del borrado en cascada de una ruta
#[derive(Debug)]
pub struct RouteCascade {
    pub bookings_removed: u64,
    pub schedules_removed: u64,
    pub route_removed: bool,
}

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check de duplicados case-insensitive sobre ambas ciudades.
    ///
    /// `exclude_id` permite que una ruta no se considere duplicada de sí
    /// misma en el escenario de update.
    pub async fn exists(
        &self,
        source: &str,
        destination: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let found: Option<(Uuid,)> = match exclude_id {
            Some(id) => {
                sqlx::query_as(
                    "SELECT id FROM routes \
                     WHERE LOWER(source_city) = LOWER($1) \
                       AND LOWER(destination_city) = LOWER($2) \
                       AND id <> $3 \
                     LIMIT 1",
                )
                .bind(source)
                .bind(destination)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id FROM routes \
                     WHERE LOWER(source_city) = LOWER($1) \
                       AND LOWER(destination_city) = LOWER($2) \
                     LIMIT 1",
                )
                .bind(source)
                .bind(destination)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(found.is_some())
    }

    pub async fn create(
        &self,
        source_city: String,
        destination_city: String,
        distance_km: f64,
        estimated_duration: String,
    ) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            "INSERT INTO routes (id, source_city, destination_city, distance_km, estimated_duration, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(source_city)
        .bind(destination_city)
        .bind(distance_km)
        .bind(estimated_duration)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes ORDER BY source_city, destination_city",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    pub async fn update(
        &self,
        id: Uuid,
        source_city: Option<String>,
        destination_city: Option<String>,
        distance_km: Option<f64>,
        estimated_duration: Option<String>,
    ) -> AppResult<Route> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let route = sqlx::query_as::<_, Route>(
            "UPDATE routes \
             SET source_city = $2, destination_city = $3, distance_km = $4, estimated_duration = $5 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(source_city.unwrap_or(current.source_city))
        .bind(destination_city.unwrap_or(current.destination_city))
        .bind(distance_km.unwrap_or(current.distance_km))
        .bind(estimated_duration.unwrap_or(current.estimated_duration))
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    /// Conteos de schedules y reservas colgando de la ruta (solo lectura).
    ///
    /// Se reportan antes de la cascada para que el caller confirme el
    /// borrado destructivo.
    pub async fn cascade_preview(&self, route_id: Uuid) -> AppResult<RouteCascadePreview> {
        let (schedules_attached,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM schedules WHERE route_id = $1")
                .bind(route_id)
                .fetch_one(&self.pool)
                .await?;

        let (bookings_attached,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM bookings \
             WHERE schedule_id IN (SELECT id FROM schedules WHERE route_id = $1)",
        )
        .bind(route_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RouteCascadePreview {
            schedules_attached,
            bookings_attached,
        })
    }

    /// Borrar una ruta con sus schedules y reservas, en una transacción.
    ///
    /// Orden obligatorio: bookings -> schedules -> route. Todo o nada.
    pub async fn delete_cascade(&self, route_id: Uuid) -> AppResult<RouteCascade> {
        let mut tx = self.pool.begin().await?;

        let bookings_removed = sqlx::query(
            "DELETE FROM bookings \
             WHERE schedule_id IN (SELECT id FROM schedules WHERE route_id = $1)",
        )
        .bind(route_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let schedules_removed = sqlx::query("DELETE FROM schedules WHERE route_id = $1")
            .bind(route_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let route_removed = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(route_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        tx.commit().await?;

        tracing::info!(
            route_id = %route_id,
            bookings_removed,
            schedules_removed,
            "Cascada de borrado de ruta completada"
        );

        Ok(RouteCascade {
            bookings_removed,
            schedules_removed,
            route_removed,
        })
    }

    /// Reasignar los schedules de una ruta a otra (alternativa no
    /// destructiva a la cascada). Devuelve cuántos schedules se movieron.
    pub async fn reassign_schedules(
        &self,
        from_route_id: Uuid,
        to_route_id: Uuid,
    ) -> AppResult<u64> {
        let moved = sqlx::query("UPDATE schedules SET route_id = $1 WHERE route_id = $2")
            .bind(to_route_id)
            .bind(from_route_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(moved)
    }
}
