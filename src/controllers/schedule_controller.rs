//! Controller de schedules
//!
//! Creación y edición de horarios bajo el invariante del contador:
//! `0 <= available_seats <= bus.total_seats`.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::schedule_dto::{CreateScheduleRequest, ScheduleResponse, UpdateScheduleRequest};
use crate::repositories::bus_repository::BusRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::normalize_city;

pub struct ScheduleController {
    repository: ScheduleRepository,
    buses: BusRepository,
    routes: RouteRepository,
}

impl ScheduleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ScheduleRepository::new(pool.clone()),
            buses: BusRepository::new(pool.clone()),
            routes: RouteRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<ApiResponse<ScheduleResponse>, AppError> {
        request.validate()?;

        let bus = self
            .buses
            .find_by_id(request.bus_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bus no encontrado".to_string()))?;

        self.routes
            .find_by_id(request.route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        if request.arrival_time <= request.departure_time {
            return Err(AppError::BadRequest(
                "La hora de llegada debe ser posterior a la de salida".to_string(),
            ));
        }

        // Asientos iniciales: capacidad del bus salvo override explícito
        let available_seats = request.available_seats.unwrap_or(bus.total_seats);
        if available_seats < 0 || available_seats > bus.total_seats {
            return Err(AppError::BadRequest(format!(
                "available_seats fuera de rango: {} (capacidad {})",
                available_seats, bus.total_seats
            )));
        }

        let schedule = self
            .repository
            .create(
                request.bus_id,
                request.route_id,
                request.departure_time,
                request.arrival_time,
                request.ticket_price,
                available_seats,
            )
            .await?;

        tracing::info!(schedule_id = %schedule.id, bus = %bus.bus_number, "Schedule creado");

        // Devolver la vista joined completa
        let details = self
            .repository
            .find_by_id(schedule.id)
            .await?
            .ok_or_else(|| AppError::Internal("Schedule recién creado no encontrado".to_string()))?;

        Ok(ApiResponse::success_with_message(
            details.into(),
            "Schedule creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ScheduleResponse, AppError> {
        let schedule = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Schedule", &id.to_string()))?;

        Ok(schedule.into())
    }

    pub async fn list(&self) -> Result<Vec<ScheduleResponse>, AppError> {
        let schedules = self.repository.find_all().await?;
        Ok(schedules.into_iter().map(Into::into).collect())
    }

    pub async fn search_trips(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<ScheduleResponse>, AppError> {
        // Normalizar la entrada del usuario: misma regla que el LOWER() del SQL
        let schedules = self
            .repository
            .search_trips(&normalize_city(from), &normalize_city(to))
            .await?;
        Ok(schedules.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_route(&self, route_id: Uuid) -> Result<Vec<ScheduleResponse>, AppError> {
        let schedules = self.repository.find_by_route(route_id).await?;
        Ok(schedules.into_iter().map(Into::into).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateScheduleRequest,
    ) -> Result<ApiResponse<ScheduleResponse>, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule no encontrado".to_string()))?;

        let departure_time = request.departure_time.unwrap_or(current.departure_time);
        let arrival_time = request.arrival_time.unwrap_or(current.arrival_time);
        let ticket_price = request.ticket_price.unwrap_or(current.ticket_price);

        if arrival_time <= departure_time {
            return Err(AppError::BadRequest(
                "La hora de llegada debe ser posterior a la de salida".to_string(),
            ));
        }

        // Invariante del contador contra la capacidad del bus. El contador
        // NO se rellena desde esta lectura sin lock: solo un override
        // explícito del request lo escribe.
        if let Some(available_seats) = request.available_seats {
            if available_seats < 0 || available_seats > current.total_seats {
                return Err(AppError::BadRequest(format!(
                    "available_seats fuera de rango: {} (capacidad {})",
                    available_seats, current.total_seats
                )));
            }
        }

        self.repository
            .update(
                id,
                departure_time,
                arrival_time,
                ticket_price,
                request.available_seats,
            )
            .await?;

        let details = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal("Schedule actualizado no encontrado".to_string()))?;

        Ok(ApiResponse::success_with_message(
            details.into(),
            "Schedule actualizado exitosamente".to_string(),
        ))
    }

    /// Borrar un schedule junto con sus reservas
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.repository.delete_with_bookings(id).await?;
        if !removed {
            return Err(AppError::NotFound("Schedule no encontrado".to_string()));
        }
        Ok(())
    }
}
