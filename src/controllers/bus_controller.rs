//! Controller de buses
//!
//! Administración de flota y entrada al borrado en cascada de un bus.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::bus_dto::{BusCascadeResponse, BusResponse, CreateBusRequest, UpdateBusRequest};
use crate::dto::common::ApiResponse;
use crate::repositories::bus_repository::BusRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::validation::validate_not_empty;

pub struct BusController {
    repository: BusRepository,
}

impl BusController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BusRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateBusRequest,
    ) -> Result<ApiResponse<BusResponse>, AppError> {
        request.validate()?;

        validate_not_empty(&request.bus_number)
            .map_err(|_| AppError::BadRequest("El número de bus es requerido".to_string()))?;

        if self
            .repository
            .bus_number_exists(&request.bus_number, None)
            .await?
        {
            return Err(conflict_error("Bus", "bus_number", &request.bus_number));
        }

        let bus = self
            .repository
            .create(
                request.bus_number,
                request.total_seats,
                request.bus_type,
                request.is_operational.unwrap_or(true),
            )
            .await?;

        tracing::info!(bus_id = %bus.id, "Bus registrado: {}", bus.bus_number);

        Ok(ApiResponse::success_with_message(
            bus.into(),
            "Bus registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<BusResponse, AppError> {
        let bus = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Bus", &id.to_string()))?;

        Ok(bus.into())
    }

    pub async fn get_by_number(&self, bus_number: &str) -> Result<BusResponse, AppError> {
        let bus = self
            .repository
            .find_by_number(bus_number)
            .await?
            .ok_or_else(|| not_found_error("Bus", bus_number))?;

        Ok(bus.into())
    }

    pub async fn list(&self) -> Result<Vec<BusResponse>, AppError> {
        let buses = self.repository.find_all().await?;
        Ok(buses.into_iter().map(Into::into).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateBusRequest,
    ) -> Result<ApiResponse<BusResponse>, AppError> {
        request.validate()?;

        if let Some(bus_number) = &request.bus_number {
            if self
                .repository
                .bus_number_exists(bus_number, Some(id))
                .await?
            {
                return Err(conflict_error("Bus", "bus_number", bus_number));
            }
        }

        let bus = self
            .repository
            .update(
                id,
                request.bus_number,
                request.total_seats,
                request.bus_type,
                request.is_operational,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            bus.into(),
            "Bus actualizado exitosamente".to_string(),
        ))
    }

    /// Borrado en cascada: reservas y schedules del bus, el bus, y las
    /// rutas que quedaron huérfanas
    pub async fn delete(&self, id: Uuid) -> Result<BusCascadeResponse, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Bus", &id.to_string()))?;

        let cascade = self.repository.delete_cascade(id).await?;

        Ok(BusCascadeResponse {
            bus_removed: cascade.bus_removed,
            bookings_removed: cascade.bookings_removed,
            schedules_removed: cascade.schedules_removed,
            orphan_routes_removed: cascade.orphan_routes_removed,
        })
    }
}
