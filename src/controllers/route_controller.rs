//! Controller de rutas
//!
//! El guard de deduplicación corre antes de cada insert y cada update:
//! si existe otra ruta con la misma pareja origen/destino
//! (case-insensitive), la escritura se rechaza sin intentarse.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::route_dto::{
    CreateRouteRequest, RouteCascadePreview, RouteCascadeResponse, RouteResponse,
    UpdateRouteRequest,
};
use crate::repositories::route_repository::RouteRepository;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::normalize_city;

pub struct RouteController {
    repository: RouteRepository,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RouteRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate()?;

        // Guard de deduplicación antes del insert
        if self
            .repository
            .exists(&request.source_city, &request.destination_city, None)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "La ruta {} -> {} ya existe",
                request.source_city, request.destination_city
            )));
        }

        let route = self
            .repository
            .create(
                request.source_city,
                request.destination_city,
                request.distance_km,
                request.estimated_duration,
            )
            .await?;

        tracing::info!(route_id = %route.id, "Ruta creada: {} -> {}", route.source_city, route.destination_city);

        Ok(ApiResponse::success_with_message(
            route.into(),
            "Ruta creada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate()?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        // Guard con exclude_id: la ruta no es duplicada de sí misma
        let source = request.source_city.as_deref().unwrap_or(&current.source_city);
        let destination = request
            .destination_city
            .as_deref()
            .unwrap_or(&current.destination_city);

        if self.repository.exists(source, destination, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "La ruta {} -> {} ya existe",
                source, destination
            )));
        }

        let route = self
            .repository
            .update(
                id,
                request.source_city,
                request.destination_city,
                request.distance_km,
                request.estimated_duration,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            route.into(),
            "Ruta actualizada exitosamente".to_string(),
        ))
    }

    pub async fn exists(
        &self,
        source: &str,
        destination: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        // Normalizar antes de consultar: misma regla que el LOWER() del SQL
        self.repository
            .exists(&normalize_city(source), &normalize_city(destination), exclude_id)
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RouteResponse, AppError> {
        let route = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;

        Ok(route.into())
    }

    pub async fn list(&self) -> Result<Vec<RouteResponse>, AppError> {
        let routes = self.repository.find_all().await?;
        Ok(routes.into_iter().map(Into::into).collect())
    }

    /// Conteos de dependencias para confirmar una cascada destructiva
    pub async fn cascade_preview(&self, id: Uuid) -> Result<RouteCascadePreview, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;

        let preview = self.repository.cascade_preview(id).await?;

        Ok(RouteCascadePreview {
            schedules_attached: preview.schedules_attached,
            bookings_attached: preview.bookings_attached,
        })
    }

    /// Cascada destructiva: bookings -> schedules -> ruta
    pub async fn delete(&self, id: Uuid) -> Result<RouteCascadeResponse, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Route", &id.to_string()))?;

        let cascade = self.repository.delete_cascade(id).await?;

        Ok(RouteCascadeResponse {
            bookings_removed: cascade.bookings_removed,
            schedules_removed: cascade.schedules_removed,
            route_removed: cascade.route_removed,
        })
    }

    /// Mover los schedules de una ruta a otra sin borrar nada
    pub async fn reassign_schedules(
        &self,
        from_route_id: Uuid,
        to_route_id: Uuid,
    ) -> Result<u64, AppError> {
        if from_route_id == to_route_id {
            return Err(AppError::BadRequest(
                "La ruta origen y destino de la reasignación son la misma".to_string(),
            ));
        }

        self.repository
            .find_by_id(from_route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta origen no encontrada".to_string()))?;
        self.repository
            .find_by_id(to_route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta destino no encontrada".to_string()))?;

        self.repository
            .reassign_schedules(from_route_id, to_route_id)
            .await
    }
}
