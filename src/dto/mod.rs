//! DTOs de la API
//!
//! Requests y responses serializables, separados de los modelos de BD.

pub mod booking_dto;
pub mod bus_dto;
pub mod common;
pub mod route_dto;
pub mod schedule_dto;
