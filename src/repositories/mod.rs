//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula el SQL de su tabla; las operaciones
//! multi-sentencia abren transacciones explícitas sobre el pool.

pub mod booking_repository;
pub mod bus_repository;
pub mod route_repository;
pub mod schedule_repository;
