//! Módulo de base de datos
//!
//! Maneja la conexión y el schema de PostgreSQL. Las reglas de cascada NO
//! viven en el schema (sin ON DELETE CASCADE): los borrados ordenados son
//! responsabilidad del código de aplicación.

pub mod connection;

pub use connection::DatabaseConnection;
