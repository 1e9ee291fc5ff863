//! Controllers del sistema
//!
//! Instancias de servicio sin estado, construidas con el pool inyectado.
//! Nada de singletons con estado mutable de proceso.

pub mod booking_controller;
pub mod bus_controller;
pub mod route_controller;
pub mod schedule_controller;
