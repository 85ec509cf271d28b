//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`.

pub mod car;
pub mod client;
pub mod parking_assignment;
pub mod parking_space;
