//! Services module
//!
//! Este módulo contiene la lógica de negocio: el motor de asignación de
//! espacios y el proyector de disponibilidad que lo acompaña.

pub mod allocation_engine;
pub mod availability_projector;

pub use allocation_engine::{AllocationEngine, Proposal};
pub use availability_projector::{AvailabilityProjector, ReconcileReport};
