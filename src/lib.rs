//! Motor de asignación de plazas de parking
//!
//! Garantiza que cada plaza tenga como máximo una asignación activa y mantiene
//! la disponibilidad de cada plaza como proyección de sus asignaciones.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
