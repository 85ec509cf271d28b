//! Controladores
//!
//! Capa entre las rutas HTTP y los servicios/repositorios.

pub mod assignment_controller;
pub mod car_controller;
pub mod client_controller;
pub mod parking_space_controller;
