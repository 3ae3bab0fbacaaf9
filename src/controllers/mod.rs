//! Controladores del servicio HTTP del store

pub mod fleet_controller;

pub use fleet_controller::FleetController;
