//! DTOs de las APIs HTTP

pub mod dashboard_dto;
pub mod fleet_dto;
