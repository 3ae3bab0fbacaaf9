//! Flota fija usada por `POST /api/seed`

use chrono::Utc;

use crate::models::{Vehicle, VehicleStatus};

struct SeedUnit {
    reg_number: &'static str,
    driver_name: &'static str,
    status: VehicleStatus,
    lat: f64,
    lng: f64,
    speed: f64,
    battery: f64,
    cargo: &'static str,
    destination: &'static str,
}

const SEED_UNITS: [SeedUnit; 3] = [
    SeedUnit {
        reg_number: "KHI-LOG-A24",
        driver_name: "Mohammad Ali",
        status: VehicleStatus::Active,
        lat: 24.8607,
        lng: 67.0011,
        speed: 45.0,
        battery: 88.0,
        cargo: "Medical Supplies",
        destination: "North Nazimabad",
    },
    SeedUnit {
        reg_number: "KHI-LOG-B92",
        driver_name: "Zeeshan Khan",
        status: VehicleStatus::Active,
        lat: 24.8100,
        lng: 67.0500,
        speed: 32.0,
        battery: 42.0,
        cargo: "FMCG Goods",
        destination: "DHA Phase 8",
    },
    SeedUnit {
        reg_number: "KHI-LOG-E99",
        driver_name: "Imran Ahmed",
        status: VehicleStatus::Emergency,
        lat: 24.7800,
        lng: 67.3300,
        speed: 0.0,
        battery: 5.0,
        cargo: "Heavy Machinery",
        destination: "Port Qasim Hub",
    },
];

/// Vehículos semilla sin identidad; el store asigna los ids al insertarlos
pub fn seed_fleet() -> Vec<Vehicle> {
    let now = Utc::now();
    SEED_UNITS
        .iter()
        .map(|unit| Vehicle {
            id: String::new(),
            store_id: None,
            reg_number: unit.reg_number.to_string(),
            driver_name: unit.driver_name.to_string(),
            status: unit.status,
            lat: unit.lat,
            lng: unit.lng,
            speed: unit.speed,
            battery: unit.battery,
            cargo: unit.cargo.to_string(),
            destination: unit.destination.to_string(),
            last_update: now,
            path: vec![[unit.lat, unit.lng]],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_fleet_shape() {
        let fleet = seed_fleet();
        assert_eq!(fleet.len(), 3);
        assert!(fleet.iter().all(|v| v.path == vec![v.position()]));
        assert!(fleet.iter().all(|v| v.store_id.is_none()));
        assert_eq!(fleet[2].status, VehicleStatus::Emergency);
    }
}
