//! Motor de simulación local
//!
//! Mientras no hay enlace con el store, mueve los vehículos con un paseo
//! aleatorio y consume batería. Es un efecto visual, no un modelo físico:
//! solo se garantizan los límites de velocidad, batería e historial.
//! El heartbeat genera logs sintéticos y nunca toca los vehículos.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{LogEntry, Severity, SyncMode, Vehicle};
use crate::services::fleet_state::SharedFleetState;

const HEARTBEAT_MESSAGES: [&str; 4] = [
    "Telemetry heartbeat received",
    "Encrypted uplink verified",
    "Geo-fence check passed",
    "Driver session token refreshed",
];

#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    /// Desplazamiento máximo por tick en grados
    pub position_jitter: f64,
    pub speed_jitter: f64,
    pub max_speed: f64,
    /// Porcentaje de batería consumido por tick
    pub battery_drain: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            position_jitter: 0.0015,
            speed_jitter: 5.0,
            max_speed: 80.0,
            battery_drain: 0.05,
        }
    }
}

/// Avanzar un vehículo un tick de simulación
pub fn advance_vehicle<R: Rng + ?Sized>(vehicle: &mut Vehicle, config: &SimulationConfig, rng: &mut R) {
    let jitter = config.position_jitter;
    let lat = vehicle.lat + rng.gen_range(-jitter..=jitter);
    let lng = vehicle.lng + rng.gen_range(-jitter..=jitter);

    let speed_delta = rng.gen_range(-config.speed_jitter..=config.speed_jitter);
    vehicle.speed = (vehicle.speed + speed_delta).clamp(0.0, config.max_speed);

    // La batería nunca se recarga en simulación
    vehicle.battery = (vehicle.battery.min(100.0) - config.battery_drain).max(0.0);

    vehicle.move_to(lat, lng);
}

pub fn advance_fleet<R: Rng + ?Sized>(vehicles: &mut [Vehicle], config: &SimulationConfig, rng: &mut R) {
    for vehicle in vehicles.iter_mut() {
        advance_vehicle(vehicle, config, rng);
    }
}

/// Log sintético para un vehículo elegido al azar
pub fn heartbeat_entry<R: Rng + ?Sized>(vehicles: &[Vehicle], rng: &mut R) -> Option<LogEntry> {
    let vehicle = vehicles.choose(rng)?;
    let message = HEARTBEAT_MESSAGES.choose(rng).copied().unwrap_or(HEARTBEAT_MESSAGES[0]);
    Some(LogEntry::new(vehicle.reg_number.as_str(), message, Severity::Info))
}

pub struct SimulationService {
    state: SharedFleetState,
    config: SimulationConfig,
    heartbeat_in_connected_mode: bool,
}

impl SimulationService {
    pub fn new(state: SharedFleetState, config: SimulationConfig, heartbeat_in_connected_mode: bool) -> Self {
        Self {
            state,
            config,
            heartbeat_in_connected_mode,
        }
    }

    /// Tick de simulación; devuelve cuántos vehículos se movieron
    pub async fn tick(&self) -> usize {
        let mut state = self.state.write().await;
        if state.mode() == SyncMode::Connected {
            return 0;
        }

        let vehicles = state.vehicles_mut();
        advance_fleet(vehicles, &self.config, &mut rand::thread_rng());
        vehicles.len()
    }

    /// Tick de heartbeat; devuelve el log generado, si hubo
    pub async fn heartbeat(&self) -> Option<LogEntry> {
        let mut state = self.state.write().await;
        if state.mode() == SyncMode::Connected && !self.heartbeat_in_connected_mode {
            return None;
        }

        let entry = heartbeat_entry(state.vehicles(), &mut rand::thread_rng())?;
        state.prepend_log(entry.clone());
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VehicleStatus, PATH_HISTORY_LIMIT};
    use crate::services::fleet_state::{bootstrap_vehicle, FleetState};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fleet() -> Vec<Vehicle> {
        let mut slow = bootstrap_vehicle();
        slow.id = "sim_2".to_string();
        slow.speed = 0.0;
        slow.battery = 0.2;

        let mut fast = bootstrap_vehicle();
        fast.id = "sim_3".to_string();
        fast.speed = 80.0;
        fast.battery = 100.0;

        vec![bootstrap_vehicle(), slow, fast]
    }

    #[test]
    fn test_simulation_invariants_hold_over_many_ticks() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = SimulationConfig::default();
        let mut vehicles = fleet();

        for _ in 0..200 {
            let before: Vec<f64> = vehicles.iter().map(|v| v.battery).collect();
            advance_fleet(&mut vehicles, &config, &mut rng);

            for (vehicle, previous) in vehicles.iter().zip(before) {
                assert!(vehicle.battery >= 0.0 && vehicle.battery <= 100.0);
                assert!(vehicle.battery <= previous);
                assert!(vehicle.speed >= 0.0 && vehicle.speed <= 80.0);
                assert!(vehicle.path.len() <= PATH_HISTORY_LIMIT);
                assert_eq!(vehicle.path.last().copied(), Some([vehicle.lat, vehicle.lng]));
            }
        }

        // La unidad con 0.2% se agota y queda en cero
        assert_eq!(vehicles[1].battery, 0.0);
    }

    #[test]
    fn test_position_moves_within_jitter() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = SimulationConfig::default();
        let mut vehicle = bootstrap_vehicle();
        let (lat, lng) = (vehicle.lat, vehicle.lng);

        advance_vehicle(&mut vehicle, &config, &mut rng);

        assert!((vehicle.lat - lat).abs() <= config.position_jitter);
        assert!((vehicle.lng - lng).abs() <= config.position_jitter);
        assert_eq!(vehicle.path.len(), 2);
        assert_eq!(vehicle.status, VehicleStatus::Active);
    }

    #[test]
    fn test_heartbeat_entry_references_fleet_vehicle() {
        let mut rng = StdRng::seed_from_u64(3);
        let vehicles = fleet();
        let entry = heartbeat_entry(&vehicles, &mut rng).unwrap();
        assert_eq!(entry.severity, Severity::Info);
        assert!(vehicles.iter().any(|v| v.reg_number == entry.vehicle_id));
        assert!(heartbeat_entry(&[], &mut rng).is_none());
    }

    #[tokio::test]
    async fn test_tick_does_not_run_while_connected() {
        let state = FleetState::new(fleet()).shared();
        state.write().await.set_mode(SyncMode::Connected);
        let before = state.read().await.vehicles().to_vec();

        let service = SimulationService::new(state.clone(), SimulationConfig::default(), true);
        assert_eq!(service.tick().await, 0);
        assert_eq!(state.read().await.vehicles(), before.as_slice());
    }

    #[tokio::test]
    async fn test_tick_advances_when_simulated() {
        let state = FleetState::new(fleet()).shared();
        let service = SimulationService::new(state.clone(), SimulationConfig::default(), true);

        assert_eq!(service.tick().await, 3);
        let s = state.read().await;
        assert!(s.vehicles().iter().all(|v| v.path.len() == 2));
    }

    #[tokio::test]
    async fn test_heartbeat_does_not_mutate_vehicles() {
        let state = FleetState::new(fleet()).shared();
        let before = state.read().await.vehicles().to_vec();
        let service = SimulationService::new(state.clone(), SimulationConfig::default(), true);

        let entry = service.heartbeat().await.unwrap();

        let s = state.read().await;
        assert_eq!(s.vehicles(), before.as_slice());
        assert_eq!(s.log_count(), 1);
        assert_eq!(s.logs().next().map(|l| l.id.clone()), Some(entry.id));
    }

    #[tokio::test]
    async fn test_heartbeat_mode_gate() {
        let state = FleetState::new(fleet()).shared();
        state.write().await.set_mode(SyncMode::Connected);

        let gated = SimulationService::new(state.clone(), SimulationConfig::default(), false);
        assert!(gated.heartbeat().await.is_none());

        let always = SimulationService::new(state.clone(), SimulationConfig::default(), true);
        assert!(always.heartbeat().await.is_some());
    }
}
