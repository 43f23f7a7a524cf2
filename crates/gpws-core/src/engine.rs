//! Vehicle controller: availability gating, per-vehicle memory
//! lifecycle, the flight-phase machine, and dispatch into the
//! per-vehicle-kind mode chains.
//!
//! Single-threaded and tick-driven: the host calls [`Gpws::update`] once
//! per simulation frame and reads back the alert transitions. A tick
//! always runs to completion; nothing here blocks or yields.

use crate::alert::{AlertArbitrator, AlertEvent};
use crate::config::GpwsConfig;
use crate::lander::LanderGpws;
use crate::memory::VehicleMemory;
use crate::plane::PlaneGpws;
use crate::telemetry::{FlightSample, FlightState, VehicleClass};

/// Session warm-up during which everything reads unavailable, seconds.
const STARTUP_GRACE_SECS: f32 = 2.0;

/// Liftoff window with alerts suppressed, seconds.
const JUST_AIRBORNE_SECS: f32 = 1.5;

/// Time on the ground before touchdown handling gives way to taxi
/// checks, seconds.
const ROLLOUT_SECS: f32 = 5.0;

/// Where the active vehicle currently is in its flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    /// On the surface, long enough since touchdown for taxi checks.
    Grounded,
    /// First moments after liftoff; alert evaluation is suppressed to
    /// avoid liftoff-noise false positives.
    JustAirborne,
    /// Airborne with a valid radar altitude: the full mode chain runs.
    Flying,
    /// Just touched down; alerts clear and the landing time is held.
    Landed,
}

/// What one tick produced.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Active-alert transitions, in order, for the audio collaborator.
    pub events: Vec<AlertEvent>,
    /// Normalized stall-shake intensity for the haptics collaborator,
    /// present only while the stall check fires with shake enabled.
    pub stall_intensity: Option<f32>,
    pub phase: FlightPhase,
}

/// The ground proximity warning engine.
pub struct Gpws {
    plane: PlaneGpws,
    lander: LanderGpws,
    arbitrator: AlertArbitrator,
    state: FlightState,
    memory: VehicleMemory,
    phase: FlightPhase,
    active_vehicle: Option<String>,
    session_start: Option<f32>,
}

impl Gpws {
    pub fn new(config: GpwsConfig) -> Self {
        Self {
            plane: PlaneGpws::new(config.plane),
            lander: LanderGpws::new(config.lander),
            arbitrator: AlertArbitrator::new(),
            state: FlightState::new(),
            memory: VehicleMemory::new(),
            phase: FlightPhase::Grounded,
            active_vehicle: None,
            session_start: None,
        }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn arbitrator(&self) -> &AlertArbitrator {
        &self.arbitrator
    }

    /// Run one tick. Never fails: abnormal telemetry degrades to the
    /// unavailable state, not to an error.
    pub fn update(&mut self, sample: FlightSample) -> TickReport {
        self.state.begin_tick(sample);
        let now = self.state.sample.time;
        let session_elapsed = now - *self.session_start.get_or_insert(now);

        // A different vehicle became active: reset everything that could
        // leak across vehicles and sit out this tick.
        let vehicle_changed = self
            .active_vehicle
            .as_deref()
            .is_some_and(|id| id != self.state.sample.vehicle_id);
        if vehicle_changed || self.active_vehicle.is_none() {
            if vehicle_changed {
                tracing::info!(
                    from = self.active_vehicle.as_deref(),
                    to = %self.state.sample.vehicle_id,
                    "active vehicle changed, resetting memory"
                );
            }
            self.active_vehicle = Some(self.state.sample.vehicle_id.clone());
            self.memory.reset();
            self.state.clear_history();
            self.set_phase(FlightPhase::Grounded);
            if vehicle_changed {
                self.arbitrator.reset();
                self.arbitrator.mark_unavailable(now);
                return self.finish_tick(None);
            }
        }

        // Takeoff/landing clocks: pinned to now on the side of the
        // transition the vehicle is currently on.
        if self.state.sample.landed_or_splashed {
            self.memory.take_off_time = now;
        } else {
            self.memory.landing_time = now;
        }

        if !self.available(session_elapsed) {
            self.arbitrator.mark_unavailable(now);
            return self.finish_tick(None);
        }

        let phase = self.classify_phase(now);
        self.set_phase(phase);

        let stall_intensity = match self.state.sample.class {
            VehicleClass::Plane => self.run_plane(phase),
            VehicleClass::Lander => self.run_lander(phase),
            VehicleClass::None => None,
        };

        // Nothing claimed the audible slot and nothing is sounding:
        // the tick ends idle.
        self.arbitrator.mark_idle(now);
        self.finish_tick(stall_intensity)
    }

    fn run_plane(&mut self, phase: FlightPhase) -> Option<f32> {
        self.plane.pre_update(&self.state, &mut self.memory);
        match phase {
            FlightPhase::Grounded => {
                self.plane.run_taxi(&self.state, &mut self.arbitrator);
                None
            }
            FlightPhase::Flying if self.radar_altitude_valid() => {
                self.plane
                    .run_flying(&self.state, &mut self.memory, &mut self.arbitrator)
            }
            _ => None,
        }
    }

    fn run_lander(&mut self, phase: FlightPhase) -> Option<f32> {
        if phase == FlightPhase::Flying && self.radar_altitude_valid() {
            self.lander
                .run_flying(&self.state, &mut self.memory, &mut self.arbitrator);
        }
        None
    }

    fn radar_altitude_valid(&self) -> bool {
        let ra = self.state.sample.radar_altitude;
        ra > 0.0 && ra.is_finite()
    }

    /// Availability per the abnormal-condition policy: a normal,
    /// expected state, not a fault.
    fn available(&self, session_elapsed: f32) -> bool {
        let sample = &self.state.sample;
        if session_elapsed < STARTUP_GRACE_SECS {
            return false;
        }
        match sample.class {
            VehicleClass::None => false,
            VehicleClass::Plane => {
                self.plane.cfg.enable_system && sample.has_landing_gear && sample.in_atmosphere
            }
            VehicleClass::Lander => self.lander.cfg.enable_system,
        }
    }

    fn classify_phase(&self, now: f32) -> FlightPhase {
        if self.state.sample.landed_or_splashed {
            if now - self.memory.landing_time > ROLLOUT_SECS {
                FlightPhase::Grounded
            } else {
                FlightPhase::Landed
            }
        } else if now - self.memory.take_off_time < JUST_AIRBORNE_SECS {
            FlightPhase::JustAirborne
        } else {
            FlightPhase::Flying
        }
    }

    fn set_phase(&mut self, phase: FlightPhase) {
        if phase != self.phase {
            tracing::debug!(from = ?self.phase, to = ?phase, "flight phase");
            self.phase = phase;
        }
    }

    fn finish_tick(&mut self, stall_intensity: Option<f32>) -> TickReport {
        self.state.retire();
        TickReport {
            events: self.arbitrator.take_events(),
            stall_intensity,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertKind;
    use crate::telemetry::VehicleClass;

    fn sample(vehicle: &str, time: f32, radar: f32) -> FlightSample {
        FlightSample {
            vehicle_id: vehicle.into(),
            class: VehicleClass::Plane,
            time,
            radar_altitude: radar,
            altitude: radar,
            hor_speed: 100.0,
            ver_speed: 0.0,
            gear_deployed: false,
            has_landing_gear: true,
            landed_or_splashed: false,
            in_atmosphere: true,
            throttle: 0.0,
            bank_angle: 0.0,
            aoa: 0.0,
            mass: 0.0,
            max_thrust: 0.0,
            gravity: 9.81,
            traffic: Vec::new(),
        }
    }

    fn grounded(vehicle: &str, time: f32) -> FlightSample {
        let mut s = sample(vehicle, time, 0.0);
        s.landed_or_splashed = true;
        s
    }

    /// Drive the engine through the startup grace and a takeoff so that
    /// mode evaluation is live.
    fn engine_in_flight() -> (Gpws, f32) {
        let mut gpws = Gpws::new(GpwsConfig::default());
        for i in 0..8 {
            gpws.update(grounded("A", i as f32 * 0.5));
        }
        // Liftoff at t=4.0, climb past the just-airborne window.
        for i in 0..10 {
            let t = 4.0 + i as f32 * 0.5;
            gpws.update(sample("A", t, 100.0 + 50.0 * i as f32));
        }
        (gpws, 9.0)
    }

    #[test]
    fn test_startup_grace_reads_unavailable() {
        let mut gpws = Gpws::new(GpwsConfig::default());
        let report = gpws.update(sample("A", 0.0, 1000.0));
        assert_eq!(gpws.arbitrator().active(), AlertKind::Unavailable);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].kind, AlertKind::Unavailable);
    }

    #[test]
    fn test_no_vehicle_class_is_unavailable() {
        let mut gpws = Gpws::new(GpwsConfig::default());
        for i in 0..4 {
            let mut s = sample("A", i as f32, 1000.0);
            s.class = VehicleClass::None;
            gpws.update(s);
        }
        assert_eq!(gpws.arbitrator().active(), AlertKind::Unavailable);
    }

    #[test]
    fn test_plane_without_gear_is_unavailable() {
        let (mut gpws, now) = engine_in_flight();
        let mut s = sample("A", now + 1.0, 1000.0);
        s.has_landing_gear = false;
        gpws.update(s);
        assert_eq!(gpws.arbitrator().active(), AlertKind::Unavailable);
    }

    #[test]
    fn test_phase_progression_through_a_hop() {
        let mut gpws = Gpws::new(GpwsConfig::default());
        for i in 0..8 {
            gpws.update(grounded("A", i as f32 * 0.5));
        }
        assert_eq!(gpws.phase(), FlightPhase::Grounded);

        let report = gpws.update(sample("A", 4.2, 10.0));
        assert_eq!(report.phase, FlightPhase::JustAirborne);

        let report = gpws.update(sample("A", 6.5, 300.0));
        assert_eq!(report.phase, FlightPhase::Flying);

        let report = gpws.update(grounded("A", 7.0));
        assert_eq!(report.phase, FlightPhase::Landed);

        // Rollout complete: back to taxi checks.
        let mut t = 7.5;
        let mut last = report.phase;
        while t < 13.0 {
            last = gpws.update(grounded("A", t)).phase;
            t += 0.5;
        }
        assert_eq!(last, FlightPhase::Grounded);
    }

    #[test]
    fn test_vehicle_switch_resets_memory_before_modes_run() {
        let (mut gpws, now) = engine_in_flight();
        gpws.memory.peak_radar_altitude_since_takeoff = 1200.0;

        gpws.update(sample("B", now + 1.0, 500.0));
        assert_eq!(gpws.memory.peak_radar_altitude_since_takeoff, 0.0);
        assert_eq!(gpws.arbitrator().active(), AlertKind::Unavailable);
        assert_eq!(gpws.phase(), FlightPhase::Grounded);
    }

    #[test]
    fn test_sink_rate_fires_through_full_engine() {
        let (mut gpws, now) = engine_in_flight();
        // Settle level at RA 500 first, then lose 30 units in 1 s:
        // 1800 ft/min, above the interpolated 1734.7 threshold.
        gpws.update({
            let mut s = sample("A", now + 1.0, 500.0);
            s.altitude = 548.0;
            s
        });
        let report = gpws.update({
            let mut s = sample("A", now + 2.0, 500.0);
            s.altitude = 518.0;
            s
        });
        assert!(report
            .events
            .iter()
            .any(|e| e.kind == AlertKind::SinkRate));
    }

    #[test]
    fn test_touchdown_clears_to_idle() {
        let (mut gpws, now) = engine_in_flight();
        gpws.update({
            let mut s = sample("A", now + 1.0, 500.0);
            s.altitude = 548.0;
            s
        });
        gpws.update({
            let mut s = sample("A", now + 2.0, 500.0);
            s.altitude = 518.0;
            s
        });
        assert_eq!(gpws.arbitrator().active(), AlertKind::SinkRate);

        // Touch down and let the one-shot window expire.
        let report = gpws.update(grounded("A", now + 4.0));
        assert_eq!(report.phase, FlightPhase::Landed);
        assert_eq!(gpws.arbitrator().active(), AlertKind::None);
    }

    #[test]
    fn test_idle_tick_emits_no_events() {
        let (mut gpws, now) = engine_in_flight();
        let report = gpws.update(sample("A", now + 1.0, 2600.0));
        let report2 = gpws.update(sample("A", now + 2.0, 2600.0));
        // Steady cruise: no transitions after the initial ones settle.
        assert!(report2.events.is_empty(), "{:?} {:?}", report.events, report2.events);
    }
}
