//! Fixed-wing mode evaluators.
//!
//! Each mode is a pure function of the flight state plus the per-vehicle
//! memory, returning the candidate alert for this tick. The controller
//! runs them in a fixed priority order and short-circuits on the first
//! hit, so at most one mode claims the audible slot per tick; stall and
//! gear-up checks run outside that chain every tick.

use crate::alert::{request_with_suppression, AlertArbitrator, AlertKind, AlertRequest};
use crate::config::{PlaneConfig, UnitOfAltitude, M_TO_FT, NM_TO_M};
use crate::curve::Curve;
use crate::memory::VehicleMemory;
use crate::telemetry::FlightState;

/// Fixed-wing threshold curves. Control points are tuned in feet.
#[derive(Debug, Clone)]
pub struct PlaneCurves {
    /// (radar altitude, baro sink rate ft/min) for the SinkRate warning.
    pub sink_rate: Curve,
    /// Tighter companion for the SinkRatePullUp warning.
    pub sink_rate_pull_up: Curve,
    /// (radar altitude, closure rate ft/min), cruise regime.
    pub terrain: Curve,
    pub terrain_pull_up: Curve,
    /// Approach-regime terrain curves (gear down or slow).
    pub terrain_b: Curve,
    pub terrain_pull_up_b: Curve,
    /// (peak altitude since takeoff, allowed altitude loss).
    pub dont_sink: Curve,
    /// (speed / landing speed, gate scale) for TooLowTerrain.
    pub too_low_terrain: Curve,
    /// (radar altitude, bank angle limit in degrees).
    pub bank_angle: Curve,
}

impl Default for PlaneCurves {
    fn default() -> Self {
        Self {
            sink_rate: Curve::from_points(&[(50.0, -1000.0), (2500.0, -5000.0)]),
            sink_rate_pull_up: Curve::from_points(&[
                (50.0, -1500.0),
                (100.0, -1600.0),
                (2500.0, -7000.0),
            ]),
            terrain: Curve::from_points(&[
                (0.0, -4000.0),
                (1400.0, -4600.0),
                (1900.0, -7500.0),
                (2100.0, -10000.0),
            ]),
            terrain_pull_up: Curve::from_points(&[
                (0.0, -1500.0),
                (1200.0, -3400.0),
                (1350.0, -4000.0),
                (1600.0, -6000.0),
            ]),
            terrain_b: Curve::from_points(&[(0.0, -2000.0), (800.0, -2900.0)]),
            terrain_pull_up_b: Curve::from_points(&[(0.0, -2400.0), (750.0, -3100.0)]),
            dont_sink: Curve::from_points(&[(0.0, -0.1), (1500.0, -150.0)]),
            too_low_terrain: Curve::from_points(&[(0.0, 1.0), (1.2, 1.0), (1.5, 2.0)]),
            bank_angle: Curve::from_points(&[
                (5.0, 10.0),
                (30.0, 10.0),
                (150.0, 40.0),
                (2450.0, 55.0),
            ]),
        }
    }
}

/// Fixed-wing controller: configuration, curves and the mode chain.
#[derive(Debug, Clone)]
pub struct PlaneGpws {
    pub cfg: PlaneConfig,
    curves: PlaneCurves,
}

impl PlaneGpws {
    pub fn new(cfg: PlaneConfig) -> Self {
        Self {
            cfg,
            curves: PlaneCurves::default(),
        }
    }

    /// Per-tick upkeep that runs before any phase logic: feed the
    /// smoothing ring and drop the takeoff peak while on the surface.
    pub fn pre_update(&self, state: &FlightState, mem: &mut VehicleMemory) {
        if state.sample.landed_or_splashed {
            mem.peak_radar_altitude_since_takeoff = 0.0;
        }
        mem.radar_history
            .record(state.sample.radar_altitude, state.sample.time);
    }

    /// Taxi-phase checks: decision-speed and rotation callouts on the
    /// takeoff roll.
    pub fn run_taxi(&self, state: &FlightState, arb: &mut AlertArbitrator) {
        let now = state.sample.time;
        if let Some(req) = self.check_takeoff_speeds(state) {
            request_with_suppression(arb, &req, now);
        }
    }

    /// Full airborne mode chain. Returns the stall haptic intensity when
    /// the stall check fires with shake enabled.
    pub fn run_flying(
        &self,
        state: &FlightState,
        mem: &mut VehicleMemory,
        arb: &mut AlertArbitrator,
    ) -> Option<f32> {
        let now = state.sample.time;

        // Priority chain: the first hazard to report claims the audible
        // slot for this tick, whether or not family suppression lets the
        // request through.
        let claimed = self
            .check_descent_rate(state)
            .or_else(|| self.check_terrain_closure(state, mem, arb))
            .or_else(|| self.check_altitude_loss(state, mem))
            .or_else(|| self.check_terrain_clearance(state, mem))
            .or_else(|| self.check_traffic(state))
            .or_else(|| self.check_advisory(state, mem));
        if let Some(req) = claimed {
            request_with_suppression(arb, &req, now);
        }

        // Stall and gear-up are evaluated every tick, independent of the
        // chain above.
        let mut stall_intensity = None;
        if let Some((req, intensity)) = self.check_stall(state) {
            request_with_suppression(arb, &req, now);
            stall_intensity = intensity;
        }
        if let Some(req) = self.check_gear_up(state, mem) {
            request_with_suppression(arb, &req, now);
        }
        stall_intensity
    }

    /// Mode 1 — excessive descent rate (SinkRate / SinkRatePullUp).
    ///
    /// A plain SinkRate hit short-circuits the chain exactly like the
    /// pull-up variant; lower-priority modes never also fire that tick.
    fn check_descent_rate(&self, state: &FlightState) -> Option<AlertRequest> {
        if !self.cfg.enable_descent_rate || state.sample.altitude >= 2500.0 {
            return None;
        }
        let sink = state.baro_sink_rate()?;
        let ra = state.sample.radar_altitude;

        let pull_up_limit =
            self.curves.sink_rate_pull_up.evaluate(ra).abs() * self.cfg.descent_rate_factor;
        if sink > pull_up_limit {
            return Some(AlertRequest::new(AlertKind::SinkRatePullUp));
        }
        let sink_limit = self.curves.sink_rate.evaluate(ra).abs() * self.cfg.descent_rate_factor;
        if sink > sink_limit {
            return Some(AlertRequest::new(AlertKind::SinkRate));
        }
        None
    }

    /// Mode 2 — excessive closure to terrain (Terrain / TerrainPullUp).
    ///
    /// Regime B (gear down, long past takeoff, or slow) uses the tight
    /// low-altitude curves; regime A uses the looser cruise curves and
    /// keeps a logically-in-force warning alive with a near-silent
    /// continuation while the vehicle stays inside the altitude gate.
    fn check_terrain_closure(
        &self,
        state: &FlightState,
        mem: &mut VehicleMemory,
        arb: &mut AlertArbitrator,
    ) -> Option<AlertRequest> {
        if !self.cfg.enable_closure_to_terrain {
            return None;
        }
        let now = state.sample.time;
        let ra = state.sample.radar_altitude;
        let factor = self.cfg.descent_rate_factor;
        // Smoothed closure rate in altitude-units per minute; zero until
        // the ring has two full windows.
        let rate = mem
            .radar_history
            .smoothed_rate()
            .map_or(0.0, |rate| rate.abs() * 60.0);

        let approach_regime = state.sample.gear_deployed
            || mem.time_since_takeoff(now) > 30.0
            || state.speed < self.cfg.landing_speed * 1.2;

        if approach_regime {
            if ra < 800.0 && state.radar_descending() {
                if rate > self.curves.terrain_pull_up_b.evaluate(ra).abs() * factor {
                    return Some(AlertRequest::new(AlertKind::TerrainPullUp));
                }
                if rate > self.curves.terrain_b.evaluate(ra).abs() * factor {
                    return Some(AlertRequest::new(AlertKind::Terrain));
                }
            }
        } else if ra < 2200.0 && state.radar_descending() {
            if rate > self.curves.terrain_pull_up.evaluate(ra).abs() * factor {
                mem.exit_closure_warning = false;
                return Some(AlertRequest::new(AlertKind::TerrainPullUp));
            }
            if rate > self.curves.terrain.evaluate(ra).abs() * factor {
                mem.exit_closure_warning = false;
                return Some(AlertRequest::new(AlertKind::Terrain));
            }
            // Still inside the gate and not alerting: if a terrain
            // warning was the last thing played and nothing is audible,
            // keep the warning state alive without re-sounding it. Does
            // not claim the tick.
            if !arb.is_sounding(now)
                && !mem.exit_closure_warning
                && (arb.was_active(AlertKind::Terrain)
                    || arb.was_active(AlertKind::TerrainPullUp))
            {
                arb.request(AlertKind::Terrain, Some("silence"), now);
            }
        } else {
            mem.exit_closure_warning = true;
        }
        None
    }

    /// Mode 3 — altitude loss after takeoff (DontSink).
    fn check_altitude_loss(
        &self,
        state: &FlightState,
        mem: &mut VehicleMemory,
    ) -> Option<AlertRequest> {
        if !self.cfg.enable_altitude_loss {
            return None;
        }
        let now = state.sample.time;
        if mem.time_since_takeoff(now) >= 15.0 || mem.peak_radar_altitude_since_takeoff >= 1500.0
        {
            return None;
        }
        let ra = state.sample.radar_altitude;
        if ra >= mem.peak_radar_altitude_since_takeoff {
            mem.peak_radar_altitude_since_takeoff = ra;
            return None;
        }
        let loss = mem.peak_radar_altitude_since_takeoff - ra;
        let allowed = self
            .curves
            .dont_sink
            .evaluate(mem.peak_radar_altitude_since_takeoff)
            .abs();
        (loss > allowed).then(|| AlertRequest::new(AlertKind::DontSink))
    }

    /// Mode 4 — unsafe terrain clearance (TooLowGear / TooLowTerrain).
    fn check_terrain_clearance(
        &self,
        state: &FlightState,
        mem: &VehicleMemory,
    ) -> Option<AlertRequest> {
        if !self.cfg.enable_terrain_clearance {
            return None;
        }
        let now = state.sample.time;
        // Time gate avoids false alarms right after liftoff.
        if state.sample.gear_deployed || mem.time_since_takeoff(now) <= 15.0 {
            return None;
        }
        let ra = state.sample.radar_altitude;
        if ra < self.cfg.too_low_gear_altitude && state.speed < self.cfg.landing_speed * 1.2 {
            return Some(AlertRequest::new(AlertKind::TooLowGear));
        }
        let gate = self
            .curves
            .too_low_terrain
            .evaluate(state.speed / self.cfg.landing_speed)
            * self.cfg.too_low_gear_altitude;
        (ra < gate).then(|| AlertRequest::new(AlertKind::TooLowTerrain))
    }

    /// Mode 5 — traffic advisory.
    ///
    /// First matching target wins; no ordering guarantee among
    /// simultaneous traffic.
    fn check_traffic(&self, state: &FlightState) -> Option<AlertRequest> {
        if !self.cfg.enable_traffic {
            return None;
        }
        let own_altitude = match self.cfg.unit {
            UnitOfAltitude::Foot => state.sample.altitude / M_TO_FT,
            UnitOfAltitude::Meter => state.sample.altitude,
        };
        let own_altitude_m = f64::from(own_altitude);
        for target in &state.sample.traffic {
            if !target.airborne {
                continue;
            }
            let vertical_m = (target.altitude_m - own_altitude_m).abs();
            let near = target.distance_m < 2.1 * NM_TO_M
                && vertical_m < 600.0 / f64::from(M_TO_FT);
            let far = target.distance_m < 3.3 * NM_TO_M
                && vertical_m < 850.0 / f64::from(M_TO_FT);
            if near || far {
                return Some(AlertRequest::new(AlertKind::Traffic));
            }
        }
        None
    }

    /// Mode 6 — advisory callouts: retard, altitude callouts, bank angle.
    fn check_advisory(&self, state: &FlightState, mem: &VehicleMemory) -> Option<AlertRequest> {
        let now = state.sample.time;
        let ra = state.sample.radar_altitude;

        if self.cfg.enable_retard
            && state.radar_descending()
            && ra < 15.0
            && state.sample.throttle > 0.0
            && mem.time_since_takeoff(now) > 5.0
        {
            return Some(AlertRequest::new(AlertKind::Retard));
        }

        if self.cfg.enable_altitude_callouts && state.radar_descending() && ra > 0.0 {
            for &threshold in &self.cfg.altitude_callouts {
                if state.descending_through(threshold as f32) {
                    return Some(AlertRequest::with_detail(
                        AlertKind::AltitudeCallout,
                        threshold.to_string(),
                    ));
                }
            }
        }

        if self.cfg.enable_bank_angle && ra > 5.0 && ra < 2450.0 {
            let limit = self.curves.bank_angle.evaluate(ra).abs();
            if state.sample.bank_angle > limit {
                return Some(AlertRequest::new(AlertKind::BankAngle));
            }
        }
        None
    }

    /// Stall check, outside the priority chain. Also produces the
    /// normalized haptic intensity for the haptics collaborator.
    fn check_stall(&self, state: &FlightState) -> Option<(AlertRequest, Option<f32>)> {
        if !self.cfg.enable_stall {
            return None;
        }
        let aoa = state.sample.aoa.abs();
        if aoa <= self.cfg.stall_aoa {
            return None;
        }
        let intensity = self.cfg.enable_stall_shake.then(|| {
            ((aoa - self.cfg.stall_aoa) / (90.0 - self.cfg.stall_aoa)).clamp(0.0, 1.0)
        });
        Some((AlertRequest::new(AlertKind::Stall), intensity))
    }

    /// Gear-up reminder, outside the priority chain: fires exactly when
    /// the tick interval crosses the 5 s post-takeoff mark while still
    /// climbing with the gear down.
    fn check_gear_up(&self, state: &FlightState, mem: &VehicleMemory) -> Option<AlertRequest> {
        if !self.cfg.enable_gear_up {
            return None;
        }
        const CHECK_AT_SECS: f32 = 5.0;
        let crossed = state.sample.time - mem.take_off_time > CHECK_AT_SECS
            && state.last_time - mem.take_off_time < CHECK_AT_SECS;
        (crossed && state.sample.gear_deployed && state.sample.ver_speed >= 0.0)
            .then(|| AlertRequest::new(AlertKind::GearUp))
    }

    /// Takeoff-roll speed callouts (V1, Rotate), taxi phase only.
    fn check_takeoff_speeds(&self, state: &FlightState) -> Option<AlertRequest> {
        if self.cfg.enable_v1
            && state.sample.hor_speed >= self.cfg.v1_speed
            && state.last_hor_speed < self.cfg.v1_speed
        {
            return Some(AlertRequest::new(AlertKind::V1));
        }
        if self.cfg.enable_rotate
            && state.sample.hor_speed >= self.cfg.take_off_speed
            && state.last_hor_speed < self.cfg.take_off_speed
        {
            return Some(AlertRequest::new(AlertKind::Rotate));
        }
        None
    }
}
