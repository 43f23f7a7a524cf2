//! Vertical-lander mode evaluators.
//!
//! Smaller sibling of the fixed-wing chain, same priority discipline:
//! descent-rate-to-touchdown, horizontal speed versus altitude, throttle
//! retard, then altitude callouts.

use crate::alert::{request_with_suppression, AlertArbitrator, AlertKind, AlertRequest};
use crate::config::{LanderConfig, UnitOfAltitude, M_TO_FT};
use crate::memory::VehicleMemory;
use crate::telemetry::FlightState;

/// Horizontal drift below this is treated as touchdown creep, never
/// worth an alert, m/s.
const DRIFT_FLOOR_MPS: f32 = 1.0;

/// Vertical-lander controller.
#[derive(Debug, Clone)]
pub struct LanderGpws {
    pub cfg: LanderConfig,
}

impl LanderGpws {
    pub fn new(cfg: LanderConfig) -> Self {
        Self { cfg }
    }

    /// Radar altitude in meters, whatever unit the samples use. The
    /// arrest-capability law works in SI.
    fn radar_altitude_m(&self, state: &FlightState) -> f32 {
        match self.cfg.unit {
            UnitOfAltitude::Foot => state.sample.radar_altitude / M_TO_FT,
            UnitOfAltitude::Meter => state.sample.radar_altitude,
        }
    }

    /// Airborne mode chain.
    pub fn run_flying(
        &self,
        state: &FlightState,
        mem: &mut VehicleMemory,
        arb: &mut AlertArbitrator,
    ) {
        let now = state.sample.time;
        let claimed = self
            .check_descent_capability(state)
            .or_else(|| self.check_horizontal_speed(state))
            .or_else(|| self.check_retard(state, mem))
            .or_else(|| self.check_altitude_callouts(state));
        if let Some(req) = claimed {
            request_with_suppression(arb, &req, now);
        }
    }

    /// Whether the current deceleration capability can still arrest the
    /// sink rate before impact.
    ///
    /// Net upward acceleration at full thrust is `thrust/mass − g`; a
    /// sink rate `v` then needs `v² / 2a` of height to stop. PullUp when
    /// even the raw capability is insufficient, SinkRate when only the
    /// safety margin is gone.
    fn check_descent_capability(&self, state: &FlightState) -> Option<AlertRequest> {
        if !self.cfg.enable_descent_rate {
            return None;
        }
        let sink = -state.sample.ver_speed;
        if sink <= self.cfg.touchdown_speed {
            return None;
        }
        let radar_m = self.radar_altitude_m(state);

        let sample = &state.sample;
        if sample.mass <= 0.0 {
            return None;
        }
        let net_decel = sample.max_thrust / sample.mass - sample.gravity;
        if net_decel <= 0.0 {
            // Thrust cannot even cancel gravity: nothing arrests this.
            return Some(AlertRequest::new(AlertKind::SinkRatePullUp));
        }
        let stop_height = sink * sink / (2.0 * net_decel);
        if stop_height >= radar_m {
            return Some(AlertRequest::new(AlertKind::SinkRatePullUp));
        }
        if stop_height * self.cfg.descent_rate_safety_factor >= radar_m {
            return Some(AlertRequest::new(AlertKind::SinkRate));
        }
        None
    }

    /// Horizontal speed against the descent rate near the surface.
    fn check_horizontal_speed(&self, state: &FlightState) -> Option<AlertRequest> {
        if !self.cfg.enable_horizontal_speed {
            return None;
        }
        let sample = &state.sample;
        if sample.radar_altitude >= self.cfg.horizontal_speed_check_altitude
            || sample.ver_speed >= 0.0
            || sample.hor_speed <= DRIFT_FLOOR_MPS
        {
            return None;
        }
        let limit = sample.ver_speed.abs() * self.cfg.horizontal_speed_factor;
        (sample.hor_speed > limit).then(|| AlertRequest::new(AlertKind::HorizontalSpeed))
    }

    /// Throttle still open inside the touchdown gate.
    fn check_retard(&self, state: &FlightState, mem: &VehicleMemory) -> Option<AlertRequest> {
        if !self.cfg.enable_retard {
            return None;
        }
        let now = state.sample.time;
        (state.radar_descending()
            && state.sample.radar_altitude < self.cfg.retard_altitude
            && state.sample.throttle > 0.0
            && mem.time_since_takeoff(now) > 5.0)
            .then(|| AlertRequest::new(AlertKind::Retard))
    }

    fn check_altitude_callouts(&self, state: &FlightState) -> Option<AlertRequest> {
        if !self.cfg.enable_altitude_callouts
            || !state.radar_descending()
            || state.sample.radar_altitude <= 0.0
        {
            return None;
        }
        for &threshold in &self.cfg.altitude_callouts {
            if state.descending_through(threshold as f32) {
                return Some(AlertRequest::with_detail(
                    AlertKind::AltitudeCallout,
                    threshold.to_string(),
                ));
            }
        }
        None
    }
}
