//! Per-vehicle temporal memory.
//!
//! Owned by the vehicle controller, handed by mutable reference into the
//! mode evaluators each tick, and reset in place when the active vehicle
//! changes so that stale takeoff times and altitude history never leak
//! across vehicles.

use std::collections::VecDeque;

/// Samples averaged per smoothing window.
const WINDOW: usize = 3;
/// Two windows: the older half and the newer half.
const CAPACITY: usize = WINDOW * 2;
/// Minimum age of the oldest retained sample before recording another.
const MIN_SPAN_SECS: f32 = 0.2;

/// Short ring of (radar altitude, time) pairs.
///
/// The terrain-closure mode derives its vertical speed from the averaged
/// older half versus the averaged newer half, which is far less noise
/// sensitive than a single-sample derivative.
#[derive(Debug, Clone, Default)]
pub struct AltitudeRing {
    samples: VecDeque<(f32, f32)>,
}

impl AltitudeRing {
    /// Record the tick's radar altitude. Samples are only appended once
    /// the ring spans enough time, and the ring never exceeds two
    /// windows.
    pub fn record(&mut self, radar_altitude: f32, time: f32) {
        let due = self
            .samples
            .front()
            .map_or(true, |&(_, t0)| time - t0 > MIN_SPAN_SECS);
        if due {
            self.samples.push_back((radar_altitude, time));
        }
        while self.samples.len() > CAPACITY {
            self.samples.pop_front();
        }
    }

    /// Smoothed vertical speed over the ring, altitude-units per second,
    /// negative while descending. `None` until both windows are full or
    /// when the windows span no time.
    pub fn smoothed_rate(&self) -> Option<f32> {
        if self.samples.len() < CAPACITY {
            return None;
        }
        let (mut h0, mut t0, mut hf, mut tf) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for i in 0..WINDOW {
            let (h_old, t_old) = self.samples[i];
            let (h_new, t_new) = self.samples[WINDOW + i];
            h0 += h_old;
            t0 += t_old;
            hf += h_new;
            tf += t_new;
        }
        let span = tf - t0;
        (span > 0.0).then(|| (hf - h0) / span)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Per-active-vehicle state that must survive across ticks.
#[derive(Debug, Clone)]
pub struct VehicleMemory {
    /// Pinned to "now" every tick spent on the ground, so that after
    /// liftoff it reads as the moment of takeoff.
    pub take_off_time: f32,
    /// Pinned to "now" every airborne tick, so that after touchdown it
    /// reads as the moment of landing.
    pub landing_time: f32,
    /// Running peak radar altitude since takeoff, for the
    /// altitude-loss-after-takeoff mode.
    pub peak_radar_altitude_since_takeoff: f32,
    /// Set once the vehicle climbs back out of the terrain-closure gate;
    /// clears the "warning logically still in force" continuation.
    pub exit_closure_warning: bool,
    pub radar_history: AltitudeRing,
}

impl VehicleMemory {
    pub fn new() -> Self {
        Self {
            take_off_time: f32::NEG_INFINITY,
            landing_time: f32::NEG_INFINITY,
            peak_radar_altitude_since_takeoff: 0.0,
            exit_closure_warning: false,
            radar_history: AltitudeRing::default(),
        }
    }

    /// Reset in place on vehicle change. The struct is reused, never
    /// reallocated.
    pub fn reset(&mut self) {
        self.take_off_time = f32::NEG_INFINITY;
        self.landing_time = f32::NEG_INFINITY;
        self.peak_radar_altitude_since_takeoff = 0.0;
        self.exit_closure_warning = false;
        self.radar_history.clear();
    }

    pub fn time_since_takeoff(&self, now: f32) -> f32 {
        now - self.take_off_time
    }
}

impl Default for VehicleMemory {
    fn default() -> Self {
        Self::new()
    }
}
