//! Flight telemetry models.
//!
//! The host feeds the engine one [`FlightSample`] per simulation frame;
//! [`FlightState`] wraps the current sample together with the previous
//! tick's altitude-family fields, which several modes need to measure
//! rates over the last sampling interval rather than instantaneous
//! derivatives.

use serde::{Deserialize, Serialize};

/// Vehicle classification supplied by the telemetry provider.
///
/// Selects which mode set runs; `None` puts the system in the
/// unavailable state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Plane,
    Lander,
    #[default]
    None,
}

/// Another tracked vehicle in the same reference frame.
///
/// Distances and altitudes are always meters, independent of the
/// configured altitude unit; the traffic separation limits are converted
/// to meters at the comparison site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficTarget {
    pub id: String,
    /// Straight-line separation from the active vehicle, in meters.
    pub distance_m: f64,
    /// Barometric altitude, in meters.
    pub altitude_m: f64,
    #[serde(default)]
    pub airborne: bool,
}

fn default_true() -> bool {
    true
}

fn default_gravity() -> f32 {
    9.81
}

/// One telemetry snapshot, as delivered by the host once per frame.
///
/// Altitude-family fields arrive already converted to the configured
/// altitude unit (the provider owns the meters-to-feet conversion);
/// speeds are m/s and angles degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSample {
    pub vehicle_id: String,
    #[serde(default)]
    pub class: VehicleClass,
    /// Elapsed mission time, seconds. Monotonically non-decreasing.
    pub time: f32,
    /// Height above the terrain directly below, in the configured unit.
    pub radar_altitude: f32,
    /// Barometric altitude, in the configured unit.
    pub altitude: f32,
    #[serde(default)]
    pub hor_speed: f32,
    #[serde(default)]
    pub ver_speed: f32,
    #[serde(default)]
    pub gear_deployed: bool,
    /// False when the vehicle carries no landing gear at all, which makes
    /// the fixed-wing system unavailable.
    #[serde(default = "default_true")]
    pub has_landing_gear: bool,
    #[serde(default)]
    pub landed_or_splashed: bool,
    #[serde(default = "default_true")]
    pub in_atmosphere: bool,
    /// Main throttle, [0, 1].
    #[serde(default)]
    pub throttle: f32,
    /// Bank angle magnitude, degrees.
    #[serde(default)]
    pub bank_angle: f32,
    /// Angle of attack, degrees, signed.
    #[serde(default)]
    pub aoa: f32,
    /// Vehicle mass in kg. Only read by the lander controller.
    #[serde(default)]
    pub mass: f32,
    /// Maximum available thrust in N. Only read by the lander controller.
    #[serde(default)]
    pub max_thrust: f32,
    /// Local gravitational acceleration, m/s².
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default)]
    pub traffic: Vec<TrafficTarget>,
}

/// Current sample plus the previous tick's retained fields.
#[derive(Debug, Clone)]
pub struct FlightState {
    pub sample: FlightSample,
    /// sqrt(hor_speed² + ver_speed²), m/s.
    pub speed: f32,
    pub last_radar_altitude: f32,
    pub last_altitude: f32,
    pub last_hor_speed: f32,
    pub last_ver_speed: f32,
    pub last_time: f32,
}

impl FlightState {
    pub fn new() -> Self {
        Self {
            sample: FlightSample {
                vehicle_id: String::new(),
                class: VehicleClass::None,
                time: 0.0,
                radar_altitude: 0.0,
                altitude: 0.0,
                hor_speed: 0.0,
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
            },
            speed: 0.0,
            last_radar_altitude: f32::INFINITY,
            last_altitude: f32::INFINITY,
            last_hor_speed: 0.0,
            last_ver_speed: 0.0,
            last_time: 0.0,
        }
    }

    /// Install the new tick's sample. The previous sample's
    /// altitude-family fields were already retained by [`Self::retire`].
    pub fn begin_tick(&mut self, sample: FlightSample) {
        self.speed = (sample.hor_speed * sample.hor_speed
            + sample.ver_speed * sample.ver_speed)
            .sqrt();
        self.sample = sample;
    }

    /// Save the current tick's fields as "last" values. Runs after mode
    /// evaluation, mirroring the end-of-frame save in the host loop.
    pub fn retire(&mut self) {
        self.last_radar_altitude = self.sample.radar_altitude;
        self.last_altitude = self.sample.altitude;
        self.last_hor_speed = self.sample.hor_speed;
        self.last_ver_speed = self.sample.ver_speed;
        self.last_time = self.sample.time;
    }

    /// Reset the retained previous-tick fields, as on vehicle change.
    pub fn clear_history(&mut self) {
        self.last_radar_altitude = f32::INFINITY;
        self.last_altitude = f32::INFINITY;
        self.last_hor_speed = 0.0;
        self.last_ver_speed = 0.0;
        self.last_time = self.sample.time;
    }

    /// Time since the previous sample, or `None` when the two samples
    /// share a timestamp (no new information, never a division).
    pub fn dt(&self) -> Option<f32> {
        let dt = self.sample.time - self.last_time;
        (dt > 0.0).then_some(dt)
    }

    /// Barometric sink rate over the previous interval, in
    /// altitude-units per minute, positive while descending.
    ///
    /// `None` when not descending, on the first tick, or on a degenerate
    /// time delta.
    pub fn baro_sink_rate(&self) -> Option<f32> {
        if !self.last_altitude.is_finite() {
            return None;
        }
        let loss = self.last_altitude - self.sample.altitude;
        if loss <= 0.0 {
            return None;
        }
        self.dt().map(|dt| loss / dt * 60.0)
    }

    /// True when radar altitude decreased since the previous sample.
    pub fn radar_descending(&self) -> bool {
        self.last_radar_altitude.is_finite()
            && self.sample.radar_altitude < self.last_radar_altitude
    }

    /// True when radar altitude crossed downward through `threshold`
    /// during the last interval.
    pub fn descending_through(&self, threshold: f32) -> bool {
        self.last_radar_altitude.is_finite()
            && self.last_radar_altitude > threshold
            && self.sample.radar_altitude < threshold
    }
}

impl Default for FlightState {
    fn default() -> Self {
        Self::new()
    }
}
