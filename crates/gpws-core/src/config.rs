//! Per-vehicle-kind configuration.
//!
//! Supplied and persisted by the configuration collaborator; the engine
//! only reads it and assumes values arrive pre-clamped to legal ranges.
//! `clamp()` implements the legality rules for the provider's use.

use serde::{Deserialize, Serialize};

/// Feet per meter. Altitude thresholds are authored in feet; a provider
/// working in meters converts before calling the engine.
pub const M_TO_FT: f32 = 3.280_839_9;

/// Meters per nautical mile, used by the traffic separation limits.
pub const NM_TO_M: f64 = 1852.0;

/// Unit the altitude-family sample fields are expressed in.
///
/// Feet is recommended; the curve control points are tuned in feet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfAltitude {
    #[default]
    Foot,
    Meter,
}

/// Fixed-wing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    pub enable_system: bool,
    pub enable_descent_rate: bool,
    pub enable_closure_to_terrain: bool,
    pub enable_altitude_loss: bool,
    pub enable_terrain_clearance: bool,
    pub enable_altitude_callouts: bool,
    pub enable_retard: bool,
    pub enable_bank_angle: bool,
    pub enable_traffic: bool,
    pub enable_v1: bool,
    pub enable_rotate: bool,
    pub enable_gear_up: bool,
    pub enable_stall: bool,
    pub enable_stall_shake: bool,

    /// Scales every descent-rate threshold curve. Legal range [0.1, 10.0].
    pub descent_rate_factor: f32,
    /// Gate for the unsafe-terrain-clearance mode, in the configured unit.
    pub too_low_gear_altitude: f32,
    /// Decision speed for the V1 callout, m/s.
    pub v1_speed: f32,
    /// Rotation speed for the Rotate callout, m/s.
    pub take_off_speed: f32,
    /// Reference landing speed, m/s; several gates scale off it.
    pub landing_speed: f32,
    /// Stall warning angle of attack, degrees.
    pub stall_aoa: f32,
    /// Downward-crossing callout thresholds, in the configured unit.
    pub altitude_callouts: Vec<i32>,
    pub unit: UnitOfAltitude,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            enable_system: true,
            enable_descent_rate: true,
            enable_closure_to_terrain: true,
            enable_altitude_loss: true,
            enable_terrain_clearance: true,
            enable_altitude_callouts: true,
            enable_retard: true,
            enable_bank_angle: false,
            enable_traffic: true,
            enable_v1: false,
            enable_rotate: false,
            enable_gear_up: true,
            enable_stall: true,
            enable_stall_shake: true,

            descent_rate_factor: 1.0,
            too_low_gear_altitude: 500.0,
            v1_speed: 45.0,
            take_off_speed: 60.0,
            landing_speed: 60.0,
            stall_aoa: 20.0,
            altitude_callouts: vec![1000, 500, 400, 300, 200, 100, 50, 40, 30, 20, 10],
            unit: UnitOfAltitude::Foot,
        }
    }
}

impl PlaneConfig {
    /// Clamp numeric fields to their legal ranges. The configuration
    /// provider calls this before handing the config to the engine.
    pub fn clamp(&mut self) {
        self.descent_rate_factor = self.descent_rate_factor.clamp(0.1, 10.0);
    }
}

/// Vertical-lander configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanderConfig {
    pub enable_system: bool,
    pub enable_descent_rate: bool,
    pub enable_horizontal_speed: bool,
    pub enable_retard: bool,
    pub enable_altitude_callouts: bool,

    /// Intended touchdown sink rate, m/s. Sink below this never alerts.
    pub touchdown_speed: f32,
    /// Horizontal-speed checks only run below this radar altitude,
    /// in the configured unit.
    pub horizontal_speed_check_altitude: f32,
    /// Max horizontal speed = |vertical speed| * this factor.
    pub horizontal_speed_factor: f32,
    /// Margin applied to the thrust-arrestable sink rate. Legal range
    /// [1.0, 5.0]; higher warns earlier.
    pub descent_rate_safety_factor: f32,
    /// Radar altitude below which a still-open throttle calls retard,
    /// in the configured unit.
    pub retard_altitude: f32,
    pub altitude_callouts: Vec<i32>,
    pub unit: UnitOfAltitude,
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            enable_system: true,
            enable_descent_rate: true,
            enable_horizontal_speed: true,
            enable_retard: true,
            enable_altitude_callouts: true,

            touchdown_speed: 5.0,
            horizontal_speed_check_altitude: 300.0,
            horizontal_speed_factor: 1.0,
            descent_rate_safety_factor: 1.5,
            retard_altitude: 10.0,
            altitude_callouts: vec![1000, 500, 400, 300, 200, 100, 50, 40, 30, 20, 10],
            unit: UnitOfAltitude::Meter,
        }
    }
}

impl LanderConfig {
    pub fn clamp(&mut self) {
        self.descent_rate_safety_factor = self.descent_rate_safety_factor.clamp(1.0, 5.0);
        self.horizontal_speed_factor = self.horizontal_speed_factor.max(0.1);
    }
}

/// Complete engine configuration, one section per vehicle kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GpwsConfig {
    pub plane: PlaneConfig,
    pub lander: LanderConfig,
}

impl GpwsConfig {
    pub fn clamp(&mut self) {
        self.plane.clamp();
        self.lander.clamp();
    }
}
