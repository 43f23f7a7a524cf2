pub mod alert;
pub mod config;
pub mod curve;
pub mod engine;
pub mod lander;
pub mod memory;
pub mod plane;
pub mod telemetry;

pub use alert::{
    AlertArbitrator, AlertEvent, AlertKind, AlertRequest, DEBOUNCE_SECS, PLAYBACK_SECS,
};
pub use config::{GpwsConfig, LanderConfig, PlaneConfig, UnitOfAltitude, M_TO_FT, NM_TO_M};
pub use curve::Curve;
pub use engine::{FlightPhase, Gpws, TickReport};
pub use lander::LanderGpws;
pub use memory::{AltitudeRing, VehicleMemory};
pub use plane::{PlaneCurves, PlaneGpws};
pub use telemetry::{FlightSample, FlightState, TrafficTarget, VehicleClass};
