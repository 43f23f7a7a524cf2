//! GPWS CLI - Command line tools for the warning engine.
//!
//! This crate provides the operator binaries:
//! - replay: run a recorded telemetry trace through the engine
//! - gen_trace: synthesize scenario traces for demos and testing

pub mod trace;

pub use trace::{read_trace, EventRecord, TraceError};
