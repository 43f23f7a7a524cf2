//! Telemetry trace decoding and alert-event export records.
//!
//! A trace is JSON Lines: one [`FlightSample`] object per line, in
//! mission-time order. Blank lines and `#` comment lines are skipped so
//! hand-edited traces stay easy to annotate.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use gpws_core::{AlertEvent, FlightSample};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace file: {0}")]
    Io(#[from] std::io::Error),
    #[error("trace line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("trace is empty")]
    Empty,
    #[error("trace line {line}: time {time} runs backwards (previous {previous})")]
    TimeRegression { line: usize, time: f32, previous: f32 },
}

/// Read a JSONL telemetry trace.
///
/// Enforces the one invariant the engine relies on: mission time is
/// monotonically non-decreasing across the trace.
pub fn read_trace(path: &Path) -> Result<Vec<FlightSample>, TraceError> {
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();
    let mut previous_time = f32::NEG_INFINITY;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        let sample: FlightSample = serde_json::from_str(trimmed)
            .map_err(|source| TraceError::Decode { line: line_no, source })?;
        if sample.time < previous_time {
            return Err(TraceError::TimeRegression {
                line: line_no,
                time: sample.time,
                previous: previous_time,
            });
        }
        previous_time = sample.time;
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(TraceError::Empty);
    }
    Ok(samples)
}

/// One exported alert transition, stamped with the wall-clock time the
/// replay produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(flatten)]
    pub event: AlertEvent,
    pub generated_at: DateTime<Utc>,
}

impl EventRecord {
    pub fn new(event: AlertEvent) -> Self {
        Self {
            event,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("gpws-trace-{}-{}.jsonl", std::process::id(), name));
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_reads_samples_and_skips_comments() {
        let path = write_temp("comments", concat!(
            "# final approach\n",
            "\n",
            r#"{"vehicle_id":"A","class":"plane","time":1.0,"radar_altitude":500.0,"altitude":800.0}"#,
            "\n",
            r#"{"vehicle_id":"A","class":"plane","time":2.0,"radar_altitude":480.0,"altitude":780.0}"#,
            "\n",
        ));
        let samples = read_trace(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].time, 2.0);
    }

    #[test]
    fn test_rejects_backwards_time() {
        let path = write_temp("backwards", concat!(
            r#"{"vehicle_id":"A","class":"plane","time":5.0,"radar_altitude":500.0,"altitude":800.0}"#,
            "\n",
            r#"{"vehicle_id":"A","class":"plane","time":4.0,"radar_altitude":480.0,"altitude":780.0}"#,
            "\n",
        ));
        let err = read_trace(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, TraceError::TimeRegression { line: 2, .. }));
    }

    #[test]
    fn test_empty_trace_is_an_error() {
        let path = write_temp("empty", "# nothing here\n");
        let err = read_trace(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, TraceError::Empty));
    }
}
