//! Alert kinds, events and the arbitrator.
//!
//! Mode evaluators decide *eligibility* (family suppression via
//! [`AlertArbitrator::is_active`] / [`AlertArbitrator::was_active`]);
//! the arbitrator decides *timing* (retrigger debounce, one-shot
//! playback window) and is the only component that mutates the active
//! alert. Keeping suppression split across the two layers preserves the
//! observable alert sequences of the reference behavior.

use serde::{Deserialize, Serialize};

/// Minimum time between accepted alert (re)triggers, seconds.
///
/// Models audio-engine settle time and stops chatter when a threshold is
/// crossed repeatedly in noisy telemetry.
pub const DEBOUNCE_SECS: f32 = 0.3;

/// Nominal one-shot playback window, seconds. The audio collaborator
/// owns the real clip lengths; the arbitrator only needs a notion of
/// "still sounding" for idle upkeep and retrigger rejection.
pub const PLAYBACK_SECS: f32 = 1.0;

/// Closed set of alert kinds.
///
/// Declaration order is the total priority order: the lowest ordinal is
/// the highest priority. `None` and `Unavailable` are sentinels, not
/// requestable alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    SinkRatePullUp,
    SinkRate,
    TerrainPullUp,
    Terrain,
    DontSink,
    TooLowTerrain,
    TooLowGear,
    TooLowFlaps,
    Retard,
    AltitudeCallout,
    BankAngle,
    Traffic,
    HorizontalSpeed,
    Stall,
    V1,
    Rotate,
    GearUp,
    None,
    Unavailable,
}

/// One transition of the active alert, exposed to the audio collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    /// Qualifier for kinds that need one, e.g. the crossed threshold for
    /// an altitude callout or `"silence"` for a state-only continuation.
    #[serde(default)]
    pub detail: Option<String>,
    /// Mission time of the transition, seconds.
    pub time: f32,
}

/// Owns the currently active alert and its trigger timing.
#[derive(Debug, Clone)]
pub struct AlertArbitrator {
    active: AlertKind,
    /// Last kind that actually reached audible output. Survives idle and
    /// unavailable transitions.
    last_played: AlertKind,
    last_detail: Option<String>,
    last_trigger_time: f32,
    events: Vec<AlertEvent>,
}

impl AlertArbitrator {
    pub fn new() -> Self {
        Self {
            active: AlertKind::None,
            last_played: AlertKind::None,
            last_detail: None,
            last_trigger_time: f32::NEG_INFINITY,
            events: Vec::new(),
        }
    }

    pub fn active(&self) -> AlertKind {
        self.active
    }

    /// True while `kind` is the currently active alert.
    pub fn is_active(&self, kind: AlertKind) -> bool {
        self.active == kind
    }

    /// True when `kind` is active now or was the last thing played.
    pub fn was_active(&self, kind: AlertKind) -> bool {
        self.active == kind || self.last_played == kind
    }

    /// True while the last accepted one-shot is still inside its nominal
    /// playback window.
    pub fn is_sounding(&self, now: f32) -> bool {
        self.active != AlertKind::None
            && self.active != AlertKind::Unavailable
            && now - self.last_trigger_time < PLAYBACK_SECS
    }

    /// True while `kind` is active and still sounding.
    pub fn is_playing(&self, kind: AlertKind, now: f32) -> bool {
        self.active == kind && self.is_sounding(now)
    }

    /// Request audible output for `kind`.
    ///
    /// Returns true when the request reaches audible output. Requests
    /// inside the debounce window are dropped with no state change, as
    /// are retriggers of the identical kind while it is still sounding.
    pub fn request(&mut self, kind: AlertKind, detail: Option<&str>, now: f32) -> bool {
        debug_assert!(kind != AlertKind::None && kind != AlertKind::Unavailable);

        if now - self.last_trigger_time < DEBOUNCE_SECS {
            return false;
        }
        if kind == self.active && self.is_sounding(now) {
            return false;
        }

        let detail = detail.map(str::to_owned);
        if kind != self.active || detail != self.last_detail {
            self.events.push(AlertEvent {
                kind,
                detail: detail.clone(),
                time: now,
            });
        }
        tracing::debug!(?kind, detail = detail.as_deref(), time = now, "alert");

        self.active = kind;
        self.last_played = kind;
        self.last_detail = detail;
        self.last_trigger_time = now;
        true
    }

    /// Force the active kind to `Unavailable` (system disabled or out of
    /// the operating envelope). Does not consume the debounce window.
    pub fn mark_unavailable(&mut self, now: f32) {
        if self.active != AlertKind::Unavailable {
            self.active = AlertKind::Unavailable;
            self.last_detail = None;
            self.events.push(AlertEvent {
                kind: AlertKind::Unavailable,
                detail: None,
                time: now,
            });
        }
    }

    /// Clear to `None`, but only when nothing is currently sounding.
    /// Idempotent: clearing an already-idle arbitrator emits nothing.
    pub fn mark_idle(&mut self, now: f32) {
        if self.active == AlertKind::None || self.is_sounding(now) {
            return;
        }
        self.active = AlertKind::None;
        self.last_detail = None;
        self.events.push(AlertEvent {
            kind: AlertKind::None,
            detail: None,
            time: now,
        });
    }

    /// Drain the queued transition events for the audio collaborator.
    pub fn take_events(&mut self) -> Vec<AlertEvent> {
        std::mem::take(&mut self.events)
    }

    /// Full reset, as on vehicle change.
    pub fn reset(&mut self) {
        self.active = AlertKind::None;
        self.last_played = AlertKind::None;
        self.last_detail = None;
        self.last_trigger_time = f32::NEG_INFINITY;
        self.events.clear();
    }
}

impl Default for AlertArbitrator {
    fn default() -> Self {
        Self::new()
    }
}

/// A mode evaluator's candidate alert for the current tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRequest {
    pub kind: AlertKind,
    pub detail: Option<String>,
}

impl AlertRequest {
    pub fn new(kind: AlertKind) -> Self {
        Self { kind, detail: None }
    }

    pub fn with_detail(kind: AlertKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }
}

/// Family members whose audible output suppresses a request for `kind`.
///
/// Caller-side knowledge: mode evaluators consult this before asking the
/// arbitrator, which itself never re-derives priority. Same-kind
/// retriggers are already rejected by [`AlertArbitrator::request`].
pub fn suppressors(kind: AlertKind) -> &'static [AlertKind] {
    use AlertKind::*;
    match kind {
        SinkRate => &[SinkRatePullUp],
        SinkRatePullUp => &[SinkRate],
        Terrain => &[SinkRate, SinkRatePullUp, TerrainPullUp],
        TerrainPullUp => &[SinkRate, SinkRatePullUp],
        DontSink => &[SinkRate, SinkRatePullUp, Terrain, TerrainPullUp],
        TooLowGear => &[TooLowTerrain, TooLowFlaps],
        TooLowTerrain => &[TooLowGear, TooLowFlaps],
        TooLowFlaps => &[TooLowGear, TooLowTerrain],
        HorizontalSpeed => &[SinkRate, SinkRatePullUp],
        _ => &[],
    }
}

/// Apply family suppression, then hand the request to the arbitrator.
///
/// Returns true when the request reached audible output. A request whose
/// family is currently audible is dropped here without touching the
/// arbitrator's state; the hazard still claims the tick in the caller's
/// priority chain.
pub fn request_with_suppression(
    arb: &mut AlertArbitrator,
    req: &AlertRequest,
    now: f32,
) -> bool {
    if suppressors(req.kind)
        .iter()
        .any(|&k| arb.is_playing(k, now))
    {
        return false;
    }
    arb.request(req.kind, req.detail.as_deref(), now)
}
