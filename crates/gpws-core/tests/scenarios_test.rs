//! End-to-end tick scenarios against the full engine.
//!
//! Each test drives `Gpws` with a hand-built sample sequence and checks
//! the emitted alert transitions, the way the host application would
//! observe them.

use gpws_core::{
    AlertKind, FlightPhase, FlightSample, Gpws, GpwsConfig, TickReport, VehicleClass,
};

fn plane_sample(time: f32, radar: f32, baro: f32) -> FlightSample {
    FlightSample {
        vehicle_id: "KERBAL-1".into(),
        class: VehicleClass::Plane,
        time,
        radar_altitude: radar,
        altitude: baro,
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

fn lander_sample(time: f32, radar_m: f32, ver_speed: f32) -> FlightSample {
    FlightSample {
        vehicle_id: "MUN-LANDER".into(),
        class: VehicleClass::Lander,
        time,
        radar_altitude: radar_m,
        altitude: radar_m,
        hor_speed: 0.0,
        ver_speed,
        gear_deployed: true,
        has_landing_gear: true,
        landed_or_splashed: false,
        in_atmosphere: false,
        throttle: 0.8,
        bank_angle: 0.0,
        aoa: 0.0,
        mass: 10_000.0,
        max_thrust: 180_000.0,
        gravity: 1.63,
        traffic: Vec::new(),
    }
}

/// Ground run through the startup grace, then a climb to cruise.
fn airborne_engine(config: GpwsConfig) -> (Gpws, f32) {
    let mut gpws = Gpws::new(config);
    for i in 0..8 {
        let mut s = plane_sample(i as f32 * 0.5, 0.0, 0.0);
        s.landed_or_splashed = true;
        gpws.update(s);
    }
    for i in 0..10 {
        let t = 4.0 + i as f32 * 0.5;
        let alt = 100.0 + 50.0 * i as f32;
        gpws.update(plane_sample(t, alt, alt));
    }
    (gpws, 8.5)
}

fn kinds(report: &TickReport) -> Vec<AlertKind> {
    report.events.iter().map(|e| e.kind).collect()
}

#[test]
fn test_alert_events_never_overlap() {
    // Over an aggressive descent the active kind changes, but every
    // transition is a single kind; the engine never reports two alerts
    // active at once.
    let (mut gpws, start) = airborne_engine(GpwsConfig::default());
    let mut alt: f32 = 550.0;
    for i in 0..20 {
        let t = start + 1.0 + i as f32 * 0.5;
        alt -= 25.0;
        gpws.update(plane_sample(t, alt.max(10.0), alt.max(10.0)));
        let active = gpws.arbitrator().active();
        // `active` is one enum value by construction; assert it is a
        // meaningful one for an evaluated tick.
        assert_ne!(active, AlertKind::Unavailable);
    }
}

#[test]
fn test_debounce_suppresses_rapid_retriggers() {
    let (mut gpws, start) = airborne_engine(GpwsConfig::default());

    // Two different hazards 0.1 s apart: the second stays silent.
    let mut s = plane_sample(start + 1.0, 500.0, 548.0);
    s.hor_speed = 100.0;
    gpws.update(s);

    // Steep baro sink -> SinkRate.
    let report = gpws.update(plane_sample(start + 2.0, 500.0, 518.0));
    assert!(kinds(&report).contains(&AlertKind::SinkRate));

    // 0.1 s later a traffic target appears; inside the debounce window
    // nothing new may sound.
    let mut s = plane_sample(start + 2.1, 500.0, 517.0);
    s.traffic = vec![gpws_core::TrafficTarget {
        id: "OTHER".into(),
        distance_m: 1000.0,
        altitude_m: 160.0,
        airborne: true,
    }];
    let report = gpws.update(s);
    assert!(report.events.is_empty());
}

#[test]
fn test_altitude_callout_sequence_on_final() {
    let mut config = GpwsConfig::default();
    // Isolate the callout mode.
    config.plane.enable_descent_rate = false;
    config.plane.enable_closure_to_terrain = false;
    config.plane.enable_terrain_clearance = false;
    config.plane.enable_altitude_loss = false;
    let (mut gpws, start) = airborne_engine(config);

    // Descend through 500, 400, 300 one threshold per second.
    let mut heard = Vec::new();
    let profile = [(1.0, 520.0), (2.0, 480.0), (3.0, 390.0), (4.0, 290.0)];
    for (dt, radar) in profile {
        let report = gpws.update(plane_sample(start + dt, radar, 2600.0));
        for event in &report.events {
            if event.kind == AlertKind::AltitudeCallout {
                heard.push(event.detail.clone().unwrap());
            }
        }
    }
    assert_eq!(heard, vec!["500", "400", "300"]);
}

#[test]
fn test_unavailable_overrides_active_alert() {
    let (mut gpws, start) = airborne_engine(GpwsConfig::default());
    gpws.update(plane_sample(start + 1.0, 500.0, 548.0));
    gpws.update(plane_sample(start + 2.0, 500.0, 518.0));
    assert_eq!(gpws.arbitrator().active(), AlertKind::SinkRate);

    // Leaving the atmosphere mid-alert: unavailable immediately, no
    // debounce consideration.
    let mut s = plane_sample(start + 2.1, 500.0, 517.0);
    s.in_atmosphere = false;
    let report = gpws.update(s);
    assert_eq!(gpws.arbitrator().active(), AlertKind::Unavailable);
    assert_eq!(kinds(&report), vec![AlertKind::Unavailable]);
}

#[test]
fn test_vehicle_switch_produces_clean_slate() {
    let (mut gpws, start) = airborne_engine(GpwsConfig::default());
    gpws.update(plane_sample(start + 1.0, 500.0, 548.0));
    gpws.update(plane_sample(start + 2.0, 500.0, 518.0));
    assert_eq!(gpws.arbitrator().active(), AlertKind::SinkRate);

    // Another vehicle becomes active: the switch tick reads unavailable
    // and no stale alert state survives into the new vehicle's ticks.
    let mut s = plane_sample(start + 3.0, 2000.0, 2000.0);
    s.vehicle_id = "KERBAL-2".into();
    gpws.update(s);
    assert_eq!(gpws.arbitrator().active(), AlertKind::Unavailable);

    let mut s = plane_sample(start + 3.5, 2000.0, 2000.0);
    s.vehicle_id = "KERBAL-2".into();
    s.landed_or_splashed = true;
    let report = gpws.update(s);
    assert_eq!(report.phase, FlightPhase::Grounded);
    assert!(!gpws.arbitrator().was_active(AlertKind::SinkRate));
}

#[test]
fn test_lander_descent_to_landing() {
    let mut gpws = Gpws::new(GpwsConfig::default());

    // Grace period on approach.
    gpws.update(lander_sample(0.0, 3000.0, -40.0));
    gpws.update(lander_sample(1.0, 2960.0, -40.0));
    assert_eq!(gpws.arbitrator().active(), AlertKind::Unavailable);

    // Net deceleration on the Mun: 18 − 1.63 ≈ 16.4 m/s². A 90 m/s
    // plunge needs ~247 m to stop; at 300 m the 1.5x margin is gone.
    let report = gpws.update(lander_sample(3.0, 300.0, -90.0));
    assert_eq!(kinds(&report), vec![AlertKind::SinkRate]);

    // Deeper still: raw capability insufficient, pull up.
    let report = gpws.update(lander_sample(4.0, 200.0, -90.0));
    assert!(kinds(&report).contains(&AlertKind::SinkRatePullUp));

    // Arrested to a gentle final descent: the alert decays to idle.
    let mut t = 5.0;
    let mut radar = 150.0;
    let mut saw_idle = false;
    while radar > 20.0 {
        let report = gpws.update(lander_sample(t, radar, -3.0));
        saw_idle |= kinds(&report).contains(&AlertKind::None);
        t += 1.0;
        radar -= 10.0;
    }
    assert!(saw_idle);
    assert_eq!(gpws.arbitrator().active(), AlertKind::None);
}

#[test]
fn test_lander_retard_when_throttled_at_touchdown() {
    let mut gpws = Gpws::new(GpwsConfig::default());
    gpws.update(lander_sample(0.0, 500.0, -3.0));
    for i in 1..6 {
        gpws.update(lander_sample(i as f32, 500.0 - 20.0 * i as f32, -3.0));
    }
    // Inside the retard gate with the throttle still open.
    let report = gpws.update(lander_sample(7.0, 8.0, -2.0));
    assert!(kinds(&report).contains(&AlertKind::Retard));
}

#[test]
fn test_disabled_system_is_unavailable() {
    let mut config = GpwsConfig::default();
    config.plane.enable_system = false;
    let (gpws, _) = airborne_engine(config);
    assert_eq!(gpws.arbitrator().active(), AlertKind::Unavailable);
}
