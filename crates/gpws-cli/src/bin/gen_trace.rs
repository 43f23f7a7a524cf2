//! CLI tool to synthesize telemetry traces for the replay tool.
//!
//! Generates simple but physically plausible scenarios: a fixed-wing
//! steep final approach, and a powered lander descent.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use gpws_core::{FlightSample, VehicleClass, M_TO_FT};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    /// Fixed-wing climb-out and an overly steep final approach
    SteepApproach,
    /// Powered lander coming down too hot, arresting late
    LanderDescent,
}

/// Generate a synthetic JSONL telemetry trace
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario to synthesize
    #[arg(long, value_enum, default_value_t = Scenario::SteepApproach)]
    scenario: Scenario,

    /// Output file
    #[arg(long, default_value = "trace.jsonl")]
    out: PathBuf,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 4.0)]
    rate: f32,
}

fn blank_sample(vehicle_id: &str, class: VehicleClass, time: f32) -> FlightSample {
    FlightSample {
        vehicle_id: vehicle_id.into(),
        class,
        time,
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
    }
}

/// Ground roll, climb to 2000 ft, then a 3000 ft/min final: steep
/// enough to walk through sink-rate and terrain-closure territory.
fn steep_approach(rate: f32) -> Vec<FlightSample> {
    let dt = 1.0 / rate;
    let mut samples = Vec::new();
    let mut time = 0.0f32;
    let mut altitude_ft = 0.0f32;

    // 10 s on the runway, accelerating.
    while time < 10.0 {
        let mut s = blank_sample("KERBAL-1", VehicleClass::Plane, time);
        s.landed_or_splashed = true;
        s.gear_deployed = true;
        s.hor_speed = 8.0 * time;
        samples.push(s);
        time += dt;
    }
    // Climb at 1500 ft/min to 2000 ft.
    while altitude_ft < 2000.0 {
        altitude_ft += 1500.0 / 60.0 * dt;
        let mut s = blank_sample("KERBAL-1", VehicleClass::Plane, time);
        s.radar_altitude = altitude_ft;
        s.altitude = altitude_ft;
        s.hor_speed = 90.0;
        s.ver_speed = 1500.0 / 60.0 / M_TO_FT;
        s.gear_deployed = time < 16.0;
        samples.push(s);
        time += dt;
    }
    // Descend at 3000 ft/min until short final.
    while altitude_ft > 50.0 {
        altitude_ft -= 3000.0 / 60.0 * dt;
        let mut s = blank_sample("KERBAL-1", VehicleClass::Plane, time);
        s.radar_altitude = altitude_ft;
        s.altitude = altitude_ft;
        s.hor_speed = 80.0;
        s.ver_speed = -3000.0 / 60.0 / M_TO_FT;
        s.throttle = 0.2;
        samples.push(s);
        time += dt;
    }
    samples
}

/// Lander dropping from 2 km on the Mun, burning late.
fn lander_descent(rate: f32) -> Vec<FlightSample> {
    let dt = 1.0 / rate;
    let mut samples = Vec::new();
    let mut time = 0.0f32;
    let mut radar_m = 2000.0f32;
    let mut sink = 5.0f32;

    while radar_m > 1.0 {
        // Free fall until 300 m, then a hard constant-thrust arrest.
        // Braking that late eats the safety margin on the way down.
        let braking = radar_m < 300.0;
        if braking {
            sink = (sink - 12.0 * dt).max(2.0);
        } else {
            sink += 1.63 * dt;
        }
        radar_m -= sink * dt;

        let mut s = blank_sample("MUN-LANDER", VehicleClass::Lander, time);
        s.radar_altitude = radar_m.max(0.0);
        s.altitude = radar_m.max(0.0);
        s.ver_speed = -sink;
        s.hor_speed = 3.0;
        s.gear_deployed = true;
        s.in_atmosphere = false;
        s.throttle = if braking { 0.9 } else { 0.0 };
        s.mass = 8000.0;
        s.max_thrust = 120_000.0;
        s.gravity = 1.63;
        samples.push(s);
        time += dt;
    }
    samples
}

fn main() -> Result<()> {
    let args = Args::parse();

    let samples = match args.scenario {
        Scenario::SteepApproach => steep_approach(args.rate),
        Scenario::LanderDescent => lander_descent(args.rate),
    };

    let file = File::create(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    let mut writer = BufWriter::new(file);
    for sample in &samples {
        serde_json::to_writer(&mut writer, sample)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    println!(
        "Wrote {} samples ({:?}) to {}",
        samples.len(),
        args.scenario,
        args.out.display()
    );
    Ok(())
}
