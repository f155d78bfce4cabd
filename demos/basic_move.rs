//! Basic axis control example.
//!
//! Parses a TOML configuration, drives an `AxisController` through homing
//! and a named move on a simulated clock, and prints the commanded step
//! rate as the profile unfolds.
//!
//! Run with: `cargo run --example basic_move`

use std::cell::Cell;

use axis_motion::{
    config::units::{Degrees, Micros},
    error::Result,
    parse_config,
    state::NoHooks,
    Actuator, AxisController, FnActuator, OperatingState, StateHooks,
};

const CONFIG: &str = r#"
[axis]
name = "pan_axis"
steps_per_revolution = 200
microsteps = 16
gear_ratio = 4.0
max_velocity_deg_per_sec = 90.0
max_acceleration_deg_per_sec2 = 360.0
max_jerk_deg_per_sec3 = 3600.0

[axis.limits]
min_degrees = -180.0
max_degrees = 180.0
policy = "reject"

[executor]
tick_rate_hz = 1000

[homing]
position_degrees = 0.0
velocity_percent = 50

[moves.left_90]
target_degrees = -90.0
velocity_percent = 100

[moves.right_45]
target_degrees = 45.0
velocity_percent = 50
acceleration_percent = 50
"#;

/// Tick the controller until it returns to `Ready`, printing every 100 ms.
fn run<A, H>(axis: &mut AxisController<A, H>, clock: &mut Micros, period: u64) -> OperatingState
where
    A: Actuator,
    H: StateHooks,
{
    let mut ticks = 0u64;
    loop {
        *clock = *clock + period;
        let state = axis.tick(*clock);
        ticks += 1;

        if ticks % 100 == 0 {
            let status = axis.status();
            println!(
                "  t={:>6.3}s  {:<12} pos={:>8.2}°  vel={:>8.1} steps/s  progress={:>5.1}%",
                clock.0 as f64 / 1e6,
                state,
                status.position.value(),
                status.executor.current_velocity,
                status.executor.progress * 100.0
            );
        }

        if !matches!(
            state,
            OperatingState::Accelerating
                | OperatingState::Running
                | OperatingState::Decelerating
                | OperatingState::Homing
                | OperatingState::Stopping
        ) {
            return state;
        }
    }
}

fn main() -> Result<()> {
    println!("=== Basic Axis Move Example ===\n");

    let config = parse_config(CONFIG)?;
    let period = config.executor.tick_period_us();

    println!("Axis: {}", config.axis.name);
    println!("  Steps/degree: {:.2}", config.axis.steps_per_degree());
    println!("  Profile: {:?}", config.axis.profile);
    println!("  Moves: {:?}", config.move_names().collect::<Vec<_>>());
    println!();

    let peak_rate = Cell::new(0.0f32);
    let actuator = FnActuator::new(
        |rate: f32| peak_rate.set(peak_rate.get().max(rate)),
        |forward: bool| println!("  direction -> {}", if forward { "forward" } else { "reverse" }),
    );

    let mut axis = AxisController::with_parts(&config, actuator, NoHooks);
    let mut clock = Micros(0);

    axis.initialize()?;
    axis.enable()?;
    println!("State: {}", axis.state());

    println!("\nHoming...");
    axis.home(clock)?;
    run(&mut axis, &mut clock, period);

    for name in ["left_90", "right_45"] {
        println!("\nMove '{}':", name);
        axis.execute(name, clock)?;
        let state = run(&mut axis, &mut clock, period);
        println!("  finished in state {} at {:.2}°", state, axis.position().value());
    }

    println!("\nDirect move to 30°, stopped early:");
    axis.move_to(Degrees(30.0), clock)?;
    for _ in 0..50 {
        clock = clock + period;
        axis.tick(clock);
    }
    axis.stop()?;
    let state = run(&mut axis, &mut clock, period);
    println!("  stopped in state {} at {:.2}°", state, axis.position().value());

    println!("\nPeak commanded rate: {:.1} steps/s", peak_rate.get());
    Ok(())
}
