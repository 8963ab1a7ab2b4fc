use airflow_sim_core::{
    optimize_fan_placement, simulate, Fan, Occupant, OptimizerConfig, OutdoorAir, Room, Scene,
    SimParams, SimulationStats, Window, GRID_COLS, GRID_ROWS,
};
use clap::Parser;

/// Indoor air quality simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "airflow-sim-demo")]
#[command(about = "Room air quality simulation demo", long_about = None)]
struct Args {
    /// Room width in length units
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Room height in length units
    #[arg(long, default_value_t = 500.0)]
    height: f32,

    /// Occupant as "x,y" or "x,y,intensity" (repeatable)
    #[arg(long = "occupant", value_parser = parse_occupant)]
    occupants: Vec<Occupant>,

    /// Window as "x,y,width" or "x,y,width,open" (repeatable)
    #[arg(long = "window", value_parser = parse_window)]
    windows: Vec<Window>,

    /// Fan as "x,y" or "x,y,strength" (repeatable)
    #[arg(long = "fan", value_parser = parse_fan)]
    fans: Vec<Fan>,

    /// Outdoor CO2 baseline in ppm
    #[arg(long, default_value_t = 420.0)]
    outdoor_co2: f32,

    /// Outdoor temperature in degrees C
    #[arg(long, default_value_t = 10.0)]
    outdoor_temp: f32,

    /// Search for the best fan placement instead of simulating the fans
    /// given on the command line
    #[arg(short, long)]
    optimize: bool,

    /// Number of optimizer trials
    #[arg(long, default_value_t = 80)]
    trials: usize,

    /// Optimizer RNG seed for reproducible searches
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_floats(s: &str, min: usize, max: usize, what: &str) -> Result<Vec<f32>, String> {
    let parts: Result<Vec<f32>, _> = s.split(',').map(|p| p.trim().parse::<f32>()).collect();
    let parts = parts.map_err(|e| format!("invalid {what} '{s}': {e}"))?;
    if parts.len() < min || parts.len() > max {
        return Err(format!(
            "{what} '{s}' must have between {min} and {max} comma-separated numbers"
        ));
    }
    Ok(parts)
}

fn parse_occupant(s: &str) -> Result<Occupant, String> {
    let v = parse_floats(s, 2, 3, "occupant")?;
    Ok(Occupant::new(v[0], v[1], v.get(2).copied().unwrap_or(1.0)))
}

fn parse_window(s: &str) -> Result<Window, String> {
    let v = parse_floats(s, 3, 4, "window")?;
    Ok(Window::new(v[0], v[1], v[2], v.get(3).copied().unwrap_or(1.0)))
}

fn parse_fan(s: &str) -> Result<Fan, String> {
    let v = parse_floats(s, 2, 3, "fan")?;
    Ok(Fan::with_strength(v[0], v[1], v.get(2).copied().unwrap_or(1.0)))
}

fn print_stats(stats: &SimulationStats) {
    println!("  avg CO2:   {:>8.1} ppm", stats.avg_co2);
    println!("  max CO2:   {:>8.1} ppm", stats.max_co2);
    println!("  avg virus: {:>8.3}", stats.avg_virus);
    println!("  max virus: {:>8.3}", stats.max_virus);
    println!("  avg temp:  {:>8.2} C", stats.avg_temp);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let scene = Scene {
        room: Room::new(args.width, args.height),
        fans: args.fans.clone(),
        windows: args.windows.clone(),
        occupants: args.occupants.clone(),
        outdoor: OutdoorAir {
            co2: args.outdoor_co2,
            temp: args.outdoor_temp,
        },
    };
    let params = SimParams::default();

    println!(
        "Room {}x{} on a {}x{} grid: {} fans, {} windows, {} occupants",
        args.width,
        args.height,
        GRID_COLS,
        GRID_ROWS,
        scene.fans.len(),
        scene.windows.len(),
        scene.occupants.len()
    );

    if args.optimize {
        let config = OptimizerConfig {
            trials: args.trials,
            seed: args.seed,
            ..OptimizerConfig::default()
        };
        let outcome = optimize_fan_placement(&scene, &params, &config);
        println!(
            "Best fan after {} trials: ({:.1}, {:.1}), score {:.3}",
            config.trials, outcome.best_fan.position.x, outcome.best_fan.position.y, outcome.score
        );
        print_stats(&outcome.stats);
    } else {
        let result = simulate(scene, &params);
        if result.room_sanitized {
            println!("(room dimensions were unusable; defaults substituted)");
        }
        println!("After {} steps:", params.steps);
        print_stats(&result.stats);
    }
}
