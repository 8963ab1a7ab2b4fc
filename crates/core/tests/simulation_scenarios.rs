//! End-to-end simulation scenarios over the public API

use airflow_sim_core::{
    simulate, AirSimulation, Occupant, Room, Scene, SimParams, Window, GRID_COLS, GRID_ROWS,
};
use ctor::ctor;

#[ctor]
fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn center_occupant_scene() -> Scene {
    Scene {
        room: Room::new(800.0, 500.0),
        occupants: vec![Occupant::new(400.0, 250.0, 1.0)],
        ..Scene::default()
    }
}

#[test]
fn test_grid_dimensions_fixed_for_any_room_size() {
    for (w, h) in [(800.0, 500.0), (10.0, 10.0), (100_000.0, 3.0), (1.5, 9000.0)] {
        let scene = Scene {
            room: Room::new(w, h),
            ..Scene::default()
        };
        let result = simulate(scene, &SimParams::default());
        assert_eq!(
            result.co2.as_slice().len(),
            GRID_ROWS * GRID_COLS,
            "Grid resolution must not depend on room size ({w}x{h})"
        );
        assert_eq!(result.virus.as_slice().len(), GRID_ROWS * GRID_COLS);
        assert_eq!(result.temp.as_slice().len(), GRID_ROWS * GRID_COLS);
    }
}

#[test]
fn test_center_occupant_raises_co2_within_bounds() {
    let result = simulate(center_occupant_scene(), &SimParams::default());

    // One breathing occupant, no ventilation: CO2 climbs above the seed but
    // the hard ceiling holds
    assert!(
        result.stats.avg_co2 > 1020.0,
        "avg CO2 {} should exceed the 1020 seed",
        result.stats.avg_co2
    );
    assert!(
        result.stats.avg_co2 <= 5000.0,
        "avg CO2 {} exceeded the ceiling",
        result.stats.avg_co2
    );
    assert!(result.stats.max_virus > 0.0, "occupant must emit virus proxy");
    assert!(
        result.stats.avg_temp >= 21.0,
        "heat is only added in this scenario, avg temp {} fell below the seed",
        result.stats.avg_temp
    );
}

#[test]
fn test_open_window_lowers_co2_versus_closed() {
    let closed = Scene {
        windows: vec![Window::new(0.0, 250.0, 160.0, 0.0)],
        ..center_occupant_scene()
    };
    let open = Scene {
        windows: vec![Window::new(0.0, 250.0, 160.0, 1.0)],
        ..center_occupant_scene()
    };
    let closed_result = simulate(closed, &SimParams::default());
    let open_result = simulate(open, &SimParams::default());
    assert!(
        open_result.stats.avg_co2 < closed_result.stats.avg_co2,
        "open window ({}) must beat closed window ({})",
        open_result.stats.avg_co2,
        closed_result.stats.avg_co2
    );
}

#[test]
fn test_open_window_lowers_co2_versus_no_window() {
    let no_window = simulate(center_occupant_scene(), &SimParams::default());
    let with_window = simulate(
        Scene {
            windows: vec![Window::new(0.0, 250.0, 160.0, 1.0)],
            ..center_occupant_scene()
        },
        &SimParams::default(),
    );
    assert!(
        with_window.stats.avg_co2 < no_window.stats.avg_co2,
        "ventilated room ({}) must beat sealed room ({})",
        with_window.stats.avg_co2,
        no_window.stats.avg_co2
    );
}

#[test]
fn test_fields_stay_clamped_after_every_step() {
    // Crank emissions far past the ceilings so the clamp actually engages
    let params = SimParams {
        co2_emission: 800.0,
        virus_emission: 60.0,
        heat_emission: 4.0,
        ..SimParams::default()
    };
    let scene = Scene {
        room: Room::new(800.0, 500.0),
        occupants: vec![
            Occupant::new(200.0, 250.0, 3.0),
            Occupant::new(400.0, 250.0, 3.0),
            Occupant::new(600.0, 250.0, 3.0),
        ],
        windows: vec![Window::new(0.0, 250.0, 160.0, 1.0)],
        ..Scene::default()
    };

    let mut sim = AirSimulation::new(scene, params);
    for step in 0..params.steps {
        sim.step();
        for &v in sim.co2().as_slice() {
            assert!(
                (420.0..=5000.0).contains(&v),
                "CO2 {v} out of range after step {}",
                step + 1
            );
        }
        for &v in sim.virus().as_slice() {
            assert!(
                (0.0..=1000.0).contains(&v),
                "virus {v} out of range after step {}",
                step + 1
            );
        }
        for &v in sim.temp().as_slice() {
            assert!(
                (-10.0..=40.0).contains(&v),
                "temp {v} out of range after step {}",
                step + 1
            );
        }
    }

    // The overdriven scenario really does hit the ceilings
    let result = sim.into_result();
    assert_eq!(result.stats.max_co2, 5000.0);
    assert_eq!(result.stats.max_virus, 1000.0);
}

#[test]
fn test_stats_are_arithmetic_means_of_returned_grid() {
    let result = simulate(
        Scene {
            windows: vec![Window::new(0.0, 250.0, 160.0, 0.5)],
            ..center_occupant_scene()
        },
        &SimParams::default(),
    );

    let n = (GRID_ROWS * GRID_COLS) as f64;
    let mean = |data: &[f32]| {
        (data.iter().map(|&v| f64::from(v)).sum::<f64>() / n) as f32
    };
    assert!((result.stats.avg_co2 - mean(result.co2.as_slice())).abs() < 1e-3);
    assert!((result.stats.avg_virus - mean(result.virus.as_slice())).abs() < 1e-5);
    assert!((result.stats.avg_temp - mean(result.temp.as_slice())).abs() < 1e-4);
}

#[test]
fn test_non_finite_room_runs_on_defaults() {
    let scene = Scene {
        room: Room::new(f32::INFINITY, -0.0),
        occupants: vec![Occupant::new(400.0, 250.0, 1.0)],
        ..Scene::default()
    };
    let result = simulate(scene, &SimParams::default());
    assert!(result.room_sanitized);
    // Defaults put the occupant mid-room; the run behaves like the normal
    // center-occupant scenario
    assert!(result.stats.avg_co2 > 1020.0);
}
