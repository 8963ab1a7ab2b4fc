//! Fan placement optimizer
//!
//! Pure random search: sample candidate fan positions uniformly inside the
//! room, evaluate each with a full simulation run, keep the lowest-scoring
//! trial. No gradients, no annealing, no restarts, no convergence check —
//! the loop always runs its full trial budget and the only guarantee is
//! that the tracked best never worsens across trials.
//!
//! The exposure score blends average and peak CO2, average and peak
//! virus-proxy, and deviation from a comfortable room temperature:
//!
//! ```text
//! score = 1.0 * avg_co2/1200 + 0.6 * max_co2/2500
//!       + 1.2 * avg_virus/8  + 0.9 * max_virus/25
//!       + 0.15 * |avg_temp - 21|
//! ```
//!
//! Randomness is injectable: a fixed seed reproduces the whole search, an
//! unseeded run draws from OS entropy.

use crate::core_types::{Fan, Room, Scene};
use crate::simulation::{simulate, SimulationStats};
use crate::solver::{SimParams, INDOOR_TEMP_SEED};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for one optimization call
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Number of random trials to evaluate
    pub trials: usize,
    /// Strength assigned to every candidate fan
    pub fan_strength: f32,
    /// Fixed RNG seed for reproducible searches; `None` uses OS entropy
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            trials: 80,
            fan_strength: 1.0,
            seed: None,
        }
    }
}

/// Best trial found by a search
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// Fan placement of the winning trial
    pub best_fan: Fan,
    /// Winning exposure score, rounded to three decimal places
    pub score: f32,
    /// Full aggregate stats of the winning trial
    pub stats: SimulationStats,
}

/// Scalar exposure objective over a run's aggregate stats (lower is better)
#[must_use]
pub fn exposure_score(stats: &SimulationStats) -> f32 {
    1.0 * (stats.avg_co2 / 1200.0)
        + 0.6 * (stats.max_co2 / 2500.0)
        + 1.2 * (stats.avg_virus / 8.0)
        + 0.9 * (stats.max_virus / 25.0)
        + 0.15 * (stats.avg_temp - INDOOR_TEMP_SEED).abs()
}

/// Draw a candidate fan uniformly inside the room bounds
fn sample_fan(rng: &mut StdRng, room: &Room, strength: f32) -> Fan {
    Fan::with_strength(
        rng.random_range(0.0..room.width),
        rng.random_range(0.0..room.height),
        strength,
    )
}

/// Evaluate one candidate fan against the caller's scene
///
/// The candidate replaces whatever fans the scene already has; windows,
/// occupants, and the outdoor baseline are kept as supplied.
fn evaluate(scene: &Scene, fan: Fan, params: &SimParams) -> SimulationStats {
    let trial_scene = Scene {
        fans: vec![fan],
        ..scene.clone()
    };
    simulate(trial_scene, params).stats
}

/// Search for the fan placement minimizing pollutant exposure
///
/// Runs `config.trials` independent simulations, each with a single
/// uniformly sampled fan plus the scene's windows, occupants, and outdoor
/// baseline. Strict less-than tracking keeps the first-found minimum on
/// exact score ties.
///
/// # Panics
///
/// Panics if `config.trials` is zero.
#[must_use]
pub fn optimize_fan_placement(
    scene: &Scene,
    params: &SimParams,
    config: &OptimizerConfig,
) -> OptimizationOutcome {
    assert!(config.trials > 0, "optimizer requires at least one trial");

    let (room, _) = scene.room.sanitized();
    let scene = Scene {
        room,
        ..scene.clone()
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    info!(
        "Fan placement search: {} trials over {}x{} room",
        config.trials, room.width, room.height
    );

    let mut best_fan = sample_fan(&mut rng, &room, config.fan_strength);
    let mut best_stats = evaluate(&scene, best_fan, params);
    let mut best_score = exposure_score(&best_stats);
    debug!(
        "Trial 1/{}: fan=({:.1}, {:.1}) score={:.4}",
        config.trials, best_fan.position.x, best_fan.position.y, best_score
    );

    for trial in 1..config.trials {
        let fan = sample_fan(&mut rng, &room, config.fan_strength);
        let stats = evaluate(&scene, fan, params);
        let score = exposure_score(&stats);
        debug!(
            "Trial {}/{}: fan=({:.1}, {:.1}) score={:.4}",
            trial + 1,
            config.trials,
            fan.position.x,
            fan.position.y,
            score
        );
        if score < best_score {
            best_fan = fan;
            best_stats = stats;
            best_score = score;
        }
    }

    info!(
        "Best fan at ({:.1}, {:.1}) with score {:.3}",
        best_fan.position.x, best_fan.position.y, best_score
    );

    OptimizationOutcome {
        best_fan,
        score: (best_score * 1000.0).round() / 1000.0,
        stats: best_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Occupant, Room, Window};

    fn occupied_scene() -> Scene {
        Scene {
            room: Room::new(800.0, 500.0),
            windows: vec![Window::new(0.0, 250.0, 160.0, 1.0)],
            occupants: vec![Occupant::new(400.0, 250.0, 1.0)],
            ..Scene::default()
        }
    }

    // A tiny trial budget keeps these tests fast; each trial is a full
    // 40-step run.
    fn quick_config(seed: u64) -> OptimizerConfig {
        OptimizerConfig {
            trials: 5,
            seed: Some(seed),
            ..OptimizerConfig::default()
        }
    }

    #[test]
    fn test_exposure_score_formula() {
        let stats = SimulationStats {
            avg_co2: 1200.0,
            max_co2: 2500.0,
            avg_virus: 8.0,
            max_virus: 25.0,
            avg_temp: 23.0,
        };
        // 1.0 + 0.6 + 1.2 + 0.9 + 0.15 * 2
        assert!((exposure_score(&stats) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let scene = occupied_scene();
        let params = SimParams::default();
        let a = optimize_fan_placement(&scene, &params, &quick_config(7));
        let b = optimize_fan_placement(&scene, &params, &quick_config(7));
        assert_eq!(a.best_fan, b.best_fan);
        assert_eq!(a.score, b.score);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_different_seeds_sample_different_fans() {
        let scene = occupied_scene();
        let params = SimParams::default();
        let a = optimize_fan_placement(&scene, &params, &quick_config(1));
        let b = optimize_fan_placement(&scene, &params, &quick_config(2));
        // Not a hard guarantee, but with continuous uniform sampling two
        // identical winners across seeds would indicate a broken RNG path
        assert_ne!(a.best_fan.position, b.best_fan.position);
    }

    #[test]
    fn test_best_never_worse_than_first_trial() {
        let scene = occupied_scene();
        let params = SimParams::default();
        let config = quick_config(42);
        let outcome = optimize_fan_placement(&scene, &params, &config);

        // Replay the first trial exactly: same seed, same draw order
        let mut rng = StdRng::seed_from_u64(42);
        let first_fan = Fan::with_strength(
            rng.random_range(0.0..scene.room.width),
            rng.random_range(0.0..scene.room.height),
            config.fan_strength,
        );
        let first_score = exposure_score(&evaluate(&scene, first_fan, &params));
        assert!(outcome.score <= (first_score * 1000.0).round() / 1000.0 + 1e-6);
    }

    #[test]
    fn test_candidate_replaces_existing_fans() {
        let scene = Scene {
            fans: vec![Fan::new(1.0, 1.0)],
            ..occupied_scene()
        };
        let stats = evaluate(&scene, Fan::new(700.0, 100.0), &SimParams::default());
        let without_caller_fans = evaluate(
            &Scene {
                fans: Vec::new(),
                ..scene.clone()
            },
            Fan::new(700.0, 100.0),
            &SimParams::default(),
        );
        assert_eq!(stats, without_caller_fans);
    }

    #[test]
    fn test_sanitized_room_bounds_the_sampling() {
        let scene = Scene {
            room: Room::new(f32::NAN, f32::NAN),
            occupants: vec![Occupant::new(100.0, 100.0, 1.0)],
            ..Scene::default()
        };
        let outcome =
            optimize_fan_placement(&scene, &SimParams::default(), &quick_config(3));
        assert!(outcome.best_fan.position.x >= 0.0 && outcome.best_fan.position.x < 800.0);
        assert!(outcome.best_fan.position.y >= 0.0 && outcome.best_fan.position.y < 500.0);
    }

    #[test]
    #[should_panic(expected = "at least one trial")]
    fn test_zero_trials_rejected() {
        let config = OptimizerConfig {
            trials: 0,
            ..OptimizerConfig::default()
        };
        let _ = optimize_fan_placement(&occupied_scene(), &SimParams::default(), &config);
    }
}
