//! Simulation driver: seed, iterate, aggregate
//!
//! [`AirSimulation`] orchestrates one complete run over the fixed grid:
//!
//! ```text
//! INITIALIZE -> (STEP x steps) -> AGGREGATE -> DONE
//! ```
//!
//! Each STEP rebuilds the velocity field from the (static) fans and
//! windows, advects and diffuses all three scalar fields, applies occupant
//! sources and ventilation sinks, and clamps every field into its supported
//! range. The driver is fully deterministic: identical inputs always
//! produce identical output.

use crate::core_types::Scene;
use crate::solver::{
    accumulate_emission_weights, advect, apply_emissions, apply_ventilation, clamp_fields,
    diffuse, Field, GridMap, SimParams, VelocityField, CO2_SEED_OFFSET, GRID_COLS, GRID_ROWS,
    INDOOR_TEMP_SEED, VELOCITY_SAMPLE_STRIDE,
};
use serde::{Deserialize, Serialize};
use std::mem;
use tracing::{debug, info};

/// Aggregate statistics over the final fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Mean CO2 over all cells (ppm)
    pub avg_co2: f32,
    /// Maximum CO2 over all cells (ppm)
    pub max_co2: f32,
    /// Mean virus-proxy concentration over all cells
    pub avg_virus: f32,
    /// Maximum virus-proxy concentration over all cells
    pub max_virus: f32,
    /// Mean temperature over all cells (degrees C)
    pub avg_temp: f32,
}

/// One downsampled velocity vector for visualization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocitySample {
    /// Grid row of the sample
    pub row: usize,
    /// Grid column of the sample
    pub col: usize,
    /// x velocity component at the cell
    pub vx: f32,
    /// y velocity component at the cell
    pub vy: f32,
}

/// Scalar values of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSample {
    pub co2: f32,
    pub virus: f32,
    pub temp: f32,
}

/// Complete output of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Final CO2 field (ppm)
    pub co2: Field,
    /// Final virus-proxy field
    pub virus: Field,
    /// Final temperature field (degrees C)
    pub temp: Field,
    /// Velocity sampled every [`VELOCITY_SAMPLE_STRIDE`]th row and column
    pub velocity_samples: Vec<VelocitySample>,
    /// Aggregate statistics over the final fields
    pub stats: SimulationStats,
    /// Whether the caller's room dimensions had to be replaced with defaults
    pub room_sanitized: bool,
}

impl SimulationResult {
    /// Per-cell packaging of the three scalar fields
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> CellSample {
        CellSample {
            co2: self.co2.get(row, col),
            virus: self.virus.get(row, col),
            temp: self.temp.get(row, col),
        }
    }
}

/// Driver for one simulation run
///
/// Owns the scalar fields, a scratch buffer for the ping-pong transport
/// passes, and the most recently built velocity field. All state is private
/// to the run; concurrent runs never share anything.
pub struct AirSimulation {
    scene: Scene,
    params: SimParams,
    map: GridMap,

    co2: Field,
    virus: Field,
    temp: Field,

    // Ping-pong partner for advect/diffuse passes
    scratch: Field,
    // Shared occupant emission weights, rebuilt each step
    weights: Field,

    velocity: VelocityField,
    steps_done: usize,
    room_sanitized: bool,
}

impl AirSimulation {
    /// Seed a new run from a scene
    ///
    /// Room dimensions are sanitized here; CO2 starts uniformly at the
    /// outdoor baseline plus [`CO2_SEED_OFFSET`], virus at zero, and
    /// temperature at [`INDOOR_TEMP_SEED`].
    #[must_use]
    pub fn new(scene: Scene, params: SimParams) -> Self {
        let (room, room_sanitized) = scene.room.sanitized();
        let scene = Scene { room, ..scene };
        let map = GridMap::new(&scene.room);

        info!(
            "Air simulation initialized: {}x{} grid, {} fans, {} windows, {} occupants",
            GRID_COLS,
            GRID_ROWS,
            scene.fans.len(),
            scene.windows.len(),
            scene.occupants.len()
        );

        let velocity =
            VelocityField::build(&scene.room, &scene.fans, &scene.windows, &map, &params);
        let co2 = Field::with_value(scene.outdoor.co2 + CO2_SEED_OFFSET);
        let virus = Field::new();
        let temp = Field::with_value(INDOOR_TEMP_SEED);

        Self {
            scene,
            params,
            map,
            co2,
            virus,
            temp,
            scratch: Field::new(),
            weights: Field::new(),
            velocity,
            steps_done: 0,
            room_sanitized,
        }
    }

    /// Advance the run by one step
    ///
    /// Velocity is rebuilt from scratch even though fans and windows are
    /// static within a run; a dirty-flag cache would change nothing but the
    /// cost and is deliberately left out.
    pub fn step(&mut self) {
        self.velocity = VelocityField::build(
            &self.scene.room,
            &self.scene.fans,
            &self.scene.windows,
            &self.map,
            &self.params,
        );

        advect(&self.co2, &mut self.scratch, &self.velocity, self.params.advect);
        mem::swap(&mut self.co2, &mut self.scratch);
        advect(&self.virus, &mut self.scratch, &self.velocity, self.params.advect);
        mem::swap(&mut self.virus, &mut self.scratch);
        advect(&self.temp, &mut self.scratch, &self.velocity, self.params.advect);
        mem::swap(&mut self.temp, &mut self.scratch);

        diffuse(&self.co2, &mut self.scratch, self.params.diff);
        mem::swap(&mut self.co2, &mut self.scratch);
        diffuse(&self.virus, &mut self.scratch, self.params.diff);
        mem::swap(&mut self.virus, &mut self.scratch);
        diffuse(&self.temp, &mut self.scratch, self.params.diff);
        mem::swap(&mut self.temp, &mut self.scratch);

        accumulate_emission_weights(
            &mut self.weights,
            &self.scene.occupants,
            &self.map,
            self.params.emission_falloff,
        );
        apply_emissions(
            &mut self.co2,
            &mut self.virus,
            &mut self.temp,
            &self.weights,
            &self.params,
        );
        apply_ventilation(
            &mut self.co2,
            &mut self.virus,
            &mut self.temp,
            &self.scene.windows,
            &self.map,
            &self.scene.outdoor,
            &self.params,
        );
        clamp_fields(
            &mut self.co2,
            &mut self.virus,
            &mut self.temp,
            self.scene.outdoor.co2,
        );

        self.steps_done += 1;
        debug!(
            "Step {}: avg_co2={:.1}, avg_virus={:.3}, avg_temp={:.2}",
            self.steps_done,
            self.co2.mean(),
            self.virus.mean(),
            self.temp.mean()
        );
    }

    /// Run the configured number of steps and aggregate the result
    #[must_use]
    pub fn run(mut self) -> SimulationResult {
        for _ in 0..self.params.steps {
            self.step();
        }
        self.into_result()
    }

    /// Current CO2 field
    #[must_use]
    pub fn co2(&self) -> &Field {
        &self.co2
    }

    /// Current virus-proxy field
    #[must_use]
    pub fn virus(&self) -> &Field {
        &self.virus
    }

    /// Current temperature field
    #[must_use]
    pub fn temp(&self) -> &Field {
        &self.temp
    }

    /// Number of steps taken so far
    #[must_use]
    pub fn steps_done(&self) -> usize {
        self.steps_done
    }

    /// Package the current fields into a result
    #[must_use]
    pub fn into_result(self) -> SimulationResult {
        let stats = SimulationStats {
            avg_co2: self.co2.mean(),
            max_co2: self.co2.max(),
            avg_virus: self.virus.mean(),
            max_virus: self.virus.max(),
            avg_temp: self.temp.mean(),
        };

        let mut velocity_samples = Vec::new();
        for row in (0..GRID_ROWS).step_by(VELOCITY_SAMPLE_STRIDE) {
            for col in (0..GRID_COLS).step_by(VELOCITY_SAMPLE_STRIDE) {
                velocity_samples.push(VelocitySample {
                    row,
                    col,
                    vx: self.velocity.vx.get(row, col),
                    vy: self.velocity.vy.get(row, col),
                });
            }
        }

        info!(
            "Air simulation done after {} steps: avg_co2={:.1}, max_co2={:.1}, avg_virus={:.3}",
            self.steps_done, stats.avg_co2, stats.max_co2, stats.avg_virus
        );

        SimulationResult {
            co2: self.co2,
            virus: self.virus,
            temp: self.temp,
            velocity_samples,
            stats,
            room_sanitized: self.room_sanitized,
        }
    }
}

/// Run one complete simulation for a scene
#[must_use]
pub fn simulate(scene: Scene, params: &SimParams) -> SimulationResult {
    AirSimulation::new(scene, *params).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Fan, Occupant, OutdoorAir, Room, Window};
    use approx::assert_relative_eq;

    fn center_occupant_scene() -> Scene {
        Scene {
            room: Room::new(800.0, 500.0),
            occupants: vec![Occupant::new(400.0, 250.0, 1.0)],
            ..Scene::default()
        }
    }

    #[test]
    fn test_inert_scene_stays_at_seed_values() {
        let scene = Scene {
            room: Room::new(800.0, 500.0),
            ..Scene::default()
        };
        let result = simulate(scene, &SimParams::default());

        // No fans, windows, or occupants: still air, uniform fields, every
        // pass is an exact identity
        assert!(result.co2.as_slice().iter().all(|&v| v == 1020.0));
        assert!(result.virus.as_slice().iter().all(|&v| v == 0.0));
        assert!(result.temp.as_slice().iter().all(|&v| v == 21.0));
        assert_eq!(result.stats.max_co2, 1020.0);
        assert!(!result.room_sanitized);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let scene = Scene {
            room: Room::new(800.0, 500.0),
            fans: vec![Fan::new(200.0, 100.0)],
            windows: vec![Window::new(0.0, 250.0, 160.0, 0.7)],
            occupants: vec![Occupant::new(600.0, 400.0, 1.4)],
            ..Scene::default()
        };
        let a = simulate(scene.clone(), &SimParams::default());
        let b = simulate(scene, &SimParams::default());
        assert_eq!(a.co2, b.co2);
        assert_eq!(a.virus, b.virus);
        assert_eq!(a.temp, b.temp);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_stats_match_field_means() {
        let result = simulate(center_occupant_scene(), &SimParams::default());
        assert_relative_eq!(result.stats.avg_co2, result.co2.mean(), max_relative = 1e-6);
        assert_relative_eq!(result.stats.avg_virus, result.virus.mean(), max_relative = 1e-6);
        assert_relative_eq!(result.stats.avg_temp, result.temp.mean(), max_relative = 1e-6);
        assert_eq!(result.stats.max_co2, result.co2.max());
        assert_eq!(result.stats.max_virus, result.virus.max());
    }

    #[test]
    fn test_velocity_samples_follow_stride() {
        let result = simulate(center_occupant_scene(), &SimParams::default());
        let rows = GRID_ROWS.div_ceil(VELOCITY_SAMPLE_STRIDE);
        let cols = GRID_COLS.div_ceil(VELOCITY_SAMPLE_STRIDE);
        assert_eq!(result.velocity_samples.len(), rows * cols);
        for sample in &result.velocity_samples {
            assert_eq!(sample.row % VELOCITY_SAMPLE_STRIDE, 0);
            assert_eq!(sample.col % VELOCITY_SAMPLE_STRIDE, 0);
        }
    }

    #[test]
    fn test_sanitized_room_is_reported() {
        let scene = Scene {
            room: Room::new(f32::NAN, 500.0),
            ..Scene::default()
        };
        let result = simulate(scene, &SimParams::default());
        assert!(result.room_sanitized);
        // The run itself proceeds normally on the default room
        assert_eq!(result.stats.avg_co2, 1020.0);
    }

    #[test]
    fn test_stepwise_api_matches_run() {
        let params = SimParams::default();
        let mut sim = AirSimulation::new(center_occupant_scene(), params);
        for _ in 0..params.steps {
            sim.step();
        }
        assert_eq!(sim.steps_done(), params.steps);
        let stepped = sim.into_result();
        let ran = simulate(center_occupant_scene(), &params);
        assert_eq!(stepped.co2, ran.co2);
        assert_eq!(stepped.stats, ran.stats);
    }

    #[test]
    fn test_cell_accessor_packages_all_fields() {
        let result = simulate(center_occupant_scene(), &SimParams::default());
        let cell = result.cell(14, 22);
        assert_eq!(cell.co2, result.co2.get(14, 22));
        assert_eq!(cell.virus, result.virus.get(14, 22));
        assert_eq!(cell.temp, result.temp.get(14, 22));
    }

    #[test]
    fn test_higher_outdoor_co2_raises_floor() {
        let scene = Scene {
            room: Room::new(800.0, 500.0),
            outdoor: OutdoorAir {
                co2: 600.0,
                temp: 10.0,
            },
            ..Scene::default()
        };
        let result = simulate(scene, &SimParams::default());
        // Seeded at outdoor + offset and clamped against the outdoor floor
        assert!(result.co2.as_slice().iter().all(|&v| v >= 600.0));
        assert_eq!(result.stats.avg_co2, 1200.0);
    }
}
