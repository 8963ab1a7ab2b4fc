//! Indoor Air Quality Simulation Core Library
//!
//! Estimates CO2, virus-proxy concentration, and temperature across a 2D
//! room cross-section from the placement of ventilation fans, windows, and
//! occupants, and searches for the fan placement that minimizes pollutant
//! exposure.
//!
//! The model is a coarse, qualitative grid simulation, not a validated CFD
//! solver: a diagnostic velocity field is derived from fans and windows,
//! scalar fields are moved by semi-Lagrangian advection plus neighbor
//! diffusion, occupants and windows act as sources and sinks, and hard
//! clamps keep every field in a bounded range.

// Scene entities and shared input types
pub mod core_types;

// Grid fields, velocity construction, transport, sources/sinks
pub mod solver;

// Step sequencing, aggregation, result packaging
pub mod simulation;

// Random-search fan placement
pub mod optimizer;

// Re-export core types
pub use core_types::{Fan, Occupant, OutdoorAir, Room, Scene, Window};

// Re-export solver types
pub use solver::{Field, GridMap, SimParams, VelocityField, GRID_COLS, GRID_ROWS};

// Re-export simulation driver
pub use simulation::{
    simulate, AirSimulation, CellSample, SimulationResult, SimulationStats, VelocitySample,
};

// Re-export optimizer
pub use optimizer::{
    exposure_score, optimize_fan_placement, OptimizationOutcome, OptimizerConfig,
};
