//! Field solver for the air quality model
//!
//! The solver owns everything that happens on the fixed grid within one
//! simulation step: scalar field storage and sampling, velocity field
//! construction from fans and windows, semi-Lagrangian transport, occupant
//! sources, ventilation sinks, and range clamping. The driver in
//! [`crate::simulation`] sequences these passes; the tuning constants for
//! all of them live in [`SimParams`].

mod fields;
mod params;
mod sources;
mod transport;
mod velocity;

pub use fields::{lerp, Field, GridMap, GRID_COLS, GRID_ROWS};
pub use params::{
    SimParams, CO2_MAX, CO2_SEED_OFFSET, INDOOR_TEMP_SEED, TEMP_MAX, TEMP_MIN,
    VELOCITY_SAMPLE_STRIDE, VIRUS_MAX,
};
pub use sources::{accumulate_emission_weights, apply_emissions, apply_ventilation, clamp_fields};
pub use transport::{advect, diffuse};
pub use velocity::{nearest_wall, VelocityField, Wall, WindowBand};
