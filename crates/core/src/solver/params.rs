//! Tuning parameters for the field simulation
//!
//! All per-step rates and shape constants are collected in one immutable
//! [`SimParams`] value passed into the driver, so tests can vary them
//! deterministically instead of reaching for globals. The defaults are
//! empirically chosen "looks right" values for a coarse qualitative model;
//! none of them derive from a physical calibration.

use serde::{Deserialize, Serialize};

/// Hard upper clamp for CO2 concentration (ppm)
pub const CO2_MAX: f32 = 5000.0;

/// Hard upper clamp for the virus-proxy concentration
pub const VIRUS_MAX: f32 = 1000.0;

/// Hard lower clamp for temperature (degrees C)
pub const TEMP_MIN: f32 = -10.0;

/// Hard upper clamp for temperature (degrees C)
pub const TEMP_MAX: f32 = 40.0;

/// CO2 is seeded this far above the outdoor baseline
pub const CO2_SEED_OFFSET: f32 = 600.0;

/// Initial indoor temperature (degrees C)
pub const INDOOR_TEMP_SEED: f32 = 21.0;

/// Result velocity samples are taken every this many rows/columns
pub const VELOCITY_SAMPLE_STRIDE: usize = 4;

/// Immutable tuning constants for one simulation run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimParams {
    /// Number of transport + source/sink iterations per run
    pub steps: usize,

    /// Backtrace attenuation for semi-Lagrangian advection (< 1)
    pub advect: f32,

    /// Blend factor toward the four-neighbor average per step, in (0, 1)
    pub diff: f32,

    /// Gain on the fan's pseudo-radial velocity contribution
    pub fan_strength: f32,

    /// Singularity guard in the fan falloff denominator (grid units squared)
    pub fan_epsilon: f32,

    /// Velocity injected across a window band at open fraction 1.0
    pub window_flow: f32,

    /// Fixed half-height of the window band in grid rows
    pub window_band_half_rows: f32,

    /// Per-step pull toward the outdoor baseline inside a window band at
    /// open fraction 1.0
    pub vent_pull: f32,

    /// Temperature exchanges through a window slower than gases
    pub vent_temp_factor: f32,

    /// CO2 added per step at an occupant's own cell, intensity 1.0 (ppm)
    pub co2_emission: f32,

    /// Virus-proxy added per step at an occupant's own cell, intensity 1.0
    pub virus_emission: f32,

    /// Heat added per step at an occupant's own cell, intensity 1.0 (deg C)
    pub heat_emission: f32,

    /// Gaussian falloff divisor for occupant emission, exp(-d^2 / falloff)
    pub emission_falloff: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            steps: 40,
            advect: 0.4,  // Keeps backtraces under one cell for typical speeds
            diff: 0.25,   // Visible mixing without flattening plumes instantly
            fan_strength: 3.0,
            fan_epsilon: 6.0, // Grid units squared, caps the peak near the hub
            window_flow: 1.5,
            window_band_half_rows: 2.5,
            vent_pull: 0.35,
            vent_temp_factor: 0.8,
            co2_emission: 80.0,
            virus_emission: 0.9,
            heat_emission: 0.25,
            emission_falloff: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_in_stable_ranges() {
        let params = SimParams::default();
        assert!(params.advect > 0.0 && params.advect < 1.0);
        assert!(params.diff > 0.0 && params.diff < 1.0);
        assert!(params.vent_pull > 0.0 && params.vent_pull < 1.0);
        assert!(params.window_band_half_rows >= 2.2 && params.window_band_half_rows <= 2.8);
        assert_eq!(params.steps, 40);
    }
}
