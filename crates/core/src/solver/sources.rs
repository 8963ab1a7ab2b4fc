//! Occupant sources, ventilation sinks, and range clamping
//!
//! Occupants emit CO2, virus-proxy aerosol, and heat with a Gaussian
//! footprint in grid space:
//!
//! ```text
//! contribution = exp(-d^2 / falloff) * intensity * rate
//! ```
//!
//! The Gaussian tail is never truncated; every occupant touches every cell,
//! so the pass is O(occupants x grid cells).
//!
//! Windows exchange air with the outside: inside a window's band (the same
//! band that receives velocity injection) each field is pulled toward its
//! outdoor baseline, temperature at a reduced rate since walls and glass
//! buffer heat exchange more than gas exchange.
//!
//! The final clamp is the model's only protection against runaway
//! accumulation and runs unconditionally every step.

use crate::core_types::{Occupant, OutdoorAir, Window, OUTDOOR_VIRUS};
use crate::solver::fields::{lerp, Field, GridMap, GRID_COLS};
use crate::solver::params::{SimParams, CO2_MAX, TEMP_MAX, TEMP_MIN, VIRUS_MAX};
use crate::solver::velocity::WindowBand;
use rayon::prelude::*;

/// Accumulate the Gaussian emission weight of every occupant into `weights`
///
/// The buffer is reset first. A cell's weight is
/// `sum over occupants of intensity * exp(-d^2 / falloff)` with `d` the
/// grid-space distance from occupant to cell; the three per-field emission
/// rates scale this shared weight in [`apply_emissions`].
pub fn accumulate_emission_weights(
    weights: &mut Field,
    occupants: &[Occupant],
    map: &GridMap,
    falloff: f32,
) {
    weights.fill(0.0);
    if occupants.is_empty() {
        return;
    }

    let centers: Vec<(f32, f32, f32)> = occupants
        .iter()
        .map(|o| {
            (
                map.to_grid_x(o.position.x),
                map.to_grid_y(o.position.y),
                o.intensity,
            )
        })
        .collect();

    weights
        .as_mut_slice()
        .par_chunks_mut(GRID_COLS)
        .enumerate()
        .for_each(|(row, out_row)| {
            for (col, cell) in out_row.iter_mut().enumerate() {
                let mut w = 0.0;
                for &(ox, oy, intensity) in &centers {
                    let dx = col as f32 - ox;
                    let dy = row as f32 - oy;
                    w += intensity * (-(dx * dx + dy * dy) / falloff).exp();
                }
                *cell = w;
            }
        });
}

/// Add occupant emissions to the three scalar fields
///
/// Each field receives the shared weight buffer scaled by its own per-step
/// emission rate.
pub fn apply_emissions(
    co2: &mut Field,
    virus: &mut Field,
    temp: &mut Field,
    weights: &Field,
    params: &SimParams,
) {
    let w = weights.as_slice();
    for (i, v) in co2.as_mut_slice().iter_mut().enumerate() {
        *v += w[i] * params.co2_emission;
    }
    for (i, v) in virus.as_mut_slice().iter_mut().enumerate() {
        *v += w[i] * params.virus_emission;
    }
    for (i, v) in temp.as_mut_slice().iter_mut().enumerate() {
        *v += w[i] * params.heat_emission;
    }
}

/// Pull field values toward the outdoor baseline inside every window band
///
/// `new = lerp(current, baseline, vent_pull * open)`; temperature uses the
/// same pull scaled by `vent_temp_factor`. A closed window (open 0) is a
/// no-op.
pub fn apply_ventilation(
    co2: &mut Field,
    virus: &mut Field,
    temp: &mut Field,
    windows: &[Window],
    map: &GridMap,
    outdoor: &OutdoorAir,
    params: &SimParams,
) {
    for window in windows {
        let Some(band) = WindowBand::of(window, map, params.window_band_half_rows) else {
            continue;
        };
        let pull = params.vent_pull * window.open;
        let temp_pull = pull * params.vent_temp_factor;

        for row in band.row_min..=band.row_max {
            for col in band.col_min..=band.col_max {
                co2.set(row, col, lerp(co2.get(row, col), outdoor.co2, pull));
                virus.set(row, col, lerp(virus.get(row, col), OUTDOOR_VIRUS, pull));
                temp.set(row, col, lerp(temp.get(row, col), outdoor.temp, temp_pull));
            }
        }
    }
}

/// Clamp all three fields into their supported ranges
///
/// CO2 can never fall below the outdoor baseline; the upper bounds cap
/// accumulation near strong sources.
pub fn clamp_fields(co2: &mut Field, virus: &mut Field, temp: &mut Field, outdoor_co2: f32) {
    co2.clamp_values(outdoor_co2, CO2_MAX);
    virus.clamp_values(0.0, VIRUS_MAX);
    temp.clamp_values(TEMP_MIN, TEMP_MAX);
}
