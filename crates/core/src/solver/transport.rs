//! Scalar transport: semi-Lagrangian advection and neighbor diffusion
//!
//! Each simulation step moves every scalar field (CO2, virus-proxy,
//! temperature) through two passes:
//!
//! 1. **Advect** — for every cell, trace backward along the local velocity
//!    scaled by the `advect` factor and bilinearly sample the previous field
//!    at the traced position. Sampling the past instead of pushing forward
//!    keeps the scheme unconditionally stable for any velocity magnitude,
//!    at the cost of numerical smoothing.
//! 2. **Diffuse** — blend every cell toward the unweighted average of its
//!    four orthogonal neighbors (edge-clamped, no wraparound) by the `diff`
//!    factor, modeling turbulent mixing.
//!
//! Both passes write into a separate output buffer; the caller ping-pongs
//! the buffers between passes. Every output cell reads only the immutable
//! input buffer, so the row-parallel loops are bit-deterministic.

use crate::solver::fields::{lerp, Field, GRID_COLS, GRID_ROWS};
use crate::solver::velocity::VelocityField;
use rayon::prelude::*;

/// Semi-Lagrangian advection pass
///
/// For each cell, backtrace `velocity * factor` and sample `src` bilinearly
/// at the traced position. With zero velocity the backtrace lands exactly on
/// the cell and the field is reproduced bit-for-bit.
pub fn advect(src: &Field, dst: &mut Field, velocity: &VelocityField, factor: f32) {
    let vx = velocity.vx.as_slice();
    let vy = velocity.vy.as_slice();

    dst.as_mut_slice()
        .par_chunks_mut(GRID_COLS)
        .enumerate()
        .for_each(|(row, out_row)| {
            for (col, cell) in out_row.iter_mut().enumerate() {
                let idx = row * GRID_COLS + col;
                let back_x = col as f32 - vx[idx] * factor;
                let back_y = row as f32 - vy[idx] * factor;
                *cell = src.sample(back_x, back_y);
            }
        });
}

/// Neighbor-average diffusion pass
///
/// `dst[cell] = lerp(src[cell], avg(four neighbors), diff)` with neighbor
/// indices clamped at the edges, so border cells average themselves in
/// place of the missing neighbor.
pub fn diffuse(src: &Field, dst: &mut Field, diff: f32) {
    let data = src.as_slice();

    dst.as_mut_slice()
        .par_chunks_mut(GRID_COLS)
        .enumerate()
        .for_each(|(row, out_row)| {
            let up = row.saturating_sub(1);
            let down = (row + 1).min(GRID_ROWS - 1);
            for (col, cell) in out_row.iter_mut().enumerate() {
                let left = col.saturating_sub(1);
                let right = (col + 1).min(GRID_COLS - 1);

                let neighbor_avg = (data[row * GRID_COLS + left]
                    + data[row * GRID_COLS + right]
                    + data[up * GRID_COLS + col]
                    + data[down * GRID_COLS + col])
                    / 4.0;
                *cell = lerp(data[row * GRID_COLS + col], neighbor_avg, diff);
            }
        });
}
