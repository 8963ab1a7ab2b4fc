//! Scalar field storage and sampling
//!
//! Every simulated quantity (CO2, virus-proxy, temperature, velocity
//! components) lives on the same fixed-resolution grid, stored as a flat
//! `Vec<f32>` in row-major order. The grid resolution is independent of the
//! room's physical size; [`GridMap`] converts room coordinates to grid
//! coordinates by linear scaling per axis.

use crate::core_types::Room;
use serde::{Deserialize, Serialize};

/// Grid height in cells, fixed for every room
pub const GRID_ROWS: usize = 28;

/// Grid width in cells, fixed for every room
pub const GRID_COLS: usize = 44;

/// Linear interpolation between `a` and `b`
///
/// Exact at the endpoints: `lerp(a, b, 0.0) == a` bit-for-bit.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Scalar field over the simulation grid
///
/// Stores values as a flat `Vec<f32>` in row-major order
/// (`row * GRID_COLS + col`). A single contiguous buffer keeps the
/// optimizer's repeated full-grid passes cache-friendly and avoids per-row
/// allocation churn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    data: Vec<f32>,
}

impl Field {
    /// Create a field initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::with_value(0.0)
    }

    /// Create a field initialized to a value
    #[must_use]
    pub fn with_value(value: f32) -> Self {
        Self {
            data: vec![value; GRID_ROWS * GRID_COLS],
        }
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(
            row < GRID_ROWS && col < GRID_COLS,
            "Coordinates out of bounds"
        );
        self.data[row * GRID_COLS + col]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(
            row < GRID_ROWS && col < GRID_COLS,
            "Coordinates out of bounds"
        );
        self.data[row * GRID_COLS + col] = value;
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Clamp every cell into `[lo, hi]`
    pub fn clamp_values(&mut self, lo: f32, hi: f32) {
        for v in &mut self.data {
            *v = v.clamp(lo, hi);
        }
    }

    /// Arithmetic mean over all cells
    #[must_use]
    pub fn mean(&self) -> f32 {
        let sum: f64 = self.data.iter().map(|&v| f64::from(v)).sum();
        (sum / self.data.len() as f64) as f32
    }

    /// Maximum over all cells
    #[must_use]
    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::MIN, f32::max)
    }

    /// Bilinearly sample the field at a fractional grid coordinate
    ///
    /// `x` is the column coordinate, `y` the row coordinate. Coordinates are
    /// clamped to the grid extent and the +1 corner is clamped to the last
    /// valid index, so sampling never wraps around an edge. Sampling at an
    /// exact integer coordinate reproduces the stored value exactly.
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let x = x.clamp(0.0, (GRID_COLS - 1) as f32);
        let y = y.clamp(0.0, (GRID_ROWS - 1) as f32);

        let c0 = x.floor() as usize;
        let r0 = y.floor() as usize;
        let c1 = (c0 + 1).min(GRID_COLS - 1);
        let r1 = (r0 + 1).min(GRID_ROWS - 1);

        let tx = x - c0 as f32;
        let ty = y - r0 as f32;

        let top = lerp(self.get(r0, c0), self.get(r0, c1), tx);
        let bottom = lerp(self.get(r1, c0), self.get(r1, c1), tx);
        lerp(top, bottom, ty)
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear mapping from room coordinates to grid coordinates
///
/// The grid always spans the full room, so the scale factors are simply
/// cells-per-length-unit along each axis.
#[derive(Debug, Clone, Copy)]
pub struct GridMap {
    scale_x: f32,
    scale_y: f32,
}

impl GridMap {
    /// Build the mapping for a room (dimensions must already be sanitized)
    #[must_use]
    pub fn new(room: &Room) -> Self {
        Self {
            scale_x: GRID_COLS as f32 / room.width,
            scale_y: GRID_ROWS as f32 / room.height,
        }
    }

    /// Room x coordinate to (clamped) fractional grid column
    #[must_use]
    pub fn to_grid_x(&self, x: f32) -> f32 {
        (x * self.scale_x).clamp(0.0, (GRID_COLS - 1) as f32)
    }

    /// Room y coordinate to (clamped) fractional grid row
    #[must_use]
    pub fn to_grid_y(&self, y: f32) -> f32 {
        (y * self.scale_y).clamp(0.0, (GRID_ROWS - 1) as f32)
    }

    /// Physical span along x (e.g. a window width) to a span in grid columns
    #[must_use]
    pub fn span_to_cols(&self, width: f32) -> f32 {
        width * self.scale_x
    }
}
