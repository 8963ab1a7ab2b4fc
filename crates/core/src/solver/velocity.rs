//! Velocity field construction from fans and windows
//!
//! The airflow model is diagnostic, not dynamic: each step derives the full
//! 2D velocity field directly from the current fan and window placements
//! instead of integrating momentum.
//!
//! - Each fan contributes a pseudo-radial repulsive field. Per axis the
//!   contribution is `offset / (offset^2 + eps)`, which peaks a short
//!   distance from the hub and decays with distance; `eps` removes the
//!   singularity at the hub itself.
//! - Each window drives a straight draft through a rectangular band of
//!   cells, directed inward from the nearest wall. Band width follows the
//!   window's physical width; band height is a fixed number of rows.
//!
//! Fans and windows are static within a run, but the field is still rebuilt
//! from scratch every step; callers wanting to cache it may do so as a pure
//! optimization.

use crate::core_types::{Fan, Room, Window};
use crate::solver::fields::{Field, GridMap, GRID_COLS, GRID_ROWS};
use crate::solver::params::SimParams;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// The four room walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

impl Wall {
    /// Unit direction pointing into the room from this wall
    ///
    /// y increases downward, so "into the room" from the top wall is +y.
    #[must_use]
    pub fn inward(self) -> Vector2<f32> {
        match self {
            Wall::Left => Vector2::new(1.0, 0.0),
            Wall::Right => Vector2::new(-1.0, 0.0),
            Wall::Top => Vector2::new(0.0, 1.0),
            Wall::Bottom => Vector2::new(0.0, -1.0),
        }
    }
}

/// Wall closest to a position, checked left, right, top, bottom
///
/// Comparisons are strict, so on exact ties the earlier wall in the check
/// order wins (a window equidistant from all four walls counts as a
/// left-wall window).
#[must_use]
pub fn nearest_wall(room: &Room, position: Vector2<f32>) -> Wall {
    let mut wall = Wall::Left;
    let mut dist = position.x;

    let d_right = room.width - position.x;
    if d_right < dist {
        wall = Wall::Right;
        dist = d_right;
    }
    let d_top = position.y;
    if d_top < dist {
        wall = Wall::Top;
        dist = d_top;
    }
    let d_bottom = room.height - position.y;
    if d_bottom < dist {
        wall = Wall::Bottom;
    }
    wall
}

/// Rectangular band of grid cells a window acts on
///
/// The same band receives both the velocity injection and the ventilation
/// sink. Ranges are inclusive and already clamped to the grid; a band can be
/// empty for a degenerate window width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBand {
    pub col_min: usize,
    pub col_max: usize,
    pub row_min: usize,
    pub row_max: usize,
}

impl WindowBand {
    /// Compute the band for a window: half-width from the window's physical
    /// width scaled into grid columns, fixed half-height in rows, centered
    /// on the window's grid cell.
    #[must_use]
    pub fn of(window: &Window, map: &GridMap, half_rows: f32) -> Option<Self> {
        let wc = map.to_grid_x(window.position.x);
        let wr = map.to_grid_y(window.position.y);
        let half_cols = map.span_to_cols(window.width) * 0.5;

        let col_min = (wc - half_cols).ceil().max(0.0) as usize;
        let col_max = (wc + half_cols).floor().min((GRID_COLS - 1) as f32) as usize;
        let row_min = (wr - half_rows).ceil().max(0.0) as usize;
        let row_max = (wr + half_rows).floor().min((GRID_ROWS - 1) as f32) as usize;

        if col_min > col_max || row_min > row_max {
            return None;
        }
        Some(Self {
            col_min,
            col_max,
            row_min,
            row_max,
        })
    }

    /// Whether a cell lies inside the band
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row_min && row <= self.row_max && col >= self.col_min && col <= self.col_max
    }
}

/// 2D velocity field over the simulation grid
///
/// Component fields share the scalar [`Field`] storage so the advection
/// step can sample them with the same bilinear machinery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityField {
    /// x (column-axis) component per cell
    pub vx: Field,
    /// y (row-axis) component per cell
    pub vy: Field,
}

impl VelocityField {
    /// Build the velocity field for the current fan and window placements
    #[must_use]
    pub fn build(room: &Room, fans: &[Fan], windows: &[Window], map: &GridMap, params: &SimParams) -> Self {
        let mut vx = Field::new();
        let mut vy = Field::new();

        for fan in fans {
            let fx = map.to_grid_x(fan.position.x);
            let fy = map.to_grid_y(fan.position.y);
            let gain = params.fan_strength * fan.strength;

            let vx_data = vx.as_mut_slice();
            let vy_data = vy.as_mut_slice();
            for row in 0..GRID_ROWS {
                let dy = row as f32 - fy;
                for col in 0..GRID_COLS {
                    let dx = col as f32 - fx;
                    let idx = row * GRID_COLS + col;
                    vx_data[idx] += dx / (dx * dx + params.fan_epsilon) * gain;
                    vy_data[idx] += dy / (dy * dy + params.fan_epsilon) * gain;
                }
            }
        }

        for window in windows {
            let Some(band) = WindowBand::of(window, map, params.window_band_half_rows) else {
                continue;
            };
            let dir = nearest_wall(room, window.position).inward();
            let flow = params.window_flow * window.open;

            for row in band.row_min..=band.row_max {
                for col in band.col_min..=band.col_max {
                    vx.set(row, col, vx.get(row, col) + dir.x * flow);
                    vy.set(row, col, vy.get(row, col) + dir.y * flow);
                }
            }
        }

        Self { vx, vy }
    }

    /// Velocity vector stored at a cell
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> Vector2<f32> {
        Vector2::new(self.vx.get(row, col), self.vy.get(row, col))
    }
}
