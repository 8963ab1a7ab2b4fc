//! Scene entities for a simulation request
//!
//! A scene describes one room cross-section: the room extent, the fans and
//! windows mounted in it, the occupants inside it, and the outdoor air the
//! windows exchange against. All values are request-scoped; a scene is
//! consumed by one simulation or optimization call and discarded.
//!
//! Room coordinates are an abstract length unit with the origin at the
//! top-left corner, x increasing rightward and y increasing downward.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fallback room width when the caller supplies a non-finite or
/// non-positive dimension (length units)
pub const DEFAULT_ROOM_WIDTH: f32 = 800.0;

/// Fallback room height (length units)
pub const DEFAULT_ROOM_HEIGHT: f32 = 500.0;

/// Outdoor virus-proxy concentration is always zero
pub const OUTDOOR_VIRUS: f32 = 0.0;

/// Room extent in length units
///
/// The room only defines the physical extent the fixed simulation grid maps
/// onto; grid resolution never changes with room size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room width (x extent) in length units
    pub width: f32,
    /// Room height (y extent) in length units
    pub height: f32,
}

impl Room {
    /// Create a room with the given extent
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Return a room with usable dimensions plus a flag recording whether
    /// the caller's values had to be replaced.
    ///
    /// Non-finite or non-positive dimensions are substituted with the
    /// defaults rather than rejected; callers that care can inspect the
    /// returned flag (it is also carried on the simulation result).
    #[must_use]
    pub fn sanitized(&self) -> (Self, bool) {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            (*self, false)
        } else {
            warn!(
                "Replacing unusable room dimensions {}x{} with defaults {}x{}",
                self.width, self.height, DEFAULT_ROOM_WIDTH, DEFAULT_ROOM_HEIGHT
            );
            (Self::default(), true)
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self {
            width: DEFAULT_ROOM_WIDTH,
            height: DEFAULT_ROOM_HEIGHT,
        }
    }
}

/// A ventilation fan mounted somewhere in the room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fan {
    /// Position in room coordinates
    pub position: Vector2<f32>,
    /// Strength multiplier on the fan's radial flow (positive)
    pub strength: f32,
}

impl Fan {
    /// Create a fan with the default strength of 1.0
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self::with_strength(x, y, 1.0)
    }

    /// Create a fan with an explicit strength
    #[must_use]
    pub fn with_strength(x: f32, y: f32, strength: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            strength,
        }
    }
}

/// A window in one of the room walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Center position in room coordinates
    pub position: Vector2<f32>,
    /// Physical width along the wall (length units, positive)
    pub width: f32,
    /// Open fraction, 0 = closed, 1 = fully open
    pub open: f32,
}

impl Window {
    /// Create a window; the open fraction is clamped to [0, 1]
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, open: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            width,
            open: open.clamp(0.0, 1.0),
        }
    }
}

/// Minimum occupant emission multiplier
pub const OCCUPANT_INTENSITY_MIN: f32 = 0.2;

/// Maximum occupant emission multiplier
pub const OCCUPANT_INTENSITY_MAX: f32 = 3.0;

/// A person in the room emitting CO2, virus-proxy aerosol, and heat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    /// Position in room coordinates
    pub position: Vector2<f32>,
    /// Emission multiplier, clamped to [0.2, 3.0]
    pub intensity: f32,
}

impl Occupant {
    /// Create an occupant; intensity is clamped to the supported range
    #[must_use]
    pub fn new(x: f32, y: f32, intensity: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            intensity: intensity.clamp(OCCUPANT_INTENSITY_MIN, OCCUPANT_INTENSITY_MAX),
        }
    }
}

/// Outdoor air baseline the ventilation sink pulls toward
///
/// The virus-proxy baseline is always [`OUTDOOR_VIRUS`] (zero) and is not
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutdoorAir {
    /// Outdoor CO2 concentration (ppm)
    pub co2: f32,
    /// Outdoor temperature (degrees C)
    pub temp: f32,
}

impl Default for OutdoorAir {
    fn default() -> Self {
        Self {
            co2: 420.0, // Current global ambient CO2
            temp: 10.0,
        }
    }
}

/// One complete simulation input: room, equipment, occupants, outdoor air
///
/// This is the plain structure external collaborators (an HTTP layer, a UI)
/// marshal across their boundary; everything on it derives serde.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Room extent
    pub room: Room,
    /// Ventilation fans
    #[serde(default)]
    pub fans: Vec<Fan>,
    /// Windows
    #[serde(default)]
    pub windows: Vec<Window>,
    /// Occupants
    #[serde(default)]
    pub occupants: Vec<Occupant>,
    /// Outdoor air baseline
    #[serde(default)]
    pub outdoor: OutdoorAir,
}
