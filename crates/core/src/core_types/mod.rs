//! Core types and utilities

pub mod scene;

pub use scene::{
    Fan, Occupant, OutdoorAir, Room, Scene, Window, DEFAULT_ROOM_HEIGHT, DEFAULT_ROOM_WIDTH,
    OCCUPANT_INTENSITY_MAX, OCCUPANT_INTENSITY_MIN, OUTDOOR_VIRUS,
};
