//! Stackgen - procedural tower-stack level generator
//!
//! Synthesizes physically plausible tower-stack puzzle layouts for 2D
//! physics games: a horizontal sequence of vertical stacks, each stack a
//! supportable arrangement of boxes, circles and rectangles, seeded with
//! target "pig" entities placed inside or atop the structures.
//!
//! The generator is pure and deterministic: it consumes entropy only from
//! the caller-supplied RNG, so a fixed seed always reproduces the same
//! layout. Output is a flat list of (label, position) placement records;
//! turning those into live physics bodies is the caller's job.
//!
//! Core modules:
//! - `shapes`: template catalog types and output records
//! - `config`: stacking rules and generation tuning
//! - `generator`: the deterministic placement algorithm

pub mod config;
pub mod error;
pub mod generator;
pub mod shapes;

pub use config::{CompatibilityMatrix, GeneratorConfig};
pub use error::Error;
pub use generator::{bird_count, generate_level};
pub use shapes::{Label, Placement, ShapeKind, ShapeTemplate};

/// Generation tuning constants
pub mod consts {
    /// Default per-template probability that a shape spawns as a mirrored pair
    pub const DEFAULT_DUPLICATE_PROBABILITY: f32 = 0.5;

    /// A nested object must be no wider than this fraction of the box width
    pub const NEST_WIDTH_RATIO: f32 = 0.5;
    /// Cumulative nested height must stay under this fraction of the box height
    pub const NEST_HEIGHT_RATIO: f32 = 0.9;

    /// Interior headroom a box must have, relative to pig height, to hold a pig
    pub const PIG_FIT_HEADROOM: f32 = 1.2;

    /// Upper bound of the horizontal jitter applied to ground placements
    pub const GROUND_JITTER_MAX: f32 = 0.5;

    /// Default bird count range [min, max)
    pub const DEFAULT_BIRD_RANGE: (u32, u32) = (0, 4);
}
