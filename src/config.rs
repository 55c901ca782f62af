//! Generator configuration
//!
//! Everything that was once process-global tuning (stacking rules, stack
//! limits, duplicate probabilities) lives here and is passed explicitly
//! into each generation call, so tests can vary it without shared state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BIRD_RANGE, DEFAULT_DUPLICATE_PROBABILITY};
use crate::error::Error;

/// Which shape classes may rest directly on which.
///
/// `allowed[above][below]`, indexed by [`crate::ShapeKind::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityMatrix {
    allowed: [[bool; 3]; 3],
}

impl Default for CompatibilityMatrix {
    /// The canonical stacking rules: a box may rest on anything; circles
    /// and rects may rest on anything except a circle.
    fn default() -> Self {
        Self {
            allowed: [
                [true, true, true],
                [true, false, true],
                [true, false, true],
            ],
        }
    }
}

impl CompatibilityMatrix {
    pub const fn new(allowed: [[bool; 3]; 3]) -> Self {
        Self { allowed }
    }

    /// True if `above` may rest directly on `below`
    pub fn allows(&self, above: crate::ShapeKind, below: crate::ShapeKind) -> bool {
        self.allowed[above.index()][below.index()]
    }
}

/// Tuning for one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Approximate level width; each stack's widest object is charged
    /// against it when deciding whether to start another stack
    pub max_stack_width: f32,
    /// Approximate stack height; object heights are charged against it
    /// when deciding whether to stack another object
    pub max_stack_height: f32,
    /// One pig target per this many placed objects
    pub pig_density_divisor: u32,
    /// Pig bounding size (width, height) in world units
    pub pig_size: Vec2,
    /// Per-template duplicate probability; empty means the 0.5 default
    /// for every template
    pub duplicate_probability: Vec<f32>,
    /// Bird count range [min, max)
    pub bird_range: (u32, u32),
    /// Stacking rules
    pub compatibility: CompatibilityMatrix,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_stack_width: 1.0,
            max_stack_height: 1.0,
            pig_density_divisor: 1,
            pig_size: Vec2::new(0.5, 0.5),
            duplicate_probability: Vec::new(),
            bird_range: DEFAULT_BIRD_RANGE,
            compatibility: CompatibilityMatrix::default(),
        }
    }
}

impl GeneratorConfig {
    /// Duplicate probability for one template label
    pub fn duplicate_probability_for(&self, label: usize) -> f32 {
        self.duplicate_probability
            .get(label)
            .copied()
            .unwrap_or(DEFAULT_DUPLICATE_PROBABILITY)
    }

    /// Check the configuration against a catalog of `template_count`
    /// templates. Runs before any entropy is consumed.
    pub fn validate(&self, template_count: usize) -> Result<(), Error> {
        if template_count == 0 {
            return Err(Error::InvalidConfiguration(
                "template catalog is empty".into(),
            ));
        }
        if !self.max_stack_width.is_finite() || self.max_stack_width <= 0.0 {
            return Err(Error::InvalidConfiguration(
                "max_stack_width must be positive".into(),
            ));
        }
        if !self.max_stack_height.is_finite() || self.max_stack_height <= 0.0 {
            return Err(Error::InvalidConfiguration(
                "max_stack_height must be positive".into(),
            ));
        }
        if self.pig_density_divisor == 0 {
            return Err(Error::InvalidConfiguration(
                "pig_density_divisor must be positive".into(),
            ));
        }
        if !self.pig_size.is_finite() || self.pig_size.x <= 0.0 || self.pig_size.y <= 0.0 {
            return Err(Error::InvalidConfiguration(
                "pig size must be positive".into(),
            ));
        }
        if !self.duplicate_probability.is_empty() {
            if self.duplicate_probability.len() != template_count {
                return Err(Error::InvalidConfiguration(
                    "duplicate_probability length must match the template catalog".into(),
                ));
            }
            if self
                .duplicate_probability
                .iter()
                .any(|p| !(0.0..=1.0).contains(p))
            {
                return Err(Error::InvalidConfiguration(
                    "duplicate probabilities must lie in [0, 1]".into(),
                ));
            }
        }
        if self.bird_range.0 >= self.bird_range.1 {
            return Err(Error::InvalidConfiguration("bird range is empty".into()));
        }
        Ok(())
    }
}
