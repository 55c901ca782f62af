//! Shape templates and placement records
//!
//! The template catalog is supplied by the caller and never owned by the
//! generator; labels in the output index back into it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Shape class of a template; drives the stacking rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Circle,
    Rect,
}

impl ShapeKind {
    /// Look up a shape class from its engine tag string
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Box" => Some(ShapeKind::Box),
            "Circle" => Some(ShapeKind::Circle),
            "Rect" => Some(ShapeKind::Rect),
            _ => None,
        }
    }

    /// Row/column index into the compatibility matrix
    pub const fn index(self) -> usize {
        match self {
            ShapeKind::Box => 0,
            ShapeKind::Circle => 1,
            ShapeKind::Rect => 2,
        }
    }
}

/// One entry of the template catalog: shape class plus bounding size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeTemplate {
    pub kind: ShapeKind,
    /// Bounding size (width, height) in world units
    pub size: Vec2,
}

impl ShapeTemplate {
    pub fn new(kind: ShapeKind, width: f32, height: f32) -> Self {
        Self {
            kind,
            size: Vec2::new(width, height),
        }
    }
}

/// Output label: an index into the template catalog, or the pig sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Shape(usize),
    Pig,
}

impl Label {
    pub fn is_pig(self) -> bool {
        matches!(self, Label::Pig)
    }
}

/// One placed object of the final layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub label: Label,
    /// World-space center
    pub pos: Vec2,
}
