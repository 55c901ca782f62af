//! Per-generation arena of placed objects
//!
//! Holding and nesting relationships are indices into the arena, never
//! owning handles; relationships only ever point backward in build order,
//! so no cycle can form. The whole arena is discarded once the layout has
//! been flattened into placement records.

use glam::Vec2;
use std::ops::{Index, IndexMut};

use crate::shapes::{Label, ShapeKind};

/// Index of a placed object within one generation's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ObjId(usize);

/// One vertical column, bottom to top, as arena indices
pub(crate) type Stack = Vec<ObjId>;

/// One object while the layout is under construction
#[derive(Debug, Clone)]
pub(crate) struct PlacedObject {
    pub label: Label,
    /// None for pigs
    pub kind: Option<ShapeKind>,
    /// Bounding size (width, height)
    pub size: Vec2,
    /// World-space center; may be shifted later by column re-leveling
    pub pos: Vec2,
    /// Expands into two horizontally offset instances at output time
    pub is_duplicate: bool,
    /// Object directly beneath in the same stack; None when ground-resting
    pub holding: Option<ObjId>,
    /// Objects enclosed by this box, top of the cluster first
    pub nested: Vec<ObjId>,
    /// Sum of nested object heights
    pub nested_height: f32,
}

impl PlacedObject {
    /// A fresh shape object with no position or relationships yet
    pub fn shape(label: usize, kind: ShapeKind, size: Vec2, is_duplicate: bool) -> Self {
        Self {
            label: Label::Shape(label),
            kind: Some(kind),
            size,
            pos: Vec2::ZERO,
            is_duplicate,
            holding: None,
            nested: Vec::new(),
            nested_height: 0.0,
        }
    }

    /// A pig at the given position
    pub fn pig(size: Vec2, pos: Vec2) -> Self {
        Self {
            label: Label::Pig,
            kind: None,
            size,
            pos,
            is_duplicate: false,
            holding: None,
            nested: Vec::new(),
            nested_height: 0.0,
        }
    }

    pub fn is_kind(&self, kind: ShapeKind) -> bool {
        self.kind == Some(kind)
    }
}

/// Arena of every object placed during one generation call
#[derive(Debug, Default)]
pub(crate) struct Arena {
    objects: Vec<PlacedObject>,
}

impl Arena {
    pub fn insert(&mut self, obj: PlacedObject) -> ObjId {
        let id = ObjId(self.objects.len());
        self.objects.push(obj);
        id
    }
}

impl Index<ObjId> for Arena {
    type Output = PlacedObject;

    fn index(&self, id: ObjId) -> &PlacedObject {
        &self.objects[id.0]
    }
}

impl IndexMut<ObjId> for Arena {
    fn index_mut(&mut self, id: ObjId) -> &mut PlacedObject {
        &mut self.objects[id.0]
    }
}
