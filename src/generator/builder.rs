//! Stack-sequence and stack-construction algorithms
//!
//! Stacks are built left to right, each stack bottom up. Both loops use
//! decaying continue-probabilities rather than hard caps: the stack loop
//! charges each finished stack's widest object against `max_stack_width`,
//! the object loop charges each placed object's height against
//! `max_stack_height`. The width charge is an approximation, not a strict
//! bound, and may occasionally overshoot.

use glam::Vec2;
use rand::Rng;

use super::arena::{Arena, ObjId, PlacedObject, Stack};
use crate::config::GeneratorConfig;
use crate::consts::{GROUND_JITTER_MAX, NEST_HEIGHT_RATIO, NEST_WIDTH_RATIO};
use crate::shapes::{ShapeKind, ShapeTemplate};

/// Transient state for one generation call
pub(crate) struct LevelBuilder<'a, R: Rng> {
    templates: &'a [ShapeTemplate],
    config: &'a GeneratorConfig,
    ground_y: f32,
    rng: &'a mut R,
    arena: Arena,
    stacks: Vec<Stack>,
}

impl<'a, R: Rng> LevelBuilder<'a, R> {
    pub fn new(
        templates: &'a [ShapeTemplate],
        config: &'a GeneratorConfig,
        ground_y: f32,
        rng: &'a mut R,
    ) -> Self {
        Self {
            templates,
            config,
            ground_y,
            rng,
            arena: Arena::default(),
            stacks: Vec::new(),
        }
    }

    /// Build the full stack sequence and hand back the arena and columns
    pub fn build(mut self) -> (Arena, Vec<Stack>) {
        let mut continue_prob = 1.0f32;

        while self.rng.random::<f32>() <= continue_prob {
            let stack_idx = self.stacks.len();
            self.stacks.push(Stack::new());
            self.build_stack(stack_idx);

            let widest = self.widest_in_stack(stack_idx, f32::INFINITY);
            continue_prob -= self.arena[widest].size.x / self.config.max_stack_width;
        }

        (self.arena, self.stacks)
    }

    /// Grow one stack bottom-up until the height budget or the candidate
    /// pool runs out
    fn build_stack(&mut self, stack_idx: usize) {
        let mut stack_prob = 1.0f32;

        while self.rng.random::<f32>() <= stack_prob {
            let Some(id) = self.next_object(stack_idx) else {
                break;
            };
            self.stacks[stack_idx].push(id);
            stack_prob -= self.arena[id].size.y / self.config.max_stack_height;
        }
    }

    /// Pick and place the next object for a stack. None means no stable
    /// candidate exists for this position, which ends the stack normally.
    fn next_object(&mut self, stack_idx: usize) -> Option<ObjId> {
        let mut obj = self.choose_label(stack_idx)?;
        self.assign_position(stack_idx, &mut obj);
        Some(self.arena.insert(obj))
    }

    /// Select a template for the next stack position, applying the
    /// compatibility and stability rules
    fn choose_label(&mut self, stack_idx: usize) -> Option<PlacedObject> {
        let below = self.stacks[stack_idx].last().copied();

        // Resting on the ground: any template is eligible.
        let Some(below) = below else {
            let label = self.rng.random_range(0..self.templates.len());
            let template = self.templates[label];
            let mut is_duplicate =
                self.rng.random::<f32>() < self.config.duplicate_probability_for(label);
            // A pair of boxes cannot share a slot as a stable load.
            if template.kind == ShapeKind::Box {
                is_duplicate = false;
            }
            return Some(PlacedObject::shape(
                label,
                template.kind,
                template.size,
                is_duplicate,
            ));
        };

        let below_kind = self.arena[below].kind?;
        let mut candidates = self.stackable_labels(below_kind);

        while !candidates.is_empty() {
            // The last candidate is only reachable once the pool shrinks to
            // one; preserved from the reference generator.
            let pick = if candidates.len() > 1 {
                self.rng.random_range(0..candidates.len() - 1)
            } else {
                0
            };
            let label = candidates[pick];
            let template = self.templates[label];

            let mut is_duplicate =
                self.rng.random::<f32>() < self.config.duplicate_probability_for(label);

            if template.kind == ShapeKind::Box {
                is_duplicate = false;

                // Walk down from the stack top, enclosing objects small
                // enough to sit inside the box.
                let mut nested: Vec<ObjId> = Vec::new();
                let mut nested_height = 0.0f32;
                let mut cursor = self.stacks[stack_idx].len();

                while cursor > 0 {
                    let under = &self.arena[self.stacks[stack_idx][cursor - 1]];
                    if under.size.x <= template.size.x * NEST_WIDTH_RATIO
                        && nested_height + under.size.y < template.size.y * NEST_HEIGHT_RATIO
                    {
                        nested.push(self.stacks[stack_idx][cursor - 1]);
                        nested_height += under.size.y;
                        cursor -= 1;
                    } else {
                        break;
                    }
                }

                if cursor == 0 {
                    // Nested all the way down; the box rests on the ground.
                    let mut obj =
                        PlacedObject::shape(label, template.kind, template.size, is_duplicate);
                    obj.nested = nested;
                    obj.nested_height = nested_height;
                    return Some(obj);
                }

                let hold_id = self.stacks[stack_idx][cursor - 1];
                if self.arena[hold_id].size.x >= template.size.x {
                    let mut obj =
                        PlacedObject::shape(label, template.kind, template.size, is_duplicate);
                    obj.holding = Some(hold_id);
                    obj.nested = nested;
                    obj.nested_height = nested_height;
                    return Some(obj);
                }
            } else if self.arena[below].size.x >= template.size.x {
                let mut obj =
                    PlacedObject::shape(label, template.kind, template.size, is_duplicate);
                obj.holding = Some(below);
                return Some(obj);
            }

            candidates.remove(pick);
        }

        None
    }

    /// Templates whose shape class may rest on `below`, in catalog order
    fn stackable_labels(&self, below: ShapeKind) -> Vec<usize> {
        (0..self.templates.len())
            .filter(|&i| self.config.compatibility.allows(self.templates[i].kind, below))
            .collect()
    }

    /// Assign the object's position and re-level the column beneath it
    fn assign_position(&mut self, stack_idx: usize, obj: &mut PlacedObject) {
        let size = obj.size;

        // Surface the object rests on: the holder's top, or the ground.
        let surface = match obj.holding {
            Some(id) => {
                let holder = &self.arena[id];
                Vec2::new(holder.pos.x, holder.pos.y + holder.size.y / 2.0)
            }
            None => {
                let mut x = self.rng.random_range(0.0..GROUND_JITTER_MAX);

                if self.stacks[stack_idx].is_empty() {
                    if stack_idx > 0 {
                        if !self.stacks[stack_idx - 1].is_empty() {
                            let widest = self.widest_in_stack(stack_idx - 1, size.y);
                            let w = &self.arena[widest];
                            x += w.pos.x + w.size.x / 2.0;
                        }
                        x += size.x / 2.0;
                    }
                } else if stack_idx > 0 {
                    // A box that nested the whole column down to the ground.
                    let widest = self.widest_in_stack(stack_idx - 1, size.y);
                    let w = &self.arena[widest];
                    x += w.pos.x + w.size.x / 2.0 + size.x / 2.0;
                }

                Vec2::new(x, self.ground_y)
            }
        };

        obj.pos = Vec2::new(surface.x, surface.y + size.y / 2.0);

        // Every object already in the column moves onto the new x.
        for &id in &self.stacks[stack_idx] {
            self.arena[id].pos.x = surface.x;
        }
    }

    /// Widest object among those inside a cumulative-height window from the
    /// stack bottom. The first object is always eligible; heights start
    /// accumulating from the second.
    fn widest_in_stack(&self, stack_idx: usize, max_height: f32) -> ObjId {
        let stack = &self.stacks[stack_idx];
        let mut widest = stack[0];
        let mut height = 0.0f32;

        for &id in &stack[1..] {
            if height > max_height {
                break;
            }
            if self.arena[id].size.x > self.arena[widest].size.x {
                widest = id;
            }
            height += self.arena[id].size.y;
        }

        widest
    }
}
