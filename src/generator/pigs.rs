//! Pig insertion pass
//!
//! Runs once over the finished stacks. The pig target is derived from the
//! total object count and the configured density divisor; each stack gets a
//! fair share, and the walk stops globally once the target is met. Stacks
//! that finish under quota are topped up with one forced pig.

use glam::Vec2;
use rand::Rng;

use super::arena::{Arena, PlacedObject, Stack};
use crate::config::GeneratorConfig;
use crate::consts::PIG_FIT_HEADROOM;
use crate::shapes::{Label, ShapeKind};

pub(crate) fn insert_pigs<R: Rng>(
    arena: &mut Arena,
    stacks: &mut [Stack],
    config: &GeneratorConfig,
    ground_y: f32,
    rng: &mut R,
) {
    let object_count: usize = stacks.iter().map(|s| s.len()).sum();
    let target = object_count / config.pig_density_divisor as usize;
    let per_stack = target / stacks.len() + 1;
    let pig = config.pig_size;

    let mut total_added = 0usize;

    for stack in stacks.iter_mut() {
        let mut added = 0usize;

        let mut i = 0;
        while i < stack.len() {
            let host_id = stack[i];
            let host = arena[host_id].clone();

            if host.is_kind(ShapeKind::Box)
                && host.size.y - host.nested_height > pig.y * PIG_FIT_HEADROOM
            {
                if let Some(&inside_id) = host.nested.first() {
                    // Above the topmost object enclosed by the box.
                    let inside = &arena[inside_id];
                    let pos = Vec2::new(
                        inside.pos.x,
                        inside.pos.y + inside.size.y + pig.y / 2.0,
                    );
                    let pig_id = arena.insert(PlacedObject::pig(pig, pos));
                    if let Some(at) = stack.iter().position(|&id| id == inside_id) {
                        stack.insert(at + 1, pig_id);
                        added += 1;
                        i += 1;
                    }
                } else if let Some(hold_id) = host.holding {
                    // On top of whatever the box itself rests on.
                    let holder = &arena[hold_id];
                    let pos = Vec2::new(
                        holder.pos.x,
                        holder.pos.y + holder.size.y / 2.0 + pig.y / 2.0,
                    );
                    let pig_id = arena.insert(PlacedObject::pig(pig, pos));
                    if let Some(at) = stack.iter().position(|&id| id == hold_id) {
                        stack.insert(at + 1, pig_id);
                        added += 1;
                        i += 1;
                    }
                } else {
                    // Ground-resting box: the pig sits beside it, under the
                    // same side jitter a duplicate pair gets.
                    let mut x = host.pos.x;
                    if host.is_duplicate {
                        let side = if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
                        x += host.size.x / 4.0 * side;
                    }
                    let pos = Vec2::new(x, ground_y + pig.y / 2.0);
                    let pig_id = arena.insert(PlacedObject::pig(pig, pos));
                    stack.insert(0, pig_id);
                    added += 1;
                    i += 1;
                }
            }

            if added == per_stack {
                break;
            }
            i += 1;
        }

        // Under quota: force one more pig onto the stack top. A circle top
        // converts in place rather than gaining an unstable rider.
        if added < per_stack {
            let top_id = match stack.last() {
                Some(&id) => id,
                None => continue,
            };

            if arena[top_id].is_kind(ShapeKind::Circle) {
                let top = &mut arena[top_id];
                let mut pos = top.pos;
                pos.y -= top.size.y / 2.0;
                pos.y += pig.y / 2.0;
                top.label = Label::Pig;
                top.kind = None;
                top.size = pig;
                top.is_duplicate = false;
                top.pos = pos;
            } else {
                let top = &arena[top_id];
                let pos = Vec2::new(
                    top.pos.x,
                    top.pos.y + top.size.y / 2.0 + pig.y / 2.0,
                );
                let pig_id = arena.insert(PlacedObject::pig(pig, pos));
                stack.push(pig_id);
            }
            added += 1;
        }

        total_added += added;
        if total_added >= target {
            break;
        }
    }

    log::debug!("inserted {total_added} pigs (target {target})");
}
