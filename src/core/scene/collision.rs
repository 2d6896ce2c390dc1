//=========================================================================
// Collision Math
//=========================================================================
//
// Pure checks behind `Scene::request_coordinate_update`.
//
// A move is judged one axis at a time against the prospective interval
// `[target, target + extent)`:
//
// ```text
//   positive move (right / down)
//
//        current            obstacle
//     [=========)         [=========)
//     ^ cur.start         ^ obs.start
//             [=========)                 new.end > obs.start → blocked
//                 prospective
// ```
//
// An obstacle only blocks while the actor approaches it, so an actor
// that already overlaps an obstacle can always back out.
//
//=========================================================================

use crate::core::geometry::{Axis, Side, Size, Span};
use crate::core::object::GameObject;

//=== Borders =============================================================

/// Stage side the move would cross, if any.
pub(crate) fn border_violation(
    stage: Size,
    actor: &GameObject,
    axis: Axis,
    target: i32,
) -> Option<Side> {
    let positive = target > actor.position.get(axis);

    // A far end past i32::MAX is past any stage.
    let beyond = target
        .checked_add(actor.size.get(axis))
        .map_or(true, |end| end > stage.get(axis));
    if positive && beyond {
        return Some(Side::of_move(axis, true));
    }
    if !positive && target < 0 {
        return Some(Side::of_move(axis, false));
    }
    None
}

//=== Obstacles ===========================================================

fn cross(axis: Axis) -> Axis {
    match axis {
        Axis::X => Axis::Y,
        Axis::Y => Axis::X,
    }
}

/// True when `obstacle` stops a move from `current` to `prospective`.
fn blocks(current: Span, prospective: Span, obstacle: Span, positive: bool) -> bool {
    if positive {
        current.start <= obstacle.start && prospective.end > obstacle.start
    } else {
        current.end >= obstacle.end && prospective.start < obstacle.end
    }
}

/// First colliding object on the actor's z that stops the move.
pub(crate) fn find_blocker<'a>(
    objects: &'a [GameObject],
    actor: &GameObject,
    axis: Axis,
    target: i32,
) -> Option<&'a GameObject> {
    let bounds = actor.bounds();
    let current = bounds.span(axis);
    let prospective = current.shifted_to(target);
    let positive = target > current.start;
    let actor_cross = bounds.span(cross(axis));

    objects
        .iter()
        .filter(|o| o.id != actor.id && o.collides() && o.z == actor.z)
        .filter(|o| actor_cross.overlaps(&o.bounds().span(cross(axis))))
        .find(|o| blocks(current, prospective, o.bounds().span(axis), positive))
}

/// First colliding object on the actor's z, overlapping it horizontally,
/// whose top lies in `[actor.bottom, actor.bottom + range]`.
pub(crate) fn find_support<'a>(
    objects: &'a [GameObject],
    actor: &GameObject,
    range: i32,
) -> Option<&'a GameObject> {
    let bounds = actor.bounds();
    let actor_x = bounds.span(Axis::X);

    objects
        .iter()
        .filter(|o| o.id != actor.id && o.collides() && o.z == actor.z)
        .filter(|o| actor_x.overlaps(&o.bounds().span(Axis::X)))
        .find(|o| {
            let top = o.bounds().top;
            top >= bounds.bottom && top <= bounds.bottom + range
        })
}

//=========================================================================
// Unit Tests
//=========================================================================
