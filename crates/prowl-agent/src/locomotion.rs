//! Movement-intent resolution.
//!
//! States only write intent; this pass turns intent into position, once per
//! tick, after every agent's `update` and before any `late_update`.  The
//! model is deliberately simple — accelerate toward the destination, clamp
//! to the body's caps, snap onto the destination on the final step — because
//! an embedding engine replaces this with its own character controller and
//! only the intent contract matters.

use prowl_world::AgentBody;

/// Distance under which the agent counts as arrived.
const ARRIVE_EPSILON: f32 = 0.01;

/// Advance `body` by one tick of `delta` seconds according to its intent.
pub fn resolve(body: &mut AgentBody, delta: f32) {
    if !body.move_intent.allowed {
        // Frozen in place; bleed speed so a re-allowed agent ramps up again.
        body.speed = (body.speed - body.acceleration * delta).max(0.0);
        return;
    }

    let to_destination = body.move_intent.destination - body.position;
    let distance = to_destination.length();
    if distance <= ARRIVE_EPSILON {
        body.speed = 0.0;
        return;
    }

    body.speed = (body.speed + body.acceleration * delta).min(body.max_speed);
    let step = body.speed * delta;
    let direction = to_destination * (1.0 / distance);

    if step >= distance {
        body.position = body.move_intent.destination;
    } else {
        body.position = body.position + direction * step;
    }
    body.facing = direction;
}
