use crate::tuning::Tuning;
use crate::world::components::{CanvasSize, Facing};
use crate::world::entity::EntityId;
use crate::world::stores::ComponentStores;

/// Applies one tick of intent-driven movement, jump, gravity and ground
/// contact to `player`. Skipped when the player is not fully initialised.
pub(crate) fn integrate_player(
    player: EntityId,
    stores: &mut ComponentStores,
    tuning: &Tuning,
    canvas: CanvasSize,
    dt_seconds: f32,
) {
    let Some(intent) = stores.intents.get(player).copied() else {
        return;
    };
    let half_width = stores
        .sprites
        .get(player)
        .map(|sprite| sprite.half_width())
        .unwrap_or(tuning.fallback_half_width_px);
    let (Some(position), Some(velocity), Some(locomotion)) = (
        stores.positions.get_mut(player),
        stores.velocities.get_mut(player),
        stores.locomotion.get_mut(player),
    ) else {
        return;
    };

    locomotion.previous_x = position.x;
    locomotion.moving = false;
    let step = tuning.move_speed_px_per_second * dt_seconds;

    // Right is applied after left: with both held, right owns the facing.
    if intent.left {
        position.x -= step;
        locomotion.facing = Facing::Left;
        locomotion.moving = true;
    }
    if intent.right {
        position.x += step;
        locomotion.facing = Facing::Right;
        locomotion.moving = true;
    }
    locomotion.attempted_x = position.x;

    if intent.up && locomotion.grounded {
        velocity.y = tuning.jump_impulse_px_per_second;
        locomotion.grounded = false;
    }

    velocity.y += tuning.gravity_px_per_second_sq * dt_seconds;
    position.y += velocity.y * dt_seconds;

    let ground = tuning.ground_level(canvas.height);
    if position.y >= ground {
        position.y = ground;
        velocity.y = 0.0;
        locomotion.grounded = true;
    }

    position.x = clamp_to_canvas(position.x, half_width, canvas.width);
}

/// Keeps a sprite of the given half width inside `[0, width]`. A canvas
/// narrower than the sprite pins it to the centre.
pub(crate) fn clamp_to_canvas(x: f32, half_width: f32, canvas_width: f32) -> f32 {
    let min = half_width;
    let max = canvas_width - half_width;
    if min > max {
        return canvas_width * 0.5;
    }
    x.clamp(min, max)
}
