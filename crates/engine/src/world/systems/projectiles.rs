use tracing::debug;

use crate::assets::SpriteSheet;
use crate::tuning::Tuning;
use crate::world::components::{CanvasSize, ComponentStore, Projectile, SpriteState, Vec2};
use crate::world::entity::{EntityAllocator, EntityId};
use crate::world::stores::ComponentStores;

/// Launches one projectile from the player's position in the facing
/// direction. Returns `None` without touching the pool while the template
/// sheet is not loaded or the player is not placed yet.
pub(crate) fn spawn_projectile(
    player: EntityId,
    allocator: &mut EntityAllocator,
    stores: &mut ComponentStores,
    template: Option<&SpriteSheet>,
    tuning: &Tuning,
) -> Option<EntityId> {
    let Some(template) = template else {
        debug!("projectile_spawn_skipped_template_not_ready");
        return None;
    };
    let origin = *stores.positions.get(player)?;
    let facing = stores
        .locomotion
        .get(player)
        .map(|locomotion| locomotion.facing)
        .unwrap_or_default();

    let id = allocator.allocate();
    // A pooled id still carries its previous data; every store is rewritten.
    stores.positions.insert(id, origin);
    stores.velocities.insert(
        id,
        Vec2::new(facing.sign() * tuning.projectile_speed_px_per_second, 0.0),
    );
    stores.sprites.insert(id, SpriteState::from_sheet(template));
    stores.projectiles.insert(id, Projectile { active: true });
    debug!(entity = id.0, pooled = allocator.pool().len(), "projectile_spawned");
    Some(id)
}

/// Moves active projectiles and retires any that left the canvas. Returns
/// the number retired this tick.
pub(crate) fn update_projectiles(
    allocator: &mut EntityAllocator,
    stores: &mut ComponentStores,
    canvas: CanvasSize,
    dt_seconds: f32,
) -> usize {
    let mut retired = Vec::new();
    for (id, projectile) in stores.projectiles.iter_mut() {
        if !projectile.active {
            continue;
        }
        let (Some(position), Some(velocity)) =
            (stores.positions.get_mut(id), stores.velocities.get(id))
        else {
            continue;
        };
        position.x += velocity.x * dt_seconds;
        position.y += velocity.y * dt_seconds;

        if !canvas.contains(*position) {
            projectile.active = false;
            retired.push(id);
        }
    }

    for &id in &retired {
        recycle_projectile(allocator, &stores.projectiles, id);
    }
    retired.len()
}

/// Hands a projectile id back to the pool. The projectile must already be
/// inactive; recycling a live one would let `allocate` hand it out twice.
pub(crate) fn recycle_projectile(
    allocator: &mut EntityAllocator,
    projectiles: &ComponentStore<Projectile>,
    id: EntityId,
) {
    debug_assert!(
        projectiles.get(id).map_or(true, |projectile| !projectile.active),
        "projectile {id:?} recycled while still active"
    );
    allocator.recycle(id);
}
