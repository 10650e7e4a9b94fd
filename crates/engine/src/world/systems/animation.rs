use crate::tuning::Tuning;
use crate::world::components::Facing;
use crate::world::entity::EntityId;
use crate::world::stores::ComponentStores;

/// Neutral frame while standing, facing frame while moving.
pub(crate) fn animate_player(player: EntityId, stores: &mut ComponentStores, tuning: &Tuning) {
    let Some(locomotion) = stores.locomotion.get(player).copied() else {
        return;
    };
    let Some(sprite) = stores.sprites.get_mut(player) else {
        return;
    };
    let frames = tuning.player_frames;
    let frame = match (locomotion.moving, locomotion.facing) {
        (false, _) => frames.neutral,
        (true, Facing::Left) => frames.facing_left,
        (true, Facing::Right) => frames.facing_right,
    };
    sprite.set_frame(frame);
}

/// Advances every clocked sprite, toggling between frames 0 and 1 once per
/// elapsed interval. The remainder carries over to the next tick.
pub(crate) fn animate_frame_clocks(stores: &mut ComponentStores, tuning: &Tuning, dt_seconds: f32) {
    let interval = tuning.boss_frame_interval_seconds;
    if interval <= 0.0 {
        return;
    }
    for (id, clock) in stores.frame_clocks.iter_mut() {
        let Some(sprite) = stores.sprites.get_mut(id) else {
            continue;
        };
        clock.accumulator_seconds += dt_seconds;
        while clock.accumulator_seconds >= interval {
            clock.accumulator_seconds -= interval;
            let next = if sprite.current_frame() == 0 { 1 } else { 0 };
            sprite.set_frame(next);
        }
    }
}
