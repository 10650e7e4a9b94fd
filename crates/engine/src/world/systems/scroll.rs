use crate::assets::SpriteSheet;
use crate::tuning::Tuning;
use crate::world::components::CanvasSize;
use crate::world::entity::EntityId;
use crate::world::stores::ComponentStores;

use super::integrator::clamp_to_canvas;

/// Furthest the background may scroll: a fraction of the full sheet width.
/// Zero without a loaded background, which disables scrolling.
pub(crate) fn max_scroll_offset(background: Option<&SpriteSheet>, tuning: &Tuning) -> f32 {
    background
        .map(|sheet| (sheet.frame_width * sheet.frame_count) as f32 * tuning.max_scroll_fraction)
        .unwrap_or(0.0)
}

/// Camera dead zone. Past a trigger the player's attempted move is spent on
/// the background offset and the player is pinned at the trigger. Both
/// triggers are checked every tick.
pub(crate) fn update_scroll(
    player: EntityId,
    stores: &mut ComponentStores,
    scroll_offset: &mut f32,
    max_offset: f32,
    tuning: &Tuning,
    canvas: CanvasSize,
) {
    let Some(intent) = stores.intents.get(player).copied() else {
        return;
    };
    let half_width = stores
        .sprites
        .get(player)
        .map(|sprite| sprite.half_width())
        .unwrap_or(tuning.fallback_half_width_px);
    let (Some(position), Some(locomotion)) = (
        stores.positions.get_mut(player),
        stores.locomotion.get_mut(player),
    ) else {
        return;
    };

    let right_trigger = canvas.width * tuning.right_scroll_trigger_fraction;
    let left_trigger = canvas.width * tuning.left_scroll_trigger_fraction;
    let previous_x = locomotion.previous_x;
    // The integrator's canvas clamp is redone below; after a shrink it can
    // pull x far behind previous_x.
    let mut x = locomotion.attempted_x;

    if intent.right && x >= right_trigger && *scroll_offset < max_offset {
        let amount = x - previous_x;
        *scroll_offset = (*scroll_offset + amount).clamp(0.0, max_offset);
        x = right_trigger;
    }

    if intent.left && x <= left_trigger && *scroll_offset > 0.0 {
        let amount = previous_x - x;
        *scroll_offset = (*scroll_offset - amount).clamp(0.0, max_offset);
        x = left_trigger;
    }

    position.x = clamp_to_canvas(x, half_width, canvas.width);
}
