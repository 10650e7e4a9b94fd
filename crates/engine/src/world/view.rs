use crate::assets::ImageHandle;
use crate::tuning::Tuning;

use super::components::{CanvasSize, Rect};
use super::entity::EntityId;
use super::stores::ComponentStores;

/// One sprite blit: a sheet region drawn into a canvas region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub entity: EntityId,
    pub image: ImageHandle,
    pub source: Rect,
    pub dest: Rect,
}

/// Everything a renderer needs for one frame, in draw order. Read-only with
/// respect to game state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderView {
    pub canvas: CanvasSize,
    pub scroll_offset: f32,
    pub commands: Vec<DrawCommand>,
}

pub(crate) struct ViewSources<'a> {
    pub stores: &'a ComponentStores,
    pub tuning: &'a Tuning,
    pub background: EntityId,
    pub boss: EntityId,
    pub player: EntityId,
    pub scroll_offset: f32,
}

pub(crate) fn build_render_view(sources: ViewSources<'_>, canvas: CanvasSize) -> RenderView {
    let ViewSources {
        stores,
        tuning,
        background,
        boss,
        player,
        scroll_offset,
    } = sources;
    let mut commands = Vec::new();

    if let Some(sprite) = stores.sprites.get(background) {
        let full_width = (sprite.frame_width * sprite.frame_count) as f32;
        commands.push(DrawCommand {
            entity: background,
            image: sprite.image,
            source: Rect {
                x: scroll_offset,
                y: 0.0,
                width: full_width * tuning.visible_background_fraction,
                height: sprite.frame_height as f32,
            },
            dest: Rect {
                x: 0.0,
                y: 0.0,
                width: canvas.width,
                height: canvas.height,
            },
        });
    }

    let projectiles = stores
        .projectiles
        .iter()
        .filter(|(_, projectile)| projectile.active)
        .map(|(id, _)| id);
    for id in [boss, player].into_iter().chain(projectiles) {
        let (Some(position), Some(sprite)) = (stores.positions.get(id), stores.sprites.get(id))
        else {
            continue;
        };
        let source = sprite.source_rect();
        commands.push(DrawCommand {
            entity: id,
            image: sprite.image,
            source,
            dest: Rect::centered_on(*position, source.width, source.height),
        });
    }

    RenderView {
        canvas,
        scroll_offset,
        commands,
    }
}
