mod components;
mod entity;
mod game;
mod stores;
mod systems;
mod view;

pub use components::{
    CanvasSize, ComponentStore, Facing, FrameClock, InputIntent, Locomotion, Position, Projectile,
    Rect, SpriteState, Vec2, Velocity,
};
pub use entity::{EntityAllocator, EntityId};
pub use game::{FrameInput, FramePhase, GameState};
pub use stores::ComponentStores;
pub use systems::{FrameSystemId, FRAME_SYSTEM_ORDER};
pub use view::{DrawCommand, RenderView};
