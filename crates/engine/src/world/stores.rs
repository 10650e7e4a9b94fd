use super::components::{
    ComponentStore, FrameClock, InputIntent, Locomotion, Position, Projectile, SpriteState,
    Velocity,
};

/// Every per-aspect store, side by side. Systems borrow the stores they need
/// and skip any entity that lacks a required companion.
#[derive(Debug, Default)]
pub struct ComponentStores {
    pub positions: ComponentStore<Position>,
    pub velocities: ComponentStore<Velocity>,
    pub sprites: ComponentStore<SpriteState>,
    pub intents: ComponentStore<InputIntent>,
    pub projectiles: ComponentStore<Projectile>,
    pub locomotion: ComponentStore<Locomotion>,
    pub frame_clocks: ComponentStore<FrameClock>,
}
