mod animation;
mod integrator;
mod projectiles;
mod scroll;

pub(crate) use animation::{animate_frame_clocks, animate_player};
pub(crate) use integrator::{clamp_to_canvas, integrate_player};
pub(crate) use projectiles::{spawn_projectile, update_projectiles};
pub(crate) use scroll::{max_scroll_offset, update_scroll};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSystemId {
    Integrator,
    ProjectileSpawn,
    Scroll,
    Animation,
    ProjectileUpdate,
}

impl FrameSystemId {
    pub fn name(self) -> &'static str {
        match self {
            Self::Integrator => "Integrator",
            Self::ProjectileSpawn => "ProjectileSpawn",
            Self::Scroll => "Scroll",
            Self::Animation => "Animation",
            Self::ProjectileUpdate => "ProjectileUpdate",
        }
    }
}

pub const FRAME_SYSTEM_ORDER: [FrameSystemId; 5] = [
    FrameSystemId::Integrator,
    FrameSystemId::ProjectileSpawn,
    FrameSystemId::Scroll,
    FrameSystemId::Animation,
    FrameSystemId::ProjectileUpdate,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_order_text_is_stable() {
        let names: Vec<&'static str> = FRAME_SYSTEM_ORDER.iter().map(|id| id.name()).collect();
        assert_eq!(
            names.join(">"),
            "Integrator>ProjectileSpawn>Scroll>Animation>ProjectileUpdate"
        );
    }
}
