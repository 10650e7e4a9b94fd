use serde::Deserialize;
use thiserror::Error;

/// Reference tick rate the per-tick constants were authored against.
pub const REFERENCE_TICKS_PER_SECOND: f32 = 60.0;

/// Gameplay constants. Rates are per second so every system can scale them
/// by the frame delta.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub move_speed_px_per_second: f32,
    pub gravity_px_per_second_sq: f32,
    /// Negative: screen y grows downward.
    pub jump_impulse_px_per_second: f32,
    pub ground_offset_px: f32,
    /// Used for bounds clamping until the player sheet has loaded.
    pub fallback_half_width_px: f32,
    pub right_scroll_trigger_fraction: f32,
    pub left_scroll_trigger_fraction: f32,
    pub max_scroll_fraction: f32,
    pub visible_background_fraction: f32,
    pub boss_frame_interval_seconds: f32,
    pub boss_anchor_fraction: f32,
    pub projectile_speed_px_per_second: f32,
    pub player_frames: PlayerFrames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerFrames {
    pub neutral: u32,
    pub facing_left: u32,
    pub facing_right: u32,
}

impl Default for PlayerFrames {
    fn default() -> Self {
        Self {
            neutral: 0,
            facing_left: 1,
            facing_right: 2,
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        let tps = REFERENCE_TICKS_PER_SECOND;
        Self {
            move_speed_px_per_second: 3.0 * tps,
            gravity_px_per_second_sq: 0.5 * tps * tps,
            jump_impulse_px_per_second: -12.0 * tps,
            ground_offset_px: 200.0,
            fallback_half_width_px: 32.0,
            right_scroll_trigger_fraction: 2.0 / 3.0,
            left_scroll_trigger_fraction: 1.0 / 3.0,
            max_scroll_fraction: 2.0 / 3.0,
            visible_background_fraction: 1.0 / 3.0,
            boss_frame_interval_seconds: 0.5,
            boss_anchor_fraction: 0.8,
            projectile_speed_px_per_second: 8.0 * tps,
            player_frames: PlayerFrames::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be within [0, 1], got {value}")]
    FractionOutOfRange { field: &'static str, value: f32 },
    #[error(
        "left_scroll_trigger_fraction ({left}) must not exceed right_scroll_trigger_fraction ({right})"
    )]
    TriggersCrossed { left: f32, right: f32 },
}

impl Tuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        let all = [
            ("move_speed_px_per_second", self.move_speed_px_per_second),
            ("gravity_px_per_second_sq", self.gravity_px_per_second_sq),
            ("jump_impulse_px_per_second", self.jump_impulse_px_per_second),
            ("ground_offset_px", self.ground_offset_px),
            ("fallback_half_width_px", self.fallback_half_width_px),
            ("right_scroll_trigger_fraction", self.right_scroll_trigger_fraction),
            ("left_scroll_trigger_fraction", self.left_scroll_trigger_fraction),
            ("max_scroll_fraction", self.max_scroll_fraction),
            ("visible_background_fraction", self.visible_background_fraction),
            ("boss_frame_interval_seconds", self.boss_frame_interval_seconds),
            ("boss_anchor_fraction", self.boss_anchor_fraction),
            ("projectile_speed_px_per_second", self.projectile_speed_px_per_second),
        ];
        for (field, value) in all {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("move_speed_px_per_second", self.move_speed_px_per_second),
            ("boss_frame_interval_seconds", self.boss_frame_interval_seconds),
            ("projectile_speed_px_per_second", self.projectile_speed_px_per_second),
            ("visible_background_fraction", self.visible_background_fraction),
        ] {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("right_scroll_trigger_fraction", self.right_scroll_trigger_fraction),
            ("left_scroll_trigger_fraction", self.left_scroll_trigger_fraction),
            ("max_scroll_fraction", self.max_scroll_fraction),
            ("visible_background_fraction", self.visible_background_fraction),
            ("boss_anchor_fraction", self.boss_anchor_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::FractionOutOfRange { field, value });
            }
        }

        if self.left_scroll_trigger_fraction > self.right_scroll_trigger_fraction {
            return Err(TuningError::TriggersCrossed {
                left: self.left_scroll_trigger_fraction,
                right: self.right_scroll_trigger_fraction,
            });
        }
        Ok(())
    }

    pub fn ground_level(&self, canvas_height: f32) -> f32 {
        canvas_height - self.ground_offset_px
    }
}
