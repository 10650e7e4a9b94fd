use tracing::info;

use crate::assets::{AssetCompletion, AssetManifest, AssetStore, CompletionOutcome, SpriteRole};
use crate::tuning::Tuning;

use super::components::{
    CanvasSize, FrameClock, InputIntent, Locomotion, Projectile, SpriteState, Vec2,
};
use super::entity::{EntityAllocator, EntityId};
use super::stores::ComponentStores;
use super::systems::{
    animate_frame_clocks, animate_player, clamp_to_canvas, integrate_player, max_scroll_offset,
    spawn_projectile, update_projectiles, update_scroll, FrameSystemId, FRAME_SYSTEM_ORDER,
};
use super::view::{build_render_view, RenderView, ViewSources};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Waiting for every declared asset to report in. Ticks are no-ops.
    Loading,
    Running,
}

/// Per-tick input snapshot. `fire_pressed` is an edge: true only on the
/// tick the fire key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub intent: InputIntent,
    pub fire_pressed: bool,
}

/// The whole session: asset readiness, entities, component stores and the
/// scroll offset. Owned by the frame loop and advanced once per tick.
#[derive(Debug)]
pub struct GameState {
    tuning: Tuning,
    phase: FramePhase,
    assets: AssetStore,
    allocator: EntityAllocator,
    stores: ComponentStores,
    background: EntityId,
    player: EntityId,
    boss: EntityId,
    placed: bool,
    scroll_offset: f32,
    tick_count: u64,
    last_tick_order: Vec<FrameSystemId>,
}

impl GameState {
    pub fn new(tuning: Tuning, manifest: &AssetManifest) -> Self {
        let mut allocator = EntityAllocator::default();
        let background = allocator.allocate_fresh();
        let player = allocator.allocate_fresh();
        let boss = allocator.allocate_fresh();
        let mut state = Self {
            tuning,
            phase: FramePhase::Loading,
            assets: AssetStore::new(manifest),
            allocator,
            stores: ComponentStores::default(),
            background,
            player,
            boss,
            placed: false,
            scroll_offset: 0.0,
            tick_count: 0,
            last_tick_order: Vec::with_capacity(FRAME_SYSTEM_ORDER.len()),
        };
        state.enter_running_if_ready();
        state
    }

    /// Counts one asset completion. The first time every declared asset has
    /// reported, loaded or failed, the session starts running.
    pub fn record_asset(&mut self, completion: AssetCompletion) -> CompletionOutcome {
        let outcome = self.assets.record(completion);
        self.enter_running_if_ready();
        outcome
    }

    fn enter_running_if_ready(&mut self) {
        if self.phase == FramePhase::Loading && self.assets.is_ready() {
            self.phase = FramePhase::Running;
            let loaded = SpriteRole::ALL
                .iter()
                .filter(|role| self.assets.sheet(**role).is_some())
                .count();
            info!(
                declared = self.assets.declared_count(),
                loaded,
                "game_running"
            );
        }
    }

    /// Runs one frame of gameplay. Returns false while still loading, and
    /// while the canvas has no area (minimised window): nothing moves then.
    pub fn tick(&mut self, dt_seconds: f32, input: &FrameInput, canvas: CanvasSize) -> bool {
        if self.phase != FramePhase::Running || canvas.is_degenerate() {
            return false;
        }
        let dt_seconds = if dt_seconds.is_finite() {
            dt_seconds.max(0.0)
        } else {
            0.0
        };
        if !self.placed {
            self.place_entities(canvas);
        }
        self.stores.intents.insert(self.player, input.intent);

        self.last_tick_order.clear();
        for system_id in FRAME_SYSTEM_ORDER {
            self.last_tick_order.push(system_id);
            self.run_system(system_id, dt_seconds, input, canvas);
        }
        self.tick_count += 1;
        true
    }

    fn run_system(
        &mut self,
        system_id: FrameSystemId,
        dt_seconds: f32,
        input: &FrameInput,
        canvas: CanvasSize,
    ) {
        match system_id {
            FrameSystemId::Integrator => {
                integrate_player(self.player, &mut self.stores, &self.tuning, canvas, dt_seconds);
                self.anchor_boss(canvas);
            }
            FrameSystemId::ProjectileSpawn => {
                if input.fire_pressed {
                    spawn_projectile(
                        self.player,
                        &mut self.allocator,
                        &mut self.stores,
                        self.assets.sheet(SpriteRole::Projectile),
                        &self.tuning,
                    );
                }
            }
            FrameSystemId::Scroll => {
                let max_offset =
                    max_scroll_offset(self.assets.sheet(SpriteRole::Background), &self.tuning);
                update_scroll(
                    self.player,
                    &mut self.stores,
                    &mut self.scroll_offset,
                    max_offset,
                    &self.tuning,
                    canvas,
                );
            }
            FrameSystemId::Animation => {
                animate_player(self.player, &mut self.stores, &self.tuning);
                animate_frame_clocks(&mut self.stores, &self.tuning, dt_seconds);
            }
            FrameSystemId::ProjectileUpdate => {
                update_projectiles(&mut self.allocator, &mut self.stores, canvas, dt_seconds);
            }
        }
    }

    /// First running tick: put the long-lived entities on screen and attach
    /// whichever sheets loaded.
    fn place_entities(&mut self, canvas: CanvasSize) {
        let ground = self.tuning.ground_level(canvas.height);
        let sheet = |role: SpriteRole| self.assets.sheet(role).map(SpriteState::from_sheet);
        let background_sprite = sheet(SpriteRole::Background);
        let player_sprite = sheet(SpriteRole::Player);
        let boss_sprite = sheet(SpriteRole::Boss);

        if let Some(sprite) = background_sprite {
            self.stores.sprites.insert(self.background, sprite);
        }

        let player_x = canvas.width * 0.5;
        self.stores
            .positions
            .insert(self.player, Vec2::new(player_x, ground));
        self.stores.velocities.insert(self.player, Vec2::default());
        self.stores.locomotion.insert(
            self.player,
            Locomotion {
                previous_x: player_x,
                attempted_x: player_x,
                ..Locomotion::default()
            },
        );
        self.stores.intents.insert(self.player, InputIntent::default());
        if let Some(sprite) = player_sprite {
            self.stores.sprites.insert(self.player, sprite);
        }

        self.stores.frame_clocks.insert(self.boss, FrameClock::default());
        if let Some(sprite) = boss_sprite {
            self.stores.sprites.insert(self.boss, sprite);
        }
        self.anchor_boss(canvas);

        self.placed = true;
        info!(
            canvas_width = canvas.width,
            canvas_height = canvas.height,
            entity_count = self.allocator.high_water_mark(),
            "entities_placed"
        );
    }

    /// The boss stands on the ground at a fixed fraction of the canvas width,
    /// so it follows resizes.
    fn anchor_boss(&mut self, canvas: CanvasSize) {
        let half_width = self
            .stores
            .sprites
            .get(self.boss)
            .map(|sprite| sprite.half_width())
            .unwrap_or(self.tuning.fallback_half_width_px);
        let x = clamp_to_canvas(
            canvas.width * self.tuning.boss_anchor_fraction,
            half_width,
            canvas.width,
        );
        let y = self.tuning.ground_level(canvas.height);
        self.stores.positions.insert(self.boss, Vec2::new(x, y));
    }

    pub fn render_view(&self, canvas: CanvasSize) -> RenderView {
        build_render_view(
            ViewSources {
                stores: &self.stores,
                tuning: &self.tuning,
                background: self.background,
                boss: self.boss,
                player: self.player,
                scroll_offset: self.scroll_offset,
            },
            canvas,
        )
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == FramePhase::Running
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn stores(&self) -> &ComponentStores {
        &self.stores
    }

    pub fn allocator(&self) -> &EntityAllocator {
        &self.allocator
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn boss(&self) -> EntityId {
        self.boss
    }

    pub fn background(&self) -> EntityId {
        self.background
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_tick_order(&self) -> &[FrameSystemId] {
        &self.last_tick_order
    }

    pub fn live_projectile_count(&self) -> usize {
        self.stores
            .projectiles
            .iter()
            .filter(|(_, projectile)| projectile.active)
            .count()
    }

    pub fn is_live_projectile(&self, id: EntityId) -> bool {
        matches!(
            self.stores.projectiles.get(id),
            Some(Projectile { active: true })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetId, AssetLoadError, DecodedImage, LoadedSheet};
    use crate::tuning::REFERENCE_TICKS_PER_SECOND;
    use crate::world::components::Facing;

    const DT: f32 = 1.0 / REFERENCE_TICKS_PER_SECOND;

    fn canvas() -> CanvasSize {
        CanvasSize::new(800.0, 600.0)
    }

    fn sheet(width: u32, height: u32, frame_count: u32) -> LoadedSheet {
        LoadedSheet {
            image: DecodedImage {
                width,
                height,
                rgba: vec![255; (width * height * 4) as usize],
            },
            frame_width: width / frame_count,
            frame_height: height,
            frame_count,
        }
    }

    fn fixture(role: SpriteRole) -> LoadedSheet {
        match role {
            SpriteRole::Background => sheet(300, 100, 1),
            SpriteRole::Player => sheet(96, 32, 3),
            SpriteRole::Boss => sheet(64, 32, 2),
            SpriteRole::Projectile => sheet(16, 16, 1),
        }
    }

    fn completion(manifest: &AssetManifest, role: SpriteRole, ok: bool) -> AssetCompletion {
        let index = manifest
            .sprites()
            .iter()
            .position(|decl| decl.role == role)
            .expect("declared");
        let result = if ok {
            Ok(fixture(role))
        } else {
            Err(AssetLoadError::SheetTooNarrow {
                width: 0,
                frame_count: 1,
            })
        };
        AssetCompletion {
            asset: AssetId(index),
            result,
        }
    }

    fn state_with(failed: &[SpriteRole]) -> GameState {
        let manifest = AssetManifest::default();
        let mut state = GameState::new(Tuning::default(), &manifest);
        for role in SpriteRole::ALL {
            state.record_asset(completion(&manifest, role, !failed.contains(&role)));
        }
        state
    }

    fn running_state() -> GameState {
        let mut state = state_with(&[]);
        assert!(state.tick(DT, &FrameInput::default(), canvas()));
        state
    }

    fn hold(intent: InputIntent) -> FrameInput {
        FrameInput {
            intent,
            fire_pressed: false,
        }
    }

    fn fire() -> FrameInput {
        FrameInput {
            intent: InputIntent::default(),
            fire_pressed: true,
        }
    }

    fn player_pos(state: &GameState) -> Vec2 {
        *state.stores().positions.get(state.player()).expect("player pos")
    }

    #[test]
    fn loading_ticks_do_nothing_until_every_asset_reports() {
        let manifest = AssetManifest::default();
        let mut state = GameState::new(Tuning::default(), &manifest);
        assert_eq!(state.phase(), FramePhase::Loading);
        assert!(!state.tick(DT, &FrameInput::default(), canvas()));

        state.record_asset(completion(&manifest, SpriteRole::Background, true));
        state.record_asset(completion(&manifest, SpriteRole::Player, false));
        state.record_asset(completion(&manifest, SpriteRole::Boss, true));
        assert_eq!(state.phase(), FramePhase::Loading);
        assert!(!state.tick(DT, &FrameInput::default(), canvas()));
        assert!(state.stores().positions.is_empty());
        assert_eq!(state.tick_count(), 0);

        state.record_asset(completion(&manifest, SpriteRole::Projectile, true));
        assert_eq!(state.phase(), FramePhase::Running);
        assert!(state.tick(DT, &FrameInput::default(), canvas()));
        assert_eq!(state.tick_count(), 1);
    }

    #[test]
    fn duplicate_completion_does_not_start_the_session_early() {
        let manifest = AssetManifest::default();
        let mut state = GameState::new(Tuning::default(), &manifest);
        for _ in 0..4 {
            state.record_asset(completion(&manifest, SpriteRole::Player, true));
        }
        assert_eq!(state.phase(), FramePhase::Loading);
    }

    #[test]
    fn empty_manifest_runs_immediately() {
        let state = GameState::new(Tuning::default(), &AssetManifest::from_sprites(Vec::new()));
        assert!(state.is_running());
    }

    #[test]
    fn systems_run_in_fixed_order() {
        let state = running_state();
        assert_eq!(state.last_tick_order(), &FRAME_SYSTEM_ORDER);
    }

    #[test]
    fn first_running_tick_places_player_and_boss_on_ground() {
        let state = running_state();

        let player = player_pos(&state);
        assert_eq!(player, Vec2::new(400.0, 400.0));
        let boss = state.stores().positions.get(state.boss()).expect("boss pos");
        assert!((boss.x - 640.0).abs() < 1e-3);
        assert_eq!(boss.y, 400.0);
        assert!(state.stores().sprites.contains(state.background()));
    }

    #[test]
    fn jump_leaves_ground_then_returns() {
        let mut state = running_state();
        let ground = player_pos(&state).y;

        let up = InputIntent {
            up: true,
            ..InputIntent::default()
        };
        state.tick(DT, &hold(up), canvas());
        let velocity = state.stores().velocities.get(state.player()).expect("vel");
        assert!(velocity.y < 0.0);
        let locomotion = state.stores().locomotion.get(state.player()).expect("loco");
        assert!(!locomotion.grounded);
        let after_jump = player_pos(&state).y;
        assert!(after_jump < ground);

        state.tick(DT, &FrameInput::default(), canvas());
        assert!(player_pos(&state).y < after_jump);

        for _ in 0..120 {
            state.tick(DT, &FrameInput::default(), canvas());
        }
        assert_eq!(player_pos(&state).y, ground);
        let locomotion = state.stores().locomotion.get(state.player()).expect("loco");
        assert!(locomotion.grounded);
    }

    #[test]
    fn walking_right_scrolls_background_and_pins_player() {
        let mut state = running_state();
        let right = InputIntent {
            right: true,
            ..InputIntent::default()
        };
        // 400 -> 533.33 trigger takes 45 ticks at 3 px per tick.
        for _ in 0..60 {
            state.tick(DT, &hold(right), canvas());
        }

        let trigger = canvas().width * state.tuning().right_scroll_trigger_fraction;
        assert!((player_pos(&state).x - trigger).abs() < 1e-3);
        assert!(state.scroll_offset() > 0.0);
        assert!(state.scroll_offset() <= 200.0);

        for _ in 0..200 {
            state.tick(DT, &hold(right), canvas());
            let x = player_pos(&state).x;
            assert!((16.0..=784.0).contains(&x));
            assert!((0.0..=200.0).contains(&state.scroll_offset()));
        }
        assert!((state.scroll_offset() - 200.0).abs() < 1e-3);
    }

    #[test]
    fn player_frame_tracks_motion() {
        let mut state = running_state();
        let left = InputIntent {
            left: true,
            ..InputIntent::default()
        };
        state.tick(DT, &hold(left), canvas());
        let sprite = state.stores().sprites.get(state.player()).expect("sprite");
        assert_eq!(sprite.current_frame(), 1);

        state.tick(DT, &FrameInput::default(), canvas());
        let sprite = state.stores().sprites.get(state.player()).expect("sprite");
        assert_eq!(sprite.current_frame(), 0);
    }

    #[test]
    fn fire_spawns_projectile_at_player_moving_with_facing() {
        let mut state = running_state();
        state
            .stores
            .positions
            .insert(state.player, Vec2::new(400.0, 300.0));

        state.tick(0.0, &fire(), canvas());

        assert_eq!(state.live_projectile_count(), 1);
        let id = state
            .stores()
            .projectiles
            .ids()
            .next()
            .expect("projectile id");
        assert!(state.is_live_projectile(id));
        assert_eq!(state.stores().positions.get(id), Some(&player_pos(&state)));
        let velocity = state.stores().velocities.get(id).expect("velocity");
        assert!((velocity.x * DT - 8.0).abs() < 1e-4);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn projectile_leaving_canvas_is_pooled_and_reused() {
        let mut state = running_state();
        state.tick(DT, &fire(), canvas());
        let first = state.stores().projectiles.ids().next().expect("first");

        let mut ticks = 0;
        while state.is_live_projectile(first) {
            state.tick(DT, &FrameInput::default(), canvas());
            ticks += 1;
            assert!(ticks < 200, "projectile never left the canvas");
        }
        assert_eq!(state.allocator().pool(), &[first]);
        assert!(state.render_view(canvas()).commands.iter().all(|c| c.entity != first));

        state.tick(DT, &fire(), canvas());
        assert!(state.is_live_projectile(first));
        assert!(state.allocator().pool().is_empty());
    }

    #[test]
    fn empty_pool_mints_ids_above_everything_so_far() {
        let mut state = running_state();
        state.tick(DT, &fire(), canvas());
        state.tick(DT, &fire(), canvas());
        let ids: Vec<_> = state.stores().projectiles.ids().collect();

        assert_eq!(ids.len(), 2);
        assert!(ids[1] > ids[0]);
        assert!(ids[0] > state.boss());
    }

    #[test]
    fn fire_without_projectile_sheet_is_ignored() {
        let mut state = state_with(&[SpriteRole::Projectile]);
        assert!(state.is_running());

        state.tick(DT, &fire(), canvas());

        assert_eq!(state.live_projectile_count(), 0);
        assert_eq!(state.allocator().high_water_mark(), 3);
    }

    #[test]
    fn failed_sprites_are_tolerated_and_skipped_in_view() {
        let mut state = state_with(&[SpriteRole::Player, SpriteRole::Background]);
        let right = InputIntent {
            right: true,
            ..InputIntent::default()
        };
        for _ in 0..90 {
            state.tick(DT, &hold(right), canvas());
        }

        // No background sheet: nothing to scroll, player walks to the edge.
        assert_eq!(state.scroll_offset(), 0.0);
        let view = state.render_view(canvas());
        let drawn: Vec<_> = view.commands.iter().map(|c| c.entity).collect();
        assert_eq!(drawn, vec![state.boss()]);
    }

    #[test]
    fn boss_toggles_every_half_second() {
        let mut state = running_state();
        let frame = |state: &GameState| {
            state
                .stores()
                .sprites
                .get(state.boss())
                .expect("boss sprite")
                .current_frame()
        };
        assert_eq!(frame(&state), 0);

        for _ in 0..30 {
            state.tick(DT, &FrameInput::default(), canvas());
        }
        assert_eq!(frame(&state), 1);

        state.tick(0.5, &FrameInput::default(), canvas());
        assert_eq!(frame(&state), 0);
    }

    #[test]
    fn resize_moves_ground_and_boss_anchor() {
        let mut state = running_state();
        let taller = CanvasSize::new(1000.0, 900.0);

        for _ in 0..120 {
            state.tick(DT, &FrameInput::default(), taller);
        }

        assert!((player_pos(&state).y - 700.0).abs() < 1e-3);
        let boss = state.stores().positions.get(state.boss()).expect("boss");
        assert!((boss.x - 800.0).abs() < 1e-3);
        assert_eq!(boss.y, 700.0);
    }

    #[test]
    fn minimised_window_freezes_the_world() {
        let mut state = running_state();
        state.tick(DT, &fire(), canvas());
        let before = player_pos(&state);
        let ticks = state.tick_count();
        assert_eq!(state.live_projectile_count(), 1);

        assert!(!state.tick(DT, &fire(), CanvasSize::new(0.0, 0.0)));
        assert_eq!(player_pos(&state), before);
        assert_eq!(state.live_projectile_count(), 1);
        assert_eq!(state.tick_count(), ticks);

        assert!(state.tick(DT, &FrameInput::default(), canvas()));
        assert_eq!(player_pos(&state).x, before.x);
        assert_eq!(state.live_projectile_count(), 1);
    }

    #[test]
    fn first_tick_on_minimised_window_defers_placement() {
        let mut state = state_with(&[]);
        assert!(!state.tick(DT, &FrameInput::default(), CanvasSize::new(0.0, 0.0)));
        assert!(state.stores().positions.is_empty());

        assert!(state.tick(DT, &FrameInput::default(), canvas()));
        assert_eq!(player_pos(&state).x, 400.0);
    }

    #[test]
    fn bad_delta_is_treated_as_zero() {
        let mut state = running_state();
        let before = player_pos(&state);
        let right = InputIntent {
            right: true,
            ..InputIntent::default()
        };

        state.tick(f32::NAN, &hold(right), canvas());
        state.tick(-1.0, &hold(right), canvas());

        assert_eq!(player_pos(&state), before);
        let locomotion = state.stores().locomotion.get(state.player()).expect("loco");
        assert_eq!(locomotion.facing, Facing::Right);
    }

    #[test]
    fn sprite_frames_stay_within_sheets_over_a_long_run() {
        let mut state = running_state();
        let inputs = [
            hold(InputIntent {
                left: true,
                ..InputIntent::default()
            }),
            fire(),
            hold(InputIntent {
                right: true,
                up: true,
                ..InputIntent::default()
            }),
            FrameInput::default(),
        ];
        for tick in 0..600 {
            state.tick(DT * 1.7, &inputs[tick % inputs.len()], canvas());
            for (_, sprite) in state.stores().sprites.iter() {
                assert!(sprite.current_frame() < sprite.frame_count);
            }
            let half = state
                .stores()
                .sprites
                .get(state.player())
                .expect("sprite")
                .half_width();
            let x = player_pos(&state).x;
            assert!(x >= half && x <= canvas().width - half);
        }
    }
}
