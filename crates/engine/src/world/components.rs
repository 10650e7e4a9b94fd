use crate::assets::{ImageHandle, SpriteSheet};

use super::entity::EntityId;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub type Position = Vec2;
pub type Velocity = Vec2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn centered_on(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width * 0.5,
            y: center.y - height * 0.5,
            width,
            height,
        }
    }
}

/// Current drawable surface size in pixels. May change between any two ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// No drawable area, as reported by a minimised window.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

/// Per-tick movement state for a grounded walker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Locomotion {
    pub facing: Facing,
    pub moving: bool,
    pub grounded: bool,
    /// x before this tick's horizontal move; read by the scroll controller.
    pub previous_x: f32,
    /// x after this tick's horizontal move, before the canvas clamp.
    pub attempted_x: f32,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            facing: Facing::Right,
            moving: false,
            grounded: true,
            previous_x: 0.0,
            attempted_x: 0.0,
        }
    }
}

/// One horizontal strip sprite sheet plus the frame currently shown.
///
/// `current_frame < frame_count` holds for every value handed out by
/// [`SpriteState::from_sheet`] and [`SpriteState::set_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteState {
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_count: u32,
    current_frame: u32,
    pub image: ImageHandle,
}

impl SpriteState {
    pub fn from_sheet(sheet: &SpriteSheet) -> Self {
        Self {
            frame_width: sheet.frame_width,
            frame_height: sheet.frame_height,
            frame_count: sheet.frame_count.max(1),
            current_frame: 0,
            image: sheet.image,
        }
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    /// Sets the frame, clamping indices past the end of the sheet onto the
    /// last frame.
    pub fn set_frame(&mut self, frame: u32) {
        self.current_frame = frame.min(self.frame_count.saturating_sub(1));
    }

    pub fn source_rect(&self) -> Rect {
        Rect {
            x: (self.current_frame * self.frame_width) as f32,
            y: 0.0,
            width: self.frame_width as f32,
            height: self.frame_height as f32,
        }
    }

    pub fn half_width(&self) -> f32 {
        self.frame_width as f32 * 0.5
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Projectile {
    pub active: bool,
}

/// Elapsed-time accumulator driving a two-frame idle loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    pub accumulator_seconds: f32,
}

/// Dense per-aspect storage indexed by [`EntityId`].
///
/// Slot `n` belongs to entity `n`; `None` means the entity has no data for
/// this aspect (yet).
#[derive(Debug, Clone)]
pub struct ComponentStore<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> ComponentStore<T> {
    pub fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        let index = id.index();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index].replace(value)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_ref().map(|value| (EntityId(index as u64), value))
            })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_mut().map(|value| (EntityId(index as u64), value))
            })
    }
}
