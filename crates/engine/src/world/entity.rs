#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl EntityId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Issues monotonically increasing ids and hands retired projectile ids back
/// out before minting new ones.
///
/// A recycled id comes back with whatever component data it had when it was
/// retired; the caller overwrites every store for it before activation.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    next: u64,
    pool: Vec<EntityId>,
}

impl EntityAllocator {
    pub fn allocate(&mut self) -> EntityId {
        if let Some(id) = self.pool.pop() {
            return id;
        }
        self.allocate_fresh()
    }

    /// Always mints a new id, ignoring the pool. Used for entities that live
    /// for the whole session.
    pub fn allocate_fresh(&mut self) -> EntityId {
        debug_assert!(self.next < u64::MAX, "entity id counter exhausted");
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Pushes `id` onto the pool. Projectile ids go through
    /// `recycle_projectile`, which checks the id is no longer active.
    pub(crate) fn recycle(&mut self, id: EntityId) {
        debug_assert!(id.0 < self.next, "recycled id {id:?} was never allocated");
        debug_assert!(!self.pool.contains(&id), "id {id:?} recycled twice");
        self.pool.push(id);
    }

    pub fn pool(&self) -> &[EntityId] {
        &self.pool
    }

    pub fn is_pooled(&self, id: EntityId) -> bool {
        self.pool.contains(&id)
    }

    /// One past the highest id ever minted.
    pub fn high_water_mark(&self) -> u64 {
        self.next
    }
}
