//! Entities and fixed-capacity pools
//!
//! Every category (enemies, missiles, bombs, pickups, explosions) lives in a
//! [`Pool`] whose slots are allocated once. Spawning reuses the first
//! disabled slot; despawning disables the slot and parks it at
//! [`PARKED_POS`] so a stale position can never collide before reuse. A full
//! pool drops the spawn request, which bounds how many projectiles and
//! pickups can be live at once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::condition::ConditionKind;
use super::weapon::WeaponKind;
use crate::consts::PARKED_POS;

/// What the render collaborator should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    /// Gameplay-only entity, never drawn
    Hidden,
    Ship,
    Border,
    GameOver,
    /// `tier` follows the invader's remaining lives
    Invader { stage: u32, tier: i32 },
    Missile(WeaponKind),
    Bomb,
    Pickup(WeaponKind),
    Indicator(ConditionKind),
    Explosion,
}

/// Axis-aligned box with a visual and an enabled flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Vec2,
    pub half_extents: Vec2,
    pub visual: Visual,
    pub enabled: bool,
}

impl Entity {
    /// An enabled entity of full size `size` centred at `pos`
    pub fn new(visual: Visual, pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            half_extents: size * 0.5,
            visual,
            enabled: true,
        }
    }

    /// A disabled entity waiting off-screen
    pub fn parked(visual: Visual, size: Vec2) -> Self {
        Self {
            enabled: false,
            ..Self::new(visual, PARKED_POS, size)
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Place this entity at `offset` from another
    pub fn set_relative(&mut self, other: &Entity, offset: Vec2) {
        self.pos = other.pos + offset;
    }

    /// Disable and move out of the playfield
    pub fn park(&mut self) {
        self.enabled = false;
        self.pos = PARKED_POS;
    }

    pub fn resize(&mut self, size: Vec2) {
        self.half_extents = size * 0.5;
    }
}

/// Anything stored in a [`Pool`]
pub trait Pooled {
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;

    fn is_active(&self) -> bool {
        self.entity().enabled
    }
}

impl Pooled for Entity {
    fn entity(&self) -> &Entity {
        self
    }

    fn entity_mut(&mut self) -> &mut Entity {
        self
    }
}

/// Fixed-capacity slot array; slot index is the only identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Pooled> Pool<T> {
    /// Allocate `capacity` slots; `make` should return a parked entity
    pub fn new(capacity: usize, make: impl FnMut(usize) -> T) -> Self {
        let mut slots: Vec<T> = (0..capacity).map(make).collect();
        for slot in &mut slots {
            slot.entity_mut().park();
        }
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Initialise the first free slot in place and enable it.
    ///
    /// Returns `None` (and does nothing) when every slot is in use.
    pub fn spawn(&mut self, init: impl FnOnce(&mut T)) -> Option<usize> {
        let index = self.slots.iter().position(|s| !s.is_active())?;
        let slot = &mut self.slots[index];
        init(slot);
        slot.entity_mut().enabled = true;
        Some(index)
    }

    /// Disable a slot. Returns whether it was active.
    pub fn despawn(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_active() => {
                slot.entity_mut().park();
                true
            }
            _ => false,
        }
    }

    pub fn despawn_all(&mut self) {
        for slot in &mut self.slots {
            slot.entity_mut().park();
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// All slots, active or not, in slot order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }

    /// Active slots with their indices, in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool(capacity: usize) -> Pool<Entity> {
        Pool::new(capacity, |_| Entity::parked(Visual::Bomb, Vec2::splat(0.25)))
    }

    #[test]
    fn test_spawn_uses_first_free_slot() {
        let mut pool = pool(3);
        assert_eq!(pool.spawn(|e| e.pos = Vec2::ZERO), Some(0));
        assert_eq!(pool.spawn(|e| e.pos = Vec2::ONE), Some(1));
        assert!(pool.despawn(0));
        assert_eq!(pool.spawn(|e| e.pos = Vec2::X), Some(0));
        assert_eq!(pool.get(0).unwrap().pos, Vec2::X);
    }

    #[test]
    fn test_full_pool_drops_spawn() {
        let mut pool = pool(2);
        pool.spawn(|_| {});
        pool.spawn(|_| {});
        let mut ran = false;
        assert_eq!(pool.spawn(|_| ran = true), None);
        assert!(!ran);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_despawn_parks_offscreen() {
        let mut pool = pool(1);
        pool.spawn(|e| e.pos = Vec2::new(1.0, -1.0));
        assert!(pool.despawn(0));
        let e = pool.get(0).unwrap();
        assert!(!e.enabled);
        assert_eq!(e.pos, PARKED_POS);
        // Second despawn is a no-op
        assert!(!pool.despawn(0));
        assert!(!pool.despawn(7));
    }

    proptest! {
        #[test]
        fn prop_active_count_never_exceeds_capacity(
            capacity in 1usize..8,
            ops in proptest::collection::vec((any::<bool>(), 0usize..10), 0..64),
        ) {
            let mut pool = pool(capacity);
            for (spawn, index) in ops {
                if spawn {
                    pool.spawn(|_| {});
                } else {
                    pool.despawn(index);
                }
                prop_assert!(pool.active_count() <= pool.capacity());
                prop_assert_eq!(pool.capacity(), capacity);
            }
        }
    }
}
