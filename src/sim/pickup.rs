//! Falling power-ups

use glam::Vec2;

use super::collision::overlaps;
use super::entity::Pooled;
use super::state::{GameEvent, GameState};
use super::weapon::equip_weapon;
use crate::consts::*;
use crate::error::SimError;

/// Drop every pickup a step; the player catches them, the floor eats them
pub fn update_pickups(state: &mut GameState) -> Result<(), SimError> {
    state.run.pickup_cooldown = state.run.pickup_cooldown.saturating_sub(1);

    for p in 0..state.pickups.capacity() {
        let Some(pickup) = state.pickups.get_mut(p) else {
            continue;
        };
        if !pickup.is_active() {
            continue;
        }
        pickup.entity.translate(Vec2::new(0.0, -PICKUP_SPEED));
        let pickup = *pickup;

        if overlaps(&pickup.entity, &state.player.entity) {
            state.pickups.despawn(p);
            log::debug!("Collected {:?}", pickup.kind);
            state.emit(GameEvent::PickupCollected { kind: pickup.kind });
            equip_weapon(state, pickup.kind)?;
        } else if overlaps(&pickup.entity, &state.borders.bottom) {
            state.pickups.despawn(p);
        }
    }
    Ok(())
}
