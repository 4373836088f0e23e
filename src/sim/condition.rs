//! Timed buffs
//!
//! Each [`ConditionKind`] owns one countdown slot on the player. Applying a
//! condition resets its countdown (no stacking). Expiry runs exactly once per
//! activation: the indicator is parked and any scaling the buff applied is
//! undone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Visual};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Buff types, in balance-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Divides invader and bomb speed by `SLOW_FACTOR`
    Slow,
    /// Heals a share of max lives every `REGEN_INTERVAL` frames
    Regeneration,
}

impl ConditionKind {
    pub const ALL: [ConditionKind; 2] = [ConditionKind::Slow, ConditionKind::Regeneration];

    pub fn index(self) -> usize {
        self as usize
    }

    /// HUD spot for the indicator, along the top-left corner
    fn indicator_pos(self) -> Vec2 {
        Vec2::new(-2.7 + 0.3 * self.index() as f32, 2.75)
    }
}

/// One buff slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    /// Frames left; the buff is active while this is non-zero
    pub remaining: u32,
    /// Frames until the next periodic effect
    pub period_left: u32,
    pub indicator: Entity,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            remaining: 0,
            period_left: 0,
            indicator: Entity::parked(Visual::Indicator(kind), Vec2::splat(INDICATOR_SIZE)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }
}

/// Start (or restart) a buff for `duration` frames
pub fn apply_condition(state: &mut GameState, kind: ConditionKind, duration: u32) {
    if duration == 0 {
        remove_condition(state, kind);
        return;
    }

    let condition = state.player.condition_mut(kind);
    let was_active = condition.is_active();
    condition.remaining = duration;
    if !was_active {
        condition.period_left = REGEN_INTERVAL;
        condition.indicator.pos = kind.indicator_pos();
        condition.indicator.enabled = true;
        on_activate(state, kind);
    }

    log::debug!("{:?} applied for {} frames", kind, duration);
    state.emit(GameEvent::ConditionApplied { kind, duration });
}

/// End a buff now. Returns whether it was active.
pub fn remove_condition(state: &mut GameState, kind: ConditionKind) -> bool {
    let condition = state.player.condition_mut(kind);
    if !condition.is_active() {
        return false;
    }
    condition.remaining = 0;
    expire(state, kind);
    true
}

fn on_activate(state: &mut GameState, kind: ConditionKind) {
    match kind {
        ConditionKind::Slow => state.run.slowed = true,
        ConditionKind::Regeneration => {}
    }
}

fn expire(state: &mut GameState, kind: ConditionKind) {
    let condition = state.player.condition_mut(kind);
    condition.period_left = 0;
    condition.indicator.park();

    match kind {
        ConditionKind::Slow => state.run.slowed = false,
        ConditionKind::Regeneration => {}
    }

    log::debug!("{:?} expired", kind);
    state.emit(GameEvent::ConditionExpired { kind });
}

fn regenerate(state: &mut GameState) {
    let player = &mut state.player;
    if player.lives >= player.max_lives {
        return;
    }
    let amount = (player.max_lives / REGEN_DIVISOR)
        .max(1)
        .min(player.max_lives - player.lives);
    player.lives += amount;
    state.emit(GameEvent::Healed { amount });
}

/// Count every active buff down by one frame
pub fn update_conditions(state: &mut GameState) {
    for kind in ConditionKind::ALL {
        let condition = state.player.condition_mut(kind);
        if !condition.is_active() {
            continue;
        }
        condition.remaining -= 1;

        condition.period_left = condition.period_left.saturating_sub(1);
        let periodic = condition.period_left == 0;
        if periodic {
            condition.period_left = REGEN_INTERVAL;
        }
        let expired = condition.remaining == 0;

        if periodic && kind == ConditionKind::Regeneration {
            regenerate(state);
        }
        if expired {
            expire(state, kind);
        }
    }
}
