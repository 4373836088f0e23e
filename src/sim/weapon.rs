//! Weapons and fire control
//!
//! The player carries exactly one [`Weapon`]. Non-default weapons burn one
//! unit of energy per frame and fall back to the ball when it runs out.
//! Firing is gated by a cooldown counter; a full missile pool simply drops
//! the shot.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::is_above;
use super::condition::{ConditionKind, apply_condition, remove_condition};
use super::entity::{Pooled, Visual};
use super::state::{GameEvent, GameState};
use super::tick::TickInput;
use crate::consts::*;
use crate::error::SimError;
use crate::settings::TriggerMode;
use crate::tuning::WeaponStats;

/// Weapon types, in balance-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Default weapon, never runs out
    Ball,
    /// Tall piercing beam
    Lightning,
    Star,
    /// Carries the slow buff
    Slow,
    /// Carries the regeneration buff
    Heart,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Ball,
        WeaponKind::Lightning,
        WeaponKind::Star,
        WeaponKind::Slow,
        WeaponKind::Heart,
    ];

    /// Kinds that can drop from a defeated enemy
    pub const DROPS: [WeaponKind; 4] = [
        WeaponKind::Lightning,
        WeaponKind::Star,
        WeaponKind::Slow,
        WeaponKind::Heart,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_default(self) -> bool {
        self == WeaponKind::Ball
    }

    pub fn is_piercing(self) -> bool {
        self == WeaponKind::Lightning
    }

    /// Buff that lives and dies with this weapon
    pub fn coupled_condition(self) -> Option<ConditionKind> {
        match self {
            WeaponKind::Slow => Some(ConditionKind::Slow),
            WeaponKind::Heart => Some(ConditionKind::Regeneration),
            _ => None,
        }
    }

    /// Shape of the missiles this weapon fires
    pub fn template(self) -> ProjectileTemplate {
        match self {
            WeaponKind::Lightning => ProjectileTemplate {
                visual: Visual::Missile(self),
                size: Vec2::new(BEAM_WIDTH, BEAM_HEIGHT),
                offset: Vec2::new(0.0, BEAM_HEIGHT * 0.5),
            },
            _ => ProjectileTemplate {
                visual: Visual::Missile(self),
                size: Vec2::splat(PROJECTILE_SIZE),
                offset: Vec2::ZERO,
            },
        }
    }
}

/// Remaining shots-worth of frames for a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Energy {
    Unlimited,
    Finite(u32),
}

impl Energy {
    /// Table encoding: `-1` (or any negative) is unlimited
    pub fn from_table(raw: i32) -> Self {
        u32::try_from(raw).map_or(Energy::Unlimited, Energy::Finite)
    }
}

/// The equipped weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub power: i32,
    /// Frames between shots
    pub cooldown: u32,
    pub max_energy: Energy,
    pub energy: Energy,
}

impl Weapon {
    pub fn from_stats(kind: WeaponKind, stats: &WeaponStats) -> Self {
        let energy = Energy::from_table(stats.energy);
        Self {
            kind,
            power: stats.power,
            cooldown: stats.cooldown,
            max_energy: energy,
            energy,
        }
    }
}

/// Visual, size and spawn offset for newly fired missiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTemplate {
    pub visual: Visual,
    pub size: Vec2,
    pub offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipOutcome {
    /// Weapon replaced wholesale
    Equipped,
    /// Already holding this unlimited weapon; nothing to refresh
    Unchanged,
}

/// Swap the player's weapon.
///
/// Re-equipping the same kind refreshes energy, cooldown and any coupled buff,
/// except for an unlimited weapon where there is nothing to refresh. Missiles
/// already in flight keep their old look and power.
pub fn equip_weapon(state: &mut GameState, kind: WeaponKind) -> Result<EquipOutcome, SimError> {
    let current = state.player.weapon;
    if current.kind == kind && current.energy == Energy::Unlimited {
        return Ok(EquipOutcome::Unchanged);
    }

    let stats = *state.tables.weapon(kind)?;
    let coupled = kind
        .coupled_condition()
        .map(|c| state.tables.condition_duration(c).map(|d| (c, d)))
        .transpose()?;

    if current.kind != kind {
        if let Some(buff) = current.kind.coupled_condition() {
            remove_condition(state, buff);
        }
    }

    state.player.weapon = Weapon::from_stats(kind, &stats);
    state.player.fire_cooldown = stats.cooldown;
    state.missile_template = kind.template();
    if let Some((buff, duration)) = coupled {
        apply_condition(state, buff, duration);
    }

    log::debug!("Equipped {:?} (power {}, cooldown {})", kind, stats.power, stats.cooldown);
    state.emit(GameEvent::WeaponEquipped { kind });
    Ok(EquipOutcome::Equipped)
}

/// Drop back to the default weapon, ending any coupled buff
pub fn revert_weapon(state: &mut GameState) -> Result<(), SimError> {
    let from = state.player.weapon.kind;
    if from.is_default() {
        return Ok(());
    }
    log::debug!("{:?} ran out of energy", from);
    state.emit(GameEvent::WeaponReverted { from });
    equip_weapon(state, WeaponKind::Ball)?;
    Ok(())
}

/// Burn one frame of energy; reverts on the frame it reaches zero
fn drain_energy(state: &mut GameState) -> Result<(), SimError> {
    let weapon = &mut state.player.weapon;
    if weapon.kind.is_default() {
        return Ok(());
    }
    match weapon.energy {
        Energy::Unlimited => Ok(()),
        Energy::Finite(n) => {
            let left = n.saturating_sub(1);
            weapon.energy = Energy::Finite(left);
            if left == 0 { revert_weapon(state) } else { Ok(()) }
        }
    }
}

/// Player fire control: energy drain, cooldown, then maybe a shot
pub fn update_fire_control(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    drain_energy(state)?;

    if state.player.fire_cooldown > 0 {
        state.player.fire_cooldown -= 1;
        return Ok(());
    }

    let weapon = state.player.weapon;
    let trigger = match state.settings.fire.for_kind(weapon.kind) {
        TriggerMode::Held => input.fire_held,
        TriggerMode::Pressed => input.fire_pressed,
    };
    if !trigger {
        return Ok(());
    }

    let template = state.missile_template;
    let origin = state.player.entity;
    let spawned = state.missiles.spawn(|m| {
        m.entity.visual = template.visual;
        m.entity.resize(template.size);
        m.entity.set_relative(&origin, template.offset);
        m.kind = weapon.kind;
        m.power = weapon.power;
        m.piercing = weapon.kind.is_piercing();
        m.struck = 0;
    });

    if let Some(slot) = spawned {
        state.player.fire_cooldown = weapon.cooldown;
        state.emit(GameEvent::Fired {
            slot,
            kind: weapon.kind,
        });
    }
    Ok(())
}

/// Invader fire: pick a random starting slot and scan upward for an enemy
/// roughly above the player
pub fn update_bomb_fire(state: &mut GameState) {
    if state.run.bomb_cooldown > 0 {
        state.run.bomb_cooldown -= 1;
        return;
    }

    let start = state.rng.random_range(0..state.enemies.capacity());
    let ship = state.player.entity;
    let shooter = (start..state.enemies.capacity())
        .filter_map(|j| state.enemies.get(j))
        .find(|e| e.is_active() && is_above(&e.entity, &ship, BOMB_TARGET_MARGIN))
        .copied();

    let Some(shooter) = shooter else {
        return;
    };
    let spawned = state.bombs.spawn(|b| {
        b.entity.set_relative(&shooter.entity, Vec2::new(0.0, BOMB_SPAWN_OFFSET));
        b.power = shooter.power;
    });
    if let Some(slot) = spawned {
        state.run.bomb_cooldown = BOMB_COOLDOWN;
        state.emit(GameEvent::BombDropped { slot });
    }
}
