//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod combat;
pub mod condition;
pub mod entity;
pub mod movement;
pub mod pickup;
pub mod state;
pub mod tick;
pub mod wave;
pub mod weapon;

pub use collision::{is_above, overlaps};
pub use combat::{damage_for, kill_score};
pub use condition::{Condition, ConditionKind, apply_condition, remove_condition};
pub use entity::{Entity, Pool, Pooled, Visual};
pub use state::{
    Borders, Enemy, Explosion, GameEvent, GamePhase, GameState, Pickup, Player, Projectile,
    RunState,
};
pub use tick::{TickInput, tick};
pub use wave::generate_wave;
pub use weapon::{Energy, EquipOutcome, ProjectileTemplate, Weapon, WeaponKind, equip_weapon};
