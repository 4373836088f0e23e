//! Invaderers - a fixed-timestep arcade invader simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, combat, waves, buffs)
//! - `tuning`: Data-driven game balance tables
//! - `settings`: Host configuration (fire trigger modes, seed, lives)
//! - `platform`: Input collaborator boundary
//! - `audio`: Audio collaborator boundary
//! - `renderer`: Render collaborator boundary

pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use settings::{FireTriggers, Settings, TriggerMode};
pub use tuning::BalanceTables;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Where disabled entities are parked, far outside the playfield
    pub const PARKED_POS: Vec2 = Vec2::new(20.0, 20.0);

    /// Playfield borders (centre, full width, full height)
    pub const BORDER_EXTENT: f32 = 3.0;
    pub const BORDER_THICKNESS: f32 = 0.2;

    /// Enemy grid
    pub const NUM_ROWS: usize = 5;
    pub const NUM_COLS: usize = 10;
    pub const NUM_ENEMIES: usize = NUM_ROWS * NUM_COLS;
    pub const GRID_SPACING: f32 = 0.5;
    pub const GRID_TOP: f32 = 2.5;

    /// Pool capacities
    pub const NUM_MISSILES: usize = 2;
    pub const NUM_BOMBS: usize = 2;
    pub const NUM_PICKUPS: usize = 4;
    pub const NUM_EXPLOSIONS: usize = 8;

    /// Player defaults
    pub const PLAYER_START: Vec2 = Vec2::new(0.0, -2.75);
    pub const PLAYER_SIZE: f32 = 0.25;
    pub const PLAYER_SPEED: f32 = 0.1;
    pub const PLAYER_MAX_LIVES: i32 = 6;
    /// Vertical travel is also bounded in whole speed steps above the spawn row
    pub const PLAYER_MAX_RISE_STEPS: i32 = 20;
    pub const HIT_FLASH_FRAMES: u32 = 15;

    /// Projectile motion (units per frame)
    pub const MISSILE_SPEED: f32 = 0.3;
    pub const BOMB_SPEED: f32 = 0.2;
    pub const PICKUP_SPEED: f32 = 0.05;
    pub const PROJECTILE_SIZE: f32 = 0.4;
    pub const BEAM_WIDTH: f32 = 1.1;
    pub const BEAM_HEIGHT: f32 = 5.0;
    pub const BOMB_WIDTH: f32 = 0.0625;
    pub const BOMB_HEIGHT: f32 = 0.25;
    pub const PICKUP_SIZE: f32 = 0.25;
    pub const INDICATOR_SIZE: f32 = 0.2;

    /// Invader march
    pub const INVADER_BASE_SPEED: f32 = 0.01;
    pub const INVADER_DROP: f32 = 0.1;
    pub const RAGE_THRESHOLD: usize = 4;
    pub const RAGE_MULTIPLIER: f32 = 4.0;
    pub const SLOW_FACTOR: f32 = 3.0;

    /// Enemy bombs
    pub const BOMB_TARGET_MARGIN: f32 = 0.3;
    pub const BOMB_SPAWN_OFFSET: f32 = -0.25;
    pub const BOMB_COOLDOWN: u32 = 30;
    pub const BOMB_HIT_COOLDOWN: u32 = 50;
    pub const INITIAL_BOMB_COOLDOWN: u32 = 30;
    pub const INITIAL_MISSILE_COOLDOWN: u32 = 15;

    /// Drops and effects
    pub const PICKUP_DROP_COOLDOWN: u32 = 200;
    pub const EXPLOSION_FRAMES: u32 = 20;
    pub const EXPLOSION_SIZE: f32 = 0.5;
    pub const REGEN_INTERVAL: u32 = 120;
    /// Regeneration heals `max_lives / REGEN_DIVISOR` (at least one life)
    pub const REGEN_DIVISOR: i32 = 6;

    /// Progression
    pub const MAX_STAGE: u32 = 3;
    pub const KILL_SCORE_BASE: u64 = 10;
}
