//! Game state and core simulation types
//!
//! The orchestrator owns everything here. Subsystems borrow the state for
//! one call and keep nothing between frames beyond the counters stored in
//! the entities themselves.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::condition::{Condition, ConditionKind};
use super::entity::{Entity, Pool, Pooled, Visual};
use super::wave::generate_wave;
use super::weapon::{ProjectileTemplate, Weapon, WeaponKind};
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;
use crate::tuning::BalanceTables;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Final stage cleared
    Victory,
    /// Player ran out of lives
    Defeat,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }

    /// Only a defeat shows the game-over banner
    pub fn shows_game_over(&self) -> bool {
        matches!(self, GamePhase::Defeat)
    }
}

/// Things that happened during a tick, for audio and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { slot: usize, kind: WeaponKind },
    BombDropped { slot: usize },
    EnemyHit { slot: usize, lives_left: i32 },
    EnemyKilled { slot: usize, points: u64 },
    PlayerHit { damage: i32, lives_left: i32 },
    PickupSpawned { kind: WeaponKind },
    PickupCollected { kind: WeaponKind },
    WeaponEquipped { kind: WeaponKind },
    WeaponReverted { from: WeaponKind },
    ConditionApplied { kind: ConditionKind, duration: u32 },
    ConditionExpired { kind: ConditionKind },
    Healed { amount: i32 },
    Rage,
    StageAdvanced { stage: u32 },
    GameOver { phase: GamePhase },
}

/// An invader
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub entity: Entity,
    pub level: u32,
    pub max_lives: i32,
    pub lives: i32,
    pub power: i32,
}

impl Enemy {
    fn parked() -> Self {
        Self {
            entity: Entity::parked(Visual::Invader { stage: 1, tier: 1 }, Vec2::splat(PLAYER_SIZE)),
            level: 1,
            max_lives: 1,
            lives: 0,
            power: 0,
        }
    }
}

impl Pooled for Enemy {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

/// A missile or bomb in flight
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub entity: Entity,
    /// Weapon that fired it; bombs are tagged `Ball`
    pub kind: WeaponKind,
    /// Damage carried from the shooter at spawn time
    pub power: i32,
    /// Piercing projectiles survive hits and leave at the top border
    pub piercing: bool,
    /// Enemy slots already struck this flight (piercing only)
    pub struck: u64,
}

impl Projectile {
    fn parked(template: ProjectileTemplate) -> Self {
        Self {
            entity: Entity::parked(template.visual, template.size),
            kind: WeaponKind::Ball,
            power: 0,
            piercing: false,
            struck: 0,
        }
    }

    fn parked_bomb() -> Self {
        Self::parked(ProjectileTemplate {
            visual: Visual::Bomb,
            size: Vec2::new(BOMB_WIDTH, BOMB_HEIGHT),
            offset: Vec2::new(0.0, BOMB_SPAWN_OFFSET),
        })
    }

    pub fn has_struck(&self, slot: usize) -> bool {
        slot < 64 && self.struck & (1 << slot) != 0
    }

    pub fn mark_struck(&mut self, slot: usize) {
        if slot < 64 {
            self.struck |= 1 << slot;
        }
    }
}

impl Pooled for Projectile {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

/// A falling power-up icon
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub entity: Entity,
    pub kind: WeaponKind,
}

impl Pooled for Pickup {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

/// Explosion marker left where an enemy died
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Explosion {
    pub entity: Entity,
    pub frames_left: u32,
}

impl Pooled for Explosion {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    pub max_lives: i32,
    pub lives: i32,
    /// Frames left of the red hit tint
    pub hit_flash: u32,
    /// Total damage taken this run
    pub damage_taken: i32,
    pub weapon: Weapon,
    /// Frames until the next shot is allowed
    pub fire_cooldown: u32,
    /// Speed steps risen above the spawn row
    pub rise_steps: i32,
    /// One slot per [`ConditionKind`], in `ConditionKind::ALL` order
    pub conditions: Vec<Condition>,
}

impl Player {
    fn new(max_lives: i32, weapon: Weapon) -> Self {
        Self {
            entity: Entity::new(Visual::Ship, PLAYER_START, Vec2::splat(PLAYER_SIZE)),
            max_lives,
            lives: max_lives,
            hit_flash: 0,
            damage_taken: 0,
            weapon,
            fire_cooldown: INITIAL_MISSILE_COOLDOWN,
            rise_steps: 0,
            conditions: ConditionKind::ALL.iter().map(|&k| Condition::new(k)).collect(),
        }
    }

    pub fn condition(&self, kind: ConditionKind) -> &Condition {
        &self.conditions[kind.index()]
    }

    pub fn condition_mut(&mut self, kind: ConditionKind) -> &mut Condition {
        &mut self.conditions[kind.index()]
    }
}

/// The four playfield walls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borders {
    pub bottom: Entity,
    pub top: Entity,
    pub left: Entity,
    pub right: Entity,
}

impl Default for Borders {
    fn default() -> Self {
        let horizontal = Vec2::new(2.0 * BORDER_EXTENT, BORDER_THICKNESS);
        let vertical = Vec2::new(BORDER_THICKNESS, 2.0 * BORDER_EXTENT);
        Self {
            bottom: Entity::new(Visual::Border, Vec2::new(0.0, -BORDER_EXTENT), horizontal),
            top: Entity::new(Visual::Border, Vec2::new(0.0, BORDER_EXTENT), horizontal),
            left: Entity::new(Visual::Border, Vec2::new(-BORDER_EXTENT, 0.0), vertical),
            right: Entity::new(Visual::Border, Vec2::new(BORDER_EXTENT, 0.0), vertical),
        }
    }
}

impl Borders {
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        [&self.bottom, &self.top, &self.left, &self.right].into_iter()
    }
}

/// Stage progression, scoring and run-wide counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Current stage (1-based)
    pub stage: u32,
    /// Signed horizontal invader speed before any slow scaling
    pub invader_velocity: f32,
    /// Rage multiplier already applied this stage
    pub rage: bool,
    /// Slow buff scaling currently in force
    pub slowed: bool,
    pub live_enemies: usize,
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation frame counter
    pub frame: u64,
    /// Frames until an invader may drop the next bomb
    pub bomb_cooldown: u32,
    /// Frames until a kill may drop the next pickup
    pub pickup_cooldown: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            stage: 1,
            invader_velocity: INVADER_BASE_SPEED,
            rage: false,
            slowed: false,
            live_enemies: 0,
            score: 0,
            phase: GamePhase::Playing,
            frame: 0,
            bomb_cooldown: INITIAL_BOMB_COOLDOWN,
            pickup_cooldown: 0,
        }
    }
}

impl RunState {
    /// Invader displacement per frame with slow scaling applied
    pub fn invader_step(&self) -> f32 {
        if self.slowed {
            self.invader_velocity / SLOW_FACTOR
        } else {
            self.invader_velocity
        }
    }

    /// Bomb fall speed with slow scaling applied
    pub fn bomb_speed(&self) -> f32 {
        if self.slowed {
            BOMB_SPEED / SLOW_FACTOR
        } else {
            BOMB_SPEED
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Shared RNG; every random roll in the run draws from it
    pub rng: Pcg32,
    pub tables: BalanceTables,
    pub settings: Settings,
    pub run: RunState,
    pub player: Player,
    pub enemies: Pool<Enemy>,
    pub missiles: Pool<Projectile>,
    pub bombs: Pool<Projectile>,
    pub pickups: Pool<Pickup>,
    pub explosions: Pool<Explosion>,
    /// Visual and size given to newly fired missiles
    pub missile_template: ProjectileTemplate,
    pub borders: Borders,
    pub game_over_banner: Entity,
    /// Events raised during the current tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a run at stage 1.
    ///
    /// Fails if the balance tables do not cover every stage, weapon and
    /// condition the run can reach.
    pub fn new(settings: Settings, tables: BalanceTables) -> Result<Self, SimError> {
        tables.validate(MAX_STAGE)?;
        let weapon = Weapon::from_stats(WeaponKind::Ball, tables.weapon(WeaponKind::Ball)?);
        let template = WeaponKind::Ball.template();

        let mut state = Self {
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            run: RunState::default(),
            player: Player::new(settings.player_max_lives, weapon),
            enemies: Pool::new(NUM_ENEMIES, |_| Enemy::parked()),
            missiles: Pool::new(NUM_MISSILES, |_| Projectile::parked(template)),
            bombs: Pool::new(NUM_BOMBS, |_| Projectile::parked_bomb()),
            pickups: Pool::new(NUM_PICKUPS, |_| Pickup {
                entity: Entity::parked(
                    Visual::Pickup(WeaponKind::Lightning),
                    Vec2::splat(PICKUP_SIZE),
                ),
                kind: WeaponKind::Lightning,
            }),
            explosions: Pool::new(NUM_EXPLOSIONS, |_| Explosion {
                entity: Entity::parked(Visual::Explosion, Vec2::splat(EXPLOSION_SIZE)),
                frames_left: 0,
            }),
            missile_template: template,
            borders: Borders::default(),
            game_over_banner: Entity::parked(Visual::GameOver, Vec2::new(3.0, 1.5)),
            events: Vec::new(),
            tables,
            settings,
        };

        generate_wave(&mut state, 1)?;
        log::info!("New run with seed {}", state.seed);
        Ok(state)
    }

    pub fn is_over(&self) -> bool {
        self.run.phase.is_over()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Enter a terminal phase; the first call wins
    pub(crate) fn end_run(&mut self, phase: GamePhase) {
        if self.is_over() {
            return;
        }
        debug_assert!(phase.is_over());
        self.run.phase = phase;
        if phase.shows_game_over() {
            self.game_over_banner.pos = Vec2::ZERO;
            self.game_over_banner.enabled = true;
        }
        log::info!(
            "Game over ({:?}) at stage {} with score {}",
            phase,
            self.run.stage,
            self.run.score
        );
        self.emit(GameEvent::GameOver { phase });
    }
}
