//! Enemy waves: grid setup, kill thresholds and the sideways march

use glam::Vec2;

use super::collision::overlaps;
use super::entity::{Entity, Pool, Visual};
use super::state::{Enemy, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::error::SimError;

/// Centre of grid cell (`col`, `row`)
pub fn grid_position(col: usize, row: usize) -> Vec2 {
    Vec2::new(
        (col as f32 - NUM_COLS as f32 * 0.5) * GRID_SPACING,
        GRID_TOP - row as f32 * GRID_SPACING,
    )
}

/// Fill the enemy grid for `stage` and reset the stage counters.
///
/// The stored invader velocity goes back to the base speed, dropping any
/// rage multiplier. The slow buff is not part of the stored velocity: while
/// it is active the new wave still marches at a third of that speed.
///
/// Missiles and bombs in flight are cleared with the old wave.
pub fn generate_wave(state: &mut GameState, stage: u32) -> Result<(), SimError> {
    debug_assert!((1..=MAX_STAGE).contains(&stage), "stage {stage} out of range");
    let stage = stage.clamp(1, MAX_STAGE);
    let stats = *state.tables.enemy(stage)?;
    let size = Vec2::new(stats.width, stats.height);

    state.missiles.despawn_all();
    state.bombs.despawn_all();
    state.enemies.despawn_all();
    for row in 0..NUM_ROWS {
        for col in 0..NUM_COLS {
            state.enemies.spawn(|enemy| {
                *enemy = Enemy {
                    entity: Entity::new(
                        Visual::Invader {
                            stage,
                            tier: stats.lives,
                        },
                        grid_position(col, row),
                        size,
                    ),
                    level: stage,
                    max_lives: stats.lives,
                    lives: stats.lives,
                    power: stats.power,
                };
            });
        }
    }

    state.run.stage = stage;
    state.run.live_enemies = state.enemies.active_count();
    state.run.invader_velocity = INVADER_BASE_SPEED;
    state.run.rage = false;

    log::info!(
        "Stage {}: {} enemies, {} lives each",
        stage,
        state.run.live_enemies,
        stats.lives
    );
    Ok(())
}

/// Threshold rules, run after every kill
pub fn on_enemy_killed(state: &mut GameState) -> Result<(), SimError> {
    let live = state.run.live_enemies;
    if live == RAGE_THRESHOLD && !state.run.rage {
        state.run.invader_velocity *= RAGE_MULTIPLIER;
        state.run.rage = true;
        log::info!("Rage! {} invaders left on stage {}", live, state.run.stage);
        state.emit(GameEvent::Rage);
    } else if live == 0 {
        advance_stage(state)?;
    }
    Ok(())
}

/// Move to the next stage, or win if this was the last one
pub fn advance_stage(state: &mut GameState) -> Result<(), SimError> {
    if state.run.stage < MAX_STAGE {
        let next = state.run.stage + 1;
        generate_wave(state, next)?;
        state.emit(GameEvent::StageAdvanced { stage: next });
    } else {
        state.end_run(GamePhase::Victory);
    }
    Ok(())
}

fn move_invaders(enemies: &mut Pool<Enemy>, delta: Vec2) {
    for enemy in enemies.iter_mut().filter(|e| e.entity.enabled) {
        enemy.entity.translate(delta);
    }
}

fn invaders_collide(enemies: &Pool<Enemy>, border: &Entity) -> bool {
    enemies.iter().any(|e| overlaps(&e.entity, border))
}

/// March sideways; on touching the leading wall, turn around and drop
pub fn update_invaders(state: &mut GameState) {
    move_invaders(&mut state.enemies, Vec2::new(state.run.invader_step(), 0.0));

    let border = if state.run.invader_velocity < 0.0 {
        &state.borders.left
    } else {
        &state.borders.right
    };
    if invaders_collide(&state.enemies, border) {
        state.run.invader_velocity = -state.run.invader_velocity;
        move_invaders(
            &mut state.enemies,
            Vec2::new(state.run.invader_step(), -INVADER_DROP),
        );
    }
}
