//! Projectile motion and hit resolution
//!
//! Missiles fly up and hurt invaders; bombs fall and hurt the player. Kills
//! feed the wave controller in the same frame so its thresholds see them.

use glam::Vec2;
use rand::Rng;

use super::collision::overlaps;
use super::entity::{Pooled, Visual};
use super::state::{GameEvent, GamePhase, GameState};
use super::wave::on_enemy_killed;
use super::weapon::WeaponKind;
use crate::consts::*;
use crate::error::SimError;

/// Damage a projectile of `power` deals on `stage`
pub fn damage_for(power: i32, stage: u32) -> i32 {
    power + power * (stage as i32 - 1)
}

/// Points for killing an enemy of `level`
pub fn kill_score(level: u32) -> u64 {
    KILL_SCORE_BASE * u64::from(level) * u64::from(level)
}

/// Apply one hit to the enemy in `slot`
fn hit_enemy(state: &mut GameState, slot: usize, power: i32) -> Result<(), SimError> {
    let damage = damage_for(power, state.run.stage);
    let Some(enemy) = state.enemies.get_mut(slot) else {
        return Ok(());
    };
    enemy.lives -= damage;

    if enemy.lives > 0 {
        enemy.entity.visual = Visual::Invader {
            stage: enemy.level,
            tier: enemy.lives,
        };
        let lives_left = enemy.lives;
        state.emit(GameEvent::EnemyHit { slot, lives_left });
        return Ok(());
    }

    enemy.lives = 0;
    let pos = enemy.entity.pos;
    let points = kill_score(enemy.level);
    state.enemies.despawn(slot);
    state.run.live_enemies = state.run.live_enemies.saturating_sub(1);
    state.run.score += points;
    state.emit(GameEvent::EnemyKilled { slot, points });

    state.explosions.spawn(|x| {
        x.entity.pos = pos;
        x.frames_left = EXPLOSION_FRAMES;
    });
    drop_pickup(state, pos);

    on_enemy_killed(state)
}

/// Roll a pickup at `pos` if the drop cooldown has run out
fn drop_pickup(state: &mut GameState, pos: Vec2) {
    if state.run.pickup_cooldown > 0 {
        return;
    }
    let kind = WeaponKind::DROPS[state.rng.random_range(0..WeaponKind::DROPS.len())];
    let spawned = state.pickups.spawn(|p| {
        p.entity.pos = pos;
        p.entity.visual = Visual::Pickup(kind);
        p.kind = kind;
    });
    if spawned.is_some() {
        state.run.pickup_cooldown = PICKUP_DROP_COOLDOWN;
        log::debug!("Dropped {:?} pickup at {:?}", kind, pos);
        state.emit(GameEvent::PickupSpawned { kind });
    }
}

/// Move missiles up and resolve their hits.
///
/// A kill that clears the stage ends the pass: the new wave starts with no
/// projectiles in flight.
pub fn update_missiles(state: &mut GameState) -> Result<(), SimError> {
    let stage = state.run.stage;
    for m in 0..state.missiles.capacity() {
        let Some(missile) = state.missiles.get_mut(m) else {
            continue;
        };
        if !missile.is_active() {
            continue;
        }
        missile.entity.translate(Vec2::new(0.0, MISSILE_SPEED));
        let mut missile = *missile;

        for e in 0..state.enemies.capacity() {
            let hit = state
                .enemies
                .get(e)
                .is_some_and(|enemy| overlaps(&missile.entity, &enemy.entity));
            if !hit || missile.has_struck(e) {
                continue;
            }
            hit_enemy(state, e, missile.power)?;
            if state.is_over() || state.run.stage != stage {
                return Ok(());
            }
            if !missile.piercing {
                state.missiles.despawn(m);
                break;
            }
            missile.mark_struck(e);
            if let Some(slot) = state.missiles.get_mut(m) {
                slot.struck = missile.struck;
            }
        }

        let leaving = state
            .missiles
            .get(m)
            .is_some_and(|slot| overlaps(&slot.entity, &state.borders.top));
        if leaving {
            state.missiles.despawn(m);
        }
    }
    Ok(())
}

/// Apply bomb damage to the player; zero lives ends the run in defeat
fn hit_player(state: &mut GameState, damage: i32) {
    let player = &mut state.player;
    player.lives -= damage;
    player.damage_taken += damage;
    player.hit_flash = HIT_FLASH_FRAMES;
    if player.lives <= 0 {
        player.lives = 0;
    }
    let lives_left = player.lives;
    log::debug!("Player hit for {}, {} lives left", damage, lives_left);
    state.emit(GameEvent::PlayerHit { damage, lives_left });

    if lives_left == 0 {
        state.end_run(GamePhase::Defeat);
    }
}

/// Move bombs down and resolve hits on the player
pub fn update_bombs(state: &mut GameState) {
    let fall = Vec2::new(0.0, -state.run.bomb_speed());
    for b in 0..state.bombs.capacity() {
        let Some(bomb) = state.bombs.get_mut(b) else {
            continue;
        };
        if !bomb.is_active() {
            continue;
        }
        bomb.entity.translate(fall);
        let bomb = *bomb;

        if overlaps(&bomb.entity, &state.player.entity) {
            state.bombs.despawn(b);
            state.run.bomb_cooldown = BOMB_HIT_COOLDOWN;
            hit_player(state, bomb.power);
            if state.is_over() {
                return;
            }
        } else if overlaps(&bomb.entity, &state.borders.bottom) {
            state.bombs.despawn(b);
        }
    }
}

/// Count down explosion markers and the hit tint
pub fn update_effects(state: &mut GameState) {
    for x in 0..state.explosions.capacity() {
        let Some(explosion) = state.explosions.get_mut(x) else {
            continue;
        };
        if !explosion.is_active() {
            continue;
        }
        explosion.frames_left = explosion.frames_left.saturating_sub(1);
        if explosion.frames_left == 0 {
            state.explosions.despawn(x);
        }
    }
    state.player.hit_flash = state.player.hit_flash.saturating_sub(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::weapon::equip_weapon;
    use crate::tuning::BalanceTables;

    fn state() -> GameState {
        GameState::new(Settings::default(), BalanceTables::builtin()).unwrap()
    }

    /// Put a missile of `power` right under enemy `slot`
    fn aim_missile(state: &mut GameState, slot: usize, power: i32) {
        let target = state.enemies.get(slot).unwrap().entity.pos;
        let template = state.missile_template;
        let kind = state.player.weapon.kind;
        state.missiles.spawn(|m| {
            m.entity.visual = template.visual;
            m.entity.resize(template.size);
            m.entity.pos = target - Vec2::new(0.0, MISSILE_SPEED);
            m.kind = kind;
            m.power = power;
            m.piercing = kind.is_piercing();
            m.struck = 0;
        });
    }

    #[test]
    fn test_damage_scales_linearly_with_stage() {
        assert_eq!(damage_for(3, 1), 3);
        assert_eq!(damage_for(3, 2), 6);
        assert_eq!(damage_for(2, 3), 6);
    }

    #[test]
    fn test_stage_two_power_three_kills_six_leaves_seven_at_one() {
        let mut state = state();
        state.run.stage = 2;
        // Bottom-row slot so nothing else is in the way
        let (weak, strong) = (45, 47);
        state.enemies.get_mut(weak).unwrap().lives = 6;
        state.enemies.get_mut(strong).unwrap().lives = 7;

        aim_missile(&mut state, weak, 3);
        update_missiles(&mut state).unwrap();
        assert!(!state.enemies.get(weak).unwrap().is_active());
        assert_eq!(state.run.live_enemies, NUM_ENEMIES - 1);

        aim_missile(&mut state, strong, 3);
        update_missiles(&mut state).unwrap();
        let survivor = state.enemies.get(strong).unwrap();
        assert!(survivor.is_active());
        assert_eq!(survivor.lives, 1);
        assert_eq!(survivor.entity.visual, Visual::Invader { stage: 1, tier: 1 });
    }

    #[test]
    fn test_kill_scores_explodes_and_drops() {
        let mut state = state();
        let pos = state.enemies.get(42).unwrap().entity.pos;
        aim_missile(&mut state, 42, 1);
        update_missiles(&mut state).unwrap();

        assert_eq!(state.run.score, 10);
        assert_eq!(state.missiles.active_count(), 0);
        let (_, explosion) = state.explosions.iter_active().next().unwrap();
        assert_eq!(explosion.entity.pos, pos);
        assert_eq!(explosion.frames_left, EXPLOSION_FRAMES);
        let (_, pickup) = state.pickups.iter_active().next().unwrap();
        assert!(WeaponKind::DROPS.contains(&pickup.kind));
        assert_eq!(state.run.pickup_cooldown, PICKUP_DROP_COOLDOWN);
    }

    #[test]
    fn test_pickup_cooldown_blocks_drop() {
        let mut state = state();
        state.run.pickup_cooldown = 5;
        aim_missile(&mut state, 41, 1);
        update_missiles(&mut state).unwrap();
        assert_eq!(state.run.score, 10);
        assert_eq!(state.pickups.active_count(), 0);
        assert_eq!(state.run.pickup_cooldown, 5);
    }

    #[test]
    fn test_score_uses_level_squared() {
        assert_eq!(kill_score(1), 10);
        assert_eq!(kill_score(3), 90);
    }

    #[test]
    fn test_piercing_beam_hits_each_enemy_once() {
        let mut state = state();
        equip_weapon(&mut state, WeaponKind::Lightning).unwrap();
        for enemy in state.enemies.iter_mut() {
            enemy.lives = 100;
        }
        let template = state.missile_template;
        // Beam centred on column 4, low enough to stay clear of the top wall
        state.missiles.spawn(|m| {
            m.entity.resize(template.size);
            m.entity.pos = Vec2::new(-0.5, -MISSILE_SPEED);
            m.kind = WeaponKind::Lightning;
            m.power = 1;
            m.piercing = true;
            m.struck = 0;
        });
        update_missiles(&mut state).unwrap();
        let after_first = state.enemies.get(44).unwrap().lives;
        assert_eq!(after_first, 99);
        // Beam still alive and still overlapping the column
        assert_eq!(state.missiles.active_count(), 1);
        update_missiles(&mut state).unwrap();
        assert_eq!(state.enemies.get(44).unwrap().lives, 99);
        // The rest of the column above was hit exactly once too
        assert_eq!(state.enemies.get(34).unwrap().lives, 99);
    }

    #[test]
    fn test_beam_clearing_stage_leaves_new_wave_untouched() {
        let mut state = state();
        for slot in (0..NUM_ENEMIES).filter(|&s| s != 44) {
            state.enemies.despawn(slot);
        }
        state.run.live_enemies = 1;
        equip_weapon(&mut state, WeaponKind::Lightning).unwrap();
        let template = state.missile_template;
        state.missiles.spawn(|m| {
            m.entity.resize(template.size);
            m.entity.pos = Vec2::new(-0.5, -MISSILE_SPEED);
            m.kind = WeaponKind::Lightning;
            m.power = 1;
            m.piercing = true;
            m.struck = 0;
        });
        // A second shot lined up on where the new wave's slot 45 appears
        state.missiles.spawn(|m| {
            m.entity.resize(Vec2::splat(PROJECTILE_SIZE));
            m.entity.pos = Vec2::new(0.0, 0.5 - MISSILE_SPEED);
            m.kind = WeaponKind::Ball;
            m.power = 1;
            m.piercing = false;
            m.struck = 0;
        });

        update_missiles(&mut state).unwrap();
        assert_eq!(state.run.stage, 2);
        assert_eq!(state.run.live_enemies, NUM_ENEMIES);
        assert_eq!(state.run.score, kill_score(1));
        assert_eq!(state.missiles.active_count(), 0);
        assert!(state.enemies.iter().all(|e| e.lives == e.max_lives));

        update_missiles(&mut state).unwrap();
        assert_eq!(state.run.live_enemies, NUM_ENEMIES);
        assert!(state.enemies.iter().all(|e| e.lives == e.max_lives));
    }

    #[test]
    fn test_missile_leaves_at_top_border() {
        let mut state = state();
        state.missiles.spawn(|m| {
            m.entity.resize(Vec2::splat(PROJECTILE_SIZE));
            m.entity.pos = Vec2::new(2.8, 2.7);
            m.power = 1;
        });
        update_missiles(&mut state).unwrap();
        assert_eq!(state.missiles.active_count(), 0);
    }

    #[test]
    fn test_bomb_hit_damages_player_and_delays_next_bomb() {
        let mut state = state();
        let ship = state.player.entity.pos;
        state.bombs.spawn(|b| {
            b.entity.pos = ship + Vec2::new(0.0, BOMB_SPEED);
            b.power = 2;
        });
        update_bombs(&mut state);
        assert_eq!(state.bombs.active_count(), 0);
        assert_eq!(state.player.lives, PLAYER_MAX_LIVES - 2);
        assert_eq!(state.player.damage_taken, 2);
        assert_eq!(state.player.hit_flash, HIT_FLASH_FRAMES);
        assert_eq!(state.run.bomb_cooldown, BOMB_HIT_COOLDOWN);
    }

    #[test]
    fn test_lethal_bomb_clamps_lives_and_defeats() {
        let mut state = state();
        state.player.lives = 1;
        let ship = state.player.entity.pos;
        state.bombs.spawn(|b| {
            b.entity.pos = ship + Vec2::new(0.0, BOMB_SPEED);
            b.power = 3;
        });
        update_bombs(&mut state);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.run.phase, GamePhase::Defeat);
        assert!(state.game_over_banner.enabled);
    }

    #[test]
    fn test_slowed_bombs_fall_slower() {
        let mut state = state();
        state.run.slowed = true;
        state.bombs.spawn(|b| b.entity.pos = Vec2::new(2.0, 0.0));
        update_bombs(&mut state);
        let y = state.bombs.get(0).unwrap().entity.pos.y;
        assert!((y + BOMB_SPEED / SLOW_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_effects_count_down() {
        let mut state = state();
        state.player.hit_flash = 1;
        state.explosions.spawn(|x| {
            x.entity.pos = Vec2::ZERO;
            x.frames_left = 2;
        });
        update_effects(&mut state);
        assert_eq!(state.player.hit_flash, 0);
        assert_eq!(state.explosions.active_count(), 1);
        update_effects(&mut state);
        assert_eq!(state.explosions.active_count(), 0);
        update_effects(&mut state);
        assert_eq!(state.player.hit_flash, 0);
    }
}
