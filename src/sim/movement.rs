//! Player ship movement

use glam::Vec2;

use super::collision::overlaps;
use super::entity::Entity;
use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;

/// Move by `delta`, stepping back if that touches `wall`. Returns whether
/// the move stuck.
fn try_move(ship: &mut Entity, delta: Vec2, wall: &Entity) -> bool {
    ship.translate(delta);
    if overlaps(ship, wall) {
        ship.translate(-delta);
        false
    } else {
        true
    }
}

/// Apply one frame of held movement keys.
///
/// Left wins over right and up over down; the two axes move independently.
/// Vertical travel is also capped by a step counter above the spawn row.
pub fn move_player(state: &mut GameState, input: &TickInput) {
    if !state.player.entity.enabled {
        return;
    }
    let player = &mut state.player;
    let borders = &state.borders;

    if input.left {
        try_move(&mut player.entity, Vec2::new(-PLAYER_SPEED, 0.0), &borders.left);
    } else if input.right {
        try_move(&mut player.entity, Vec2::new(PLAYER_SPEED, 0.0), &borders.right);
    }

    if input.up {
        if player.rise_steps < PLAYER_MAX_RISE_STEPS
            && try_move(&mut player.entity, Vec2::new(0.0, PLAYER_SPEED), &borders.top)
        {
            player.rise_steps += 1;
        }
    } else if input.down
        && player.rise_steps > 0
        && try_move(&mut player.entity, Vec2::new(0.0, -PLAYER_SPEED), &borders.bottom)
    {
        player.rise_steps -= 1;
    }
}
