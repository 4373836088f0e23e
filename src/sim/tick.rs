//! Fixed timestep simulation tick
//!
//! One call advances the run by exactly one frame. The step order is fixed:
//! later steps read what earlier ones changed, so a kill during combat is
//! already counted when the wave controller runs.

use serde::{Deserialize, Serialize};

use super::combat::{update_bombs, update_effects, update_missiles};
use super::condition::update_conditions;
use super::movement::move_player;
use super::pickup::update_pickups;
use super::state::{GameEvent, GamePhase, GameState};
use super::wave::update_invaders;
use super::weapon::{update_bomb_fire, update_fire_control};
use crate::error::SimError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire key is down this frame
    pub fire_held: bool,
    /// Fire key went down this frame
    pub fire_pressed: bool,
}

type Step = fn(&mut GameState, &TickInput) -> Result<(), SimError>;

fn movement(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    move_player(state, input);
    Ok(())
}

fn fire_control(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    update_fire_control(state, input)?;
    update_bomb_fire(state);
    Ok(())
}

fn combat(state: &mut GameState, _: &TickInput) -> Result<(), SimError> {
    update_missiles(state)?;
    if !state.is_over() {
        update_bombs(state);
    }
    Ok(())
}

fn pickups(state: &mut GameState, _: &TickInput) -> Result<(), SimError> {
    update_pickups(state)
}

fn conditions(state: &mut GameState, _: &TickInput) -> Result<(), SimError> {
    update_conditions(state);
    Ok(())
}

fn effects(state: &mut GameState, _: &TickInput) -> Result<(), SimError> {
    update_effects(state);
    Ok(())
}

fn invaders(state: &mut GameState, _: &TickInput) -> Result<(), SimError> {
    update_invaders(state);
    Ok(())
}

fn game_over_check(state: &mut GameState, _: &TickInput) -> Result<(), SimError> {
    if state.player.lives <= 0 {
        state.player.lives = 0;
        state.end_run(GamePhase::Defeat);
    }
    Ok(())
}

/// Frame steps in execution order
const STEPS: [(&str, Step); 8] = [
    ("movement", movement),
    ("fire control", fire_control),
    ("combat", combat),
    ("pickups", pickups),
    ("conditions", conditions),
    ("effects", effects),
    ("invaders", invaders),
    ("game over", game_over_check),
];

/// Advance the game state by one fixed timestep.
///
/// Returns the events raised this frame. Once the run is over this does
/// nothing and returns no events.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    if state.is_over() {
        return Vec::new();
    }
    state.run.frame += 1;

    for (name, step) in STEPS {
        if let Err(err) = step(state, input) {
            log::warn!("Frame {}: {} step failed: {}", state.run.frame, name, err);
        }
        if state.is_over() {
            break;
        }
    }

    std::mem::take(&mut state.events)
}
