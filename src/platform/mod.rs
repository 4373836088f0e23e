//! Platform abstraction layer
//!
//! The simulation only ever sees a [`TickInput`]. Hosts report raw key
//! state through [`InputSource`]; [`InputSampler`] turns that into one
//! frame of input, including the "went down this frame" edge for fire.

use crate::sim::{GameState, Pooled, TickInput};

/// Keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

impl Key {
    pub const ALL: [Key; 5] = [Key::Left, Key::Right, Key::Up, Key::Down, Key::Fire];

    fn index(self) -> usize {
        self as usize
    }

    /// Map a host key name (DOM `KeyboardEvent.key` style) to a game key
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            " " | "Enter" => Some(Key::Fire),
            _ => None,
        }
    }
}

/// Anything that can answer "is this key down right now"
pub trait InputSource {
    fn is_down(&self, key: Key) -> bool;
}

/// Key state fed from host key events
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    down: [bool; Key::ALL.len()],
}

impl KeyState {
    pub fn set(&mut self, key: Key, down: bool) {
        self.down[key.index()] = down;
    }

    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    pub fn release_all(&mut self) {
        self.down = Default::default();
    }
}

impl InputSource for KeyState {
    fn is_down(&self, key: Key) -> bool {
        self.down[key.index()]
    }
}

/// Samples an [`InputSource`] once per frame
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    fire_was_down: bool,
}

impl InputSampler {
    pub fn sample(&mut self, source: &impl InputSource) -> TickInput {
        let fire = source.is_down(Key::Fire);
        let input = TickInput {
            left: source.is_down(Key::Left),
            right: source.is_down(Key::Right),
            up: source.is_down(Key::Up),
            down: source.is_down(Key::Down),
            fire_held: fire,
            fire_pressed: fire && !self.fire_was_down,
        };
        self.fire_was_down = fire;
        input
    }
}

/// Demo player for headless runs: chases pickups, otherwise lines up under
/// the lowest invader and keeps the trigger down
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    keys: KeyState,
}

impl Autopilot {
    /// Distance within which the ship counts as lined up
    const DEADZONE: f32 = 0.05;

    pub fn steer(&mut self, state: &GameState) {
        self.keys.release_all();
        if state.is_over() {
            return;
        }
        let ship_x = state.player.entity.pos.x;

        let pickup = state
            .pickups
            .iter_active()
            .map(|(_, p)| p.entity.pos.x)
            .min_by(|a, b| (a - ship_x).abs().total_cmp(&(b - ship_x).abs()));
        let target = pickup.or_else(|| {
            state
                .enemies
                .iter()
                .filter(|e| e.is_active())
                .map(|e| e.entity.pos)
                .min_by(|a, b| {
                    let (da, db) = ((a.x - ship_x).abs(), (b.x - ship_x).abs());
                    a.y.total_cmp(&b.y).then(da.total_cmp(&db))
                })
                .map(|pos| pos.x)
        });

        if let Some(x) = target {
            if x < ship_x - Self::DEADZONE {
                self.keys.press(Key::Left);
            } else if x > ship_x + Self::DEADZONE {
                self.keys.press(Key::Right);
            }
        }

        // Flick the trigger so pressed-mode weapons fire too
        if state.run.frame % 2 == 0 {
            self.keys.press(Key::Fire);
        }
    }
}

impl InputSource for Autopilot {
    fn is_down(&self, key: Key) -> bool {
        self.keys.is_down(key)
    }
}
