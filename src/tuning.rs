//! Data-driven game balance
//!
//! Two line-oriented tables feed the simulation:
//!
//! - the enemy table holds `width, height, lives, power`, one value per line,
//!   repeating once per stage;
//! - the icon table holds `power, cooldown, energy` per weapon kind, then a
//!   `+` line, then one `duration` per condition kind.
//!
//! A line starting with `-` that is not itself a number is a comment. Blank
//! lines are ignored. A trailing partial group is dropped, which leaves the
//! table short; [`BalanceTables::validate`] reports that as a configuration
//! error before any wave is built.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::{ConditionKind, WeaponKind};

/// Per-stage enemy balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub lives: i32,
    pub power: i32,
}

/// Per-weapon balance (`energy == -1` means unlimited)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub power: i32,
    pub cooldown: u32,
    pub energy: i32,
}

/// All numeric balance data consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceTables {
    /// Indexed by `stage - 1`
    pub enemies: Vec<EnemyStats>,
    /// Indexed by [`WeaponKind::index`]
    pub weapons: Vec<WeaponStats>,
    /// Condition durations in frames, indexed by [`ConditionKind::index`]
    pub conditions: Vec<u32>,
}

impl Default for BalanceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BalanceTables {
    /// The shipped balance data
    pub fn builtin() -> Self {
        let enemy = |size: f32, lives, power| EnemyStats {
            width: size,
            height: size,
            lives,
            power,
        };
        let weapon = |power, cooldown, energy| WeaponStats {
            power,
            cooldown,
            energy,
        };
        Self {
            enemies: vec![enemy(0.25, 1, 1), enemy(0.3, 2, 1), enemy(0.4, 3, 2)],
            weapons: vec![
                weapon(1, 15, -1), // ball
                weapon(1, 10, 300), // lightning
                weapon(1, 5, 300), // star
                weapon(2, 15, 300), // slow
                weapon(1, 15, 300), // heart
            ],
            conditions: vec![300, 600],
        }
    }

    /// Parse both tables from their text form
    pub fn from_texts(enemy_text: &str, icon_text: &str) -> Result<Self, SimError> {
        let enemies = parse_enemy_table(enemy_text)?;
        let (weapons, conditions) = parse_icon_table(icon_text)?;
        log::info!(
            "Loaded balance tables: {} stages, {} weapons, {} conditions",
            enemies.len(),
            weapons.len(),
            conditions.len()
        );
        Ok(Self {
            enemies,
            weapons,
            conditions,
        })
    }

    /// Parse tables from their JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check every stage, weapon and condition the simulation will ask for
    pub fn validate(&self, max_stage: u32) -> Result<(), SimError> {
        for stage in 1..=max_stage {
            self.enemy(stage)?;
        }
        for kind in WeaponKind::ALL {
            self.weapon(kind)?;
        }
        for kind in ConditionKind::ALL {
            self.condition_duration(kind)?;
        }
        Ok(())
    }

    pub fn enemy(&self, stage: u32) -> Result<&EnemyStats, SimError> {
        stage
            .checked_sub(1)
            .and_then(|i| self.enemies.get(i as usize))
            .ok_or(SimError::MissingStage { stage })
    }

    pub fn weapon(&self, kind: WeaponKind) -> Result<&WeaponStats, SimError> {
        let index = kind.index();
        self.weapons
            .get(index)
            .ok_or(SimError::MissingWeapon { index })
    }

    pub fn condition_duration(&self, kind: ConditionKind) -> Result<u32, SimError> {
        let index = kind.index();
        self.conditions
            .get(index)
            .copied()
            .ok_or(SimError::MissingCondition { index })
    }
}

/// Lines worth parsing, with their 1-based line numbers
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .filter(|(_, line)| !(line.starts_with('-') && line.parse::<f64>().is_err()))
}

fn parse_num<T: std::str::FromStr>(line: usize, text: &str) -> Result<T, SimError> {
    text.parse().map_err(|_| SimError::InvalidNumber {
        line,
        text: text.to_string(),
    })
}

/// Parse the enemy table: groups of `width, height, lives, power`
pub fn parse_enemy_table(text: &str) -> Result<Vec<EnemyStats>, SimError> {
    let mut rows = Vec::new();
    let mut pending: Vec<(usize, &str)> = Vec::with_capacity(4);

    for entry in data_lines(text) {
        pending.push(entry);
        if pending.len() == 4 {
            let [(lw, w), (lh, h), (ll, l), (lp, p)] =
                [pending[0], pending[1], pending[2], pending[3]];
            rows.push(EnemyStats {
                width: parse_num(lw, w)?,
                height: parse_num(lh, h)?,
                lives: parse_num(ll, l)?,
                power: parse_num(lp, p)?,
            });
            pending.clear();
        }
    }

    if !pending.is_empty() {
        log::warn!(
            "Enemy table ends with a partial row ({} of 4 values); dropped",
            pending.len()
        );
    }
    Ok(rows)
}

/// Parse the icon table: weapon triples, a `+` separator, then durations
pub fn parse_icon_table(text: &str) -> Result<(Vec<WeaponStats>, Vec<u32>), SimError> {
    let mut weapons = Vec::new();
    let mut conditions = Vec::new();
    let mut pending: Vec<(usize, &str)> = Vec::with_capacity(3);
    let mut in_conditions = false;

    for (line, value) in data_lines(text) {
        if value.starts_with('+') {
            in_conditions = true;
            continue;
        }
        if in_conditions {
            conditions.push(parse_num(line, value)?);
            continue;
        }
        pending.push((line, value));
        if pending.len() == 3 {
            let [(lp, p), (lc, c), (le, e)] = [pending[0], pending[1], pending[2]];
            weapons.push(WeaponStats {
                power: parse_num(lp, p)?,
                cooldown: parse_num(lc, c)?,
                energy: parse_num(le, e)?,
            });
            pending.clear();
        }
    }

    if !pending.is_empty() {
        log::warn!(
            "Weapon table ends with a partial row ({} of 3 values); dropped",
            pending.len()
        );
    }
    Ok((weapons, conditions))
}
