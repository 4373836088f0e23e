//! Rendering boundary
//!
//! The simulation has no idea how sprites reach the screen. Each frame the
//! host walks the state with [`render_frame`], which submits every visible
//! entity to a [`Renderer`] in a fixed layer order with a camera and tint.

use glam::{Mat4, Vec3, Vec4};

use crate::sim::{Entity, GameState, Pooled, Visual};

/// RGBA multiplier applied to a sprite
pub type Tint = Vec4;

pub const WHITE: Tint = Vec4::ONE;
/// Ship tint while the hit flash is running
pub const HIT_FLASH: Tint = Vec4::new(1.0, 0.2, 0.2, 1.0);

/// Host drawing backend
pub trait Renderer {
    fn draw(&mut self, sprite: &Entity, camera_to_world: &Mat4, tint: Tint);
}

/// Camera pulled back along +z, looking at the playfield centre
pub fn default_camera() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0))
}

fn visible(entity: &Entity) -> bool {
    entity.enabled && entity.visual != Visual::Hidden
}

/// Submit one frame. Returns how many sprites were drawn.
pub fn render_frame(state: &GameState, camera: &Mat4, renderer: &mut impl Renderer) -> usize {
    let ship_tint = if state.player.hit_flash > 0 {
        HIT_FLASH
    } else {
        WHITE
    };

    let layers = std::iter::once((&state.player.entity, ship_tint))
        .chain(std::iter::once((&state.game_over_banner, WHITE)))
        .chain(state.enemies.iter().map(|e| (e.entity(), WHITE)))
        .chain(state.borders.iter().map(|b| (b, WHITE)))
        .chain(state.missiles.iter().map(|m| (m.entity(), WHITE)))
        .chain(state.bombs.iter().map(|b| (b.entity(), WHITE)))
        .chain(state.pickups.iter().map(|p| (p.entity(), WHITE)))
        .chain(state.explosions.iter().map(|x| (x.entity(), WHITE)))
        .chain(state.player.conditions.iter().map(|c| (&c.indicator, WHITE)));

    let mut drawn = 0;
    for (entity, tint) in layers.filter(|(e, _)| visible(e)) {
        renderer.draw(entity, camera, tint);
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::GamePhase;
    use crate::tuning::BalanceTables;

    #[derive(Default)]
    struct Recorder {
        sprites: Vec<(Visual, Tint)>,
    }

    impl Renderer for Recorder {
        fn draw(&mut self, sprite: &Entity, _camera: &Mat4, tint: Tint) {
            self.sprites.push((sprite.visual, tint));
        }
    }

    fn state() -> GameState {
        GameState::new(Settings::default(), BalanceTables::builtin()).unwrap()
    }

    #[test]
    fn test_fresh_run_draws_ship_wave_and_walls() {
        let state = state();
        let mut recorder = Recorder::default();
        let drawn = render_frame(&state, &default_camera(), &mut recorder);
        assert_eq!(drawn, 1 + NUM_ENEMIES + 4);
        assert_eq!(recorder.sprites[0], (Visual::Ship, WHITE));
        assert!(!recorder.sprites.iter().any(|(v, _)| *v == Visual::GameOver));
    }

    #[test]
    fn test_hit_flash_tints_ship() {
        let mut state = state();
        state.player.hit_flash = 3;
        let mut recorder = Recorder::default();
        render_frame(&state, &default_camera(), &mut recorder);
        assert_eq!(recorder.sprites[0], (Visual::Ship, HIT_FLASH));
    }

    #[test]
    fn test_defeat_draws_banner() {
        let mut state = state();
        state.end_run(GamePhase::Defeat);
        let mut recorder = Recorder::default();
        render_frame(&state, &default_camera(), &mut recorder);
        assert_eq!(recorder.sprites[1].0, Visual::GameOver);
    }

    #[test]
    fn test_camera_sits_behind_playfield() {
        let camera = default_camera();
        assert_eq!(camera.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, 3.0));
    }
}
