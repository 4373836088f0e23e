//! Audio system
//!
//! The game has two samples. Playback itself belongs to the host through
//! [`AudioSink`]; the manager picks the sample for each game event, applies
//! volume and hands out voices round-robin so overlapping sounds do not cut
//! each other off.

use crate::sim::GameEvent;

/// Number of voices handed out round-robin
pub const NUM_VOICES: usize = 8;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Missile or bomb launched
    Whoosh,
    /// Something got hit
    Bang,
}

impl SoundEffect {
    /// Asset the host should load for this effect
    pub fn asset(&self) -> &'static str {
        match self {
            SoundEffect::Whoosh => "whoosh.wav",
            SoundEffect::Bang => "bang.wav",
        }
    }
}

/// Host playback backend
pub trait AudioSink {
    fn play(&mut self, voice: usize, effect: SoundEffect, volume: f32);
}

/// Sample to play for a game event, if any
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::Fired { .. } | GameEvent::BombDropped { .. } => Some(SoundEffect::Whoosh),
        GameEvent::EnemyHit { .. }
        | GameEvent::EnemyKilled { .. }
        | GameEvent::PlayerHit { .. } => Some(SoundEffect::Bang),
        _ => None,
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    next_voice: usize,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            next_voice: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect on the next voice
    pub fn play(&mut self, sink: &mut impl AudioSink, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let voice = self.next_voice;
        self.next_voice = (self.next_voice + 1) % NUM_VOICES;
        sink.play(voice, effect, vol);
    }

    /// Play whatever this frame's events call for
    pub fn handle_events(&mut self, events: &[GameEvent], sink: &mut impl AudioSink) {
        for effect in events.iter().filter_map(sound_for) {
            self.play(sink, effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WeaponKind;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(usize, SoundEffect, f32)>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, voice: usize, effect: SoundEffect, volume: f32) {
            self.played.push((voice, effect, volume));
        }
    }

    #[test]
    fn test_event_sounds() {
        let fired = GameEvent::Fired {
            slot: 0,
            kind: WeaponKind::Ball,
        };
        assert_eq!(sound_for(&fired), Some(SoundEffect::Whoosh));
        let hit = GameEvent::PlayerHit {
            damage: 1,
            lives_left: 5,
        };
        assert_eq!(sound_for(&hit), Some(SoundEffect::Bang));
        assert_eq!(sound_for(&GameEvent::Rage), None);
    }

    #[test]
    fn test_voices_rotate() {
        let mut audio = AudioManager::new();
        let mut sink = Recorder::default();
        for _ in 0..NUM_VOICES + 2 {
            audio.play(&mut sink, SoundEffect::Bang);
        }
        let voices: Vec<usize> = sink.played.iter().map(|p| p.0).collect();
        assert_eq!(voices[0], 0);
        assert_eq!(voices[NUM_VOICES - 1], NUM_VOICES - 1);
        assert_eq!(voices[NUM_VOICES], 0);
        assert_eq!(voices[NUM_VOICES + 1], 1);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new();
        audio.set_muted(true);
        let mut sink = Recorder::default();
        audio.handle_events(&[GameEvent::BombDropped { slot: 1 }], &mut sink);
        assert!(sink.played.is_empty());
    }

    #[test]
    fn test_sfx_volume_scales_master() {
        let mut audio = AudioManager::new();
        audio.set_sfx_volume(0.5);
        let mut sink = Recorder::default();
        audio.play(&mut sink, SoundEffect::Whoosh);
        assert!((sink.played[0].2 - 0.4).abs() < 1e-6);

        audio.set_sfx_volume(0.0);
        audio.play(&mut sink, SoundEffect::Whoosh);
        assert_eq!(sink.played.len(), 1);
    }

    #[test]
    fn test_handle_events_skips_silent_ones() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(2.0);
        let mut sink = Recorder::default();
        let events = [
            GameEvent::Rage,
            GameEvent::EnemyKilled { slot: 3, points: 10 },
            GameEvent::StageAdvanced { stage: 2 },
        ];
        audio.handle_events(&events, &mut sink);
        assert_eq!(sink.played, vec![(0, SoundEffect::Bang, 1.0)]);
    }
}
