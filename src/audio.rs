//! Fire-and-forget audio triggers
//!
//! The simulation never mixes or loads audio; it asks a sink to play an
//! opaque handle and moves on. The router gates every call behind the
//! sfx toggle, and a missing handle is silently skipped - gameplay is
//! never blocked on sound.

use crate::assets::SoundHandle;

/// Something that can start a sound. Implementations live outside the
/// core (a real mixer, a test spy, nothing at all).
pub trait AudioSink {
    fn play(&mut self, sound: SoundHandle);
}

/// Discards every trigger
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _sound: SoundHandle) {}
}

/// Logs triggers at debug level; handy for headless runs
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, sound: SoundHandle) {
        log::debug!("play sound {}", sound.0);
    }
}

/// Routes play requests to a sink, honoring the sfx toggle
pub struct AudioRouter {
    sfx_on: bool,
    sink: Box<dyn AudioSink>,
}

impl AudioRouter {
    pub fn new(sfx_on: bool, sink: Box<dyn AudioSink>) -> Self {
        Self { sfx_on, sink }
    }

    /// Play a sound if sfx are on and the handle loaded
    pub fn play(&mut self, sound: Option<SoundHandle>) {
        if !self.sfx_on {
            return;
        }
        match sound {
            Some(handle) => self.sink.play(handle),
            None => log::debug!("sound handle missing, skipping"),
        }
    }
}
