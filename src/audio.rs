/// Soundtrack bookkeeping.  The terminal build has no audio device, so
/// starting the music only records it; the tempo still drives gameplay.

use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct Soundtrack {
    pub bpm: f64,
    pub playing: bool,
}

impl Soundtrack {
    pub fn new(bpm: f64) -> Soundtrack {
        Soundtrack { bpm, playing: false }
    }

    pub fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            info!(bpm = self.bpm, "soundtrack started");
        }
    }

    /// Milliseconds per gait step when marching to the music: two beats.
    pub fn step_interval(&self) -> f64 {
        60_000.0 / self.bpm * 2.0
    }
}
