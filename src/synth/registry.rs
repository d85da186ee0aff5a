use crate::synth::voice::{Voice, VoiceId};

/// Render-side owner of every live voice, in trigger order.
///
/// No stealing and no pool: each trigger adds a voice, and a voice leaves
/// only once the render clock passes its disposal time.
pub struct VoiceRegistry {
    voices: Vec<Box<Voice>>,
}

impl VoiceRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            voices: Vec::with_capacity(capacity),
        }
    }

    /// Connect a voice. Does not touch any other voice.
    pub fn insert(&mut self, voice: Box<Voice>) {
        let at = self.voices.partition_point(|v| v.id() < voice.id());
        self.voices.insert(at, voice);
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn contains(&self, id: VoiceId) -> bool {
        self.voices.iter().any(|v| v.id() == id)
    }

    pub fn node_count(&self) -> usize {
        self.voices.iter().map(|v| v.node_count()).sum()
    }

    /// Mix every voice into the bus input.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], motor: &[f32], start_time: f64) {
        for voice in &mut self.voices {
            voice.render(left, right, motor, start_time);
        }
    }

    /// Detach every voice whose disposal time is at or before `time`.
    ///
    /// Each detached voice goes to `retire` exactly once. When `retire` hands
    /// a voice back, it is reconnected in place and the sweep stops; the next
    /// call picks it up again.
    pub fn dispose_finished(
        &mut self,
        time: f64,
        mut retire: impl FnMut(Box<Voice>) -> Result<(), Box<Voice>>,
    ) {
        let mut i = 0;
        while i < self.voices.len() {
            if !self.voices[i].is_finished(time) {
                i += 1;
                continue;
            }
            if let Err(voice) = retire(self.voices.remove(i)) {
                self.voices.insert(i, voice);
                return;
            }
        }
    }

    /// Drop everything without running teardowns (engine shutdown).
    pub fn abandon(&mut self) -> usize {
        let count = self.voices.len();
        self.voices.clear();
        count
    }
}
