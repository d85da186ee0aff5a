use crate::params::{self, Snapshot};
use crate::synth::envelope::{VoicePhase, VoiceSchedule};
use crate::synth::exciter::Exciter;
use crate::synth::resonator::Resonator;
use crate::synth::VoiceResources;
use crate::dsp::AutomationParam;

/// Graph nodes every voice owns regardless of chord size: carrier, modulator,
/// index gain, motor gain, noise source, splash gain, shaper, dry, wet, output.
pub const FIXED_NODES: usize = 10;
/// Nodes per chord member: input gain, delay, loop filter, feedback, panner.
pub const NODES_PER_RESONATOR: usize = 5;

/// Monotonic trigger id, assigned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoiceId(pub u64);

/// One triggered note.
///
/// Owns everything it renders with; the only things it shares are read-only
/// tables and the motor block it is handed each render call.
pub struct Voice {
    id: VoiceId,
    snapshot: Snapshot,
    schedule: VoiceSchedule,
    exciter: Exciter,
    resonators: Vec<Resonator>,
    dry_gain: f32,
    wet_gain: f32,
    output: AutomationParam,
    sample_period: f64,
}

impl Voice {
    /// Build a voice starting at render-clock time `start`.
    ///
    /// Allocates; call from the control thread.
    pub fn new(id: VoiceId, snapshot: Snapshot, start: f64, resources: &VoiceResources) -> Self {
        let snapshot = snapshot.sanitized();
        let schedule = VoiceSchedule::new(start);
        let sr = resources.sample_rate;

        let resonators = snapshot
            .frequencies()
            .iter()
            .enumerate()
            .map(|(i, &f)| Resonator::new(f, i, snapshot.resonance, snapshot.width, sr))
            .collect();

        Self {
            id,
            exciter: Exciter::new(&snapshot, &schedule, resources),
            resonators,
            dry_gain: params::dry_gain(snapshot.resonance),
            wet_gain: params::wet_gain(snapshot.resonance),
            output: schedule.gain_automation(),
            sample_period: 1.0 / sr as f64,
            snapshot,
            schedule,
        }
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn schedule(&self) -> &VoiceSchedule {
        &self.schedule
    }

    pub fn phase(&self, time: f64) -> VoicePhase {
        self.schedule.phase(time)
    }

    pub fn is_finished(&self, time: f64) -> bool {
        self.phase(time) == VoicePhase::Disposed
    }

    pub fn node_count(&self) -> usize {
        FIXED_NODES + NODES_PER_RESONATOR * self.resonators.len()
    }

    pub fn resonators(&self) -> &[Resonator] {
        &self.resonators
    }

    pub fn mix_gains(&self) -> (f32, f32) {
        (self.dry_gain, self.wet_gain)
    }

    /// Add this voice's output to the bus input for a block starting at
    /// `start_time`. `motor` holds the shared motor output for the same block.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], motor: &[f32], start_time: f64) {
        debug_assert_eq!(left.len(), right.len());
        debug_assert!(motor.len() >= left.len());

        for (i, (l, r)) in left.iter_mut().zip(right.iter_mut()).enumerate() {
            let time = start_time + i as f64 * self.sample_period;
            if time >= self.schedule.dispose {
                break;
            }

            let excitation = self.exciter.next_sample(time, motor[i]);

            let (mut wet_l, mut wet_r) = (0.0, 0.0);
            for resonator in &mut self.resonators {
                let (rl, rr) = resonator.process_stereo(excitation);
                wet_l += rl;
                wet_r += rr;
            }

            let gain = self.output.value_at(time);
            let dry = excitation * self.dry_gain;
            *l += gain * (dry + wet_l * self.wet_gain);
            *r += gain * (dry + wet_r * self.wet_gain);
        }
    }
}
