/*
Voice Envelope & Lifetime
=========================

Every voice follows the same fixed gate, laid out in absolute render-clock
time the moment it is triggered:

    gain
    1.0 ┤   ╱‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾╲
        │  ╱                            ╲
    0.0 ┼─╱                              ‾──────────────┬──────────┐
        t0  +5ms          +105ms     +205ms        stop (+355ms)  dispose
        │Attack│         Hold          │      Release               │Disposed

  Attack   linear 0 → 1 over 5 ms
  Hold     full scale; the resonators keep ringing underneath, the gate
           (not the sources) shapes the tail
  Release  exponential approach to 0 with τ = release / 5 = 10 ms, a hard cut
  stop     sources (carrier, modulator, noise) go silent
  dispose  stop + safety margin: the voice leaves the render graph and is
           sent back to the control thread to be freed

Nothing here is stepped from outside: the schedule is handed to the output
gain's automation timeline once, and disposal is decided by comparing the
render clock against `dispose`.
*/

use crate::dsp::AutomationParam;

pub const ATTACK: f64 = 0.005;
pub const DECAY: f64 = 0.1;
pub const RELEASE: f64 = 0.05;
/// Full-scale level held between attack and release.
pub const SUSTAIN: f32 = 1.0;
/// Extra hold between the end of decay and the start of the cut.
pub const RELEASE_DELAY: f64 = 0.1;
/// Extra time after the release before the sources stop.
pub const STOP_PAD: f64 = 0.2;
/// Time after `stop` before the voice is torn down.
pub const DISPOSE_MARGIN: f64 = 0.1;

/// Where a voice is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoicePhase {
    Attack,
    Hold,
    Release,
    Disposed,
}

/// Absolute times (seconds on the render clock) for one voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSchedule {
    pub start: f64,
    pub hold: f64,
    pub release: f64,
    pub stop: f64,
    pub dispose: f64,
}

impl VoiceSchedule {
    pub fn new(start: f64) -> Self {
        let hold = start + ATTACK;
        let release = hold + DECAY + RELEASE_DELAY;
        let stop = start + ATTACK + DECAY + RELEASE + STOP_PAD;

        Self {
            start,
            hold,
            release,
            stop,
            dispose: stop + DISPOSE_MARGIN,
        }
    }

    pub fn phase(&self, time: f64) -> VoicePhase {
        if time >= self.dispose {
            VoicePhase::Disposed
        } else if time >= self.release {
            VoicePhase::Release
        } else if time >= self.hold {
            VoicePhase::Hold
        } else {
            VoicePhase::Attack
        }
    }

    /// Output gain timeline for this schedule.
    pub fn gain_automation(&self) -> AutomationParam {
        let mut gain = AutomationParam::new(0.0).with_range(0.0, 1.0);
        gain.set_value_at_time(0.0, self.start);
        gain.linear_ramp_to_value_at_time(1.0, self.hold);
        gain.set_value_at_time(SUSTAIN, self.hold + DECAY);
        gain.set_target_at_time(0.0, self.release, RELEASE / 5.0);
        gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_times_follow_fixed_gate() {
        let s = VoiceSchedule::new(2.0);
        assert!((s.hold - 2.005).abs() < 1e-9);
        assert!((s.release - 2.205).abs() < 1e-9);
        assert!((s.stop - 2.355).abs() < 1e-9);
        assert!((s.dispose - 2.455).abs() < 1e-9);
    }

    #[test]
    fn phases_advance_in_order() {
        let s = VoiceSchedule::new(0.0);
        assert_eq!(s.phase(0.0), VoicePhase::Attack);
        assert_eq!(s.phase(0.004), VoicePhase::Attack);
        assert_eq!(s.phase(0.05), VoicePhase::Hold);
        assert_eq!(s.phase(0.21), VoicePhase::Release);
        assert_eq!(s.phase(0.4), VoicePhase::Release);
        assert_eq!(s.phase(0.454), VoicePhase::Release);
        assert_eq!(s.phase(s.dispose), VoicePhase::Disposed);
        assert_eq!(s.phase(0.456), VoicePhase::Disposed);
    }

    #[test]
    fn gain_shape() {
        let s = VoiceSchedule::new(1.0);
        let mut gain = s.gain_automation();

        assert_eq!(gain.value_at(1.0), 0.0);
        assert!((gain.value_at(1.0025) - 0.5).abs() < 1e-3);
        assert!((gain.value_at(1.005) - 1.0).abs() < 1e-6);
        assert_eq!(gain.value_at(1.15), 1.0);
        assert_eq!(gain.value_at(1.205), 1.0);

        // one time constant into the cut
        let cut = gain.value_at(1.215);
        assert!((cut - (-1.0f32).exp()).abs() < 1e-3, "got {cut}");

        // effectively silent when the sources stop
        assert!(gain.value_at(s.stop) < 1e-6);
    }
}
