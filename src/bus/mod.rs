//! The shared graph: one long-lived signal path every voice feeds into.
//!
//! ```text
//!   voices ──► disperser (16 × all-pass) ──► limiter ──► master ──► out
//!      ▲
//!   motor (sine LFO, read by every voice's FM index)
//! ```
//!
//! It is built once per engine and lives on the render thread. The control
//! thread never touches it directly; parameter edits arrive as
//! [`ParamUpdate`]s and become smooth retargets on the automation timelines.

pub mod disperser;
pub mod motor;

use crate::dsp::compressor::Compressor;
use crate::dsp::mix;
use crate::params;
use crate::synth::ParamUpdate;
use crate::MAX_BLOCK_SIZE;

pub use disperser::Disperser;
pub use motor::Motor;

/// Time constant of every parameter glide.
pub const RETARGET_TIME: f64 = 0.1;
pub const MASTER_GAIN: f32 = 1.0;
/// Nodes the shared graph owns: motor, 16 all-pass stages, limiter, master,
/// analysis tap.
pub const NODE_COUNT: usize = 1 + disperser::STAGES + 3;

pub struct SharedGraph {
    motor: Motor,
    disperser: Disperser,
    compressor: Compressor,
    master_gain: f32,
    motor_block: Vec<f32>,
    input_l: Vec<f32>,
    input_r: Vec<f32>,
    last_seq: Option<u64>,
    sample_rate: f32,
}

impl SharedGraph {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            motor: Motor::new(),
            disperser: Disperser::new(sample_rate),
            compressor: Compressor::limiter(sample_rate),
            master_gain: MASTER_GAIN,
            motor_block: vec![0.0; MAX_BLOCK_SIZE],
            input_l: vec![0.0; MAX_BLOCK_SIZE],
            input_r: vec![0.0; MAX_BLOCK_SIZE],
            last_seq: None,
            sample_rate,
        }
    }

    /// Retarget motor rate and disperser Q from a snapshot.
    ///
    /// Updates older than the newest one already applied are dropped, so a
    /// reordered pair still ends on the later write. Applying the same
    /// snapshot twice leaves the same targets. Returns whether the update
    /// was applied.
    pub fn apply(&mut self, update: &ParamUpdate, now: f64) -> bool {
        if self.last_seq.is_some_and(|last| update.seq <= last) {
            return false;
        }
        self.last_seq = Some(update.seq);

        let snapshot = update.snapshot.sanitized();
        let at = update.time.max(now);
        self.motor
            .retarget(params::motor_rate(snapshot.flow), at, RETARGET_TIME);
        self.disperser
            .retarget(params::disperser_q(snapshot.disperser), at, RETARGET_TIME);
        true
    }

    pub fn motor_rate_target(&self) -> f32 {
        self.motor.rate_target()
    }

    pub fn disperser_q_target(&self) -> f32 {
        self.disperser.q_target()
    }

    /// Render the motor for the next block and clear the voice input.
    ///
    /// Returns the voice input (left, right) and the motor block, all `len`
    /// samples long.
    pub fn begin_block(&mut self, len: usize, start_time: f64) -> (&mut [f32], &mut [f32], &[f32]) {
        let len = len.min(MAX_BLOCK_SIZE);
        self.motor
            .render(&mut self.motor_block[..len], start_time, self.sample_rate);
        self.input_l[..len].fill(0.0);
        self.input_r[..len].fill(0.0);

        (
            &mut self.input_l[..len],
            &mut self.input_r[..len],
            &self.motor_block[..len],
        )
    }

    /// Run the summed voice input through the chain into `left`/`right`.
    pub fn finish_block(&mut self, left: &mut [f32], right: &mut [f32], start_time: f64) {
        let len = left.len().min(MAX_BLOCK_SIZE);
        let (in_l, in_r) = (&mut self.input_l[..len], &mut self.input_r[..len]);

        self.disperser.process(in_l, in_r, start_time);
        self.compressor.process_block(in_l, in_r);
        mix::scale(in_l, self.master_gain);
        mix::scale(in_r, self.master_gain);

        left[..len].copy_from_slice(in_l);
        right[..len].copy_from_slice(in_r);
    }
}
