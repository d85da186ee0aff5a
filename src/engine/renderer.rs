use std::sync::atomic::Ordering;
use std::sync::Arc;

use rtrb::{Consumer, Producer, PushError};

use crate::analysis::AnalysisTap;
use crate::bus::{self, SharedGraph};
use crate::engine::EngineShared;
use crate::synth::{Command, Voice, VoiceRegistry};
use crate::MAX_BLOCK_SIZE;

const RETIRE_OVERFLOW: usize = 64;

/// Render-plane half of the engine: owns the shared graph, every connected
/// voice and the render clock.
///
/// Runs inside the audio callback. Does not log, lock or allocate: the
/// registry holds at most the controller's voice limit, and retired voices
/// that find the queue full wait in a fixed-capacity list.
pub struct Renderer {
    shared: Arc<EngineShared>,
    commands: Consumer<Command>,
    retired: Producer<Box<Voice>>,
    graph: SharedGraph,
    voices: VoiceRegistry,
    tap: AnalysisTap,
    /// Voices the retire queue had no room for; retried every block. Never
    /// grows past its initial capacity.
    unsent: Vec<Box<Voice>>,
    frame: u64,
    sample_rate: f32,
    scratch_l: Vec<f32>,
    scratch_r: Vec<f32>,
    abandoned: bool,
}

impl Renderer {
    pub(crate) fn new(
        shared: Arc<EngineShared>,
        commands: Consumer<Command>,
        retired: Producer<Box<Voice>>,
        graph: SharedGraph,
        voices: VoiceRegistry,
        tap: AnalysisTap,
    ) -> Self {
        let sample_rate = shared.sample_rate();
        Self {
            shared,
            commands,
            retired,
            graph,
            voices,
            tap,
            unsent: Vec::with_capacity(RETIRE_OVERFLOW),
            frame: 0,
            sample_rate,
            scratch_l: vec![0.0; MAX_BLOCK_SIZE],
            scratch_r: vec![0.0; MAX_BLOCK_SIZE],
            abandoned: false,
        }
    }

    /// Render-clock time in seconds.
    pub fn now(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn live_voices(&self) -> usize {
        self.voices.len()
    }

    /// Graph nodes alive right now: the shared graph's plus every voice's.
    pub fn node_count(&self) -> usize {
        if self.abandoned {
            return 0;
        }
        bus::NODE_COUNT + self.voices.node_count()
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Fill `left`/`right` with the next frames of output.
    ///
    /// After shutdown this writes silence and never touches a voice again.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());

        if self.shared.is_closed() {
            self.abandon();
            left.fill(0.0);
            right.fill(0.0);
            return;
        }

        let mut offset = 0;
        while offset < frames {
            let len = (frames - offset).min(MAX_BLOCK_SIZE);
            self.render_block(&mut left[offset..offset + len], &mut right[offset..offset + len]);
            offset += len;
        }
    }

    /// Render into an interleaved device buffer with `channels` channels.
    ///
    /// Mono devices get the average of both sides; channels past the second
    /// are left silent.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let mut left = std::mem::take(&mut self.scratch_l);
        let mut right = std::mem::take(&mut self.scratch_r);

        for frame_chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let frames = frame_chunk.len() / channels;
            let (l, r) = (&mut left[..frames], &mut right[..frames]);
            self.render(l, r);

            for (i, frame) in frame_chunk.chunks_mut(channels).enumerate().take(frames) {
                match frame {
                    [mono] => *mono = 0.5 * (l[i] + r[i]),
                    [fl, fr, rest @ ..] => {
                        *fl = l[i];
                        *fr = r[i];
                        rest.fill(0.0);
                    }
                    [] => {}
                }
            }
        }

        self.scratch_l = left;
        self.scratch_r = right;
    }

    fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let len = left.len();
        let start = self.now();

        self.drain_commands(start);

        let (in_l, in_r, motor) = self.graph.begin_block(len, start);
        self.voices.render(in_l, in_r, motor, start);
        self.graph.finish_block(left, right, start);
        self.tap.push(left, right);

        self.frame += len as u64;
        self.shared.frames.store(self.frame, Ordering::Release);

        self.retire_finished(self.now());
    }

    fn drain_commands(&mut self, now: f64) {
        while let Ok(command) = self.commands.pop() {
            match command {
                Command::Trigger(voice) => self.voices.insert(voice),
                Command::SetParams(update) => {
                    self.graph.apply(&update, now);
                }
            }
        }
    }

    fn retire_finished(&mut self, now: f64) {
        let retired = &mut self.retired;
        let unsent = &mut self.unsent;

        while let Some(voice) = unsent.pop() {
            if let Err(PushError::Full(voice)) = retired.push(voice) {
                unsent.push(voice);
                break;
            }
        }

        // a voice that fits nowhere stays connected (silent) until next block
        self.voices.dispose_finished(now, |voice| match retired.push(voice) {
            Ok(()) => Ok(()),
            Err(PushError::Full(voice)) if unsent.len() < unsent.capacity() => {
                unsent.push(voice);
                Ok(())
            }
            Err(PushError::Full(voice)) => Err(voice),
        });

        self.publish();
    }

    /// Drop every connected voice without running its teardown.
    fn abandon(&mut self) {
        if self.abandoned {
            return;
        }
        self.abandoned = true;

        while self.commands.pop().is_ok() {}
        self.voices.abandon();
        self.unsent.clear();
        self.publish();
    }

    fn publish(&self) {
        self.shared
            .live_voices
            .store(self.voices.len(), Ordering::Release);
        self.shared
            .voice_nodes
            .store(self.voices.node_count(), Ordering::Release);
    }
}
