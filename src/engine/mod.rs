//! Engine assembly.
//!
//! ```text
//!        control thread                          render thread
//!   ┌───────────────────┐   Command (rtrb)   ┌──────────────────────┐
//!   │ Controller        │ ─────────────────► │ Renderer             │
//!   │  builds voices    │                    │  SharedGraph         │
//!   │  stamps param seq │ ◄───────────────── │  VoiceRegistry       │
//!   │  display flags    │  retired voices    │  frame clock ──┐     │
//!   └───────────────────┘                    └────────────────┼─────┘
//!            ▲                                                │
//!            └──────────── EngineShared (atomics) ◄───────────┘
//! ```
//!
//! The render thread never allocates or frees a voice: both happen on the
//! control thread. The only state both sides touch is a handful of atomics.

pub mod config;
pub mod controller;
pub mod renderer;

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use rtrb::RingBuffer;
use tracing::info;

use crate::analysis::{self, Analyser};
use crate::bus::SharedGraph;
use crate::synth::{VoiceRegistry, VoiceResources};

pub use config::EngineConfig;
pub use controller::Controller;
pub use renderer::Renderer;

/// State shared by both halves. Written by one side, read by the other.
#[derive(Debug)]
pub struct EngineShared {
    sample_rate: f32,
    /// Frames rendered so far (render clock). Written by the renderer.
    frames: AtomicU64,
    /// Set once by shutdown; never cleared.
    closed: AtomicBool,
    /// Voices currently connected. Written by the renderer.
    live_voices: AtomicUsize,
    /// Graph nodes owned by connected voices. Written by the renderer.
    voice_nodes: AtomicUsize,
}

impl EngineShared {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frames: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            live_voices: AtomicUsize::new(0),
            voice_nodes: AtomicUsize::new(0),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Render-clock time in seconds.
    pub fn now(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn live_voices(&self) -> usize {
        self.live_voices.load(Ordering::Acquire)
    }

    pub fn voice_nodes(&self) -> usize {
        self.voice_nodes.load(Ordering::Acquire)
    }

    /// Returns true for the call that actually closed the engine.
    fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }
}

/// Everything `engine` hands back.
pub struct EngineParts {
    pub controller: Controller,
    pub renderer: Renderer,
    pub analyser: Analyser,
}

/// Build a connected controller / renderer pair plus the analysis tap.
pub fn engine(config: EngineConfig) -> EngineParts {
    let sample_rate = config.sample_rate;
    let voice_capacity = config.voice_capacity.max(1);
    let shared = Arc::new(EngineShared::new(sample_rate));

    let (command_tx, command_rx) = RingBuffer::new(config.command_capacity.max(1));
    let (retire_tx, retire_rx) = RingBuffer::new(config.retire_capacity.max(1));
    let (tap, analyser) = analysis::tap(config.fft_size, config.smoothing, sample_rate);

    let resources = VoiceResources::new(sample_rate, config.noise_seed);

    let renderer = Renderer::new(
        shared.clone(),
        command_rx,
        retire_tx,
        SharedGraph::new(sample_rate),
        VoiceRegistry::with_capacity(voice_capacity),
        tap,
    );
    let controller = Controller::new(shared, command_tx, retire_rx, resources, voice_capacity);

    info!(sample_rate, "engine ready");

    EngineParts {
        controller,
        renderer,
        analyser,
    }
}
