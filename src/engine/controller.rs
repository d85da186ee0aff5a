use std::sync::Arc;

use rtrb::{Consumer, Producer};
use tracing::{debug, info, warn};

use crate::bus;
use crate::chord::PitchClass;
use crate::display::{DisplayObserver, DisplayState};
use crate::engine::EngineShared;
use crate::params::Snapshot;
use crate::synth::{Command, ParamUpdate, Voice, VoiceId, VoiceResources};

/// Control-plane half of the engine.
///
/// Everything here runs on the caller's thread and returns immediately:
/// voices are built here and queued, parameter edits are stamped and queued,
/// finished voices are collected and freed here. After [`shutdown`] every
/// call is a no-op.
///
/// [`shutdown`]: Controller::shutdown
pub struct Controller {
    shared: Arc<EngineShared>,
    commands: Producer<Command>,
    retired: Consumer<Box<Voice>>,
    resources: VoiceResources,
    display: DisplayState,
    next_voice: u64,
    next_seq: u64,
    pending_params: Option<ParamUpdate>,
    outstanding: usize,
    /// Upper bound on `outstanding`, equal to the registry's reserved slots.
    voice_limit: usize,
}

impl Controller {
    pub(crate) fn new(
        shared: Arc<EngineShared>,
        commands: Producer<Command>,
        retired: Consumer<Box<Voice>>,
        resources: VoiceResources,
        voice_limit: usize,
    ) -> Self {
        let mut display = DisplayState::default();
        display.set_playing(true);

        Self {
            shared,
            commands,
            retired,
            resources,
            display,
            next_voice: 0,
            next_seq: 0,
            pending_params: None,
            outstanding: 0,
            voice_limit,
        }
    }

    /// Render-clock time in seconds.
    pub fn now(&self) -> f64 {
        self.shared.now()
    }

    pub fn sample_rate(&self) -> f32 {
        self.shared.sample_rate()
    }

    /// Retarget the shared graph (motor rate, disperser Q) from `snapshot`.
    ///
    /// Safe to call on every knob move; the newest call always wins.
    pub fn set_parameters(&mut self, snapshot: &Snapshot) {
        if self.shared.is_closed() {
            return;
        }

        self.collect_retired();

        self.next_seq += 1;
        let update = ParamUpdate {
            seq: self.next_seq,
            time: self.now(),
            snapshot: snapshot.sanitized(),
        };

        // anything still waiting is older than this one
        self.pending_params = None;
        self.send_params(update);
    }

    /// Start a new voice for `note` in `octave`, using `snapshot` for every
    /// other control.
    ///
    /// Never touches voices already playing. Returns `None` when the engine
    /// is closed, the command queue is full, or `voice_capacity` voices are
    /// already sounding.
    pub fn trigger(&mut self, note: PitchClass, octave: i32, snapshot: &Snapshot) -> Option<VoiceId> {
        if self.shared.is_closed() {
            return None;
        }

        self.collect_retired();
        if self.outstanding >= self.voice_limit {
            warn!(?note, octave, limit = self.voice_limit, "voice limit reached, trigger dropped");
            return None;
        }

        let id = VoiceId(self.next_voice);
        let now = self.now();
        let voice = Voice::new(id, snapshot.with_note(note, octave), now, &self.resources);

        if self.commands.push(Command::Trigger(Box::new(voice))).is_err() {
            warn!(?note, octave, "command queue full, trigger dropped");
            return None;
        }

        self.next_voice += 1;
        self.outstanding += 1;
        self.display.note_triggered(note, now);
        debug!(id = id.0, ?note, octave, at = now, "voice triggered");

        Some(id)
    }

    /// Housekeeping: free retired voices, expire the active-note highlight,
    /// resend a parameter update the queue had no room for.
    ///
    /// Returns how many voices were freed.
    pub fn poll(&mut self) -> usize {
        let freed = self.collect_retired();

        if self.shared.is_closed() {
            return freed;
        }

        if let Some(update) = self.pending_params.take() {
            self.send_params(update);
        }
        self.display.tick(self.now());
        freed
    }

    /// Close the engine. Idempotent.
    ///
    /// Voices still connected are abandoned with the render side; their
    /// teardown never runs against a closed graph.
    pub fn shutdown(&mut self) {
        if !self.shared.close() {
            return;
        }

        self.pending_params = None;
        self.collect_retired();
        self.display.clear_note();
        self.display.set_playing(false);
        info!(abandoned = self.outstanding, "engine shut down");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    pub fn is_playing(&self) -> bool {
        self.display.is_playing()
    }

    pub fn active_note(&self) -> Option<PitchClass> {
        self.display.active_note()
    }

    pub fn subscribe(&mut self, observer: impl DisplayObserver + 'static) {
        self.display.subscribe(Box::new(observer));
    }

    /// Voices triggered and not yet freed on this side.
    pub fn outstanding_voices(&self) -> usize {
        self.outstanding
    }

    /// Voices connected on the render side, as last published.
    pub fn live_voices(&self) -> usize {
        self.shared.live_voices()
    }

    /// Graph nodes alive on the render side, as last published.
    pub fn node_count(&self) -> usize {
        if self.shared.is_closed() {
            return 0;
        }
        bus::NODE_COUNT + self.shared.voice_nodes()
    }

    fn send_params(&mut self, update: ParamUpdate) {
        if let Err(rtrb::PushError::Full(Command::SetParams(update))) =
            self.commands.push(Command::SetParams(update))
        {
            debug!(seq = update.seq, "command queue full, parameter update deferred");
            self.pending_params = Some(update);
        }
    }

    fn collect_retired(&mut self) -> usize {
        let mut freed = 0;
        while let Ok(voice) = self.retired.pop() {
            debug!(id = voice.id().0, "voice freed");
            drop(voice);
            freed += 1;
        }
        self.outstanding = self.outstanding.saturating_sub(freed);
        freed
    }
}
