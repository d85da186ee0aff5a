//! Display flags.
//!
//! "Playing" and "active note" exist only for the UI. They flow one way,
//! from the control thread to registered observers, and the audio path never
//! reads them back.

use crate::chord::PitchClass;

/// How long a triggered note stays highlighted (render-clock seconds).
pub const ACTIVE_NOTE_HOLD: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEvent {
    Playing(bool),
    ActiveNote(Option<PitchClass>),
}

pub trait DisplayObserver: Send {
    fn notify(&mut self, event: DisplayEvent);
}

impl<F> DisplayObserver for F
where
    F: FnMut(DisplayEvent) + Send,
{
    fn notify(&mut self, event: DisplayEvent) {
        self(event)
    }
}

/// Current flags plus the observers that want to hear about changes.
#[derive(Default)]
pub struct DisplayState {
    playing: bool,
    active_note: Option<PitchClass>,
    clear_at: Option<f64>,
    observers: Vec<Box<dyn DisplayObserver>>,
}

impl DisplayState {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn active_note(&self) -> Option<PitchClass> {
        self.active_note
    }

    /// Register an observer; it immediately receives the current flags.
    pub fn subscribe(&mut self, mut observer: Box<dyn DisplayObserver>) {
        observer.notify(DisplayEvent::Playing(self.playing));
        observer.notify(DisplayEvent::ActiveNote(self.active_note));
        self.observers.push(observer);
    }

    pub fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.emit(DisplayEvent::Playing(playing));
        }
    }

    /// Highlight `note` until `now + ACTIVE_NOTE_HOLD`.
    pub fn note_triggered(&mut self, note: PitchClass, now: f64) {
        self.clear_at = Some(now + ACTIVE_NOTE_HOLD);
        if self.active_note != Some(note) {
            self.active_note = Some(note);
            self.emit(DisplayEvent::ActiveNote(Some(note)));
        }
    }

    /// Clear the highlight once its hold time has passed.
    pub fn tick(&mut self, now: f64) {
        if self.clear_at.is_some_and(|at| now >= at) {
            self.clear_note();
        }
    }

    pub fn clear_note(&mut self) {
        self.clear_at = None;
        if self.active_note.take().is_some() {
            self.emit(DisplayEvent::ActiveNote(None));
        }
    }

    fn emit(&mut self, event: DisplayEvent) {
        for observer in &mut self.observers {
            observer.notify(event);
        }
    }
}
