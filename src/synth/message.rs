use crate::params::Snapshot;
use crate::synth::voice::Voice;

/// Control-plane edit of the shared graph.
///
/// `seq` is assigned by the controller in call order; the renderer keeps only
/// the newest one it has seen, so a reordered pair still settles on the last
/// write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamUpdate {
    pub seq: u64,
    /// Render-clock time (seconds) at which the retarget starts.
    pub time: f64,
    pub snapshot: Snapshot,
}

/// Everything the control thread sends to the render thread.
pub enum Command {
    /// A fully built voice, ready to be connected.
    Trigger(Box<Voice>),
    SetParams(ParamUpdate),
}
