//! Feedback cues fired in response to drops and stage completion.
//!
//! The core only decides which cue fires and when; how a cue is rendered
//! (audio element, terminal banner, nothing at all) belongs to the sink.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A named feedback signal.
///
/// Cues are mutually exclusive per event: a drop produces exactly one of
/// `Correct` or `Incorrect`, and finishing the last stage adds
/// `StageComplete`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// The dragged item matched its slot.
    Correct,
    /// The dragged item did not match the slot.
    Incorrect,
    /// The final stage is fully filled.
    StageComplete,
}

impl Cue {
    /// Stable name of the cue, also the stem of its sound file.
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Correct => "correct",
            Cue::Incorrect => "incorrect",
            Cue::StageComplete => "complete",
        }
    }
}

impl std::fmt::Display for Cue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A collaborator that renders cues.
///
/// `fire` is fire-and-forget: it must not block the caller, and an
/// overlapping trigger of the same cue restarts it from the beginning
/// rather than queueing behind the previous one.
pub trait FeedbackSink {
    /// Fires a cue.
    fn fire(&mut self, cue: Cue);
}

/// Sink that discards every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FeedbackSink for NullSink {
    fn fire(&mut self, cue: Cue) {
        debug!(%cue, "cue discarded");
    }
}

/// Sink that records fired cues in order, for tests and headless drivers.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    cues: Vec<Cue>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues fired so far, oldest first.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// The most recently fired cue, if any.
    pub fn last(&self) -> Option<Cue> {
        self.cues.last().copied()
    }
}

impl FeedbackSink for RecordingSink {
    fn fire(&mut self, cue: Cue) {
        debug!(%cue, "cue recorded");
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_cue_names_are_stable() {
        let names: Vec<_> = Cue::iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["correct", "incorrect", "complete"]);
    }

    #[test]
    fn test_recording_sink_preserves_order() {
        let mut sink = RecordingSink::new();
        sink.fire(Cue::Incorrect);
        sink.fire(Cue::Correct);
        sink.fire(Cue::StageComplete);
        assert_eq!(sink.cues(), &[Cue::Incorrect, Cue::Correct, Cue::StageComplete]);
        assert_eq!(sink.last(), Some(Cue::StageComplete));
    }
}
