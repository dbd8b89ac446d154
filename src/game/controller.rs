//! Stage controller: the game's phase state machine.
//!
//! One controller instance owns the current phase, the live round for the
//! active stage, and a generation counter used to invalidate scheduled
//! transitions across resets. All transitions are one-directional except
//! reset, which returns to `Start` from anywhere.

use super::contracts::{Contract, PlacementContract};
use super::feedback::{Cue, FeedbackSink};
use super::matching::{self, DropAction, DropError, Verdict};
use super::stage::StageRound;
use super::tasks::TaskRegistry;
use crate::config::{ConfigError, GameConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Current phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Start screen; no slots or items exist.
    Start,
    /// First stage in play.
    StageOne,
    /// Second stage in play.
    StageTwo,
    /// All stages complete.
    Success,
}

impl Phase {
    /// Display label for the phase.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Start => "Start",
            Phase::StageOne => "Stage One",
            Phase::StageTwo => "Stage Two",
            Phase::Success => "Success",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which transition a pending token applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Stage one completed; build stage two.
    AdvanceToStageTwo,
    /// Stage two completed; enter the success state.
    Finish,
}

/// A one-shot scheduled stage transition.
///
/// Issued when the active stage becomes complete. The caller waits out
/// `delay` (letting feedback playback finish) and then hands the token
/// back to [`GameController::complete_transition`]. Tokens are keyed to
/// the controller generation, so a token issued before a reset is inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    generation: u64,
    delay: Duration,
    kind: TransitionKind,
}

impl PendingTransition {
    /// How long to wait before applying the transition.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The transition this token applies.
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }
}

/// Outcome of a drop, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The item matched and was locked into the slot. Carries the
    /// scheduled transition when this placement completed the stage.
    Correct {
        /// Present iff the stage is now complete.
        transition: Option<PendingTransition>,
    },
    /// The item did not match; nothing changed and the item returns to
    /// its origin collection.
    Incorrect,
    /// The drop was defensively rejected as a no-op.
    Rejected(DropError),
}

/// Error from starting outside the start phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("Cannot start from {}", phase)]
pub struct StartError {
    /// The phase the controller was in.
    pub phase: Phase,
}

impl std::error::Error for StartError {}

/// Errors from applying a pending transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TransitionError {
    /// The token predates a reset; the stage it belongs to is gone.
    #[display("Stale transition: generation {} but controller is at {}", token, current)]
    Stale {
        /// Generation recorded in the token.
        token: u64,
        /// Controller's current generation.
        current: u64,
    },

    /// The token does not apply to the current phase.
    #[display("Transition does not apply in {}", phase)]
    WrongPhase {
        /// The phase the controller was in.
        phase: Phase,
    },
}

impl std::error::Error for TransitionError {}

/// The game state machine: `Start -> StageOne -> StageTwo -> Success`,
/// with reset back to `Start` from any phase.
#[derive(Debug, Clone)]
pub struct GameController {
    config: GameConfig,
    registry: TaskRegistry,
    phase: Phase,
    round: Option<StageRound>,
    generation: u64,
}

impl GameController {
    /// Creates a controller in the start phase from a validated config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the task list or stage boundary is
    /// invalid.
    #[instrument(skip(config))]
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = config.registry()?;
        info!(
            task_count = registry.len(),
            boundary = config.stage_boundary(),
            "Controller created"
        );
        Ok(Self {
            config,
            registry,
            phase: Phase::Start,
            round: None,
            generation: 0,
        })
    }

    /// Creates a controller with the built-in daily routine.
    pub fn with_daily_routine() -> Self {
        Self::new(GameConfig::default()).expect("Built-in config is valid")
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The live round, present only during a stage.
    pub fn round(&self) -> Option<&StageRound> {
        self.round.as_ref()
    }

    /// Current generation; bumped on every reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The validated task registry.
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Starts the game: builds stage one's slots and items.
    ///
    /// # Errors
    ///
    /// Rejected unless the controller is in the start phase.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.phase != Phase::Start {
            warn!(phase = %self.phase, "start rejected");
            return Err(StartError { phase: self.phase });
        }

        let (first, _) = self
            .registry
            .partition(*self.config.stage_boundary())
            .expect("Boundary validated at construction");
        self.round = Some(StageRound::new(first));
        self.phase = Phase::StageOne;
        info!(slots = first.len(), "Stage one started");
        Ok(())
    }

    /// Handles a drop gesture.
    ///
    /// Evaluates the match, updates placement state on a correct drop, and
    /// fires the corresponding cue. Every failure mode is absorbed as a
    /// no-op [`DropOutcome::Rejected`]; there are no fatal errors here.
    #[instrument(skip(self, sink))]
    pub fn handle_drop(&mut self, action: DropAction, sink: &mut impl FeedbackSink) -> DropOutcome {
        let round = match (self.phase, self.round.as_mut()) {
            (Phase::StageOne | Phase::StageTwo, Some(round)) => round,
            _ => {
                debug!(phase = %self.phase, "drop outside an active stage");
                return DropOutcome::Rejected(DropError::NoActiveStage);
            }
        };

        let slot = match round.slot(action.slot) {
            Some(slot) => slot,
            None => return DropOutcome::Rejected(DropError::UnknownSlot(action.slot)),
        };
        let item = match round.item(action.item) {
            Some(item) => item,
            None => return DropOutcome::Rejected(DropError::UnknownItem(action.item)),
        };

        match matching::evaluate(slot, item) {
            Verdict::Incorrect => {
                debug!(%action, "mismatch");
                sink.fire(Cue::Incorrect);
                DropOutcome::Incorrect
            }
            Verdict::Correct => {
                if let Err(e) = PlacementContract::pre(round, &action) {
                    debug!(%action, error = %e, "correct drop rejected");
                    return DropOutcome::Rejected(e);
                }

                #[cfg(debug_assertions)]
                let before = round.clone();

                round
                    .place(action.slot, action.item)
                    .expect("Preconditions checked");

                #[cfg(debug_assertions)]
                PlacementContract::post(&before, round).expect("Placement postcondition");

                let complete = round.is_complete();
                sink.fire(Cue::Correct);

                let transition = if complete {
                    if self.phase == Phase::StageTwo {
                        // The congrats cue plays while the success screen
                        // transition waits out its delay.
                        sink.fire(Cue::StageComplete);
                    }
                    Some(self.schedule_transition())
                } else {
                    None
                };

                DropOutcome::Correct { transition }
            }
        }
    }

    /// Builds the transition token for the just-completed stage.
    fn schedule_transition(&self) -> PendingTransition {
        let (kind, delay) = match self.phase {
            Phase::StageOne => (TransitionKind::AdvanceToStageTwo, self.config.advance_delay()),
            _ => (TransitionKind::Finish, self.config.finish_delay()),
        };
        info!(?kind, delay_ms = delay.as_millis() as u64, "Stage complete, transition scheduled");
        PendingTransition {
            generation: self.generation,
            delay,
            kind,
        }
    }

    /// Applies a scheduled transition after its delay has elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Stale`] for tokens issued before a reset
    /// and [`TransitionError::WrongPhase`] for tokens that no longer apply;
    /// callers treat both as no-ops.
    #[instrument(skip(self))]
    pub fn complete_transition(
        &mut self,
        pending: PendingTransition,
    ) -> Result<Phase, TransitionError> {
        if pending.generation != self.generation {
            debug!(
                token = pending.generation,
                current = self.generation,
                "stale transition suppressed"
            );
            return Err(TransitionError::Stale {
                token: pending.generation,
                current: self.generation,
            });
        }

        match (self.phase, pending.kind) {
            (Phase::StageOne, TransitionKind::AdvanceToStageTwo) => {
                let (_, rest) = self
                    .registry
                    .partition(*self.config.stage_boundary())
                    .expect("Boundary validated at construction");
                self.round = Some(StageRound::new(rest));
                self.phase = Phase::StageTwo;
                info!(slots = rest.len(), "Stage two started");
                Ok(Phase::StageTwo)
            }
            (Phase::StageTwo, TransitionKind::Finish) => {
                self.round = None;
                self.phase = Phase::Success;
                info!("All stages complete");
                Ok(Phase::Success)
            }
            (phase, kind) => {
                warn!(%phase, ?kind, "transition does not apply");
                Err(TransitionError::WrongPhase { phase })
            }
        }
    }

    /// Resets to the start phase, discarding all stage state.
    ///
    /// Bumps the generation so transitions scheduled before the reset are
    /// suppressed when they eventually fire.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.round = None;
        self.phase = Phase::Start;
        self.generation += 1;
        info!(generation = self.generation, "Game reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::feedback::RecordingSink;
    use crate::game::stage::{ItemId, SlotId};

    #[test]
    fn test_start_only_from_start_phase() {
        let mut controller = GameController::with_daily_routine();
        assert!(controller.start().is_ok());
        assert_eq!(controller.phase(), Phase::StageOne);

        let err = controller.start().unwrap_err();
        assert_eq!(err.phase, Phase::StageOne);
    }

    #[test]
    fn test_drop_before_start_is_rejected() {
        let mut controller = GameController::with_daily_routine();
        let mut sink = RecordingSink::new();

        let outcome = controller.handle_drop(DropAction::new(ItemId(0), SlotId(0)), &mut sink);
        assert_eq!(outcome, DropOutcome::Rejected(DropError::NoActiveStage));
        assert!(sink.cues().is_empty());
    }

    #[test]
    fn test_correct_drop_fires_correct_cue() {
        let mut controller = GameController::with_daily_routine();
        let mut sink = RecordingSink::new();
        controller.start().unwrap();

        let outcome = controller.handle_drop(DropAction::new(ItemId(0), SlotId(0)), &mut sink);
        assert_eq!(outcome, DropOutcome::Correct { transition: None });
        assert_eq!(sink.cues(), &[Cue::Correct]);
    }

    #[test]
    fn test_incorrect_drop_changes_nothing() {
        let mut controller = GameController::with_daily_routine();
        let mut sink = RecordingSink::new();
        controller.start().unwrap();

        // Item for task 3 dropped on the slot for task 5.
        let outcome = controller.handle_drop(DropAction::new(ItemId(2), SlotId(4)), &mut sink);
        assert_eq!(outcome, DropOutcome::Incorrect);
        assert_eq!(sink.cues(), &[Cue::Incorrect]);

        let round = controller.round().unwrap();
        assert!(!round.slot(SlotId(4)).unwrap().is_filled());
        assert!(!round.item(ItemId(2)).unwrap().is_locked());
    }

    #[test]
    fn test_reset_bumps_generation_and_clears_round() {
        let mut controller = GameController::with_daily_routine();
        controller.start().unwrap();
        assert!(controller.round().is_some());

        let generation = controller.generation();
        controller.reset();
        assert_eq!(controller.phase(), Phase::Start);
        assert!(controller.round().is_none());
        assert_eq!(controller.generation(), generation + 1);
    }
}
