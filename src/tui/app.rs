//! Application state for the terminal frontend.
//!
//! The app translates keyboard selection into [`DropAction`]s, so the game
//! core never sees anything input-specific. Scheduled stage transitions
//! are held here with their deadline and handed back to the controller
//! once due.

use crate::config::GameConfig;
use crate::game::{
    Cue, DropAction, DropOutcome, FeedbackSink, GameController, ItemId, PendingTransition, Phase,
    SlotId,
};
use std::time::Instant;
use tracing::{debug, info};

/// How long a cue banner stays on screen.
const BANNER_TTL_MS: u128 = 1500;

/// Feedback sink that shows cues as a transient banner.
///
/// Firing a cue replaces whatever banner is showing, so an overlapping
/// trigger of the same cue restarts it rather than queueing.
#[derive(Debug, Default)]
pub struct BannerSink {
    current: Option<(Cue, Instant)>,
}

impl BannerSink {
    /// The cue currently on display, if its time to live has not expired.
    pub fn active(&self) -> Option<Cue> {
        self.current
            .filter(|(_, since)| since.elapsed().as_millis() < BANNER_TTL_MS)
            .map(|(cue, _)| cue)
    }
}

impl FeedbackSink for BannerSink {
    fn fire(&mut self, cue: Cue) {
        self.current = Some((cue, Instant::now()));
    }
}

/// Main application state.
pub struct App {
    controller: GameController,
    sink: BannerSink,
    item_cursor: usize,
    slot_cursor: usize,
    pending: Option<(PendingTransition, Instant)>,
    should_quit: bool,
}

impl App {
    /// Creates the app from a validated config.
    pub fn new(config: GameConfig) -> Result<Self, crate::config::ConfigError> {
        Ok(Self {
            controller: GameController::new(config)?,
            sink: BannerSink::default(),
            item_cursor: 0,
            slot_cursor: 0,
            pending: None,
            should_quit: false,
        })
    }

    /// The game controller.
    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    /// Item cursor position in the tray.
    pub fn item_cursor(&self) -> usize {
        self.item_cursor
    }

    /// Slot cursor position in the grid.
    pub fn slot_cursor(&self) -> usize {
        self.slot_cursor
    }

    /// The cue banner to display, if any.
    pub fn banner(&self) -> Option<Cue> {
        self.sink.active()
    }

    /// True once the player asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Starts the game from the start screen.
    pub fn start(&mut self) {
        if self.controller.start().is_ok() {
            self.item_cursor = 0;
            self.slot_cursor = 0;
        }
    }

    /// Resets to the start screen from anywhere.
    ///
    /// Any scheduled transition is left in place; the controller's
    /// generation guard suppresses it when it fires.
    pub fn reset(&mut self) {
        info!("Player reset");
        self.controller.reset();
        self.item_cursor = 0;
        self.slot_cursor = 0;
    }

    /// Requests quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Moves the item cursor left or right across the tray.
    pub fn move_item_cursor(&mut self, delta: isize) {
        if let Some(round) = self.controller.round() {
            let len = round.items().len();
            self.item_cursor = step(self.item_cursor, delta, len);
        }
    }

    /// Moves the slot cursor up or down the grid.
    pub fn move_slot_cursor(&mut self, delta: isize) {
        if let Some(round) = self.controller.round() {
            let len = round.slots().len();
            self.slot_cursor = step(self.slot_cursor, delta, len);
        }
    }

    /// Drops the selected item onto the selected slot.
    pub fn drop_selected(&mut self) {
        let action = DropAction::new(ItemId(self.item_cursor), SlotId(self.slot_cursor));
        let outcome = self.controller.handle_drop(action, &mut self.sink);
        debug!(%action, ?outcome, "drop handled");

        if let DropOutcome::Correct {
            transition: Some(pending),
        } = outcome
        {
            self.pending = Some((pending, Instant::now() + pending.delay()));
        }
    }

    /// Applies a due stage transition, if one is scheduled.
    ///
    /// A token from before a reset is rejected by the controller; either
    /// way the slot for pending work is cleared.
    pub fn tick(&mut self) {
        let due = self
            .pending
            .is_some_and(|(_, deadline)| Instant::now() >= deadline);
        if !due {
            return;
        }

        let (pending, _) = self.pending.take().expect("Checked above");
        match self.controller.complete_transition(pending) {
            Ok(phase) => {
                info!(%phase, "transition applied");
                self.item_cursor = 0;
                self.slot_cursor = 0;
            }
            Err(e) => debug!(error = %e, "transition dropped"),
        }
    }

    /// Handles a key press for the current phase.
    pub fn on_key(&mut self, key: crossterm::event::KeyCode) {
        use crossterm::event::KeyCode;

        match (self.controller.phase(), key) {
            (_, KeyCode::Char('q')) => self.quit(),
            (Phase::Start, KeyCode::Enter | KeyCode::Char('s')) => self.start(),
            (Phase::Success, KeyCode::Char('r') | KeyCode::Enter) => self.reset(),
            (Phase::StageOne | Phase::StageTwo, key) => match key {
                KeyCode::Left | KeyCode::Char('h') => self.move_item_cursor(-1),
                KeyCode::Right | KeyCode::Char('l') => self.move_item_cursor(1),
                KeyCode::Up | KeyCode::Char('k') => self.move_slot_cursor(-1),
                KeyCode::Down | KeyCode::Char('j') => self.move_slot_cursor(1),
                KeyCode::Enter | KeyCode::Char(' ') => self.drop_selected(),
                KeyCode::Char('r') => self.reset(),
                _ => {}
            },
            _ => {}
        }
    }
}

/// Steps a cursor by `delta`, wrapping within `len`.
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    (((current as isize + delta) % len + len) % len) as usize
}
