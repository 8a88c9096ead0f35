pub mod clock;
pub mod state;
pub mod terminal;

use std::{
    sync::Arc,
    time::Duration,
};

pub use clock::{
    Clock,
    ManualClock,
    TokioClock,
};
pub use state::{
    Effect,
    Phase,
    PlaybackState,
    Status,
    TimerId,
    DEFAULT_REVEAL_INTERVAL,
};

use crate::{
    core::{
        Deck,
        Mode,
        WordflashError,
    },
    speech::Pronouncer,
};

/// Where card text ends up. Each call replaces whatever was shown before.
pub trait Surface {
    fn render(&mut self, text: &str);
}

/// Drives a [`PlaybackState`], carrying out its effects on a clock, a
/// surface and the pronouncer.
pub struct Player<C: Clock, S: Surface> {
    state: PlaybackState,
    clock: C,
    surface: S,
    pronouncer: Pronouncer,
}

impl<C: Clock, S: Surface> Player<C, S> {
    pub fn new(clock: C, surface: S, pronouncer: Pronouncer, interval: Duration) -> Self {
        Self { state: PlaybackState::new(interval), clock, surface, pronouncer }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn load_deck(&mut self, deck: Arc<Deck>) {
        log::debug!("[Player] Loaded deck of {} cards", deck.len());
        let effects = self.state.load_deck(deck);
        self.apply(effects);
    }

    pub fn start(&mut self, mode: Mode) -> Result<(), WordflashError> {
        let effects = self.state.start(mode)?;
        log::debug!("[Player] Started {:?} at card {}", mode, self.state.cursor());
        self.apply(effects);
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Status {
        let effects = self.state.toggle_pause();
        self.apply(effects);
        self.state.status()
    }

    pub fn fire(&mut self, timer: TimerId) {
        let effects = self.state.on_elapsed(timer);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(text) => self.surface.render(&text),
                Effect::Speak(word) => self.pronouncer.pronounce(&word),
                Effect::Arm { timer, after } => self.clock.arm(timer, after),
                Effect::Disarm(timer) => self.clock.disarm(timer),
            }
        }
    }
}

impl<S: Surface> Player<ManualClock, S> {
    /// Moves virtual time forward, firing every timer that falls due on the
    /// way, including ones armed by earlier firings.
    pub fn advance(&mut self, by: Duration) {
        let until = self.clock.now() + by;
        while let Some(timer) = self.clock.pop_due(until) {
            self.fire(timer);
        }
        self.clock.set_now(until);
    }
}
