use std::{
    sync::Arc,
    time::Duration,
};

use crate::core::{
    Deck,
    Mode,
    WordflashError,
};

pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Word,
    Meaning,
}

/// Side effects requested by a transition. The driver applies them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Render(String),
    Speak(String),
    Arm { timer: TimerId, after: Duration },
    Disarm(TimerId),
}

/// Everything the flashcard loop knows. Transitions mutate the state and
/// return the effects the outside world has to carry out; nothing here
/// touches a clock or a screen.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    deck: Arc<Deck>,
    cursor: usize,
    mode: Mode,
    status: Status,
    phase: Phase,
    pending: Option<TimerId>,
    next_timer: u64,
    interval: Duration,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL)
    }
}

impl PlaybackState {
    pub fn new(interval: Duration) -> Self {
        Self {
            deck: Arc::new(Deck::empty()),
            cursor: 0,
            mode: Mode::WordsOnly,
            status: Status::Idle,
            phase: Phase::Word,
            pending: None,
            next_timer: 0,
            interval,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True once the cursor has walked past the last card.
    pub fn is_finished(&self) -> bool {
        !self.deck.is_empty() && self.cursor >= self.deck.len()
    }

    /// Replaces the deck and rewinds to the first card without starting.
    pub fn load_deck(&mut self, deck: Arc<Deck>) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.cancel_pending(&mut effects);

        self.deck = deck;
        self.cursor = 0;
        self.phase = Phase::Word;
        self.status = Status::Idle;

        effects
    }

    /// Starts (or restarts in a new mode) from the current cursor. An empty
    /// deck leaves the state untouched.
    pub fn start(&mut self, mode: Mode) -> Result<Vec<Effect>, WordflashError> {
        if self.deck.is_empty() {
            return Err(WordflashError::EmptyDeck);
        }

        let mut effects = Vec::new();
        self.cancel_pending(&mut effects);

        self.mode = mode;
        self.status = Status::Running;
        self.phase = Phase::Word;
        self.reveal(&mut effects);

        Ok(effects)
    }

    pub fn toggle_pause(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        match self.status {
            Status::Running => {
                self.cancel_pending(&mut effects);
                self.status = Status::Paused;
                // Resuming always replays the card from its word
                self.phase = Phase::Word;
            }
            Status::Paused => {
                self.status = Status::Running;
                self.phase = Phase::Word;
                self.reveal(&mut effects);
            }
            Status::Idle => {}
        }

        effects
    }

    /// Called when `timer` fires. Anything other than the one pending timer
    /// of a running state is stale and ignored.
    pub fn on_elapsed(&mut self, timer: TimerId) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.status != Status::Running || self.pending != Some(timer) {
            return effects;
        }
        self.pending = None;

        match (self.mode, self.phase) {
            (Mode::WordsWithMeaning, Phase::Word) => {
                self.phase = Phase::Meaning;
                if let Some(card) = self.deck.get(self.cursor) {
                    effects.push(Effect::Render(card.meaning().to_string()));
                    self.arm(&mut effects);
                }
            }
            _ => {
                self.cursor += 1;
                self.phase = Phase::Word;
                self.reveal(&mut effects);
            }
        }

        effects
    }

    fn reveal(&mut self, effects: &mut Vec<Effect>) {
        let Some(card) = self.deck.get(self.cursor) else {
            self.cursor = self.cursor.min(self.deck.len());
            return;
        };

        effects.push(Effect::Render(card.word().to_string()));
        if self.mode.speaks() {
            effects.push(Effect::Speak(card.word().to_string()));
        }
        self.arm(effects);
    }

    fn arm(&mut self, effects: &mut Vec<Effect>) {
        self.next_timer += 1;
        let timer = TimerId(self.next_timer);
        self.pending = Some(timer);
        effects.push(Effect::Arm { timer, after: self.interval });
    }

    fn cancel_pending(&mut self, effects: &mut Vec<Effect>) {
        if let Some(timer) = self.pending.take() {
            effects.push(Effect::Disarm(timer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WordPair;

    fn deck(words: &[(&str, &str)]) -> Arc<Deck> {
        Arc::new(Deck::in_order(words.iter().map(|(w, m)| WordPair::new(*w, *m)).collect()))
    }

    fn armed(effects: &[Effect]) -> TimerId {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Arm { timer, .. } => Some(*timer),
                _ => None,
            })
            .expect("expected an armed timer")
    }

    #[test]
    fn test_start_with_empty_deck_stays_idle() {
        let mut state = PlaybackState::default();
        let err = state.start(Mode::WordsOnly).unwrap_err();

        assert!(matches!(err, WordflashError::EmptyDeck));
        assert_eq!(err.to_string(), "please upload a file first");
        assert_eq!(state.status(), Status::Idle);
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn test_load_deck_does_not_start() {
        let mut state = PlaybackState::default();
        let effects = state.load_deck(deck(&[("cat", "고양이")]));

        assert!(effects.is_empty());
        assert_eq!(state.status(), Status::Idle);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_words_only_cycle() {
        let mut state = PlaybackState::default();
        state.load_deck(deck(&[("cat", "고양이"), ("dog", "개")]));

        let effects = state.start(Mode::WordsOnly).unwrap();
        assert_eq!(effects[0], Effect::Render("cat".to_string()));
        assert!(!effects.iter().any(|e| matches!(e, Effect::Speak(_))));

        let effects = state.on_elapsed(armed(&effects));
        assert_eq!(state.cursor(), 1);
        assert_eq!(effects[0], Effect::Render("dog".to_string()));
    }

    #[test]
    fn test_words_with_meaning_cycle() {
        let mut state = PlaybackState::default();
        state.load_deck(deck(&[("cat", "고양이"), ("dog", "개")]));

        let effects = state.start(Mode::WordsWithMeaning).unwrap();
        assert_eq!(effects[0], Effect::Render("cat".to_string()));
        assert_eq!(effects[1], Effect::Speak("cat".to_string()));

        let effects = state.on_elapsed(armed(&effects));
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.phase(), Phase::Meaning);
        assert_eq!(effects[0], Effect::Render("고양이".to_string()));

        let effects = state.on_elapsed(armed(&effects));
        assert_eq!(state.cursor(), 1);
        assert_eq!(effects[0], Effect::Render("dog".to_string()));
    }

    #[test]
    fn test_pause_and_resume_keep_cursor() {
        let mut state = PlaybackState::default();
        state.load_deck(deck(&[("cat", ""), ("dog", ""), ("bird", "")]));

        let effects = state.start(Mode::WordsOnly).unwrap();
        let effects = state.on_elapsed(armed(&effects));
        let pending = armed(&effects);
        assert_eq!(state.cursor(), 1);

        let effects = state.toggle_pause();
        assert_eq!(effects, vec![Effect::Disarm(pending)]);
        assert_eq!(state.status(), Status::Paused);

        // The cancelled timer firing late changes nothing
        assert!(state.on_elapsed(pending).is_empty());
        assert_eq!(state.cursor(), 1);

        let effects = state.toggle_pause();
        assert_eq!(state.status(), Status::Running);
        assert_eq!(state.cursor(), 1);
        assert_eq!(effects[0], Effect::Render("dog".to_string()));
    }

    #[test]
    fn test_pause_during_meaning_restarts_card() {
        let mut state = PlaybackState::default();
        state.load_deck(deck(&[("cat", "고양이"), ("dog", "개")]));

        let effects = state.start(Mode::WordsWithMeaning).unwrap();
        state.on_elapsed(armed(&effects));
        assert_eq!(state.phase(), Phase::Meaning);

        state.toggle_pause();
        let effects = state.toggle_pause();
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.phase(), Phase::Word);
        assert_eq!(effects[0], Effect::Render("cat".to_string()));
        assert_eq!(effects[1], Effect::Speak("cat".to_string()));
    }

    #[test]
    fn test_finishing_halts_without_scheduling() {
        let mut state = PlaybackState::default();
        state.load_deck(deck(&[("cat", "")]));

        let mut effects = state.start(Mode::WordsOnly).unwrap();
        let mut rendered = Vec::new();
        while let Some(timer) = effects.iter().find_map(|e| match e {
            Effect::Arm { timer, .. } => Some(*timer),
            _ => None,
        }) {
            rendered.extend(effects.iter().filter_map(|e| match e {
                Effect::Render(text) => Some(text.clone()),
                _ => None,
            }));
            effects = state.on_elapsed(timer);
        }

        assert_eq!(rendered, vec!["cat".to_string(), "FINISH!".to_string()]);
        assert!(effects.is_empty());
        assert!(state.is_finished());
        assert_eq!(state.cursor(), state.deck().len());
        assert_eq!(state.status(), Status::Running);
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn test_restart_in_new_mode_replaces_pending_timer() {
        let mut state = PlaybackState::default();
        state.load_deck(deck(&[("cat", "고양이")]));

        let first = armed(&state.start(Mode::WordsOnly).unwrap());
        let effects = state.start(Mode::WordsWithMeaning).unwrap();

        assert_eq!(effects[0], Effect::Disarm(first));
        assert_eq!(state.mode(), Mode::WordsWithMeaning);
        assert!(state.on_elapsed(first).is_empty());
    }

    #[test]
    fn test_toggle_from_idle_is_noop() {
        let mut state = PlaybackState::default();
        state.load_deck(deck(&[("cat", "")]));

        assert!(state.toggle_pause().is_empty());
        assert_eq!(state.status(), Status::Idle);
    }

    #[test]
    fn test_load_deck_cancels_running_timer() {
        let mut state = PlaybackState::default();
        state.load_deck(deck(&[("cat", "")]));
        let timer = armed(&state.start(Mode::WordsOnly).unwrap());

        let effects = state.load_deck(deck(&[("dog", "")]));
        assert_eq!(effects, vec![Effect::Disarm(timer)]);
        assert_eq!(state.status(), Status::Idle);
    }
}
