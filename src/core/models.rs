use rand::{
    seq::SliceRandom,
    Rng,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Word shown on the synthetic last card of every deck.
pub const FINISH_WORD: &str = "FINISH!";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordPair {
    word: String,
    meaning: String, // Empty when the source cell was missing or blank
}

impl WordPair {
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self { word: word.into(), meaning: meaning.into() }
    }

    pub fn finish() -> Self {
        Self::new(FINISH_WORD, "")
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn meaning(&self) -> &str {
        &self.meaning
    }
}

/// Ordered cards of one upload. A non-empty deck always ends with the
/// `FINISH!` card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<WordPair>,
}

impl Deck {
    /// Shuffles `pairs` with the thread RNG and appends the finish card.
    pub fn shuffled(pairs: Vec<WordPair>) -> Self {
        Self::shuffled_with(pairs, &mut rand::rng())
    }

    pub fn shuffled_with<R: Rng + ?Sized>(mut pairs: Vec<WordPair>, rng: &mut R) -> Self {
        pairs.shuffle(rng);
        pairs.push(WordPair::finish());
        Self { cards: pairs }
    }

    /// Keeps the given order and appends the finish card.
    pub fn in_order(mut pairs: Vec<WordPair>) -> Self {
        pairs.push(WordPair::finish());
        Self { cards: pairs }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordPair> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[WordPair] {
        &self.cards
    }

    pub fn words_only(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.word.clone()).collect()
    }

    pub fn words_with_meaning(&self) -> Vec<(String, String)> {
        self.cards.iter().map(|c| (c.word.clone(), c.meaning.clone())).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    WordsOnly,
    WordsWithMeaning,
}

impl Mode {
    pub fn speaks(&self) -> bool {
        matches!(self, Mode::WordsWithMeaning)
    }
}

#[cfg(test)]
mod tests {
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };

    use super::*;

    fn sample_pairs() -> Vec<WordPair> {
        vec![
            WordPair::new("cat", "고양이"),
            WordPair::new("dog", "개"),
            WordPair::new("bird", "새"),
            WordPair::new("fish", ""),
        ]
    }

    #[test]
    fn test_shuffle_is_permutation_with_finish_last() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = Deck::shuffled_with(sample_pairs(), &mut rng);

        assert_eq!(deck.len(), 5);
        assert_eq!(deck.get(4), Some(&WordPair::finish()));

        let mut shuffled: Vec<WordPair> = deck.cards()[..4].to_vec();
        let mut original = sample_pairs();
        shuffled.sort_by(|a, b| a.word.cmp(&b.word));
        original.sort_by(|a, b| a.word.cmp(&b.word));
        assert_eq!(shuffled, original);
    }

    #[test]
    fn test_empty_input_still_gets_finish_card() {
        let deck = Deck::shuffled(Vec::new());
        assert_eq!(deck.words_only(), vec![FINISH_WORD.to_string()]);
        assert_eq!(deck.words_with_meaning(), vec![(FINISH_WORD.to_string(), String::new())]);
    }

    #[test]
    fn test_projections_are_parallel() {
        let deck = Deck::shuffled(sample_pairs());
        let words = deck.words_only();
        let pairs = deck.words_with_meaning();

        assert_eq!(words.len(), pairs.len());
        for (word, (pair_word, _)) in words.iter().zip(pairs.iter()) {
            assert_eq!(word, pair_word);
        }
    }

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(serde_json::to_string(&Mode::WordsOnly).unwrap(), "\"words_only\"");
        assert_eq!(
            serde_json::from_str::<Mode>("\"words_with_meaning\"").unwrap(),
            Mode::WordsWithMeaning
        );
    }
}
