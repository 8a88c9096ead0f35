use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    Deck,
    WordflashError,
};

/// Body of every `POST /upload` reply. Failures are still HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Deck {
        words_only: Vec<String>,
        words_with_meaning: Vec<(String, String)>,
    },
    Error {
        error: String,
    },
}

impl From<&Deck> for UploadResponse {
    fn from(deck: &Deck) -> Self {
        UploadResponse::Deck {
            words_only: deck.words_only(),
            words_with_meaning: deck.words_with_meaning(),
        }
    }
}

impl From<WordflashError> for UploadResponse {
    fn from(error: WordflashError) -> Self {
        UploadResponse::Error { error: error.to_string() }
    }
}
