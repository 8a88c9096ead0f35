pub mod core;
pub mod parser;
pub mod persistence;
pub mod player;
pub mod settings;
pub mod speech;
pub mod web;

pub use crate::core::{
    Deck,
    Mode,
    WordPair,
    WordflashError,
};
pub use settings::Settings;
