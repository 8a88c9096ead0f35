pub mod errors;
pub mod models;
pub mod pipeline;

pub use errors::WordflashError;
pub use models::{ Deck, Mode, WordPair, FINISH_WORD };
