use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
    time::Instant,
};

use super::{
    Deck,
    WordflashError,
};
use crate::parser;

/// Builds a shuffled deck from a table already on disk.
pub fn extract_deck(path: &Path) -> Result<Deck, WordflashError> {
    let start = Instant::now();

    let pairs = parser::read(path)?;
    log::debug!("[Extractor] Parsed {} word pairs from {:?}", pairs.len(), path);

    let deck = Deck::shuffled(pairs);
    log::info!(
        "[Extractor] Built deck of {} cards ({:.1}ms)",
        deck.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(deck)
}

/// Saves an uploaded file under `upload_dir` using its original name, then
/// extracts a deck from the saved copy. A later upload with the same name
/// overwrites the earlier one.
pub fn process_upload(
    upload_dir: &Path,
    filename: &str,
    contents: &[u8],
) -> Result<Deck, WordflashError> {
    let path = stored_path(upload_dir, filename)?;

    fs::create_dir_all(upload_dir).map_err(|e| WordflashError::from(e).into_parse())?;
    fs::write(&path, contents).map_err(|e| WordflashError::from(e).into_parse())?;
    log::info!("[Upload] Saved {} bytes to {:?}", contents.len(), path);

    extract_deck(&path)
}

/// Keeps only the final component of a client supplied name so uploads
/// cannot escape the upload directory.
pub fn stored_path(upload_dir: &Path, filename: &str) -> Result<PathBuf, WordflashError> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .ok_or(WordflashError::EmptyFilename)?;

    Ok(upload_dir.join(name))
}
