use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::WordflashError;

const APP_NAME: &str = "wordflash";

/// Overrides the per-user data directory, e.g. for a portable install.
pub const DATA_DIR_ENV: &str = "WORDFLASH_DATA_DIR";

/// Where settings live: `$WORDFLASH_DATA_DIR` when set, otherwise
/// `<data_local_dir>/wordflash`, otherwise the working directory.
pub fn data_dir() -> PathBuf {
    resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from), dirs::data_local_dir())
}

fn resolve_data_dir(overridden: Option<PathBuf>, local: Option<PathBuf>) -> PathBuf {
    overridden
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| local.map(|dir| dir.join(APP_NAME)))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn data_file_path(filename: &str) -> PathBuf {
    data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, filename: &str) -> Result<PathBuf, WordflashError> {
    let file_path = data_file_path(filename);
    save_json_to(data, &file_path)?;
    Ok(file_path)
}

pub fn save_json_to<T: Serialize>(data: &T, file_path: &Path) -> Result<(), WordflashError> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(file_path, json)?;
    log::info!("Data saved to: {}", file_path.display());
    Ok(())
}

pub fn load_json_from<T: for<'de> Deserialize<'de> + Default>(
    file_path: &Path,
) -> Result<T, WordflashError> {
    if !file_path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(file_path)?;
    let data: T = serde_json::from_str(&json)?;
    log::debug!("Data loaded from: {}", file_path.display());
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> T {
    let file_path = data_file_path(filename);
    match load_json_from::<T>(&file_path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Failed to load {}: {}. Using defaults.", filename, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        count: u32,
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Sample = load_json_from(&dir.path().join("missing.json")).unwrap();
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        save_json_to(&Sample { count: 3 }, &path).unwrap();

        let loaded: Sample = load_json_from(&path).unwrap();
        assert_eq!(loaded, Sample { count: 3 });
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_json_from::<Sample>(&path), Err(WordflashError::Json(_))));
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");
        save_json_to(&Sample { count: 1 }, &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_data_dir_resolution_order() {
        let local = PathBuf::from("/home/me/.local/share");
        assert_eq!(
            resolve_data_dir(Some(PathBuf::from("/opt/cards")), Some(local.clone())),
            PathBuf::from("/opt/cards")
        );
        assert_eq!(
            resolve_data_dir(Some(PathBuf::new()), Some(local.clone())),
            local.join("wordflash")
        );
        assert_eq!(resolve_data_dir(None, None), PathBuf::from("."));
    }
}
