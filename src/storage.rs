use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Root of the locally persisted state.
#[derive(Debug, Clone)]
pub struct DataDir {
    base_dir: PathBuf,
}

impl DataDir {
    /// Resolves the data directory and creates its layout.
    ///
    /// `DEALFINDER_DATA_DIR` wins, then `$XDG_DATA_HOME/dealfinder`, then
    /// `~/.local/share/dealfinder`.
    pub fn new() -> Result<Self> {
        let base_dir = if let Ok(dir) = std::env::var("DEALFINDER_DATA_DIR") {
            PathBuf::from(shellexpand::tilde(&dir).to_string())
        } else if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
            PathBuf::from(xdg_data).join("dealfinder")
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local/share/dealfinder")
        };

        Self::at(base_dir)
    }

    pub fn at(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(base_dir.join("state")).with_context(|| {
            format!("Failed to create data directory {}", base_dir.display())
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn state_file(&self, name: &str) -> PathBuf {
        self.base_dir.join("state").join(name)
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_at_creates_state_dir() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = DataDir::at(temp_dir.path().join("nested")).unwrap();

        assert!(data_dir.base_dir().join("state").is_dir());
        assert_eq!(
            data_dir.state_file("wishlist.json"),
            temp_dir.path().join("nested/state/wishlist.json")
        );
    }

    #[test]
    fn test_json_round_trip_and_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ids.json");

        write_json(&path, &vec!["1", "2"]).unwrap();
        let ids: Vec<String> = read_json(&path).unwrap();
        assert_eq!(ids, vec!["1", "2"]);

        fs::write(&path, "{not json").unwrap();
        assert!(read_json::<Vec<String>>(&path).is_err());
        assert!(read_json::<Vec<String>>(&temp_dir.path().join("missing.json")).is_err());
    }
}
