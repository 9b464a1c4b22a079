//! JSON file store for native builds

use std::fs;
use std::path::{Path, PathBuf};

use super::{PersistenceError, ProgressGateway, decode, encode};
use crate::progress::ProgressRecord;

/// Writes go to `<path>.tmp` first and are renamed over the save
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProgressGateway for FileGateway {
    fn load(&self) -> Result<Option<ProgressRecord>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        let record = decode(&json)?;
        log::info!("Loaded progress from {}", self.path.display());
        Ok(Some(record))
    }

    fn save(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        let json = encode(record)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Progress saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gravity-hop-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("progress.json")
    }

    #[test]
    fn test_missing_file_is_none() {
        let gateway = FileGateway::new(scratch("missing"));
        assert!(gateway.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("roundtrip");
        let mut gateway = FileGateway::new(&path);
        let record = ProgressRecord {
            total_coins: 120,
            levels_unlocked: 3,
            ..Default::default()
        };
        gateway.save(&record).unwrap();
        assert!(!gateway.tmp_path().exists());
        assert_eq!(FileGateway::new(&path).load().unwrap(), Some(record));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = scratch("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "garbage").unwrap();
        assert!(matches!(
            FileGateway::new(&path).load(),
            Err(PersistenceError::Serialize(_))
        ));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
