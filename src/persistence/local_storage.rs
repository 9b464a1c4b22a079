//! Browser LocalStorage store

use super::{PersistenceError, ProgressGateway, decode, encode};
use crate::progress::ProgressRecord;

#[derive(Debug, Clone)]
pub struct LocalStorageGateway {
    key: String,
}

impl Default for LocalStorageGateway {
    fn default() -> Self {
        Self::new(Self::STORAGE_KEY)
    }
}

impl LocalStorageGateway {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "gravity_hop_progress";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable("localStorage is disabled".into()))
    }
}

impl ProgressGateway for LocalStorageGateway {
    fn load(&self) -> Result<Option<ProgressRecord>, PersistenceError> {
        let storage = Self::storage()?;
        let json = storage
            .get_item(&self.key)
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))?;
        match json {
            Some(json) => {
                let record = decode(&json)?;
                log::info!("Loaded progress from LocalStorage");
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn save(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        let json = encode(record)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|e| PersistenceError::Unavailable(format!("{:?}", e)))?;
        log::debug!("Progress saved");
        Ok(())
    }
}
