//! Progress persistence
//!
//! Records are written as a versioned JSON envelope through a
//! [`ProgressGateway`]. The game never talks to storage directly, so
//! tests run against [`MemoryGateway`] and the browser build against
//! [`LocalStorageGateway`].

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::progress::ProgressRecord;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileGateway;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageGateway;

/// Envelope version written by this build
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("save version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("save data is malformed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage seam for progress records
pub trait ProgressGateway {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<ProgressRecord>, PersistenceError>;
    fn save(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError>;
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    progress: ProgressRecord,
}

pub fn encode(record: &ProgressRecord) -> Result<String, PersistenceError> {
    let envelope = Envelope {
        version: SAVE_VERSION,
        progress: record.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

pub fn decode(json: &str) -> Result<ProgressRecord, PersistenceError> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if envelope.version > SAVE_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: envelope.version,
            supported: SAVE_VERSION,
        });
    }
    Ok(envelope.progress)
}

/// In-process store. Clones share the same slot, so a test can keep a
/// handle after moving one into the game.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    slot: Rc<RefCell<Option<String>>>,
    saves: Rc<Cell<u32>>,
    offline: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated with an encoded record
    pub fn with_record(record: &ProgressRecord) -> Result<Self, PersistenceError> {
        let gateway = Self::new();
        *gateway.slot.borrow_mut() = Some(encode(record)?);
        Ok(gateway)
    }

    /// Every call fails as if storage were disabled
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Successful saves so far
    pub fn saves(&self) -> u32 {
        self.saves.get()
    }

    pub fn set_raw(&self, json: impl Into<String>) {
        *self.slot.borrow_mut() = Some(json.into());
    }
}

impl ProgressGateway for MemoryGateway {
    fn load(&self) -> Result<Option<ProgressRecord>, PersistenceError> {
        if self.offline {
            return Err(PersistenceError::Unavailable("memory store offline".into()));
        }
        self.slot.borrow().as_deref().map(decode).transpose()
    }

    fn save(&mut self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        if self.offline {
            return Err(PersistenceError::Unavailable("memory store offline".into()));
        }
        *self.slot.borrow_mut() = Some(encode(record)?);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
