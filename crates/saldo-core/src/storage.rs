use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use chrono::{DateTime, Utc};

use saldo_domain::{Identifiable, Ledger, CURRENT_SCHEMA_VERSION};

use crate::CoreError;

/// Describes a persisted backup artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: Option<PathBuf>,
}

/// Abstraction over durable backends holding a single ledger.
///
/// Every method is atomic from the caller's point of view: a failed call
/// leaves the previously stored image intact.
pub trait LedgerStorage: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Ledger>, CoreError>;
    fn save(&self, ledger: &Ledger) -> Result<(), CoreError>;
    /// The store's complete byte image, suitable for a verbatim restore.
    fn export_image(&self) -> Result<Vec<u8>, CoreError>;
    /// Replaces the stored state with `image` in one swap and returns the
    /// ledger it decodes to. Invalid images are rejected before the swap.
    fn replace_image(&self, image: &[u8]) -> Result<Ledger, CoreError>;
    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<BackupInfo, CoreError>;
    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError>;
    fn restore_backup(&self, id: &str) -> Result<Ledger, CoreError>;
}

/// Serialises a ledger into the byte image shared by all backends.
pub fn encode_image(ledger: &Ledger) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec_pretty(ledger).map_err(|err| CoreError::Corrupt(err.to_string()))
}

/// Parses and checks a byte image. Images from a newer schema, or with
/// duplicate entry identities, are rejected.
pub fn decode_image(image: &[u8]) -> Result<Ledger, CoreError> {
    let ledger: Ledger =
        serde_json::from_slice(image).map_err(|err| CoreError::Corrupt(err.to_string()))?;
    if ledger.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Corrupt(format!(
            "ledger schema v{} is newer than supported v{}",
            ledger.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    let mut ids = HashSet::new();
    let mut sequences = HashSet::new();
    for entry in &ledger.entries {
        if !ids.insert(entry.id()) {
            return Err(CoreError::Corrupt(format!(
                "entry id {} appears more than once",
                entry.id()
            )));
        }
        if !sequences.insert(entry.sequence()) {
            return Err(CoreError::Corrupt(format!(
                "creation order {} is shared by several entries",
                entry.sequence()
            )));
        }
    }
    Ok(ledger)
}

/// Detects dangling references and other anomalies that do not prevent
/// loading.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let labels: HashSet<&str> = ledger
        .categories
        .iter()
        .map(|category| category.name.as_str())
        .collect();
    let mut warnings = Vec::new();
    if labels.len() != ledger.categories.len() {
        warnings.push("category registry contains duplicate labels".to_string());
    }
    for entry in &ledger.entries {
        if !labels.contains(entry.category()) {
            warnings.push(format!(
                "entry {} references missing category `{}`",
                entry.id(),
                entry.category()
            ));
        }
    }
    warnings
}

/// Volatile backend for tests and scratch ledgers.
#[derive(Default)]
pub struct MemoryStorage {
    image: Mutex<Option<Vec<u8>>>,
    backups: Mutex<Vec<(BackupInfo, Vec<u8>)>>,
    unavailable: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an unreachable backend: every call fails with
    /// `StoreUnavailable` while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CoreError::StoreUnavailable("memory store offline".into()))
        } else {
            Ok(())
        }
    }

    fn image_slot(&self) -> Result<std::sync::MutexGuard<'_, Option<Vec<u8>>>, CoreError> {
        self.image
            .lock()
            .map_err(|_| CoreError::StoreUnavailable("memory store lock poisoned".into()))
    }

    fn backup_slot(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<(BackupInfo, Vec<u8>)>>, CoreError> {
        self.backups
            .lock()
            .map_err(|_| CoreError::StoreUnavailable("memory store lock poisoned".into()))
    }
}

impl LedgerStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Ledger>, CoreError> {
        self.check_available()?;
        match self.image_slot()?.as_deref() {
            Some(image) => decode_image(image).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<(), CoreError> {
        self.check_available()?;
        let image = encode_image(ledger)?;
        *self.image_slot()? = Some(image);
        Ok(())
    }

    fn export_image(&self) -> Result<Vec<u8>, CoreError> {
        self.check_available()?;
        match self.image_slot()?.clone() {
            Some(image) => Ok(image),
            None => Ok(Vec::new()),
        }
    }

    fn replace_image(&self, image: &[u8]) -> Result<Ledger, CoreError> {
        self.check_available()?;
        let ledger = decode_image(image)?;
        *self.image_slot()? = Some(image.to_vec());
        Ok(ledger)
    }

    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        self.check_available()?;
        let image = encode_image(ledger)?;
        let mut backups = self.backup_slot()?;
        let mut id = format!("memory_{}", backups.len() + 1);
        if let Some(note) = note.map(str::trim).filter(|note| !note.is_empty()) {
            id.push('_');
            id.push_str(note);
        }
        let info = BackupInfo {
            id,
            created_at: Some(Utc::now()),
            size_bytes: image.len() as u64,
            path: None,
        };
        backups.push((info.clone(), image));
        Ok(info)
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        self.check_available()?;
        Ok(self
            .backup_slot()?
            .iter()
            .rev()
            .map(|(info, _)| info.clone())
            .collect())
    }

    fn restore_backup(&self, id: &str) -> Result<Ledger, CoreError> {
        self.check_available()?;
        let image = self
            .backup_slot()?
            .iter()
            .find(|(info, _)| info.id == id)
            .map(|(_, image)| image.clone())
            .ok_or_else(|| CoreError::BackupNotFound(id.to_string()))?;
        self.replace_image(&image)
    }
}
