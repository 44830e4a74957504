//! saldo-storage-json
//!
//! Filesystem-backed JSON persistence for a single ledger plus its backups.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info};

use saldo_core::{
    storage::{decode_image, encode_image, BackupInfo, LedgerStorage},
    CoreError,
};
use saldo_domain::Ledger;

const LEDGER_FILE: &str = "ledger.json";
const BACKUP_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "ledger";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
const RESTORE_NOTE: &str = "before-restore";
pub const DEFAULT_RETENTION: usize = 5;

/// Locations used by [`JsonLedgerStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub ledger_file: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// Standard layout inside a data directory.
    pub fn in_dir(base: &Path) -> Self {
        Self {
            ledger_file: base.join(LEDGER_FILE),
            backup_root: base.join(BACKUP_DIR),
        }
    }
}

/// Stores the ledger as one pretty-printed JSON document. Writes go to a
/// sibling temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonLedgerStorage {
    paths: StoragePaths,
    retention: usize,
}

impl JsonLedgerStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        if let Some(parent) = paths.ledger_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
        })
    }

    pub fn ledger_path(&self) -> &Path {
        &self.paths.ledger_file
    }

    pub fn backup_root(&self) -> &Path {
        &self.paths.backup_root
    }

    /// Resolves a backup id to its file, refusing ids that would escape the
    /// backup directory.
    fn backup_path(&self, id: &str) -> Result<PathBuf, CoreError> {
        let name = Path::new(id);
        if name.file_name().and_then(|n| n.to_str()) != Some(id) {
            return Err(CoreError::BackupNotFound(id.to_string()));
        }
        Ok(self.paths.backup_root.join(name))
    }

    fn write_backup_image(&self, image: &[u8], note: Option<&str>) -> Result<BackupInfo, CoreError> {
        fs::create_dir_all(&self.paths.backup_root)?;
        let now = Utc::now();
        let mut stem = format!(
            "{}_{}",
            BACKUP_PREFIX,
            now.format(BACKUP_TIMESTAMP_FORMAT)
        );
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let mut file_name = format!("{}.{}", stem, BACKUP_EXTENSION);
        let mut counter = 1;
        while self.paths.backup_root.join(&file_name).exists() {
            counter += 1;
            file_name = format!("{}-{}.{}", stem, counter, BACKUP_EXTENSION);
        }
        let path = self.paths.backup_root.join(&file_name);
        write_atomic(&path, image)?;
        info!(backup = %file_name, "backup written");
        self.prune_backups()?;
        Ok(BackupInfo {
            id: file_name,
            created_at: Some(now),
            size_bytes: image.len() as u64,
            path: Some(path),
        })
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        let entries = self.list_backups()?;
        for entry in entries.into_iter().skip(self.retention) {
            if let Some(path) = entry.path {
                debug!(backup = %entry.id, "pruning backup beyond retention");
                let _ = fs::remove_file(path);
            }
        }
        Ok(())
    }
}

impl LedgerStorage for JsonLedgerStorage {
    fn load(&self) -> Result<Option<Ledger>, CoreError> {
        match fs::read(&self.paths.ledger_file) {
            Ok(image) => decode_image(&image).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<(), CoreError> {
        save_image(&self.paths.ledger_file, &encode_image(ledger)?)?;
        debug!(path = %self.paths.ledger_file.display(), "ledger saved");
        Ok(())
    }

    fn export_image(&self) -> Result<Vec<u8>, CoreError> {
        Ok(fs::read(&self.paths.ledger_file)?)
    }

    fn replace_image(&self, image: &[u8]) -> Result<Ledger, CoreError> {
        let ledger = decode_image(image)?;
        if self.paths.ledger_file.exists() {
            let current = fs::read(&self.paths.ledger_file)?;
            self.write_backup_image(&current, Some(RESTORE_NOTE))?;
        }
        save_image(&self.paths.ledger_file, image)?;
        Ok(ledger)
    }

    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        self.write_backup_image(&encode_image(ledger)?, note)
    }

    /// Newest first.
    fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.paths.backup_root.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.paths.backup_root)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let metadata = entry.metadata().ok();
                let modified = metadata.as_ref().and_then(|meta| meta.modified().ok());
                let info = BackupInfo {
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    size_bytes: metadata.map(|meta| meta.len()).unwrap_or(0),
                    path: Some(path.clone()),
                };
                entries.push((info, modified));
            }
        }
        entries.sort_by_key(|(info, modified)| Reverse((info.created_at, *modified)));
        Ok(entries.into_iter().map(|(info, _)| info).collect())
    }

    fn restore_backup(&self, id: &str) -> Result<Ledger, CoreError> {
        let path = self.backup_path(id)?;
        if !path.is_file() {
            return Err(CoreError::BackupNotFound(id.to_string()));
        }
        let image = fs::read(&path)?;
        self.replace_image(&image)
    }
}

/// Writes `image` to `path` through a temp file so readers never observe a
/// partial document.
pub fn save_image(path: &Path, image: &[u8]) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, image)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads the timestamp out of `ledger_YYYYMMDD_HHMMSSmmm[_note][-n].json`.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let mut segments = stem.split('_');
    if segments.next()? != BACKUP_PREFIX {
        return None;
    }
    let date = segments.next()?;
    let time = segments.next()?;
    let time = time.split('-').next()?;
    if !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    let raw = format!("{}{}", date, time);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S%3f")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}
