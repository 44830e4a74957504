//! Stateful facade over one ledger and its storage backend.

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use saldo_core::{
    chart::{step_series, ChartPoint},
    export::ExportDocument,
    storage::{ledger_warnings, BackupInfo, LedgerStorage},
    BalanceService, CategoryService, Clock, CoreError, EntryService, LedgerService,
    ReportService,
};
use saldo_domain::{BalancedEntry, Entry, EntryDraft, Ledger, ReportWindow, WindowReport};

/// Facade that coordinates ledger state, persistence, and backups.
///
/// Every call holds the state lock for its whole duration. Mutations work
/// on a copy that only replaces the live state once the backend has
/// accepted it, so a failed save leaves the book as it was.
pub struct Book {
    state: Mutex<Ledger>,
    storage: Box<dyn LedgerStorage>,
    clock: Box<dyn Clock>,
}

impl Book {
    /// Loads the stored ledger, or creates and persists a fresh one with the
    /// default categories when the store is empty.
    pub fn open(
        storage: Box<dyn LedgerStorage>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CoreError> {
        let ledger = match storage.load()? {
            Some(ledger) => {
                for warning in ledger_warnings(&ledger) {
                    warn!(%warning, "ledger loaded with warnings");
                }
                debug!(
                    entries = ledger.entries.len(),
                    categories = ledger.categories.len(),
                    "ledger loaded"
                );
                ledger
            }
            None => {
                let ledger = LedgerService::initialize();
                storage.save(&ledger)?;
                info!(
                    categories = ledger.categories.len(),
                    "initialized new ledger"
                );
                ledger
            }
        };
        Ok(Self {
            state: Mutex::new(ledger),
            storage,
            clock,
        })
    }

    pub fn storage(&self) -> &dyn LedgerStorage {
        self.storage.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // Entries

    /// Records a new entry. The category must already be registered.
    pub fn add_entry(&self, draft: EntryDraft) -> Result<Uuid, CoreError> {
        let id = self.mutate("add_entry", |ledger| {
            EntryService::validate(&draft)?;
            CategoryService::require(ledger, &draft.category)?;
            EntryService::add(ledger, draft)
        })?;
        info!(%id, "entry added");
        Ok(id)
    }

    /// Replaces every editable field of an entry. Identity and creation
    /// order are kept.
    pub fn update_entry(&self, id: Uuid, draft: EntryDraft) -> Result<(), CoreError> {
        self.mutate("update_entry", |ledger| {
            EntryService::validate(&draft)?;
            CategoryService::require(ledger, &draft.category)?;
            EntryService::update(ledger, id, draft)
        })?;
        info!(%id, "entry updated");
        Ok(())
    }

    pub fn remove_entry(&self, id: Uuid) -> Result<Entry, CoreError> {
        let removed = self.mutate("remove_entry", |ledger| EntryService::remove(ledger, id))?;
        info!(%id, "entry removed");
        Ok(removed)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> Result<Vec<Entry>, CoreError> {
        Ok(EntryService::list_all(&*self.lock()?).to_vec())
    }

    pub fn entry(&self, id: Uuid) -> Result<Entry, CoreError> {
        let ledger = self.lock()?;
        EntryService::get(&ledger, id)
            .cloned()
            .ok_or(CoreError::EntryNotFound(id))
    }

    // Categories

    pub fn add_category(&self, label: &str) -> Result<(), CoreError> {
        self.mutate("add_category", |ledger| CategoryService::add(ledger, label))?;
        info!(label, "category added");
        Ok(())
    }

    /// Removes a category that no entry references.
    pub fn remove_category(&self, label: &str) -> Result<(), CoreError> {
        self.mutate("remove_category", |ledger| {
            CategoryService::remove(ledger, label)
        })?;
        info!(label, "category removed");
        Ok(())
    }

    pub fn categories(&self) -> Result<Vec<String>, CoreError> {
        let ledger = self.lock()?;
        Ok(CategoryService::list_all(&ledger)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub fn category_exists(&self, label: &str) -> Result<bool, CoreError> {
        Ok(CategoryService::exists(&*self.lock()?, label))
    }

    pub fn category_usage(&self, label: &str) -> Result<usize, CoreError> {
        Ok(CategoryService::usage(&*self.lock()?, label))
    }

    // Balance

    pub fn starting_balance(&self) -> Result<f64, CoreError> {
        Ok(self.lock()?.starting_balance)
    }

    pub fn set_starting_balance(&self, value: f64) -> Result<(), CoreError> {
        self.mutate("set_starting_balance", |ledger| {
            LedgerService::set_starting_balance(ledger, value)
        })?;
        info!(value, "starting balance set");
        Ok(())
    }

    /// Every entry in (date, creation) order with its running balance.
    pub fn running_ledger(&self) -> Result<Vec<BalancedEntry>, CoreError> {
        let ledger = self.lock()?;
        debug!(entries = ledger.entries.len(), "computing running ledger");
        Ok(BalanceService::running_ledger(
            &ledger.entries,
            ledger.starting_balance,
        ))
    }

    /// Balance after every recorded entry, future-dated ones included.
    pub fn current_total(&self) -> Result<f64, CoreError> {
        let ledger = self.lock()?;
        Ok(BalanceService::current_total(
            &ledger.entries,
            ledger.starting_balance,
        ))
    }

    // Reporting

    /// Window of `months` 30-day blocks starting at `start`, evaluated
    /// against today's date.
    pub fn report(&self, start: NaiveDate, months: u32) -> Result<WindowReport, CoreError> {
        let window = ReportWindow::new(start, months);
        let today = self.clock.today();
        let ledger = self.lock()?;
        let report =
            ReportService::window_report(&ledger.entries, ledger.starting_balance, window, today);
        debug!(
            start = %window.start(),
            end = %window.end(),
            rows = report.rows.len(),
            "report window selected"
        );
        Ok(report)
    }

    pub fn chart(&self, start: NaiveDate, months: u32) -> Result<Vec<ChartPoint>, CoreError> {
        Ok(step_series(&self.report(start, months)?))
    }

    pub fn export_document(
        &self,
        title: &str,
        start: NaiveDate,
        months: u32,
    ) -> Result<ExportDocument, CoreError> {
        Ok(ExportDocument::from_window(
            title,
            &self.report(start, months)?,
        ))
    }

    // Backup and restore

    /// Byte image of the store, suitable for [`Book::restore_image`].
    pub fn export_image(&self) -> Result<Vec<u8>, CoreError> {
        let _guard = self.lock()?;
        self.storage.export_image()
    }

    /// Replaces the whole ledger with a previously exported image. Nothing
    /// changes when the image is rejected.
    pub fn restore_image(&self, image: &[u8]) -> Result<(), CoreError> {
        let mut guard = self.lock()?;
        let restored = self
            .storage
            .replace_image(image)
            .inspect_err(|err| log_rejection("restore_image", err))?;
        info!(entries = restored.entries.len(), "ledger restored from image");
        *guard = restored;
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        let guard = self.lock()?;
        let info = self.storage.backup(&guard, note)?;
        info!(id = %info.id, "backup created");
        Ok(info)
    }

    /// Newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        let _guard = self.lock()?;
        self.storage.list_backups()
    }

    pub fn restore_backup(&self, id: &str) -> Result<(), CoreError> {
        let mut guard = self.lock()?;
        let restored = self
            .storage
            .restore_backup(id)
            .inspect_err(|err| log_rejection("restore_backup", err))?;
        info!(id, entries = restored.entries.len(), "ledger restored from backup");
        *guard = restored;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>, CoreError> {
        self.state
            .lock()
            .map_err(|_| CoreError::StoreUnavailable("ledger state lock poisoned".into()))
    }

    fn mutate<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut Ledger) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let value = apply(&mut next).inspect_err(|err| log_rejection(operation, err))?;
        self.storage
            .save(&next)
            .inspect_err(|err| log_rejection(operation, err))?;
        *guard = next;
        Ok(value)
    }
}

fn log_rejection(operation: &'static str, err: &CoreError) {
    warn!(operation, error = %err, "operation rejected");
}
