#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use saldo::Book;
use saldo_core::{storage::MemoryStorage, time::FixedClock};
use saldo_storage_json::{JsonLedgerStorage, StoragePaths};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Book over a volatile store, with "today" pinned.
pub fn memory_book(today: NaiveDate) -> Book {
    Book::open(Box::new(MemoryStorage::new()), Box::new(FixedClock(today))).expect("open book")
}

/// Book persisted under `dir`, with "today" pinned.
pub fn json_book(dir: &std::path::Path, today: NaiveDate) -> Book {
    let storage = JsonLedgerStorage::new(StoragePaths::in_dir(dir)).expect("json storage");
    Book::open(Box::new(storage), Box::new(FixedClock(today))).expect("open book")
}
