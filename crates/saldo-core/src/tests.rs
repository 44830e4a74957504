use chrono::NaiveDate;

use crate::{
    balance_service::BalanceService,
    category_service::CategoryService,
    chart::step_series,
    entry_service::EntryService,
    export::{truncate_field, ExportDocument, Settlement},
    ledger_service::LedgerService,
    report_service::ReportService,
    storage::{decode_image, encode_image, ledger_warnings, LedgerStorage, MemoryStorage},
    table::{table_rows, BalanceTone},
    CoreError,
};
use saldo_domain::{Amounted, EntryDraft, EntryKind, Ledger, ReportWindow};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expense(on: NaiveDate, amount: f64, category: &str) -> EntryDraft {
    EntryDraft::new(on, EntryKind::Expense, amount, category)
}

fn income(on: NaiveDate, amount: f64, category: &str) -> EntryDraft {
    EntryDraft::new(on, EntryKind::Income, amount, category)
}

fn seeded_ledger() -> Ledger {
    LedgerService::initialize()
}

#[test]
fn initialization_seeds_defaults_once() {
    let mut ledger = seeded_ledger();
    assert_eq!(ledger.starting_balance, 0.0);
    assert_eq!(
        CategoryService::list_all(&ledger),
        vec!["Salary", "Groceries", "Rent", "Leisure"]
    );

    CategoryService::add(&mut ledger, "Travel").expect("add travel");
    assert_eq!(LedgerService::seed_default_categories(&mut ledger), 0);
    assert_eq!(ledger.categories.len(), 5);
    assert_eq!(CategoryService::list_all(&ledger).last(), Some(&"Travel"));
}

#[test]
fn running_balance_example_with_tied_dates() {
    let mut ledger = seeded_ledger();
    EntryService::add(&mut ledger, income(date(2024, 1, 1), 1500.0, "Salary")).unwrap();
    EntryService::add(&mut ledger, expense(date(2024, 1, 5), 200.0, "Rent")).unwrap();
    EntryService::add(&mut ledger, expense(date(2024, 1, 5), 50.0, "Groceries")).unwrap();

    let ordered = BalanceService::running_ledger(&ledger.entries, 0.0);
    let balances: Vec<f64> = ordered.iter().map(|row| row.running_balance).collect();
    assert_eq!(balances, vec![1500.0, 1300.0, 1250.0]);
    assert_eq!(ordered[1].entry.amount(), -200.0);
    assert_eq!(ordered[2].entry.amount(), -50.0);
}

#[test]
fn ties_follow_creation_order_not_storage_order() {
    let mut ledger = seeded_ledger();
    let first = EntryService::add(&mut ledger, expense(date(2024, 2, 1), 10.0, "Rent")).unwrap();
    let second =
        EntryService::add(&mut ledger, expense(date(2024, 2, 1), 20.0, "Leisure")).unwrap();
    ledger.entries.reverse();

    for _ in 0..3 {
        let ordered = BalanceService::running_ledger(&ledger.entries, 100.0);
        let ids: Vec<_> = ordered
            .iter()
            .map(|row| saldo_domain::Identifiable::id(&row.entry))
            .collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(ordered[0].running_balance, 90.0);
        assert_eq!(ordered[1].running_balance, 70.0);
    }
}

#[test]
fn last_balance_equals_rounded_total() {
    let mut ledger = seeded_ledger();
    ledger.starting_balance = 0.1;
    let amounts = [0.2, 0.7, 3.335, 19.99, 0.01];
    for (index, amount) in amounts.iter().enumerate() {
        let on = date(2024, 3, 10 - index as u32);
        EntryService::add(&mut ledger, income(on, *amount, "Salary")).unwrap();
    }
    EntryService::add(&mut ledger, expense(date(2024, 3, 2), 7.777, "Rent")).unwrap();

    let ordered = BalanceService::running_ledger(&ledger.entries, ledger.starting_balance);
    let total: f64 = ordered.iter().map(|row| row.entry.amount()).sum();
    let expected = saldo_domain::round_currency(ledger.starting_balance + total);
    assert_eq!(ordered.last().unwrap().running_balance, expected);
    assert_eq!(
        BalanceService::current_total(&ledger.entries, ledger.starting_balance),
        expected
    );
}

#[test]
fn recalculating_own_output_is_idempotent() {
    let mut ledger = seeded_ledger();
    EntryService::add(&mut ledger, income(date(2024, 4, 3), 12.345, "Salary")).unwrap();
    EntryService::add(&mut ledger, expense(date(2024, 4, 1), 2.5, "Groceries")).unwrap();
    EntryService::add(&mut ledger, expense(date(2024, 4, 3), 1.0, "Leisure")).unwrap();

    let first = BalanceService::running_ledger(&ledger.entries, 5.0);
    let entries: Vec<_> = first.iter().map(|row| row.entry.clone()).collect();
    let second = BalanceService::running_ledger(&entries, 5.0);
    assert_eq!(first, second);
}

#[test]
fn empty_ledger_total_is_starting_balance() {
    let ledger = seeded_ledger();
    assert!(BalanceService::running_ledger(&ledger.entries, 42.0).is_empty());
    assert_eq!(BalanceService::current_total(&ledger.entries, 42.0), 42.0);
}

#[test]
fn drafts_with_bad_amounts_are_rejected() {
    let mut ledger = seeded_ledger();
    for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let err = EntryService::add(&mut ledger, expense(date(2024, 1, 1), amount, "Rent"))
            .expect_err("invalid amount rejected");
        assert!(matches!(err, CoreError::Validation(_)), "{err:?}");
    }
    let err = EntryService::add(&mut ledger, expense(date(2024, 1, 1), 5.0, "  "))
        .expect_err("blank category rejected");
    assert!(matches!(err, CoreError::Validation(_)));
    assert!(ledger.entries.is_empty());
}

#[test]
fn update_and_remove_report_missing_entries() {
    let mut ledger = seeded_ledger();
    let missing = uuid::Uuid::new_v4();
    let err = EntryService::update(&mut ledger, missing, income(date(2024, 1, 1), 1.0, "Salary"))
        .expect_err("update missing");
    assert!(matches!(err, CoreError::EntryNotFound(id) if id == missing));
    let err = EntryService::remove(&mut ledger, missing).expect_err("remove missing");
    assert!(err.is_not_found());
}

#[test]
fn update_replaces_all_fields_and_keeps_order_slot() {
    let mut ledger = seeded_ledger();
    let a = EntryService::add(&mut ledger, expense(date(2024, 1, 5), 10.0, "Rent")).unwrap();
    let b = EntryService::add(&mut ledger, expense(date(2024, 1, 5), 20.0, "Rent")).unwrap();
    EntryService::update(
        &mut ledger,
        a,
        income(date(2024, 1, 5), 99.0, "Salary").with_description("bonus"),
    )
    .unwrap();

    let stored = EntryService::get(&ledger, a).unwrap();
    assert_eq!(stored.kind(), EntryKind::Income);
    assert_eq!(stored.amount(), 99.0);
    assert_eq!(stored.category(), "Salary");
    assert_eq!(stored.description(), "bonus");

    let ordered = BalanceService::running_ledger(&ledger.entries, 0.0);
    let ids: Vec<_> = ordered
        .iter()
        .map(|row| saldo_domain::Identifiable::id(&row.entry))
        .collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn categories_are_case_sensitive_and_unique() {
    let mut ledger = seeded_ledger();
    let err = CategoryService::add(&mut ledger, "Rent").expect_err("duplicate");
    assert!(matches!(err, CoreError::DuplicateCategory(label) if label == "Rent"));
    CategoryService::add(&mut ledger, "rent").expect("different case is a new label");
    assert!(CategoryService::exists(&ledger, "rent"));
    assert!(CategoryService::exists(&ledger, "Rent"));
    assert!(!CategoryService::exists(&ledger, "RENT"));
}

#[test]
fn category_in_use_cannot_be_removed() {
    let mut ledger = seeded_ledger();
    let id = EntryService::add(&mut ledger, expense(date(2024, 1, 1), 800.0, "Rent")).unwrap();
    let before = ledger.categories.clone();

    let err = CategoryService::remove(&mut ledger, "Rent").expect_err("in use");
    match err {
        CoreError::CategoryInUse { label, entries } => {
            assert_eq!(label, "Rent");
            assert_eq!(entries, 1);
        }
        other => panic!("expected CategoryInUse, got {other:?}"),
    }
    assert_eq!(ledger.categories, before);

    EntryService::remove(&mut ledger, id).unwrap();
    CategoryService::remove(&mut ledger, "Rent").expect("unreferenced category removed");
    assert!(!CategoryService::exists(&ledger, "Rent"));

    let err = CategoryService::remove(&mut ledger, "Rent").expect_err("already gone");
    assert!(matches!(err, CoreError::CategoryNotFound(_)));
}

#[test]
fn window_includes_both_boundary_dates() {
    let mut ledger = seeded_ledger();
    let start = date(2024, 1, 1);
    let window = ReportWindow::new(start, 1);
    EntryService::add(&mut ledger, income(start, 100.0, "Salary")).unwrap();
    EntryService::add(&mut ledger, expense(window.end(), 30.0, "Rent")).unwrap();
    EntryService::add(&mut ledger, expense(window.end().succ_opt().unwrap(), 5.0, "Rent"))
        .unwrap();

    let report = ReportService::window_report(&ledger.entries, 0.0, window, date(2024, 1, 15));
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].entry.date(), start);
    assert_eq!(report.rows[1].entry.date(), window.end());
    assert_eq!(report.closing_balance(), 70.0);
}

#[test]
fn opening_balance_comes_from_last_entry_before_window() {
    let mut ledger = seeded_ledger();
    EntryService::add(&mut ledger, income(date(2023, 12, 1), 1000.0, "Salary")).unwrap();
    EntryService::add(&mut ledger, expense(date(2023, 12, 31), 250.0, "Rent")).unwrap();
    EntryService::add(&mut ledger, expense(date(2024, 1, 10), 40.0, "Groceries")).unwrap();

    let report = ReportService::window_report(
        &ledger.entries,
        10.0,
        ReportWindow::new(date(2024, 1, 1), 1),
        date(2024, 1, 5),
    );
    assert_eq!(report.opening_balance, 760.0);
    assert_eq!(report.rows.len(), 1);
    assert!(report.rows[0].is_future);
    assert_eq!(report.rows[0].running_balance, 720.0);
    assert_eq!(report.net_change(), -40.0);
    assert_eq!(report.expense_total(), -40.0);
    assert_eq!(report.income_total(), 0.0);
}

#[test]
fn empty_ledger_window_reports_starting_balance() {
    let ledger = seeded_ledger();
    let report = ReportService::window_report(
        &ledger.entries,
        42.0,
        ReportWindow::new(date(2030, 6, 1), 12),
        date(2024, 1, 1),
    );
    assert!(report.is_empty());
    assert_eq!(report.opening_balance, 42.0);
    assert_eq!(report.closing_balance(), 42.0);
}

#[test]
fn entries_on_today_are_settled() {
    let mut ledger = seeded_ledger();
    let today = date(2024, 5, 10);
    EntryService::add(&mut ledger, income(today, 5.0, "Salary")).unwrap();
    EntryService::add(&mut ledger, income(today.succ_opt().unwrap(), 5.0, "Salary")).unwrap();
    let report = ReportService::window_report(
        &ledger.entries,
        0.0,
        ReportWindow::new(date(2024, 5, 1), 1),
        today,
    );
    let flags: Vec<bool> = report.rows.iter().map(|row| row.is_future).collect();
    assert_eq!(flags, vec![false, true]);
    assert_eq!(report.projected_rows(), 1);
}

#[test]
fn step_series_holds_level_until_each_entry() {
    let mut ledger = seeded_ledger();
    EntryService::add(&mut ledger, income(date(2024, 1, 3), 50.0, "Salary")).unwrap();
    EntryService::add(&mut ledger, expense(date(2024, 1, 9), 20.0, "Leisure")).unwrap();
    let window = ReportWindow::new(date(2024, 1, 1), 1);
    let report = ReportService::window_report(&ledger.entries, 10.0, window, date(2024, 1, 1));

    let points: Vec<(NaiveDate, f64)> = step_series(&report)
        .into_iter()
        .map(|point| (point.date, point.balance))
        .collect();
    assert_eq!(
        points,
        vec![
            (date(2024, 1, 1), 10.0),
            (date(2024, 1, 3), 10.0),
            (date(2024, 1, 3), 60.0),
            (date(2024, 1, 9), 60.0),
            (date(2024, 1, 9), 40.0),
            (window.end(), 40.0),
        ]
    );
}

#[test]
fn table_rows_carry_balance_tone() {
    let mut ledger = seeded_ledger();
    EntryService::add(&mut ledger, expense(date(2024, 1, 1), 10.0, "Rent")).unwrap();
    EntryService::add(&mut ledger, income(date(2024, 1, 2), 10.0, "Salary")).unwrap();
    let ordered = BalanceService::running_ledger(&ledger.entries, 0.0);
    let rows = table_rows(&ordered);
    assert_eq!(rows[0].tone, BalanceTone::Negative);
    assert_eq!(rows[1].tone, BalanceTone::Positive);
    assert_eq!(rows[1].running_balance, 0.0);
    assert_eq!(rows[0].is_future, None);
}

#[test]
fn export_truncates_long_fields_and_marks_projection() {
    assert_eq!(truncate_field("short"), "short");
    let exact = "x".repeat(35);
    assert_eq!(truncate_field(&exact), exact);
    let long = "Monthly payment for the apartment on Main Street";
    let short = truncate_field(long);
    assert_eq!(short.chars().count(), 35);
    assert!(short.ends_with(".."));
    assert!(long.starts_with(short.trim_end_matches('.')));

    let mut ledger = seeded_ledger();
    EntryService::add(
        &mut ledger,
        expense(date(2024, 1, 2), 900.0, "Rent").with_description(long),
    )
    .unwrap();
    EntryService::add(&mut ledger, income(date(2024, 1, 20), 1500.0, "Salary")).unwrap();
    let report = ReportService::window_report(
        &ledger.entries,
        100.0,
        ReportWindow::new(date(2024, 1, 1), 1),
        date(2024, 1, 10),
    );
    let document = ExportDocument::from_window("January", &report);
    assert_eq!(document.rows[0].settlement, Settlement::Settled);
    assert_eq!(document.rows[0].tone, BalanceTone::Negative);
    assert_eq!(document.rows[1].settlement, Settlement::Projected);
    assert_eq!(document.rows[1].tone, BalanceTone::Positive);

    let text = document.render_text("EUR");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "January");
    assert!(text.contains("Opening balance: EUR 100.00"));
    assert!(text.contains(&short));
    assert!(!text.contains(long));
    assert!(lines.iter().any(|line| line.starts_with("* 2024-01-20")));
    assert!(text.trim_end().ends_with("Closing balance: EUR 700.00"));
}

#[test]
fn export_of_empty_window_reports_unchanged_balance() {
    let ledger = seeded_ledger();
    let report = ReportService::window_report(
        &ledger.entries,
        42.0,
        ReportWindow::new(date(2024, 1, 1), 1),
        date(2024, 1, 1),
    );
    let text = ExportDocument::from_window("Empty", &report).render_text("");
    assert!(text.contains("balance remained at 42.00"));
}

#[test]
fn image_roundtrip_and_corruption_checks() {
    let mut ledger = seeded_ledger();
    EntryService::add(&mut ledger, income(date(2024, 1, 1), 1.0, "Salary")).unwrap();
    let image = encode_image(&ledger).unwrap();
    assert_eq!(decode_image(&image).unwrap(), ledger);

    let mut duplicated = ledger.clone();
    duplicated.entries.push(duplicated.entries[0].clone());
    let image = encode_image(&duplicated).unwrap();
    assert!(matches!(decode_image(&image), Err(CoreError::Corrupt(_))));

    assert!(matches!(
        decode_image(b"not a ledger"),
        Err(CoreError::Corrupt(_))
    ));
}

#[test]
fn warnings_flag_dangling_categories() {
    let mut ledger = seeded_ledger();
    EntryService::add(&mut ledger, income(date(2024, 1, 1), 1.0, "Bonus")).unwrap();
    let warnings = ledger_warnings(&ledger);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Bonus"));
}

#[test]
fn memory_storage_swaps_and_fails_cleanly() {
    let storage = MemoryStorage::new();
    assert!(storage.load().unwrap().is_none());

    let mut ledger = seeded_ledger();
    storage.save(&ledger).unwrap();
    let image = storage.export_image().unwrap();

    EntryService::add(&mut ledger, income(date(2024, 1, 1), 3.0, "Salary")).unwrap();
    storage.save(&ledger).unwrap();
    let restored = storage.replace_image(&image).unwrap();
    assert!(restored.entries.is_empty());
    assert_eq!(storage.load().unwrap().unwrap(), restored);

    storage.set_unavailable(true);
    assert!(matches!(
        storage.save(&ledger),
        Err(CoreError::StoreUnavailable(_))
    ));
    storage.set_unavailable(false);
    assert!(storage.load().unwrap().unwrap().entries.is_empty());
}

#[test]
fn starting_balance_must_be_finite() {
    let mut ledger = seeded_ledger();
    LedgerService::set_starting_balance(&mut ledger, -12.5).unwrap();
    assert_eq!(ledger.starting_balance, -12.5);
    assert!(LedgerService::set_starting_balance(&mut ledger, f64::NAN).is_err());
    assert_eq!(ledger.starting_balance, -12.5);
}
