//! Reports over books, loans and usage events
//!
//! Aggregation is done by pure functions over collection snapshots so it
//! can be exercised without a store.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use indexmap::IndexMap;

use crate::{
    error::AppResult,
    models::{
        book::Book,
        enums::ReportPeriod,
        loan::{Borrower, Loan},
        report::{CountEntry, InventoryReport, LoanReport, ShelfCount, ShelfRowCount, UsageReport},
        usage_event::UsageEvent,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn inventory(&self) -> AppResult<InventoryReport> {
        let books = self.repository.books.list().await?;
        Ok(inventory_report(&books))
    }

    pub async fn loans(&self, period: ReportPeriod) -> AppResult<LoanReport> {
        let loans = self.repository.loans.list().await?;
        Ok(loan_report(&loans, period, Utc::now().date_naive()))
    }

    pub async fn usage(&self, period: ReportPeriod) -> AppResult<UsageReport> {
        let events = self.repository.usage_events.list().await?;
        let page_visits = self.repository.page_visits.count().await?;
        Ok(usage_report(&events, page_visits, period, Utc::now().date_naive()))
    }
}

pub fn inventory_report(books: &[Book]) -> InventoryReport {
    let mut by_shelf: BTreeMap<i32, i64> = BTreeMap::new();
    let mut by_shelf_row: BTreeMap<(i32, i32), i64> = BTreeMap::new();
    for book in books {
        let copies = i64::from(book.quantity);
        *by_shelf.entry(book.shelf).or_default() += copies;
        *by_shelf_row.entry((book.shelf, book.row)).or_default() += copies;
    }

    InventoryReport {
        total_copies: books.iter().map(|b| i64::from(b.quantity)).sum(),
        by_shelf: by_shelf
            .into_iter()
            .map(|(shelf, copies)| ShelfCount { shelf, copies })
            .collect(),
        by_shelf_row: by_shelf_row
            .into_iter()
            .map(|((shelf, row), copies)| ShelfRowCount { shelf, row, copies })
            .collect(),
    }
}

pub fn loan_report(loans: &[Loan], period: ReportPeriod, today: NaiveDate) -> LoanReport {
    let mut subjects = Vec::new();
    let mut teachers = Vec::new();
    let mut students = Vec::new();
    for loan in loans {
        match &loan.borrower {
            Borrower::Teacher { subject } => {
                subjects.push(subject.clone());
                teachers.push(loan.full_name());
            }
            Borrower::Student { .. } => students.push(loan.full_name()),
        }
    }

    LoanReport {
        period,
        total_loans: loans.len() as u64,
        by_subject: ranked_counts(subjects),
        by_teacher: ranked_counts(teachers),
        by_student: ranked_counts(students),
        by_period: period_counts(loans.iter().map(|l| l.loaned_at.date_naive()), period, today),
    }
}

pub fn usage_report(
    events: &[UsageEvent],
    page_visits: u64,
    period: ReportPeriod,
    today: NaiveDate,
) -> UsageReport {
    UsageReport {
        period,
        total_events: events.len() as u64,
        by_subject: ranked_counts(events.iter().filter_map(|e| e.subject.clone())),
        by_teacher: ranked_counts(events.iter().filter_map(|e| e.teacher.clone())),
        by_shift: ranked_counts(events.iter().filter_map(|e| e.shift.map(|s| s.to_string()))),
        by_period: period_counts(events.iter().map(|e| e.date), period, today),
        total_page_visits: page_visits,
    }
}

/// Count occurrences, highest count first; ties keep first-seen order
pub fn ranked_counts<I: IntoIterator<Item = String>>(labels: I) -> Vec<CountEntry> {
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(label, count)| CountEntry { label, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Count dates per period bucket, newest bucket first
pub fn period_counts<I: IntoIterator<Item = NaiveDate>>(
    dates: I,
    period: ReportPeriod,
    today: NaiveDate,
) -> Vec<CountEntry> {
    let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for date in dates {
        *buckets.entry(bucket_start(date, period)).or_default() += 1;
    }
    buckets
        .into_iter()
        .rev()
        .map(|(start, count)| CountEntry {
            label: bucket_label(start, period, today),
            count,
        })
        .collect()
}

/// First day of the bucket holding `date`; weeks start on Monday
pub fn bucket_start(date: NaiveDate, period: ReportPeriod) -> NaiveDate {
    match period {
        ReportPeriod::Daily => date,
        // Clamped to the earliest representable date
        ReportPeriod::Weekly => date
            .checked_sub_signed(Duration::days(i64::from(date.weekday().num_days_from_monday())))
            .unwrap_or(NaiveDate::MIN),
        ReportPeriod::Monthly => date.with_day(1).unwrap_or(date),
    }
}

pub fn bucket_label(start: NaiveDate, period: ReportPeriod, today: NaiveDate) -> String {
    match period {
        ReportPeriod::Daily if start == today => "today".to_string(),
        ReportPeriod::Daily if Some(start) == today.pred_opt() => "yesterday".to_string(),
        ReportPeriod::Daily => start.format("%Y-%m-%d").to_string(),
        ReportPeriod::Weekly => format!("week of {}", start.format("%Y-%m-%d")),
        ReportPeriod::Monthly => start.format("%Y-%m").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{LoanStatus, Shift};
    use chrono::{NaiveTime, TimeZone};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book(shelf: i32, row: i32, quantity: i32) -> Book {
        Book {
            id: format!("{}-{}-{}", shelf, row, quantity),
            version: 1,
            title: "t".to_string(),
            shelf,
            row,
            quantity,
            registered_at: Utc::now(),
            updated_at: None,
        }
    }

    fn loan(first: &str, borrower: Borrower, date: NaiveDate) -> Loan {
        Loan {
            id: first.to_string(),
            version: 1,
            first_name: first.to_string(),
            last_name: "Ruiz".to_string(),
            borrower,
            inventory_number: "1".to_string(),
            book_title: "t".to_string(),
            loaned_at: Utc.from_utc_datetime(&date.and_hms_opt(10, 0, 0).unwrap()),
            status: LoanStatus::Loaned,
            returned_at: None,
        }
    }

    fn teacher(subject: &str) -> Borrower {
        Borrower::Teacher { subject: subject.to_string() }
    }

    fn student() -> Borrower {
        Borrower::Student { course: "3 A".to_string(), shift: Shift::Morning }
    }

    #[test]
    fn test_inventory_report() {
        let report = inventory_report(&[book(2, 1, 3), book(1, 4, 1), book(2, 1, 2), book(2, 6, 5)]);
        assert_eq!(report.total_copies, 11);
        assert_eq!(
            report.by_shelf,
            vec![ShelfCount { shelf: 1, copies: 1 }, ShelfCount { shelf: 2, copies: 10 }]
        );
        assert_eq!(report.by_shelf_row[1], ShelfRowCount { shelf: 2, row: 1, copies: 5 });
        assert_eq!(report.by_shelf_row.len(), 3);
    }

    #[test]
    fn test_ranked_counts_ties_keep_first_seen() {
        let labels = ["Math", "History", "Art", "History", "Art", "Biology"];
        let ranked = ranked_counts(labels.iter().map(|s| s.to_string()));
        let order: Vec<_> = ranked.iter().map(|e| (e.label.as_str(), e.count)).collect();
        assert_eq!(
            order,
            vec![("History", 2), ("Art", 2), ("Math", 1), ("Biology", 1)]
        );
    }

    #[test]
    fn test_daily_labels() {
        let today = day(2025, 8, 20);
        let counts = period_counts(
            vec![day(2025, 8, 18), today, day(2025, 8, 19), today],
            ReportPeriod::Daily,
            today,
        );
        let labels: Vec<_> = counts.iter().map(|e| (e.label.as_str(), e.count)).collect();
        assert_eq!(labels, vec![("today", 2), ("yesterday", 1), ("2025-08-18", 1)]);
    }

    #[test]
    fn test_weekly_buckets_start_on_monday() {
        // 2025-08-17 is a Sunday, 2025-08-18 a Monday
        assert_eq!(bucket_start(day(2025, 8, 17), ReportPeriod::Weekly), day(2025, 8, 11));
        assert_eq!(bucket_start(day(2025, 8, 18), ReportPeriod::Weekly), day(2025, 8, 18));

        let counts = period_counts(
            vec![day(2025, 8, 17), day(2025, 8, 20), day(2025, 8, 18)],
            ReportPeriod::Weekly,
            day(2025, 8, 20),
        );
        assert_eq!(counts[0], CountEntry { label: "week of 2025-08-18".to_string(), count: 2 });
        assert_eq!(counts[1].label, "week of 2025-08-11");
    }

    #[test]
    fn test_weekly_bucket_near_earliest_date() {
        let mut date = NaiveDate::MIN;
        for _ in 0..7 {
            let start = bucket_start(date, ReportPeriod::Weekly);
            assert!(start <= date && start >= NaiveDate::MIN);
            date = date.succ_opt().unwrap();
        }
        let counts = period_counts(vec![NaiveDate::MIN], ReportPeriod::Weekly, day(2025, 8, 20));
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_monthly_buckets() {
        let counts = period_counts(
            vec![day(2024, 12, 31), day(2025, 1, 1), day(2025, 1, 31)],
            ReportPeriod::Monthly,
            day(2025, 2, 1),
        );
        let labels: Vec<_> = counts.iter().map(|e| (e.label.as_str(), e.count)).collect();
        assert_eq!(labels, vec![("2025-01", 2), ("2024-12", 1)]);
    }

    #[test]
    fn test_loan_report() {
        let today = day(2025, 8, 20);
        let loans = vec![
            loan("Ana", teacher("History"), today),
            loan("Beto", student(), today),
            loan("Ana", teacher("Math"), day(2025, 8, 1)),
            loan("Carla", teacher("Math"), day(2025, 7, 30)),
        ];
        let report = loan_report(&loans, ReportPeriod::Monthly, today);

        assert_eq!(report.total_loans, 4);
        assert_eq!(report.by_subject[0], CountEntry { label: "Math".to_string(), count: 2 });
        assert_eq!(report.by_teacher[0], CountEntry { label: "Ana Ruiz".to_string(), count: 2 });
        assert_eq!(report.by_student, vec![CountEntry { label: "Beto Ruiz".to_string(), count: 1 }]);
        assert_eq!(report.by_period[0], CountEntry { label: "2025-08".to_string(), count: 3 });
    }

    #[test]
    fn test_usage_report() {
        let event = |subject: Option<&str>, shift: Option<Shift>, date: NaiveDate| UsageEvent {
            id: "e".to_string(),
            version: 1,
            name: "Class".to_string(),
            description: None,
            date,
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            subject: subject.map(str::to_string),
            teacher: None,
            shift,
            recorded_at: Utc::now(),
        };
        let today = day(2025, 8, 20);
        let events = vec![
            event(Some("Art"), Some(Shift::Evening), today),
            event(None, Some(Shift::Evening), day(2025, 8, 19)),
            event(Some("Art"), None, today),
        ];
        let report = usage_report(&events, 42, ReportPeriod::Daily, today);

        assert_eq!(report.total_events, 3);
        assert_eq!(report.total_page_visits, 42);
        assert_eq!(report.by_subject, vec![CountEntry { label: "Art".to_string(), count: 2 }]);
        assert_eq!(report.by_shift, vec![CountEntry { label: "evening".to_string(), count: 2 }]);
        assert!(report.by_teacher.is_empty());
        assert_eq!(report.by_period[1].label, "yesterday");
    }
}
