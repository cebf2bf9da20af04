//! Rebalance calendar: first trading day of each month and the snapshot
//! date whose prices drive selection for it.

use crate::domain::price_table::PriceTable;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// First trading date of every (year, month) present in the table, ascending.
pub fn first_business_days(table: &PriceTable) -> Vec<NaiveDate> {
    let mut firsts: BTreeMap<(i32, u32), NaiveDate> = BTreeMap::new();
    for date in table.dates() {
        firsts
            .entry((date.year(), date.month()))
            .and_modify(|d| *d = (*d).min(date))
            .or_insert(date);
    }
    let mut markers: Vec<NaiveDate> = firsts.into_values().collect();
    markers.sort();
    markers
}

/// Last calendar day of the month before `date`'s month.
fn end_of_previous_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1).and_then(|first| first.pred_opt())
}

/// Resolve the selection snapshot for a marker date.
///
/// 1. latest trading date in the previous calendar month, if any;
/// 2. else the latest trading date on or before the marker;
/// 3. else the first trading date of the table.
///
/// Returns `None` only for an empty table.
pub fn snapshot_for(table: &PriceTable, marker: NaiveDate) -> Option<NaiveDate> {
    if let Some(prev_month_end) = end_of_previous_month(marker) {
        let in_prev_month = table
            .latest_on_or_before(prev_month_end)
            .filter(|d| d.year() == prev_month_end.year() && d.month() == prev_month_end.month());
        if in_prev_month.is_some() {
            return in_prev_month;
        }
    }

    table
        .latest_on_or_before(marker)
        .or_else(|| table.first_date())
}
