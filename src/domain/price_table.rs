//! Daily price table and date lookup.
//!
//! Rows are kept in ascending date order with one price slot per ticker.
//! Weekend rows are dropped on construction; no holiday calendar is applied.

use crate::domain::error::IndexError;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

/// One trading day: a date plus a price per ticker, aligned with
/// [`PriceTable::tickers`]. `None` marks a missing price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub prices: Vec<Option<f64>>,
}

impl PriceRow {
    pub fn new(date: NaiveDate, prices: Vec<Option<f64>>) -> Self {
        Self { date, prices }
    }

    pub fn price(&self, ticker_idx: usize) -> Option<f64> {
        self.prices.get(ticker_idx).copied().flatten()
    }
}

#[derive(Debug, Clone)]
pub struct PriceTable {
    tickers: Vec<String>,
    rows: Vec<PriceRow>,
    date_index: HashMap<NaiveDate, usize>,
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl PriceTable {
    /// Build a table from unordered rows. Weekend rows are discarded, the rest
    /// sorted by date. Fails on a row whose width does not match the ticker
    /// list or on a repeated weekday date.
    pub fn new(tickers: Vec<String>, rows: Vec<PriceRow>) -> Result<Self, IndexError> {
        if let Some(bad) = rows.iter().find(|r| r.prices.len() != tickers.len()) {
            return Err(IndexError::Data {
                reason: format!(
                    "row {} has {} prices, expected {}",
                    bad.date,
                    bad.prices.len(),
                    tickers.len()
                ),
            });
        }

        let mut rows: Vec<PriceRow> = rows.into_iter().filter(|r| is_weekday(r.date)).collect();
        rows.sort_by_key(|r| r.date);

        let mut date_index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if date_index.insert(row.date, i).is_some() {
                return Err(IndexError::DuplicateDate { date: row.date });
            }
        }

        Ok(Self {
            tickers,
            rows,
            date_index,
        })
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_index.contains_key(&date)
    }

    pub fn row(&self, date: NaiveDate) -> Option<&PriceRow> {
        self.date_index.get(&date).map(|&i| &self.rows[i])
    }

    pub fn price(&self, date: NaiveDate, ticker_idx: usize) -> Option<f64> {
        self.row(date).and_then(|r| r.price(ticker_idx))
    }

    /// Rows whose date lies in the closed interval `[start, end]`.
    pub fn rows_between(&self, start: NaiveDate, end: NaiveDate) -> &[PriceRow] {
        let lo = self.rows.partition_point(|r| r.date < start);
        let hi = self.rows.partition_point(|r| r.date <= end);
        if lo >= hi { &[] } else { &self.rows[lo..hi] }
    }

    /// Latest trading date on or before `date`.
    pub fn latest_on_or_before(&self, date: NaiveDate) -> Option<NaiveDate> {
        let idx = self.rows.partition_point(|r| r.date <= date);
        idx.checked_sub(1).map(|i| self.rows[i].date)
    }

    /// Earliest trading date strictly after `date`.
    pub fn next_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let idx = self.rows.partition_point(|r| r.date <= date);
        self.rows.get(idx).map(|r| r.date)
    }
}
