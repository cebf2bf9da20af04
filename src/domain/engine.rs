//! Index engine and valuation walk.
//!
//! The walk visits every trading date in the requested window in order. Each
//! day it marks the current holdings to market (or carries the previous level
//! while nothing is held), records the level, and on a month's first trading
//! day rebalances into the top-ranked tickers from the snapshot date. New
//! holdings take effect from the next trading day.
//!
//! `IndexEngine` keeps one result at a time and is not meant to be shared
//! across threads while a walk is running.

use crate::domain::calendar::{first_business_days, snapshot_for};
use crate::domain::error::IndexError;
use crate::domain::holdings::Holdings;
use crate::domain::price_table::PriceTable;
use crate::domain::selection::{select, START_LEVEL};
use crate::ports::level_port::LevelPort;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexLevel {
    pub date: NaiveDate,
    pub level: f64,
}

/// Diagnostic record of one rebalance.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRecord {
    pub rebalance_date: NaiveDate,
    pub snapshot_date: NaiveDate,
    pub selected: Vec<String>,
    /// First trading date after the rebalance; `None` at the end of the table.
    pub effective_from: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexResult {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub levels: Vec<IndexLevel>,
    pub trail: Vec<SelectionRecord>,
    pub holdings: Holdings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSummary {
    pub trading_days: usize,
    pub rebalances: usize,
    pub first_level: f64,
    pub last_level: f64,
    pub total_return: f64,
}

impl IndexResult {
    pub fn summary(&self) -> IndexSummary {
        let first_level = self.levels.first().map(|l| l.level).unwrap_or(START_LEVEL);
        let last_level = self.levels.last().map(|l| l.level).unwrap_or(first_level);
        let total_return = if first_level != 0.0 {
            last_level / first_level - 1.0
        } else {
            0.0
        };
        IndexSummary {
            trading_days: self.levels.len(),
            rebalances: self.trail.len(),
            first_level,
            last_level,
            total_return,
        }
    }
}

/// Run the valuation walk over `[start, end]`.
///
/// `markers` must be the table's first trading day per month, ascending.
pub fn walk(
    table: &PriceTable,
    markers: &[NaiveDate],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<IndexResult, IndexError> {
    let window = table.rows_between(start, end);
    if window.is_empty() {
        return Err(IndexError::DateRange { start, end });
    }

    let tickers = table.tickers();
    let mut holdings = Holdings::new(tickers.len());
    let mut level = START_LEVEL;
    let mut levels = Vec::with_capacity(window.len());
    let mut trail = Vec::new();

    for row in window {
        let today = row.date;

        if holdings.is_invested() {
            level = holdings.market_value(row);
        }

        levels.push(IndexLevel { date: today, level });

        if markers.binary_search(&today).is_ok() {
            let snapshot = snapshot_for(table, today).unwrap_or(today);
            let selection = select(table, snapshot);
            holdings.rebalance(level, &selection, row, tickers)?;

            trail.push(SelectionRecord {
                rebalance_date: today,
                snapshot_date: snapshot,
                selected: selection
                    .iter()
                    .map(|&(idx, _)| tickers[idx].clone())
                    .collect(),
                effective_from: table.next_after(today),
            });
        }
    }

    Ok(IndexResult {
        start_date: start,
        end_date: end,
        levels,
        trail,
        holdings,
    })
}

#[derive(Debug)]
pub struct IndexEngine {
    table: PriceTable,
    markers: Vec<NaiveDate>,
    result: Option<IndexResult>,
}

impl IndexEngine {
    pub fn new(table: PriceTable) -> Self {
        let markers = first_business_days(&table);
        Self {
            table,
            markers,
            result: None,
        }
    }

    pub fn from_port(port: &dyn PricePort) -> Result<Self, IndexError> {
        Ok(Self::new(port.load_prices()?))
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    /// Candidate rebalance dates: the first trading day of each month.
    pub fn markers(&self) -> &[NaiveDate] {
        &self.markers
    }

    pub fn snapshot_for(&self, marker: NaiveDate) -> Option<NaiveDate> {
        snapshot_for(&self.table, marker)
    }

    /// Compute index levels for `[start, end]`, replacing any earlier result.
    /// On error no result is kept.
    pub fn calc_index_level(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), IndexError> {
        self.result = None;
        self.result = Some(walk(&self.table, &self.markers, start, end)?);
        Ok(())
    }

    pub fn result(&self) -> Option<&IndexResult> {
        self.result.as_ref()
    }

    pub fn levels(&self) -> Option<&[IndexLevel]> {
        self.result.as_ref().map(|r| r.levels.as_slice())
    }

    pub fn selection_trail(&self) -> Option<&[SelectionRecord]> {
        self.result.as_ref().map(|r| r.trail.as_slice())
    }

    /// Holdings in effect after the last processed day.
    pub fn holdings(&self) -> Option<&Holdings> {
        self.result.as_ref().map(|r| &r.holdings)
    }

    pub fn summary(&self) -> Option<IndexSummary> {
        self.result.as_ref().map(IndexResult::summary)
    }

    pub fn export_values(&self, port: &dyn LevelPort, destination: &Path) -> Result<(), IndexError> {
        let result = self.result.as_ref().ok_or(IndexError::NotCalculated)?;
        port.write_levels(&result.levels, destination)
    }

    pub fn export_selection_trail(
        &self,
        port: &dyn LevelPort,
        destination: &Path,
    ) -> Result<(), IndexError> {
        let result = self.result.as_ref().ok_or(IndexError::NotCalculated)?;
        port.write_trail(&result.trail, destination)
    }
}
