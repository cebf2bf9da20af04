#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use index_model::domain::engine::{IndexLevel, SelectionRecord};
use index_model::domain::error::IndexError;
pub use index_model::domain::price_table::{PriceRow, PriceTable};
use index_model::ports::level_port::LevelPort;
use index_model::ports::price_port::PricePort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub struct MockPricePort {
    pub tickers: Vec<String>,
    pub rows: Vec<PriceRow>,
    pub error: Option<String>,
}

impl MockPricePort {
    pub fn new(tickers: &[&str]) -> Self {
        Self {
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            rows: Vec::new(),
            error: None,
        }
    }

    pub fn with_rows(mut self, rows: Vec<PriceRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn load_prices(&self) -> Result<PriceTable, IndexError> {
        if let Some(reason) = &self.error {
            return Err(IndexError::Data {
                reason: reason.clone(),
            });
        }
        PriceTable::new(self.tickers.clone(), self.rows.clone())
    }
}

#[derive(Default)]
pub struct MemoryLevelPort {
    pub levels: RefCell<Vec<(PathBuf, Vec<IndexLevel>)>>,
    pub trails: RefCell<Vec<(PathBuf, Vec<SelectionRecord>)>>,
}

impl LevelPort for MemoryLevelPort {
    fn write_levels(&self, levels: &[IndexLevel], destination: &Path) -> Result<(), IndexError> {
        self.levels
            .borrow_mut()
            .push((destination.to_path_buf(), levels.to_vec()));
        Ok(())
    }

    fn write_trail(
        &self,
        trail: &[SelectionRecord],
        destination: &Path,
    ) -> Result<(), IndexError> {
        self.trails
            .borrow_mut()
            .push((destination.to_path_buf(), trail.to_vec()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn tickers(names: &[&str]) -> Vec<String> {
    names.iter().map(|t| t.to_string()).collect()
}

/// Every weekday in `[start, end]`.
pub fn weekdays(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Rows for every weekday in `[start, end]`, prices from `price_fn(day_index, ticker_index)`.
pub fn generate_rows(
    start: NaiveDate,
    end: NaiveDate,
    ticker_count: usize,
    price_fn: impl Fn(usize, usize) -> f64,
) -> Vec<PriceRow> {
    weekdays(start, end)
        .into_iter()
        .enumerate()
        .map(|(i, d)| PriceRow::new(d, (0..ticker_count).map(|t| Some(price_fn(i, t))).collect()))
        .collect()
}

pub fn make_table(names: &[&str], rows: Vec<PriceRow>) -> PriceTable {
    PriceTable::new(tickers(names), rows).unwrap()
}

/// Five tickers over Q1 2020 with distinct, drifting prices.
pub fn q1_table() -> PriceTable {
    let rows = generate_rows(date(2020, 1, 1), date(2020, 3, 31), 5, |i, t| {
        let base = 10.0 * (t as f64 + 1.0);
        base + ((i * (t + 1)) % 7) as f64 - 3.0 + i as f64 * 0.1
    });
    make_table(
        &["Stock_A", "Stock_B", "Stock_C", "Stock_D", "Stock_E"],
        rows,
    )
}

pub fn price_csv(names: &[&str], rows: &[PriceRow]) -> String {
    let mut out = format!("Date,{}\n", names.join(","));
    for row in rows {
        let cells: Vec<String> = row
            .prices
            .iter()
            .map(|p| p.map(|v| v.to_string()).unwrap_or_default())
            .collect();
        out.push_str(&format!("{},{}\n", row.date.format("%d/%m/%Y"), cells.join(",")));
    }
    out
}
