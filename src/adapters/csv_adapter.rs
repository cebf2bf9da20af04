//! CSV file adapters: daily price input and index level output.

use crate::domain::engine::{IndexLevel, SelectionRecord};
use crate::domain::error::IndexError;
use crate::domain::price_table::{PriceRow, PriceTable};
use crate::ports::level_port::LevelPort;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATE_COLUMN: &str = "Date";
pub const LEVEL_COLUMN: &str = "Index_Level";

/// Day-first format used in price files and level exports.
pub const OUTPUT_DATE_FORMAT: &str = "%d/%m/%Y";

const INPUT_DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

pub struct CsvPriceAdapter {
    path: PathBuf,
    ticker_prefix: String,
}

impl CsvPriceAdapter {
    pub fn new(path: PathBuf, ticker_prefix: impl Into<String>) -> Self {
        Self {
            path,
            ticker_prefix: ticker_prefix.into(),
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    INPUT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn parse_price(value: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        "" | "nan" | "na" | "n/a" | "null" => Ok(None),
        _ => value.parse::<f64>().map(Some),
    }
}

impl PricePort for CsvPriceAdapter {
    fn load_prices(&self) -> Result<PriceTable, IndexError> {
        let content = fs::read_to_string(&self.path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| IndexError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        let date_col = headers
            .iter()
            .position(|h| h.trim() == DATE_COLUMN)
            .ok_or_else(|| IndexError::Data {
                reason: format!("missing {} column", DATE_COLUMN),
            })?;

        let ticker_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != date_col && h.trim().starts_with(self.ticker_prefix.as_str()))
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        let mut rows = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IndexError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            // header is line 1
            let line = line + 2;

            let date_str = record.get(date_col).unwrap_or_default();
            let date = parse_date(date_str).ok_or_else(|| IndexError::Data {
                reason: format!("invalid date '{}' on line {}", date_str, line),
            })?;

            let mut prices = Vec::with_capacity(ticker_cols.len());
            for (col, name) in &ticker_cols {
                let cell = record.get(*col).unwrap_or_default();
                let price = parse_price(cell).map_err(|e| IndexError::Data {
                    reason: format!("invalid {} value '{}' on line {}: {}", name, cell, line, e),
                })?;
                prices.push(price);
            }
            rows.push(PriceRow::new(date, prices));
        }

        let tickers = ticker_cols.into_iter().map(|(_, name)| name).collect();
        PriceTable::new(tickers, rows)
    }
}

/// Round to cents, half away from zero.
pub fn round_level(level: f64) -> f64 {
    (level * 100.0).round() / 100.0
}

fn csv_error(path: &Path, e: csv::Error) -> IndexError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => IndexError::Io(io),
        other => IndexError::Data {
            reason: format!("failed to write {}: {:?}", path.display(), other),
        },
    }
}

pub struct CsvLevelAdapter;

impl LevelPort for CsvLevelAdapter {
    fn write_levels(&self, levels: &[IndexLevel], destination: &Path) -> Result<(), IndexError> {
        let mut wtr = csv::Writer::from_path(destination).map_err(|e| csv_error(destination, e))?;
        wtr.write_record([DATE_COLUMN, LEVEL_COLUMN])
            .map_err(|e| csv_error(destination, e))?;
        for point in levels {
            wtr.write_record([
                point.date.format(OUTPUT_DATE_FORMAT).to_string(),
                format!("{:.2}", round_level(point.level)),
            ])
            .map_err(|e| csv_error(destination, e))?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_trail(
        &self,
        trail: &[SelectionRecord],
        destination: &Path,
    ) -> Result<(), IndexError> {
        let mut wtr = csv::Writer::from_path(destination).map_err(|e| csv_error(destination, e))?;
        wtr.write_record(["Rebalance_Date", "Snapshot_Date", "Selected", "Effective_From"])
            .map_err(|e| csv_error(destination, e))?;
        for rec in trail {
            wtr.write_record([
                rec.rebalance_date.format(OUTPUT_DATE_FORMAT).to_string(),
                rec.snapshot_date.format(OUTPUT_DATE_FORMAT).to_string(),
                rec.selected.join("|"),
                rec.effective_from
                    .map(|d| d.format(OUTPUT_DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            ])
            .map_err(|e| csv_error(destination, e))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
