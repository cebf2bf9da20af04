//! Run parameters for one index calculation.

use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_TICKER_PREFIX: &str = "Stock_";

/// Date format for `[index]` keys and CLI date flags.
pub const CONFIG_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub prices_path: PathBuf,
    pub ticker_prefix: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub output_path: PathBuf,
    pub trail_path: Option<PathBuf>,
}
