//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for index-model.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("no trading dates between {start} and {end}")]
    DateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid price for {ticker} on {date}")]
    InvalidPrice { ticker: String, date: NaiveDate },

    #[error("index levels have not been calculated; run calc_index_level first")]
    NotCalculated,

    #[error("price data error: {reason}")]
    Data { reason: String },

    #[error("duplicate trading date {date} in price table")]
    DuplicateDate { date: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&IndexError> for std::process::ExitCode {
    fn from(err: &IndexError) -> Self {
        let code: u8 = match err {
            IndexError::Io(_) => 1,
            IndexError::ConfigParse { .. }
            | IndexError::ConfigMissing { .. }
            | IndexError::ConfigInvalid { .. } => 2,
            IndexError::Data { .. } | IndexError::DuplicateDate { .. } => 3,
            IndexError::DateRange { .. } => 4,
            IndexError::InvalidPrice { .. } => 5,
            IndexError::NotCalculated => 6,
        };
        std::process::ExitCode::from(code)
    }
}
