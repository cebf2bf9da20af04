//! Configuration validation.
//!
//! Checks every run key before any price data is loaded. A reversed date
//! window is accepted here; the engine reports it as an empty range.

use crate::domain::error::IndexError;
use crate::domain::run_config::CONFIG_DATE_FORMAT;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), IndexError> {
    require_non_empty(config, "data", "prices_path")?;
    validate_ticker_prefix(config)?;
    parse_config_date(config, "index", "start_date")?;
    parse_config_date(config, "index", "end_date")?;
    require_non_empty(config, "export", "output_path")?;
    Ok(())
}

pub fn require_non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, IndexError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(IndexError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_ticker_prefix(config: &dyn ConfigPort) -> Result<(), IndexError> {
    match config.get_string("data", "ticker_prefix") {
        Some(s) if s.trim().is_empty() => Err(IndexError::ConfigInvalid {
            section: "data".to_string(),
            key: "ticker_prefix".to_string(),
            reason: "ticker_prefix must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

pub fn parse_config_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<NaiveDate, IndexError> {
    let value = require_non_empty(config, section, key)?;
    NaiveDate::parse_from_str(&value, CONFIG_DATE_FORMAT).map_err(|_| IndexError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("invalid {} format, expected YYYY-MM-DD", key),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[data]
prices_path = data_sources/stock_prices.csv
ticker_prefix = Stock_

[index]
start_date = 2020-01-01
end_date = 2020-12-31

[export]
output_path = export.csv
"#;

    #[test]
    fn valid_config_passes() {
        assert!(validate_run_config(&make_config(VALID)).is_ok());
    }

    #[test]
    fn ticker_prefix_is_optional() {
        let config = make_config(
            "[data]\nprices_path = p.csv\n[index]\nstart_date = 2020-01-01\nend_date = 2020-01-31\n[export]\noutput_path = o.csv\n",
        );
        assert!(validate_run_config(&config).is_ok());
    }

    #[test]
    fn missing_prices_path_fails() {
        let config = make_config(
            "[index]\nstart_date = 2020-01-01\nend_date = 2020-01-31\n[export]\noutput_path = o.csv\n",
        );
        let err = validate_run_config(&config).unwrap_err();
        assert!(matches!(err, IndexError::ConfigMissing { key, .. } if key == "prices_path"));
    }

    #[test]
    fn blank_ticker_prefix_fails() {
        let mut config = make_config(VALID);
        config.set("data", "ticker_prefix", "  ");
        let err = validate_run_config(&config).unwrap_err();
        assert!(matches!(err, IndexError::ConfigInvalid { key, .. } if key == "ticker_prefix"));
    }

    #[test]
    fn invalid_start_date_format_fails() {
        let mut config = make_config(VALID);
        config.set("index", "start_date", "01/01/2020");
        let err = validate_run_config(&config).unwrap_err();
        assert!(matches!(err, IndexError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn missing_end_date_fails() {
        let config = make_config(
            "[data]\nprices_path = p.csv\n[index]\nstart_date = 2020-01-01\n[export]\noutput_path = o.csv\n",
        );
        let err = validate_run_config(&config).unwrap_err();
        assert!(matches!(err, IndexError::ConfigMissing { key, .. } if key == "end_date"));
    }

    #[test]
    fn reversed_dates_are_accepted() {
        let mut config = make_config(VALID);
        config.set("index", "start_date", "2021-01-01");
        assert!(validate_run_config(&config).is_ok());
    }

    #[test]
    fn missing_output_path_fails() {
        let config = make_config(
            "[data]\nprices_path = p.csv\n[index]\nstart_date = 2020-01-01\nend_date = 2020-01-31\n",
        );
        let err = validate_run_config(&config).unwrap_err();
        assert!(matches!(err, IndexError::ConfigMissing { key, .. } if key == "output_path"));
    }
}
