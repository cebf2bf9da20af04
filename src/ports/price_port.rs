//! Price data source port.

use crate::domain::error::IndexError;
use crate::domain::price_table::PriceTable;

pub trait PricePort {
    /// Load the full daily price table. Weekend rows are already dropped.
    fn load_prices(&self) -> Result<PriceTable, IndexError>;
}
