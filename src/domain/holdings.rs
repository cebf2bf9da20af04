//! Share holdings of the index portfolio and their valuation.

use crate::domain::error::IndexError;
use crate::domain::price_table::PriceRow;

/// Share count per ticker, aligned with the price table's ticker order.
#[derive(Debug, Clone, PartialEq)]
pub struct Holdings {
    shares: Vec<f64>,
}

impl Holdings {
    pub fn new(ticker_count: usize) -> Self {
        Self {
            shares: vec![0.0; ticker_count],
        }
    }

    pub fn shares(&self) -> &[f64] {
        &self.shares
    }

    pub fn shares_of(&self, ticker_idx: usize) -> f64 {
        self.shares.get(ticker_idx).copied().unwrap_or(0.0)
    }

    pub fn total_shares(&self) -> f64 {
        self.shares.iter().sum()
    }

    pub fn is_invested(&self) -> bool {
        self.total_shares() > 0.0
    }

    /// Sum of shares x price over held tickers. A held ticker without a price
    /// on `row.date` makes the value NaN; unheld tickers are ignored.
    pub fn market_value(&self, row: &PriceRow) -> f64 {
        self.shares
            .iter()
            .enumerate()
            .filter(|&(_, &qty)| qty != 0.0)
            .map(|(i, &qty)| qty * row.price(i).unwrap_or(f64::NAN))
            .sum()
    }

    /// Replace holdings so each selected ticker carries `level * weight` of
    /// notional at `row`'s prices. Everything else goes to zero. On error the
    /// current holdings are left untouched.
    pub fn rebalance(
        &mut self,
        level: f64,
        selection: &[(usize, f64)],
        row: &PriceRow,
        tickers: &[String],
    ) -> Result<(), IndexError> {
        let mut next = vec![0.0; self.shares.len()];
        for &(idx, weight) in selection {
            if idx >= next.len() || idx >= tickers.len() {
                return Err(IndexError::Data {
                    reason: format!(
                        "selection index {} out of range for {} tickers",
                        idx,
                        next.len()
                    ),
                });
            }
            let price = row
                .price(idx)
                .filter(|p| !p.is_nan() && *p != 0.0)
                .ok_or_else(|| IndexError::InvalidPrice {
                    ticker: tickers[idx].clone(),
                    date: row.date,
                })?;
            next[idx] = level * weight / price;
        }
        self.shares = next;
        Ok(())
    }
}
