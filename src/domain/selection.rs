//! Stock selection for a rebalance.
//!
//! Tickers are ranked by snapshot price, highest first, ties broken by ticker
//! name ascending. The top entries receive [`WEIGHTS`] positionally; with fewer
//! eligible tickers than weights, the trailing weights are simply unused.

use crate::domain::price_table::PriceTable;
use chrono::NaiveDate;

/// Index level before the first rebalance takes effect.
pub const START_LEVEL: f64 = 100.0;

/// Notional weight per rank.
pub const WEIGHTS: [f64; 3] = [0.5, 0.25, 0.25];

/// Ticker indices with a price on `snapshot`, in rank order.
/// Tickers without a snapshot price are not eligible.
pub fn rank_tickers(table: &PriceTable, snapshot: NaiveDate) -> Vec<usize> {
    let Some(row) = table.row(snapshot) else {
        return Vec::new();
    };
    let tickers = table.tickers();

    let mut ranked: Vec<(usize, f64)> = (0..tickers.len())
        .filter_map(|i| row.price(i).filter(|p| !p.is_nan()).map(|p| (i, p)))
        .collect();
    ranked.sort_by(|(ia, pa), (ib, pb)| {
        pb.total_cmp(pa)
            .then_with(|| tickers[*ia].cmp(&tickers[*ib]))
    });
    ranked.into_iter().map(|(i, _)| i).collect()
}

/// The top-ranked tickers paired with their target weight.
pub fn select(table: &PriceTable, snapshot: NaiveDate) -> Vec<(usize, f64)> {
    rank_tickers(table, snapshot)
        .into_iter()
        .zip(WEIGHTS)
        .collect()
}
