//! Per-product price model: a confidence interval used both to disambiguate
//! lexically-ambiguous listings and to prune price outliers.
//!
//! Expressed as pure functions over borrowed price slices rather than
//! mutating `assigned_listings` in place and restoring it afterward.

/// A `[min, max]` confidence interval computed from a set of prices, plus
/// the width factor `k` it was computed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub min_price: f64,
    pub max_price: f64,
    pub k: f64,
}

/// Compute the price band for a set of prices with width factor `k`.
///
/// `None` if `prices` is empty — a product with no assigned listings has no
/// band. A single price falls back to `sigma = mean / 3` before the 30%
/// floor is applied (which always wins, since `mean/3 < 0.3 * mean`).
pub fn compute_band(prices: &[f64], k: f64) -> Option<PriceBand> {
    if prices.is_empty() {
        return None;
    }

    let n = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / n;
    let mean_sq = prices.iter().map(|p| p * p).sum::<f64>() / n;
    let variance = (mean_sq - mean * mean).max(0.0);
    let mut sigma = if prices.len() == 1 {
        mean / 3.0
    } else {
        variance.sqrt()
    };
    sigma = sigma.max(0.3 * mean);

    let max_price = mean + k * sigma;
    let min_price = mean - k * sigma * mean / (mean + k * sigma);

    Some(PriceBand {
        min_price,
        max_price,
        k,
    })
}

/// Does `price` belong with the other prices in `assigned`, under width
/// factor `k`?
///
/// Implements a "leave-one-price-out" rule: listings whose price exactly
/// equals `price` are excluded before recomputing the band, so a listing
/// never defends its own inclusion.
/// Fewer than two remaining listings always match (band is too thin to be
/// meaningful, and a lone listing can't be an outlier relative to itself).
pub fn matches_price(assigned: &[f64], price: f64, k: f64) -> bool {
    let reduced: Vec<f64> = assigned.iter().copied().filter(|&p| p != price).collect();

    if reduced.len() < 2 {
        return true;
    }

    match compute_band(&reduced, k) {
        Some(band) => price >= band.min_price && price <= band.max_price,
        None => true,
    }
}
