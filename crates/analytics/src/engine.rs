use crate::error::AnalyticsError;
use crate::table::AprTable;
use tracing::debug;

const DAYS_PER_YEAR: f64 = 365.0;

/// A stateless calculator for trailing-window annualized returns.
///
/// All methods take the price series most recent first: index 0 is today's
/// share price, index `n` is the price `n` days ago.
#[derive(Debug, Default)]
pub struct AprEngine {}

impl AprEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The continuously-compounded annualized return from the price `n` days
    /// ago to the most recent price: `ln(prices[0] / prices[n]) * 365 / n`.
    ///
    /// `n == 0` is the defined degenerate case and yields 0 without touching
    /// the series (no time elapsed, no annualization).
    ///
    /// # Errors
    ///
    /// - `OutOfRange` when the series holds fewer than `n + 1` prices.
    /// - `InvalidInput` when either price is non-positive or non-finite.
    pub fn point(&self, prices: &[f64], n: usize) -> Result<f64, AnalyticsError> {
        if n == 0 {
            return Ok(0.0);
        }
        if prices.len() <= n {
            return Err(AnalyticsError::OutOfRange(format!(
                "a {n}-day window needs {} prices, the series has {}",
                n + 1,
                prices.len()
            )));
        }

        let newest = prices[0];
        let reference = prices[n];
        for price in [newest, reference] {
            if !price.is_finite() || price <= 0.0 {
                return Err(AnalyticsError::InvalidInput(format!(
                    "annualized return is undefined for price {price}"
                )));
            }
        }

        Ok((newest / reference).ln() * DAYS_PER_YEAR / n as f64)
    }

    /// The simple moving average of `k` overlapping `n`-day annualized
    /// returns, each window starting one day further back than the last.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when `n` or `k` is zero, or a window reaches a
    ///   non-positive price.
    /// - `OutOfRange` when the series is too short for the k-th window,
    ///   i.e. holds fewer than `n + k` prices.
    pub fn smoothed(&self, prices: &[f64], n: usize, k: usize) -> Result<f64, AnalyticsError> {
        if n == 0 || k == 0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "window length and smoothing depth must be positive, got n={n}, k={k}"
            )));
        }
        if prices.len() < n + k {
            return Err(AnalyticsError::OutOfRange(format!(
                "{k} overlapping {n}-day windows need {} prices, the series has {}",
                n + k,
                prices.len()
            )));
        }

        let mut sum = 0.0;
        for i in 0..k {
            sum += self.point(&prices[i..], n)?;
        }
        Ok(sum / k as f64)
    }

    /// Builds the full APR modelling grid: rows are window lengths
    /// `n = 1..=n_max`, columns are smoothing depths `k = 1..=k_max`.
    ///
    /// Computed cells hold the smoothed annualized return as a percentage
    /// rounded to 2 decimal places. Cells with insufficient data keep the
    /// legacy sentinel value 0; a series shorter than the requested grid is
    /// legal, not an error.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when any computed cell reaches a non-positive price.
    /// `OutOfRange` never escapes this method: a cell the series cannot
    /// support stays a sentinel.
    pub fn table(
        &self,
        prices: &[f64],
        n_max: usize,
        k_max: usize,
    ) -> Result<AprTable, AnalyticsError> {
        let mut table = AprTable::empty(n_max, k_max);

        for n in 1..=n_max {
            for k in 1..=k_max {
                // Legacy cell guard: k <= len - n + 1, written without underflow.
                if k + n > prices.len() + 1 {
                    continue;
                }
                match self.smoothed(prices, n, k) {
                    Ok(value) => table.set(n, k, round2(value * 100.0)),
                    Err(AnalyticsError::OutOfRange(_)) => {}
                    Err(other) => return Err(other),
                }
            }
        }

        debug!(
            n_max,
            k_max,
            computed = table.computed_cells(),
            "built APR table"
        );
        Ok(table)
    }
}

/// Rounds to 2 decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
