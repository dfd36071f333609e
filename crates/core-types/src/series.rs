use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily observation of the vault's share price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub day: NaiveDate,
    pub price: f64,
}

/// An ordered series of daily share prices, most recent first.
///
/// Index 0 is always the latest observation. The constructor enforces the
/// ordering invariant so downstream consumers (the APR calculators, the
/// trailing change metrics) never have to re-sort or re-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Builds a history from points that must already be sorted newest-first.
    ///
    /// Rejects non-finite prices and out-of-order days rather than silently
    /// accepting a series the calculators would misread.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, CoreError> {
        for point in &points {
            if !point.price.is_finite() {
                return Err(CoreError::InvalidInput(
                    "price history".to_string(),
                    format!("non-finite price {} on {}", point.price, point.day),
                ));
            }
        }
        for window in points.windows(2) {
            if window[1].day >= window[0].day {
                return Err(CoreError::InvalidInput(
                    "price history".to_string(),
                    format!(
                        "days must be strictly descending, found {} after {}",
                        window[1].day, window[0].day
                    ),
                ));
            }
        }
        Ok(Self { points })
    }

    /// The latest observation, if the series is non-empty.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// The newest observation dated on or before `day`.
    pub fn on_or_before(&self, day: NaiveDate) -> Option<&PricePoint> {
        self.points.iter().find(|point| point.day <= day)
    }

    /// The bare price column, most recent first. This is the shape the APR
    /// calculators consume.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.price).collect()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn accepts_descending_days() {
        let history = PriceHistory::new(vec![
            PricePoint { day: day("2026-03-03"), price: 1.05 },
            PricePoint { day: day("2026-03-02"), price: 1.04 },
            PricePoint { day: day("2026-03-01"), price: 1.03 },
        ])
        .unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().unwrap().price, 1.05);
        assert_eq!(history.prices(), vec![1.05, 1.04, 1.03]);
    }

    #[test]
    fn rejects_out_of_order_days() {
        let result = PriceHistory::new(vec![
            PricePoint { day: day("2026-03-01"), price: 1.03 },
            PricePoint { day: day("2026-03-02"), price: 1.04 },
        ]);

        assert!(matches!(result, Err(CoreError::InvalidInput(_, _))));
    }

    #[test]
    fn rejects_non_finite_prices() {
        let result = PriceHistory::new(vec![PricePoint {
            day: day("2026-03-01"),
            price: f64::NAN,
        }]);

        assert!(matches!(result, Err(CoreError::InvalidInput(_, _))));
    }

    #[test]
    fn on_or_before_skips_gaps() {
        // No observation on 2026-03-02; the lookup must fall through to the 1st.
        let history = PriceHistory::new(vec![
            PricePoint { day: day("2026-03-04"), price: 1.06 },
            PricePoint { day: day("2026-03-01"), price: 1.03 },
        ])
        .unwrap();

        let found = history.on_or_before(day("2026-03-02")).unwrap();
        assert_eq!(found.day, day("2026-03-01"));
        assert!(history.on_or_before(day("2026-02-28")).is_none());
    }
}
