use chrono::{Duration, NaiveDate};
use core_types::PriceHistory;

/// Percentage change between the latest share price and the newest
/// observation dated at or before `today - days`.
///
/// `today` is passed in rather than read from the wall clock so the metric is
/// reproducible in tests. Returns `None` when the series is empty or holds no
/// observation old enough to compare against.
pub fn trailing_change(history: &PriceHistory, days: i64, today: NaiveDate) -> Option<f64> {
    let latest = history.latest()?;
    let comparison_day = today - Duration::days(days);
    let reference = history.on_or_before(comparison_day)?;
    if reference.price <= 0.0 {
        return None;
    }
    Some((latest.price - reference.price) / reference.price * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PricePoint;

    const TOLERANCE: f64 = 1e-9;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn history(points: &[(&str, f64)]) -> PriceHistory {
        PriceHistory::new(
            points
                .iter()
                .map(|(d, p)| PricePoint { day: day(d), price: *p })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn compares_latest_against_the_price_n_days_back() {
        let history = history(&[
            ("2026-03-08", 1.10),
            ("2026-03-07", 1.08),
            ("2026-03-01", 1.00),
        ]);

        let change = trailing_change(&history, 7, day("2026-03-08")).unwrap();

        // (1.10 - 1.00) / 1.00 * 100
        assert!((change - 10.0).abs() < TOLERANCE);
    }

    #[test]
    fn falls_back_to_the_newest_observation_before_the_gap() {
        // Nothing on 2026-03-07; the 1-day change compares against the 5th.
        let history = history(&[
            ("2026-03-08", 1.10),
            ("2026-03-05", 1.00),
        ]);

        let change = trailing_change(&history, 1, day("2026-03-08")).unwrap();

        assert!((change - 10.0).abs() < TOLERANCE);
    }

    #[test]
    fn missing_data_yields_none() {
        let empty = PriceHistory::new(Vec::new()).unwrap();
        assert_eq!(trailing_change(&empty, 1, day("2026-03-08")), None);

        // Series exists but has nothing old enough.
        let recent = history(&[("2026-03-08", 1.10)]);
        assert_eq!(trailing_change(&recent, 7, day("2026-03-08")), None);
    }
}
