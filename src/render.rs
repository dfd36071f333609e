use analytics::{AprTable, PairOpenInterest, PositionPnl};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use core_types::PriceHistory;
use std::collections::BTreeMap;

/// Renders the APR modelling grid. Computed cells are colored by their
/// position between the grid minimum and maximum (red for negative, green
/// for positive, white near zero); sentinel cells render as "n/a" so an
/// uncomputed cell is never mistaken for a zero return.
pub fn apr_table(table: &AprTable) -> Table {
    let mut out = new_table();

    let mut header = vec![Cell::new("")];
    for k in 1..=table.k_max() {
        header.push(Cell::new(AprTable::column_label(k)));
    }
    out.set_header(header);

    let min = table.min().unwrap_or(0.0);
    let max = table.max().unwrap_or(0.0);

    for n in 1..=table.n_max() {
        let mut row = vec![Cell::new(AprTable::row_label(n))];
        for k in 1..=table.k_max() {
            if !table.is_computed(n, k) {
                row.push(Cell::new("n/a").set_alignment(CellAlignment::Right));
                continue;
            }
            let value = table.cell(n, k).unwrap_or(0.0);
            let mut cell = Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right);
            if let Some(color) = scale_color(value, min, max) {
                cell = cell.bg(color);
            }
            row.push(cell);
        }
        out.add_row(row);
    }
    out
}

/// The background color for a computed cell, scaled the way the legacy
/// dashboard shaded its grid: positive values fade white to green with
/// intensity `value / max`, negative values white to red with `value / min`,
/// both capped at half strength.
fn scale_color(value: f64, min: f64, max: f64) -> Option<Color> {
    if value == 0.0 {
        return None;
    }
    let intensity = if value > 0.0 {
        if max <= 0.0 {
            return None;
        }
        (value / max).clamp(0.0, 1.0)
    } else {
        if min >= 0.0 {
            return None;
        }
        (value / min).clamp(0.0, 1.0)
    };

    let alpha = intensity * 0.5;
    let faded = (255.0 * (1.0 - alpha)).round() as u8;
    Some(if value > 0.0 {
        Color::Rgb { r: faded, g: 255, b: faded }
    } else {
        Color::Rgb { r: 255, g: faded, b: faded }
    })
}

/// A trailing change metric line, e.g. `7d Change: +1.25%`.
pub fn change_metric(label: &str, change: Option<f64>) -> String {
    match change {
        Some(pct) => format!("{label} Change: {pct:+.2}%"),
        None => format!("{label} Change: n/a"),
    }
}

/// The most recent `limit` days of share prices.
pub fn price_history(history: &PriceHistory, limit: usize) -> Table {
    let mut out = new_table();
    out.set_header(vec![Cell::new("Day"), Cell::new("Share Price")]);

    for point in history.points().iter().take(limit) {
        out.add_row(vec![
            Cell::new(point.day),
            Cell::new(format!("{:.6}", point.price)).set_alignment(CellAlignment::Right),
        ]);
    }
    out
}

/// Open positions with their unrealized PnL.
pub fn positions_table(positions: &[PositionPnl]) -> Table {
    let mut out = new_table();
    out.set_header(vec![
        Cell::new("Pair"),
        Cell::new("Side"),
        Cell::new("Trader"),
        Cell::new("Notional"),
        Cell::new("Collateral"),
        Cell::new("Leverage"),
        Cell::new("uPnL"),
        Cell::new("Open Price"),
        Cell::new("Last Price"),
    ]);

    for entry in positions {
        let position = &entry.position;
        out.add_row(vec![
            Cell::new(&position.pair),
            Cell::new(position.side),
            Cell::new(&position.trader),
            money_cell(Some(position.notional)),
            money_cell(Some(position.collateral)),
            Cell::new(format!("{:.1}x", position.leverage)).set_alignment(CellAlignment::Right),
            money_cell(entry.unrealized_pnl),
            price_cell(Some(position.open_price)),
            price_cell(entry.last_price),
        ]);
    }
    out
}

/// Aggregated PnL per grouping key (pair or trader), largest first.
pub fn pnl_table(key_label: &str, pnl_by_key: &BTreeMap<String, f64>) -> Table {
    let mut out = new_table();
    out.set_header(vec![Cell::new(key_label), Cell::new("uPnL")]);

    let mut rows: Vec<(&String, f64)> = pnl_by_key.iter().map(|(k, &v)| (k, v)).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (key, pnl) in rows {
        out.add_row(vec![Cell::new(key), money_cell(Some(pnl))]);
    }
    out
}

/// Buy/sell open interest and the signed imbalance per pair.
pub fn open_interest_table(open_interest: &BTreeMap<String, PairOpenInterest>) -> Table {
    let mut out = new_table();
    out.set_header(vec![
        Cell::new("Pair"),
        Cell::new("Buy Notional"),
        Cell::new("Sell Notional"),
        Cell::new("Imbalance"),
    ]);

    for (pair, oi) in open_interest {
        out.add_row(vec![
            Cell::new(pair),
            money_cell(Some(oi.buy_notional)),
            money_cell(Some(oi.sell_notional)),
            money_cell(Some(oi.imbalance())),
        ]);
    }
    out
}

/// Whole-dollar formatting with thousands separators, e.g. `-$12,345`.
pub fn usd(value: f64) -> String {
    let whole = value as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn money_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(usd(v)).set_alignment(CellAlignment::Right),
        None => Cell::new("n/a").set_alignment(CellAlignment::Right),
    }
}

fn price_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{v:.4}")).set_alignment(CellAlignment::Right),
        None => Cell::new("n/a").set_alignment(CellAlignment::Right),
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_scale_hits_full_strength_at_the_extremes() {
        match scale_color(10.0, -5.0, 10.0) {
            Some(Color::Rgb { r, g, b }) => assert_eq!((r, g, b), (128, 255, 128)),
            other => panic!("expected a green cell, got {other:?}"),
        }
        match scale_color(-5.0, -5.0, 10.0) {
            Some(Color::Rgb { r, g, b }) => assert_eq!((r, g, b), (255, 128, 128)),
            other => panic!("expected a red cell, got {other:?}"),
        }
    }

    #[test]
    fn zero_cells_stay_uncolored() {
        assert!(scale_color(0.0, -5.0, 10.0).is_none());
    }

    #[test]
    fn usd_groups_thousands_and_keeps_the_sign() {
        assert_eq!(usd(1234567.89), "$1,234,567");
        assert_eq!(usd(-12345.6), "-$12,345");
        assert_eq!(usd(999.0), "$999");
        assert_eq!(usd(0.4), "$0");
    }
}
