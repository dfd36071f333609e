use serde::Serialize;

/// The APR modelling grid: rows are return-window lengths `n = 1..=n_max`,
/// columns are smoothing depths `k = 1..=k_max`, stored row-major.
///
/// Cell values are percentages rounded to 2 decimal places. A cell the series
/// could not support holds the legacy sentinel 0; the `computed` mask keeps
/// the sentinel distinguishable from a genuine zero return so presentation
/// code can label and color the grid correctly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AprTable {
    n_max: usize,
    k_max: usize,
    cells: Vec<f64>,
    computed: Vec<bool>,
}

impl AprTable {
    pub(crate) fn empty(n_max: usize, k_max: usize) -> Self {
        Self {
            n_max,
            k_max,
            cells: vec![0.0; n_max * k_max],
            computed: vec![false; n_max * k_max],
        }
    }

    pub(crate) fn set(&mut self, n: usize, k: usize, value: f64) {
        let index = self.index(n, k);
        self.cells[index] = value;
        self.computed[index] = true;
    }

    fn index(&self, n: usize, k: usize) -> usize {
        debug_assert!((1..=self.n_max).contains(&n) && (1..=self.k_max).contains(&k));
        (n - 1) * self.k_max + (k - 1)
    }

    pub fn n_max(&self) -> usize {
        self.n_max
    }

    pub fn k_max(&self) -> usize {
        self.k_max
    }

    /// The value of cell `(n, k)`, 1-indexed. `None` outside the grid.
    pub fn cell(&self, n: usize, k: usize) -> Option<f64> {
        if (1..=self.n_max).contains(&n) && (1..=self.k_max).contains(&k) {
            Some(self.cells[(n - 1) * self.k_max + (k - 1)])
        } else {
            None
        }
    }

    /// Whether cell `(n, k)` was actually computed, as opposed to holding the
    /// insufficient-data sentinel.
    pub fn is_computed(&self, n: usize, k: usize) -> bool {
        if (1..=self.n_max).contains(&n) && (1..=self.k_max).contains(&k) {
            self.computed[(n - 1) * self.k_max + (k - 1)]
        } else {
            false
        }
    }

    /// The number of computed (non-sentinel) cells.
    pub fn computed_cells(&self) -> usize {
        self.computed.iter().filter(|&&c| c).count()
    }

    /// Iterates rows in `n` order; each row holds `k_max` cells in `k` order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.k_max.max(1))
    }

    /// The smallest computed cell value; `None` when nothing was computed.
    /// Sentinel cells never participate, so an all-sentinel grid has no
    /// minimum rather than a spurious zero.
    pub fn min(&self) -> Option<f64> {
        self.computed_values().fold(None, |acc, v| match acc {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        })
    }

    /// The largest computed cell value; `None` when nothing was computed.
    pub fn max(&self) -> Option<f64> {
        self.computed_values().fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }

    fn computed_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells
            .iter()
            .zip(&self.computed)
            .filter(|&(_, &computed)| computed)
            .map(|(&value, _)| value)
    }

    /// Row label for presentation, e.g. "n=7".
    pub fn row_label(n: usize) -> String {
        format!("n={n}")
    }

    /// Column label for presentation, e.g. "k=4".
    pub fn column_label(k: usize) -> String {
        format!("k={k}")
    }
}
