//! Static budget dataset and its serializations.
//!
//! The budget is reference data, never derived from pipeline output. It is
//! exposed as tabular rows, as CSV for download, and as scaled bar widths
//! for chart rendering.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One budget row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRow {
    /// The spending category.
    pub category: String,
    /// The allocated amount.
    pub amount: u64,
}

impl BudgetRow {
    /// Creates a new budget row.
    #[must_use]
    pub fn new(category: impl Into<String>, amount: u64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// The fixed three-category project budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetChart {
    rows: Vec<BudgetRow>,
}

impl Default for BudgetChart {
    fn default() -> Self {
        Self::standard()
    }
}

impl BudgetChart {
    /// The standard dataset: Development, Marketing, Operations.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rows: vec![
                BudgetRow::new("Development", 50_000),
                BudgetRow::new("Marketing", 30_000),
                BudgetRow::new("Operations", 20_000),
            ],
        }
    }

    /// Returns the rows in order.
    #[must_use]
    pub fn rows(&self) -> &[BudgetRow] {
        &self.rows
    }

    /// Returns the total allocated amount.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.amount).sum()
    }

    /// CSV serialization with a `Category,Amount` header.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Category,Amount\n");
        for row in &self.rows {
            let _ = writeln!(csv, "{},{}", row.category, row.amount);
        }
        csv
    }

    /// Proportional bar widths for rendering, with the largest row scaled
    /// to `max_width`.
    #[must_use]
    pub fn bar_widths(&self, max_width: usize) -> Vec<usize> {
        let largest = self.rows.iter().map(|row| row.amount).max().unwrap_or(0);
        if largest == 0 {
            return vec![0; self.rows.len()];
        }
        self.rows
            .iter()
            .map(|row| {
                let scaled = (row.amount as f64 / largest as f64) * max_width as f64;
                scaled.round() as usize
            })
            .collect()
    }
}
