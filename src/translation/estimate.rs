/*!
 * Pre-flight cost estimation.
 *
 * Counts the characters and rows a translation run would send, without
 * touching the rows or calling the backend.
 */

use log::info;

use crate::errors::TableError;
use crate::exchange_table::{Delimiter, ExchangeTable, Row};

use super::batch::text_len;

/// Characters and rows pending translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    /// Sum of `orig_text` lengths over pending rows
    pub total_chars: usize,
    /// Number of pending rows
    pub pending_rows: usize,
}

/// Count pending characters and rows
pub fn compute_stats(rows: &[Row]) -> TableStats {
    rows.iter()
        .filter(|row| row.is_pending())
        .fold(TableStats::default(), |acc, row| TableStats {
            total_chars: acc.total_chars + text_len(&row.orig_text),
            pending_rows: acc.pending_rows + 1,
        })
}

/// Decode a table and count its pending characters and rows
pub fn compute_stats_from_text(table_text: &str, delimiter: Delimiter) -> Result<TableStats, TableError> {
    let table = ExchangeTable::decode(table_text, delimiter)?;
    Ok(compute_stats(&table.rows))
}

/// Request and price projection for a table
#[derive(Debug, Clone, PartialEq)]
pub struct CostEstimate {
    /// Counted pending characters and rows
    pub stats: TableStats,
    /// Character budget per request
    pub max_chars_per_request: usize,
    /// `ceil(total_chars / max_chars_per_request)`
    pub batches: usize,
    /// Cost of the exact character count, when a price is known
    pub exact_cost: Option<f64>,
    /// Cost if every batch used the whole budget, when a price is known
    pub padded_cost: Option<f64>,
}

impl CostEstimate {
    /// Project request count and cost; `price_per_million` is per million characters
    pub fn new(stats: TableStats, max_chars_per_request: usize, price_per_million: Option<f64>) -> Self {
        let batches = if max_chars_per_request == 0 {
            0
        } else {
            stats.total_chars.div_ceil(max_chars_per_request)
        };

        let exact_cost = price_per_million.map(|price| stats.total_chars as f64 / 1_000_000.0 * price);
        let padded_cost = price_per_million
            .map(|price| (batches * max_chars_per_request) as f64 / 1_000_000.0 * price);

        Self {
            stats,
            max_chars_per_request,
            batches,
            exact_cost,
            padded_cost,
        }
    }

    /// Human-readable report lines
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("[estimate] rows to translate: {}", self.stats.pending_rows),
            format!("[estimate] characters: {}", self.stats.total_chars),
            format!(
                "[estimate] requests: {} (max {} chars per request)",
                self.batches, self.max_chars_per_request
            ),
        ];

        if let (Some(exact), Some(padded)) = (self.exact_cost, self.padded_cost) {
            lines.push(format!("[estimate] cost (exact characters): {:.2}", exact));
            lines.push(format!("[estimate] cost (full batches): {:.2}", padded));
        }

        lines
    }

    /// Log the report at info level
    pub fn print(&self) {
        for line in self.report_lines() {
            info!("{}", line);
        }
    }
}
