/*!
 * Batch planning.
 *
 * Selects the rows that still need translation and packs them greedily, in
 * table order, into batches bounded by a character budget. Packing is a single
 * pass: a batch is closed when the next row would push it over the budget, so
 * the same rows and budget always yield the same partition.
 */

use log::debug;

use crate::exchange_table::Row;

/// Character length of a text as counted against the budget
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Ordered group of row indices sent as one backend request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch {
    /// Row indices in table order
    indices: Vec<usize>,
    /// Sum of `orig_text` lengths of those rows
    char_count: usize,
}

impl Batch {
    /// Row indices of this batch
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Total source characters in this batch
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Number of rows in this batch
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Source texts of this batch, in batch order
    pub fn texts(&self, rows: &[Row]) -> Vec<String> {
        self.indices.iter().map(|&i| rows[i].orig_text.clone()).collect()
    }

    fn push(&mut self, index: usize, chars: usize) {
        self.indices.push(index);
        self.char_count += chars;
    }
}

/// Indices of rows with source text and no translation, in table order
pub fn select_pending(rows: &[Row]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.is_pending())
        .map(|(idx, _)| idx)
        .collect()
}

/// Pack pending rows into batches under `max_chars_per_request`
///
/// A row longer than the budget is never split; it ends up alone in its batch.
/// Empty batches are never produced.
pub fn plan_batches(pending: &[usize], rows: &[Row], max_chars_per_request: usize) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut current = Batch::default();

    for &idx in pending {
        let chars = text_len(&rows[idx].orig_text);

        if current.char_count + chars > max_chars_per_request && !current.is_empty() {
            batches.push(std::mem::take(&mut current));
        }

        if chars > max_chars_per_request {
            debug!(
                "Row {} ({}:{}) is oversized ({} chars), sending it in its own batch",
                idx, rows[idx].original_line_no, rows[idx].field_index, chars
            );
        }

        current.push(idx, chars);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
