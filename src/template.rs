/*!
 * Extraction of translatable strings from a source asset and reapplication
 * of translations.
 *
 * The source asset is UTF-8 text with one record per line and fields
 * separated by `#`. A field is translatable when it contains a CJK ideograph.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::errors::TableError;
use crate::exchange_table::{encode_rows, Delimiter, ExchangeTable, Row};

/// Field separator of the source asset
const FIELD_SEPARATOR: char = '#';

static CJK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{3400}-\u{4DBF}\u{4E00}-\u{9FFF}\u{F900}-\u{FAFF}]").expect("valid CJK pattern"));

/// Whether a field holds text to translate
pub fn is_translatable(field: &str) -> bool {
    CJK_PATTERN.is_match(field)
}

/// Build an exchange table of every translatable field of `input`.
///
/// Rows carry the 1-based line number and the field position. The record id
/// column holds field 0 when it is all digits.
pub fn extract_strings(input: &str, delimiter: Delimiter) -> Result<String, TableError> {
    let mut rows = Vec::new();

    for (line_idx, line) in input.lines().enumerate() {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let record_id = fields
            .first()
            .filter(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
            .copied()
            .unwrap_or("");

        for (field_idx, field) in fields.iter().enumerate() {
            if is_translatable(field) {
                rows.push(Row {
                    record_id: record_id.to_string(),
                    ..Row::new(line_idx as i64 + 1, field_idx as i64, *field, "")
                });
            }
        }
    }

    debug!("Extracted {} translatable field(s)", rows.len());
    encode_rows(&rows, delimiter)
}

/// Write translations from `table_text` back into `input`.
///
/// A field is matched by (line, field, original text) first and by
/// (line, field) otherwise. Empty translations are applied only when
/// `apply_empty` is set.
pub fn apply_translations(
    input: &str,
    table_text: &str,
    apply_empty: bool,
    delimiter: Delimiter,
) -> Result<String, TableError> {
    if table_text.trim().is_empty() {
        return Ok(input.to_string());
    }

    let table = ExchangeTable::decode(table_text, delimiter)?;
    let mut strict: HashMap<(i64, i64, &str), &str> = HashMap::new();
    let mut loose: HashMap<(i64, i64), &str> = HashMap::new();
    for row in &table.rows {
        let key = (row.original_line_no, row.field_index);
        strict.insert((key.0, key.1, row.orig_text.as_str()), row.translated_text.as_str());
        loose.insert(key, row.translated_text.as_str());
    }

    let separator = FIELD_SEPARATOR.to_string();
    let output: Vec<String> = input
        .lines()
        .enumerate()
        .map(|(line_idx, line)| {
            let line_no = line_idx as i64 + 1;
            line.split(FIELD_SEPARATOR)
                .enumerate()
                .map(|(field_idx, field)| {
                    let field_no = field_idx as i64;
                    let translation = strict
                        .get(&(line_no, field_no, field))
                        .or_else(|| loose.get(&(line_no, field_no)));

                    match translation {
                        Some(t) if !t.is_empty() || apply_empty => *t,
                        _ => field,
                    }
                })
                .collect::<Vec<_>>()
                .join(&separator)
        })
        .collect();

    Ok(output.join("\n"))
}
