use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use log::{debug, warn};
use std::fmt;
use std::str::FromStr;

use crate::errors::TableError;

// @module: Exchange table model and delimited text codec

/// Column names written in the header of every encoded table
pub const HEADER_COLUMNS: [&str; 5] = [
    "original_line_no",
    "field_index",
    "record_id_guess",
    "orig_text",
    "translated_text",
];

/// Single-byte column separator of an exchange table
///
/// Only ASCII characters other than line breaks are accepted, so the
/// separator maps directly to the byte the csv reader and writer split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    // @creates: Delimiter from an ASCII byte
    pub const fn new(byte: u8) -> Self {
        Self(byte)
    }

    // @returns: Separator byte
    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self(b'#')
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b'\t' => write!(f, "tab"),
            b => write!(f, "{}", char::from(b)),
        }
    }
}

impl FromStr for Delimiter {
    type Err = TableError;

    /// Accepts `tab` or `\t` for a horizontal tab, otherwise any single ASCII
    /// character except a line break.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "\\t" || s.eq_ignore_ascii_case("tab") {
            return Ok(Self(b'\t'));
        }

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() && c != '\n' && c != '\r' => Ok(Self(c as u8)),
            _ => Err(TableError::InvalidDelimiter(s.to_string())),
        }
    }
}

/// One translatable unit of an exchange table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Position of the record in the source asset
    pub original_line_no: i64,
    /// Field position within that record
    pub field_index: i64,
    /// Optional record identifier, carried through untouched
    pub record_id: String,
    /// Source-language text
    pub orig_text: String,
    /// Target-language text, empty until translated
    pub translated_text: String,
}

impl Row {
    /// Create a row without a record identifier
    pub fn new(
        original_line_no: i64,
        field_index: i64,
        orig_text: impl Into<String>,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            original_line_no,
            field_index,
            record_id: String::new(),
            orig_text: orig_text.into(),
            translated_text: translated_text.into(),
        }
    }

    /// A row needs translation when it has source text but no translation yet
    pub fn is_pending(&self) -> bool {
        !self.orig_text.trim().is_empty() && self.translated_text.trim().is_empty()
    }

    fn cells(&self) -> [String; 5] {
        [
            self.original_line_no.to_string(),
            self.field_index.to_string(),
            flatten_newlines(&self.record_id),
            flatten_newlines(&self.orig_text),
            flatten_newlines(&self.translated_text),
        ]
    }
}

/// Replace line breaks with single spaces so a cell stays on one line
pub fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Positions of the required columns in a header
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    line_no: usize,
    field_index: usize,
    record_id: Option<usize>,
    orig_text: usize,
    translated_text: usize,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self, TableError> {
        let columns: Vec<String> = header.iter().map(|c| c.trim().to_string()).collect();
        let find = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));
        let record_id = find("record_id_guess");

        match (
            find("original_line_no"),
            find("field_index"),
            find("orig_text"),
            find("translated_text"),
        ) {
            (Some(line_no), Some(field_index), Some(orig_text), Some(translated_text)) => Ok(Self {
                line_no,
                field_index,
                record_id,
                orig_text,
                translated_text,
            }),
            _ => Err(TableError::MissingColumns { found: columns }),
        }
    }

    fn parse_row(&self, record: &StringRecord) -> Option<Row> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let original_line_no = cell(self.line_no).trim().parse::<i64>().ok()?;
        let field_index = cell(self.field_index).trim().parse::<i64>().ok()?;

        Some(Row {
            original_line_no,
            field_index,
            record_id: self.record_id.map(cell).unwrap_or("").to_string(),
            orig_text: cell(self.orig_text).to_string(),
            translated_text: cell(self.translated_text).to_string(),
        })
    }
}

/// Decoded exchange table
///
/// Rows keep their load order. Blank lines found between data lines are kept
/// as passthrough text anchored before the row that followed them, so the
/// in-memory form can be written back at the same positions.
#[derive(Debug, Clone, Default)]
pub struct ExchangeTable {
    /// Data rows in table order
    pub rows: Vec<Row>,
    /// Blank lines as (number of rows preceding the line, raw text)
    blank_lines: Vec<(usize, String)>,
    /// Data lines dropped because their integer keys did not parse
    skipped_lines: usize,
    /// Input used `\r\n` line endings
    crlf: bool,
}

impl ExchangeTable {
    /// Decode a delimited table
    ///
    /// The first non-blank line is the header. Lines whose `original_line_no`
    /// or `field_index` is not an integer are skipped without failing. Quotes
    /// have no special meaning and rows may have fewer or more cells than the
    /// header.
    pub fn decode(raw: &str, delimiter: Delimiter) -> Result<Self, TableError> {
        let lines: Vec<&str> = raw
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        let start = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(lines.len());
        let body = lines.get(start + 1..).unwrap_or_default();

        // Blank lines stay out of the reader so each record matches one non-blank line
        let records_text = lines[start..]
            .iter()
            .filter(|l| !l.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .quoting(false)
            .flexible(true)
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_reader(records_text.as_bytes());
        let mut records = reader.records();

        let header = records.next().transpose()?.unwrap_or_default();
        let columns = ColumnMap::from_header(&header)?;

        let mut table = Self {
            crlf: raw.contains("\r\n"),
            ..Default::default()
        };
        for line in body {
            if line.trim().is_empty() {
                table.blank_lines.push((table.rows.len(), line.to_string()));
                continue;
            }

            let Some(record) = records.next().transpose()? else {
                break;
            };
            match columns.parse_row(&record) {
                Some(row) => table.rows.push(row),
                None => {
                    debug!("Skipping malformed table line: {}", line);
                    table.skipped_lines += 1;
                }
            }
        }

        if table.skipped_lines > 0 {
            warn!(
                "Skipped {} table line(s) with non-numeric original_line_no/field_index",
                table.skipped_lines
            );
        }
        debug!("Decoded {} table row(s), delimiter {}", table.rows.len(), delimiter);

        Ok(table)
    }

    /// Number of data lines dropped during decoding
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Number of blank passthrough lines
    pub fn blank_line_count(&self) -> usize {
        self.blank_lines.len()
    }

    /// Consume the table, discarding passthrough lines
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Encode in the in-memory form: header, then rows and blank lines
    /// interleaved at their original positions, joined by the line ending
    /// the table was read with
    pub fn encode(&self, delimiter: Delimiter) -> Result<String, TableError> {
        let encoded = encode_rows(&self.rows, delimiter)?;
        let mut lines = encoded.lines();

        let mut out: Vec<&str> = lines.next().into_iter().collect();
        let mut blanks = self.blank_lines.iter().peekable();
        for (idx, line) in lines.enumerate() {
            while let Some((_, text)) = blanks.next_if(|(anchor, _)| *anchor <= idx) {
                out.push(text.as_str());
            }
            out.push(line);
        }
        out.extend(blanks.map(|(_, text)| text.as_str()));

        Ok(out.join(if self.crlf { "\r\n" } else { "\n" }))
    }
}

/// Encode rows in the file form: header and one `\n`-terminated line per row
pub fn encode_rows(rows: &[Row], delimiter: Delimiter) -> Result<String, TableError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER_COLUMNS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::Encode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TableError::Encode(e.to_string()))
}
