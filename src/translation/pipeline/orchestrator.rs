/*!
 * Pipeline orchestrator for translating an exchange table.
 *
 * One invocation moves through these phases:
 * 1. Loaded: the table is decoded from a file or from in-memory text
 * 2. Planned: pending rows are selected and packed into batches
 * 3. Translating / Merged: each batch is sent to the backend, in order, and
 *    its translations are written into the rows
 * 4. Written: the rows are encoded back, in load order
 *
 * Batches are sent one at a time. A failing batch aborts the whole run and
 * nothing is written, so a file is either fully updated or left untouched.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::errors::TranslationError;
use crate::exchange_table::{encode_rows, flatten_newlines, Delimiter, ExchangeTable, Row};
use crate::file_utils::FileManager;
use crate::glossary::GlossaryEntry;
use crate::providers::{BatchRequest, Provider};
use crate::translation::batch::{plan_batches, select_pending, Batch};

/// Configuration for the translation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Source language, `None` for backend auto-detection
    pub source_language: Option<String>,

    /// Target language
    pub target_language: String,

    /// Character budget per backend request
    pub max_chars_per_request: usize,

    /// Whether to ask the backend to spell-check the input
    pub speller: bool,

    /// Column separator of the exchange table
    pub delimiter: Delimiter,
}

impl PipelineConfig {
    /// Create a new pipeline configuration with a 10000 character budget.
    pub fn new(source_language: Option<&str>, target_language: &str) -> Self {
        Self {
            source_language: source_language.map(str::to_string),
            target_language: target_language.to_string(),
            max_chars_per_request: 10_000,
            speller: false,
            delimiter: Delimiter::default(),
        }
    }

    /// Set the character budget per request.
    pub fn with_max_chars_per_request(mut self, max_chars: usize) -> Self {
        self.max_chars_per_request = max_chars;
        self
    }

    /// Enable or disable the backend speller.
    pub fn with_speller(mut self, speller: bool) -> Self {
        self.speller = speller;
        self
    }

    /// Set the table delimiter.
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Phases of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    /// Table decoded
    Loaded,
    /// Batches planned
    Planned,
    /// Waiting on the backend for a batch
    Translating,
    /// Batch results written into rows
    Merged,
    /// Output encoded
    Written,
}

/// Running statistics of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Rows in the table
    pub total_rows: usize,

    /// Rows that needed translation
    pub pending_rows: usize,

    /// Number of planned batches
    pub total_batches: usize,

    /// Number of batches merged
    pub completed_batches: usize,

    /// Rows that received a translation
    pub rows_translated: usize,

    /// Source characters sent to the backend
    pub chars_sent: usize,

    /// Wall time of the run
    pub duration: Duration,
}

impl TranslationStats {
    /// Get a one-line summary of the run.
    pub fn summary(&self) -> String {
        format!(
            "{} of {} rows translated in {} batches ({} chars, {:.2}s)",
            self.rows_translated,
            self.total_rows,
            self.completed_batches,
            self.chars_sent,
            self.duration.as_secs_f32()
        )
    }
}

impl fmt::Display for TranslationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// The exchange table translation pipeline.
pub struct TablePipeline<'a> {
    config: PipelineConfig,
    provider: &'a dyn Provider,
    glossary: &'a [GlossaryEntry],
}

impl<'a> TablePipeline<'a> {
    /// Create a new pipeline over a backend and a glossary.
    pub fn new(config: PipelineConfig, provider: &'a dyn Provider, glossary: &'a [GlossaryEntry]) -> Self {
        Self {
            config,
            provider,
            glossary,
        }
    }

    fn enter(&self, phase: PipelinePhase) {
        debug!("Pipeline phase: {:?}", phase);
    }

    /// Translate pending rows in place.
    ///
    /// Rows of earlier batches stay updated when a later batch fails; callers
    /// that persist must only do so on success.
    pub async fn translate_rows(&self, rows: &mut [Row]) -> Result<TranslationStats, TranslationError> {
        let start_time = Instant::now();

        let pending = select_pending(rows);
        let batches = plan_batches(&pending, rows, self.config.max_chars_per_request);
        self.enter(PipelinePhase::Planned);

        let mut stats = TranslationStats {
            total_rows: rows.len(),
            pending_rows: pending.len(),
            total_batches: batches.len(),
            ..Default::default()
        };

        if !batches.is_empty() {
            info!(
                "[translate] {} rows pending in {} batch(es) via {}",
                pending.len(),
                batches.len(),
                self.provider.name()
            );
        }

        for (batch_index, batch) in batches.iter().enumerate() {
            let position = batch_index + 1;
            self.enter(PipelinePhase::Translating);
            let translations = self.translate_batch(batch, rows, position, batches.len()).await?;

            for (&row_idx, translation) in batch.indices().iter().zip(translations) {
                rows[row_idx].translated_text = flatten_newlines(&translation);
            }
            self.enter(PipelinePhase::Merged);

            stats.completed_batches += 1;
            stats.rows_translated += batch.len();
            stats.chars_sent += batch.char_count();

            info!(
                "  [translate] batch {}/{}: {} strings, chars: {}",
                position,
                batches.len(),
                batch.len(),
                batch.char_count()
            );
        }

        stats.duration = start_time.elapsed();
        Ok(stats)
    }

    async fn translate_batch(
        &self,
        batch: &Batch,
        rows: &[Row],
        position: usize,
        total: usize,
    ) -> Result<Vec<String>, TranslationError> {
        let texts = batch.texts(rows);
        let request = BatchRequest {
            texts: &texts,
            target_language: &self.config.target_language,
            source_language: self.config.source_language.as_deref(),
            glossary: self.glossary,
            speller: self.config.speller,
        };

        let translations = self
            .provider
            .translate_batch(request)
            .await
            .map_err(|source| TranslationError::Batch {
                batch: position,
                total,
                source,
            })?;

        if translations.len() != texts.len() {
            return Err(TranslationError::Misaligned {
                batch: position,
                expected: texts.len(),
                actual: translations.len(),
            });
        }

        Ok(translations)
    }

    /// Translate a table held in memory, keeping blank lines in place.
    pub async fn translate_text(&self, table_text: &str) -> Result<(String, TranslationStats), TranslationError> {
        let mut table = ExchangeTable::decode(table_text, self.config.delimiter)?;
        self.enter(PipelinePhase::Loaded);

        let stats = self.translate_rows(&mut table.rows).await?;

        let output = table.encode(self.config.delimiter)?;
        self.enter(PipelinePhase::Written);
        Ok((output, stats))
    }

    /// Translate a table file into another file.
    ///
    /// The output is written once, after every batch succeeded.
    pub async fn translate_file(&self, input: &Path, output: &Path) -> Result<TranslationStats> {
        let content = FileManager::read_to_string(input)?;
        let mut rows = ExchangeTable::decode(&content, self.config.delimiter)
            .with_context(|| format!("Failed to decode table: {:?}", input))?
            .into_rows();
        self.enter(PipelinePhase::Loaded);

        let stats = self.translate_rows(&mut rows).await?;

        let encoded = encode_rows(&rows, self.config.delimiter)
            .with_context(|| format!("Failed to encode table: {:?}", output))?;
        FileManager::write_to_file(output, &encoded)?;
        self.enter(PipelinePhase::Written);
        Ok(stats)
    }
}
