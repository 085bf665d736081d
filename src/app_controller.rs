use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Duration;

use crate::app_config::{self, Config};
use crate::exchange_table::Delimiter;
use crate::file_utils::FileManager;
use crate::glossary::{self, GlossaryEntry};
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::yandex::YandexTranslate;
use crate::template;
use crate::translation::estimate::{compute_stats_from_text, CostEstimate};
use crate::translation::pipeline::{PipelineConfig, TablePipeline, TranslationStats};

// @module: Application controller for the localization workflow

/// Runs the extract, translate, apply and estimate commands against a configuration
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Get the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn delimiter(&self) -> Result<Delimiter> {
        Ok(self.config.table_delimiter()?)
    }

    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let backend = &self.config.backend;
        Ok(PipelineConfig::new(backend.source_language(), backend.default_target_lang.trim())
            .with_max_chars_per_request(self.config.limits.max_chars_per_request)
            .with_speller(backend.speller)
            .with_delimiter(self.delimiter()?))
    }

    fn log_languages(&self) {
        let backend = &self.config.backend;
        let name = |code: &str| language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string());
        let source = backend.source_language().map(name).unwrap_or_else(|| "auto".to_string());
        info!("Translating {} -> {}", source, name(backend.default_target_lang.trim()));
    }

    /// Load the glossary from the override path or the configured one, bounded by the pair limit
    pub fn load_glossary(&self, glossary_override: Option<&Path>) -> Vec<GlossaryEntry> {
        let path = glossary_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.backend.glossary_path.clone().into());
        glossary::enforce_limit(glossary::load_glossary(&path), self.config.limits.max_glossary_pairs)
    }

    /// Build the configured translation backend
    pub fn create_provider(&self) -> Result<YandexTranslate> {
        self.config.validate_backend()?;
        let backend = &self.config.backend;
        let provider = YandexTranslate::new(
            backend.auth_header(),
            backend.folder_id.clone(),
            backend.endpoint.clone(),
            Duration::from_secs(backend.timeout_secs),
        )?;
        Ok(provider)
    }

    /// Extract translatable fields of `input` into an exchange table file
    pub fn extract(&self, input: &Path, table: &Path) -> Result<()> {
        let content = FileManager::read_to_string(input)?;
        let table_text = template::extract_strings(&content, self.delimiter()?)?;
        FileManager::write_to_file(table, &table_text)?;

        info!("[extract] OK -> {}", table.display());
        Ok(())
    }

    /// Translate a table file with the configured backend
    pub async fn translate(&self, table_in: &Path, table_out: &Path, glossary: Option<&Path>) -> Result<TranslationStats> {
        let provider = self.create_provider()?;
        self.translate_with(&provider, table_in, table_out, glossary).await
    }

    /// Translate a table file with the given backend
    pub async fn translate_with(
        &self,
        provider: &dyn Provider,
        table_in: &Path,
        table_out: &Path,
        glossary: Option<&Path>,
    ) -> Result<TranslationStats> {
        self.log_languages();
        let glossary = self.load_glossary(glossary);
        let pipeline = TablePipeline::new(self.pipeline_config()?, provider, &glossary);

        let stats = pipeline.translate_file(table_in, table_out).await?;
        debug!("{}", stats);

        info!("[translate] OK -> {}", table_out.display());
        Ok(stats)
    }

    /// Write translations from a table file back into a copy of `input`
    pub fn apply(&self, input: &Path, table: &Path, output: &Path, apply_empty: bool) -> Result<()> {
        let content = FileManager::read_to_string(input)?;
        let table_text = FileManager::read_to_string(table)?;

        let output_text = template::apply_translations(&content, &table_text, apply_empty, self.delimiter()?)
            .with_context(|| format!("Failed to apply table: {:?}", table))?;
        FileManager::write_to_file(output, &output_text)?;

        info!("[apply] OK -> {}", output.display());
        Ok(())
    }

    /// Extract, translate in memory and apply in one pass with the configured backend
    pub async fn all(&self, input: &Path, output: &Path, glossary: Option<&Path>) -> Result<TranslationStats> {
        let provider = self.create_provider()?;
        self.all_with(&provider, input, output, glossary).await
    }

    /// Extract, translate in memory and apply in one pass with the given backend
    pub async fn all_with(
        &self,
        provider: &dyn Provider,
        input: &Path,
        output: &Path,
        glossary: Option<&Path>,
    ) -> Result<TranslationStats> {
        let delimiter = self.delimiter()?;
        let content = FileManager::read_to_string(input)?;
        let table_text = template::extract_strings(&content, delimiter)?;

        self.log_languages();
        let glossary = self.load_glossary(glossary);
        let pipeline = TablePipeline::new(self.pipeline_config()?, provider, &glossary);
        let (translated, stats) = pipeline.translate_text(&table_text).await?;
        debug!("{}", stats);

        let output_text = template::apply_translations(&content, &translated, false, delimiter)?;
        FileManager::write_to_file(output, &output_text)?;

        info!("[all] OK -> {}", output.display());
        Ok(stats)
    }

    /// Estimate request count and cost of translating a table file
    pub fn estimate(&self, table: &Path, price_per_million: Option<f64>) -> Result<CostEstimate> {
        if let Some(price) = price_per_million {
            app_config::validate_price(price)?;
        }

        let table_text = FileManager::read_to_string(table)?;
        let stats = compute_stats_from_text(&table_text, self.delimiter()?)
            .with_context(|| format!("Failed to decode table: {:?}", table))?;

        let estimate = CostEstimate::new(
            stats,
            self.config.limits.max_chars_per_request,
            price_per_million.or(self.config.price_per_million),
        );
        estimate.print();
        Ok(estimate)
    }
}
