/*!
 * Integration tests for the table translation pipeline.
 *
 * Runs file-to-file and in-memory translations against the mock provider.
 */

use anyhow::Result;
use loctool::exchange_table::{Delimiter, ExchangeTable};
use loctool::file_utils::FileManager;
use loctool::glossary::GlossaryEntry;
use loctool::providers::mock::MockProvider;
use loctool::translation::{PipelineConfig, TablePipeline};
use crate::common;

fn pipeline_config(max_chars: usize) -> PipelineConfig {
    PipelineConfig::new(Some("zh"), "en").with_max_chars_per_request(max_chars)
}

/// Test that a table file is translated into a new file, leaving translated rows alone
#[tokio::test]
async fn test_translateFile_shouldWriteTranslatedTable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_table(
        temp_dir.path(),
        "strings.tsv",
        &[(1, 0, "hi", ""), (2, 0, "bye", "再见"), (3, 1, "长剑", "")],
    )?;
    let output = temp_dir.path().join("out").join("strings_out.tsv");

    let provider = MockProvider::working();
    let pipeline = TablePipeline::new(pipeline_config(100), &provider, &[]);
    let stats = pipeline.translate_file(&input, &output).await?;

    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.pending_rows, 2);
    assert_eq!(stats.total_batches, 1);
    assert_eq!(provider.received_batches(), vec![vec!["hi".to_string(), "长剑".to_string()]]);

    let written = FileManager::read_to_string(&output)?;
    assert_eq!(
        written,
        "original_line_no#field_index#record_id_guess#orig_text#translated_text\n\
         1#0##hi#[en] hi\n\
         2#0##bye#再见\n\
         3#1##长剑#[en] 长剑\n"
    );
    Ok(())
}

/// Test that a translated output table has nothing left to send
#[tokio::test]
async fn test_translateFile_twice_shouldSendNothingSecondTime() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_table(temp_dir.path(), "strings.tsv", &[(1, 1, "盾", "")])?;
    let first = temp_dir.path().join("first.tsv");
    let second = temp_dir.path().join("second.tsv");

    let provider = MockProvider::working();
    let pipeline = TablePipeline::new(pipeline_config(100), &provider, &[]);
    pipeline.translate_file(&input, &first).await?;
    let stats = pipeline.translate_file(&first, &second).await?;

    assert_eq!(stats.total_batches, 0);
    assert_eq!(provider.call_count(), 1);
    assert_eq!(FileManager::read_to_string(&first)?, FileManager::read_to_string(&second)?);
    Ok(())
}

/// Test that a failing batch leaves the output file unwritten
#[tokio::test]
async fn test_translateFile_withFailingBatch_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let long = "字".repeat(60);
    let input = common::create_test_table(
        temp_dir.path(),
        "strings.tsv",
        &[(1, 1, long.as_str(), ""), (2, 1, long.as_str(), ""), (3, 1, long.as_str(), "")],
    )?;
    let output = temp_dir.path().join("strings_out.tsv");

    let provider = MockProvider::failing_on_call(2);
    let pipeline = TablePipeline::new(pipeline_config(100), &provider, &[]);
    let result = pipeline.translate_file(&input, &output).await;

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Batch 2 of 3 failed"));
    assert_eq!(provider.call_count(), 2);
    assert!(!output.exists());
    Ok(())
}

/// Test that a failing run over its own input leaves the input untouched
#[tokio::test]
async fn test_translateFile_inPlaceWithFailure_shouldKeepInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_table(temp_dir.path(), "strings.tsv", &[(1, 1, "盾", ""), (2, 1, "剑", "")])?;
    let before = FileManager::read_to_string(&path)?;

    let provider = MockProvider::failing();
    let pipeline = TablePipeline::new(pipeline_config(100), &provider, &[]);

    assert!(pipeline.translate_file(&path, &path).await.is_err());
    assert_eq!(FileManager::read_to_string(&path)?, before);
    Ok(())
}

/// Test that a table with a bad header fails before any backend call
#[tokio::test]
async fn test_translateFile_withBadHeader_shouldNotCallBackend() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "strings.tsv", "a#b#c\n1#2#3\n")?;

    let provider = MockProvider::working();
    let pipeline = TablePipeline::new(pipeline_config(100), &provider, &[]);
    let err = pipeline.translate_file(&input, &temp_dir.path().join("out.tsv")).await.unwrap_err();

    assert!(format!("{:#}", err).contains("Table must contain columns"));
    assert_eq!(provider.call_count(), 0);
    Ok(())
}

/// Test that the in-memory form keeps blank lines and the delimiter
#[tokio::test]
async fn test_translateText_shouldKeepBlankLines() -> Result<()> {
    let table = "original_line_no|field_index|orig_text|translated_text\n\
                 1|1|长剑|\n\
                 \n\
                 2|1|盾|Shield\n";
    let config = pipeline_config(100).with_delimiter(Delimiter::new(b'|'));
    let glossary = vec![GlossaryEntry::new("长剑", "Long sword", true)];

    let provider = MockProvider::working();
    let pipeline = TablePipeline::new(config, &provider, &glossary);
    let (output, stats) = pipeline.translate_text(table).await?;

    assert_eq!(stats.rows_translated, 1);
    assert_eq!(
        output,
        "original_line_no|field_index|record_id_guess|orig_text|translated_text\n\
         1|1||长剑|[en] 长剑\n\
         \n\
         2|1||盾|Shield\n"
    );

    let reparsed = ExchangeTable::decode(&output, Delimiter::new(b'|'))?;
    assert!(reparsed.rows.iter().all(|r| !r.is_pending()));
    Ok(())
}
