/*!
 * Full app lifecycle tests.
 *
 * Drives the controller commands end to end over temporary files, with the
 * mock provider standing in for the translation backend.
 */

use anyhow::Result;
use loctool::app_controller::Controller;
use loctool::exchange_table::{Delimiter, ExchangeTable};
use loctool::file_utils::FileManager;
use loctool::providers::mock::MockProvider;
use crate::common;

fn uppercase_tag(text: &str, _target: &str) -> String {
    format!("EN({})", text)
}

/// Test that extract, translate and apply produce a translated asset
#[tokio::test]
async fn test_extractTranslateApply_shouldTranslateAsset() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let asset = common::create_test_asset(temp_dir.path(), "input.txt")?;
    let table = temp_dir.path().join("strings.tsv");
    let table_out = temp_dir.path().join("strings_out.tsv");
    let output = temp_dir.path().join("output.txt");

    let controller = Controller::with_config(common::test_config())?;
    let provider = MockProvider::working().with_custom_response(uppercase_tag);

    controller.extract(&asset, &table)?;
    let stats = controller.translate_with(&provider, &table, &table_out, None).await?;
    controller.apply(&asset, &table_out, &output, false)?;

    assert_eq!(stats.rows_translated, 5);
    assert_eq!(
        FileManager::read_to_string(&output)?,
        "1001#EN(长剑)#Long sword#EN(一把锋利的剑)\n\
         1002#EN(盾)#Shield#\n\
         note#plain ascii only\n\
         1003#EN(药水)#Potion#EN(恢复生命)"
    );
    Ok(())
}

/// Test that the one-pass command matches the step-by-step result
#[test]
fn test_all_shouldMatchStepByStepResult() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let asset = common::create_test_asset(temp_dir.path(), "input.txt")?;
    let output = temp_dir.path().join("output.txt");

    let controller = Controller::with_config(common::test_config())?;
    let provider = MockProvider::working().with_custom_response(uppercase_tag);
    tokio_test::block_on(controller.all_with(&provider, &asset, &output, None))?;

    let translated = FileManager::read_to_string(&output)?;
    assert!(translated.starts_with("1001#EN(长剑)#Long sword#EN(一把锋利的剑)\n"));
    assert!(translated.ends_with("1003#EN(药水)#Potion#EN(恢复生命)"));
    assert_eq!(provider.call_count(), 1);
    Ok(())
}

/// Test that a small budget splits the run into several sequential batches
#[tokio::test]
async fn test_translate_withSmallBudget_shouldSendSeveralBatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let asset = common::create_test_asset(temp_dir.path(), "input.txt")?;
    let table = temp_dir.path().join("strings.tsv");
    let table_out = temp_dir.path().join("strings_out.tsv");

    let mut config = common::test_config();
    config.limits.max_chars_per_request = 4;
    let controller = Controller::with_config(config)?;
    let provider = MockProvider::working();

    controller.extract(&asset, &table)?;
    let stats = controller.translate_with(&provider, &table, &table_out, None).await?;

    // 长剑(2) 一把锋利的剑(6) 盾(1) 药水(2) 恢复生命(4)
    assert_eq!(
        provider.received_batches(),
        vec![
            vec!["长剑".to_string()],
            vec!["一把锋利的剑".to_string()],
            vec!["盾".to_string(), "药水".to_string()],
            vec!["恢复生命".to_string()],
        ]
    );
    assert_eq!(stats.completed_batches, 4);
    Ok(())
}

/// Test that a backend failure leaves no output table behind
#[tokio::test]
async fn test_translate_withFailingBackend_shouldLeaveNoOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let asset = common::create_test_asset(temp_dir.path(), "input.txt")?;
    let table = temp_dir.path().join("strings.tsv");
    let table_out = temp_dir.path().join("strings_out.tsv");

    let mut config = common::test_config();
    config.limits.max_chars_per_request = 4;
    let controller = Controller::with_config(config)?;
    let provider = MockProvider::failing_on_call(2);

    controller.extract(&asset, &table)?;
    let result = controller.translate_with(&provider, &table, &table_out, None).await;

    assert!(result.is_err());
    assert!(!table_out.exists());
    Ok(())
}

/// Test that the glossary override is loaded and bounded
#[test]
fn test_loadGlossary_withOverride_shouldApplyLimit() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let pairs: Vec<String> = (0..80)
        .map(|i| format!(r#"{{"src":"词{}","dst":"word{}"}}"#, i, i))
        .collect();
    let glossary_path = common::create_test_file(temp_dir.path(), "glossary.json", &format!("[{}]", pairs.join(",")))?;

    let controller = Controller::with_config(common::test_config())?;
    let glossary = controller.load_glossary(Some(&glossary_path));

    assert_eq!(glossary.len(), 50);
    assert_eq!(glossary[0].source, "词0");
    assert_eq!(glossary[49].target, "word49");
    Ok(())
}

/// Test that the configured delimiter is used for the extracted table
#[test]
fn test_extract_withTabDelimiter_shouldWriteTabTable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let asset = common::create_test_asset(temp_dir.path(), "input.txt")?;
    let table = temp_dir.path().join("strings.tsv");

    let mut config = common::test_config();
    config.delimiter = "tab".to_string();
    let controller = Controller::with_config(config)?;
    controller.extract(&asset, &table)?;

    let text = FileManager::read_to_string(&table)?;
    let decoded = ExchangeTable::decode(&text, Delimiter::new(b'\t'))?;
    assert_eq!(decoded.rows.len(), 5);
    Ok(())
}

/// Test that the estimate reads the table without calling any backend
#[test]
fn test_estimate_shouldCountPendingCharacters() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let table = common::create_test_table(temp_dir.path(), "strings.tsv", &[(1, 1, "长剑", ""), (2, 1, "盾", "Shield")])?;

    let controller = Controller::with_config(common::test_config())?;
    let estimate = controller.estimate(&table, Some(1_000_000.0))?;

    assert_eq!(estimate.stats.total_chars, 2);
    assert_eq!(estimate.stats.pending_rows, 1);
    assert_eq!(estimate.batches, 1);
    assert!((estimate.exact_cost.unwrap() - 2.0).abs() < 1e-9);
    Ok(())
}

/// Test that a price given on the command line is checked like the configured one
#[test]
fn test_estimate_withNegativePriceOverride_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let table = common::create_test_table(temp_dir.path(), "strings.tsv", &[(1, 1, "长剑", "")])?;
    let mut config = common::test_config();
    config.price_per_million = Some(20.0);
    let controller = Controller::with_config(config)?;

    let err = controller.estimate(&table, Some(-5.0)).unwrap_err();
    assert!(err.to_string().contains("price_per_million must be non-negative"));

    let estimate = controller.estimate(&table, None)?;
    assert!((estimate.exact_cost.unwrap() - 20.0 * 2.0 / 1_000_000.0).abs() < 1e-12);
    Ok(())
}
