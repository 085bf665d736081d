/*!
 * Tests for pre-flight cost estimation over table text
 */

use loctool::exchange_table::Delimiter;
use loctool::translation::estimate::{compute_stats_from_text, CostEstimate, TableStats};

/// Test that only pending rows are counted, by characters
#[test]
fn test_computeStatsFromText_shouldCountPendingCharacters() {
    let raw = "original_line_no#field_index#orig_text#translated_text\n\
               1#1#长剑#\n\
               2#1#盾#Shield\n\
               \n\
               x#1#skipped#\n\
               3#1#abc#";

    let stats = compute_stats_from_text(raw, Delimiter::default()).unwrap();

    assert_eq!(stats, TableStats { total_chars: 5, pending_rows: 2 });
}

/// Test that a table without the required columns cannot be estimated
#[test]
fn test_computeStatsFromText_withBadHeader_shouldFail() {
    assert!(compute_stats_from_text("a#b\n1#2", Delimiter::default()).is_err());
}

/// Test the request projection for a table read from text
#[test]
fn test_costEstimate_fromTableText_shouldProjectRequests() {
    let mut raw = String::from("original_line_no;field_index;orig_text;translated_text\n");
    for i in 1..=30 {
        raw.push_str(&format!("{};1;{};\n", i, "字".repeat(10)));
    }
    let stats = compute_stats_from_text(&raw, Delimiter::new(b';')).unwrap();

    let estimate = CostEstimate::new(stats, 100, Some(500.0));

    assert_eq!(estimate.stats.total_chars, 300);
    assert_eq!(estimate.batches, 3);
    assert!((estimate.exact_cost.unwrap() - 0.15).abs() < 1e-9);
}
