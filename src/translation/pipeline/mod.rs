/*!
 * Translation pipeline for exchange tables.
 *
 * Drives batch planning, sequential backend calls, merging of results and
 * writing of the updated table.
 */

pub mod orchestrator;

// Re-export types used externally
pub use orchestrator::{PipelineConfig, PipelinePhase, TablePipeline, TranslationStats};
