/*!
 * Translation of exchange table rows.
 *
 * - `batch`: Selection of pending rows and greedy batch planning
 * - `estimate`: Character statistics and cost estimation
 * - `pipeline`: Sequential batch translation of a table
 */

// Re-export main types for easier usage
pub use self::batch::{plan_batches, select_pending, Batch};
pub use self::estimate::{CostEstimate, TableStats};
pub use self::pipeline::{PipelineConfig, TablePipeline, TranslationStats};

// Submodules
pub mod batch;
pub mod estimate;
pub mod pipeline;
