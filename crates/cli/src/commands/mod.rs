//! CLI commands for the collection and signal pipeline.

pub mod analyze;
pub mod process;
pub mod run;
pub mod scrape;

pub use analyze::{run_analyze, AnalyzeArgs};
pub use process::{run_process, ProcessArgs};
pub use run::{run_pipeline, RunArgs};
pub use scrape::{run_scrape, ScrapeArgs};
