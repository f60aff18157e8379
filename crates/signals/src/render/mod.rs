//! Presentation of signal sequences.
//!
//! Both renderers downsample with a configurable seed before output.

mod csv_export;
mod terminal;

pub use csv_export::CsvRenderer;
pub use terminal::{sparkline, TerminalRenderer};
