//! Report file ingestion.
//!
//! Dialect sniffing, bounded sample reads for detection, and full loads
//! into all-string Polars DataFrames for transformation.

pub mod cells;
pub mod dialect;
pub mod reader;
pub mod sample;

pub use cells::{cell_f64, cell_str, format_amount, is_missing};
pub use dialect::{Dialect, SNIFF_BYTES, sniff_path, sniff_sample};
pub use reader::read_frame;
pub use sample::{SampleTable, read_sample};
