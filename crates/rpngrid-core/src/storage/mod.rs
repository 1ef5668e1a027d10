//! Sheet input parsing and value output.

mod parser;
mod writer;

pub use parser::{parse_sheet, parse_sheet_content, parse_sheet_reader};
pub use writer::{DEFAULT_PRECISION, OutputFormat, render_values, write_values};
