//! Writers for evaluated sheets

use crate::error::Result;
use rpngrid_engine::engine::EvaluatedGrid;
use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;

/// Decimal places used when none are configured.
pub const DEFAULT_PRECISION: usize = 5;

/// How computed values are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<columns> <rows>` header, then one value per line in row-major order.
    #[default]
    Text,
    /// One comma separated line per row.
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render evaluated values to a string
pub fn render_values(grid: &EvaluatedGrid, format: OutputFormat, precision: usize) -> String {
    let mut out = String::new();
    match format {
        OutputFormat::Text => {
            let _ = writeln!(out, "{} {}", grid.cols(), grid.rows());
            for value in grid.values() {
                let _ = writeln!(out, "{:.*}", precision, value);
            }
        }
        OutputFormat::Csv => {
            for row in grid.rows_iter() {
                let line: Vec<String> = row.iter().map(|v| format!("{:.*}", precision, v)).collect();
                out.push_str(&line.join(","));
                out.push('\n');
            }
        }
    }
    out
}

/// Write evaluated values to any writer
pub fn write_values<W: Write>(
    out: &mut W,
    grid: &EvaluatedGrid,
    format: OutputFormat,
    precision: usize,
) -> Result<()> {
    out.write_all(render_values(grid, format, precision).as_bytes())?;
    out.flush()?;
    Ok(())
}
