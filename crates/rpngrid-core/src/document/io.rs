use super::Document;
use crate::error::{Result, RpnGridError};
use crate::storage::{OutputFormat, parse_sheet_content, parse_sheet_reader, write_values};
use rpngrid_engine::engine::EvaluatedGrid;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

const MAX_SHEET_FILE_BYTES: u64 = 64 * 1_048_576; // 64 MiB

impl Document {
    /// Parse a document from sheet text.
    pub fn from_content(content: &str) -> Result<Self> {
        Ok(Document::from_grid(parse_sheet_content(content)?))
    }

    /// Parse a document from a reader such as stdin.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Ok(Document::from_grid(parse_sheet_reader(reader)?))
    }

    /// Load a document from a sheet file.
    pub fn load(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_SHEET_FILE_BYTES {
            return Err(RpnGridError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: sheet too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_SHEET_FILE_BYTES
                ),
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut doc = Self::from_content(&content)?;
        doc.file_path = Some(path.to_path_buf());
        info!(path = %path.display(), rows = doc.rows(), cols = doc.cols(), "loaded sheet");
        Ok(doc)
    }

    /// Write evaluated values to a file.
    pub fn export(
        path: &Path,
        values: &EvaluatedGrid,
        format: OutputFormat,
        precision: usize,
    ) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        write_values(&mut file, values, format, precision)
    }
}
