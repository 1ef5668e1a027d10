//! Parser for the sheet input format.
//!
//! ```text
//! 3 2
//! B1
//! 4 5 *
//! A1
//! A1 B2 / 2 +
//! 3
//! 39 A2 B2 * /
//! ```
//!
//! The header is `<columns> <rows>`; it is followed by one line per cell in
//! row-major order.

use crate::error::{Result, RpnGridError};
use rpngrid_engine::engine::Grid;
use std::fs;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

/// Parse a sheet file and return a Grid
pub fn parse_sheet(path: &Path) -> Result<Grid> {
    let content = fs::read_to_string(path)?;
    parse_sheet_content(&content)
}

/// Parse a sheet from any buffered reader (e.g. stdin)
pub fn parse_sheet_reader<R: BufRead>(mut reader: R) -> Result<Grid> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_sheet_content(&content)
}

/// Parse sheet content from a string
pub fn parse_sheet_content(content: &str) -> Result<Grid> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')));

    let Some((header_line, header)) = lines.by_ref().find(|(_, line)| !line.trim().is_empty())
    else {
        return Err(RpnGridError::Parse {
            line: 1,
            message: "Missing '<columns> <rows>' header".to_string(),
        });
    };
    let (cols, rows) = parse_header(header, header_line)?;

    let expected = rows.checked_mul(cols).ok_or_else(|| RpnGridError::Parse {
        line: header_line,
        message: format!("Grid of {} x {} cells is too large", cols, rows),
    })?;

    let mut contents = Vec::with_capacity(expected.min(1 << 20));
    for (line_num, line) in lines.by_ref().take(expected) {
        if line.trim().is_empty() {
            return Err(RpnGridError::Parse {
                line: line_num,
                message: format!("Cell {} has no content", contents.len() + 1),
            });
        }
        contents.push(line.to_string());
    }

    if contents.len() != expected {
        return Err(RpnGridError::Parse {
            line: header_line + contents.len() + 1,
            message: format!("Expected {} cells, found {}", expected, contents.len()),
        });
    }

    let trailing = lines.filter(|(_, line)| !line.trim().is_empty()).count();
    if trailing > 0 {
        warn!(trailing, "ignoring lines after the last cell");
    }

    debug!(rows, cols, "parsed sheet");
    Ok(Grid::new(rows, cols, contents)?)
}

fn parse_header(header: &str, line: usize) -> Result<(usize, usize)> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    let [cols, rows] = parts[..] else {
        return Err(RpnGridError::Parse {
            line,
            message: "Expected '<columns> <rows>' header".to_string(),
        });
    };

    let parse_dim = |value: &str, what: &str| {
        value.parse::<usize>().map_err(|_| RpnGridError::Parse {
            line,
            message: format!("Invalid {} count: {}", what, value),
        })
    };

    Ok((parse_dim(cols, "column")?, parse_dim(rows, "row")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpngrid_engine::engine::CellRef;

    #[test]
    fn test_parse_header_is_columns_then_rows() {
        let grid = parse_sheet_content("3 2\n1\n2\n3\n4\n5\n6\n").unwrap();
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.rows(), 2);
        let cell = grid.get(&CellRef::new(0, 1)).unwrap();
        assert_eq!(cell.content(), "4");
    }

    #[test]
    fn test_parse_keeps_expressions_verbatim() {
        let grid = parse_sheet_content("1 2\nA2 3 *\n  4 5 +  \n").unwrap();
        assert_eq!(grid.get(&CellRef::new(0, 0)).unwrap().content(), "A2 3 *");
        assert_eq!(grid.get(&CellRef::new(0, 1)).unwrap().content(), "  4 5 +  ");
    }

    #[test]
    fn test_parse_crlf() {
        let grid = parse_sheet_content("1 1\r\n7\r\n").unwrap();
        assert_eq!(grid.get(&CellRef::new(0, 0)).unwrap().content(), "7");
    }

    #[test]
    fn test_missing_header() {
        let err = parse_sheet_content("\n\n").unwrap_err();
        assert!(matches!(err, RpnGridError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_bad_header() {
        let err = parse_sheet_content("3\n1\n").unwrap_err();
        assert!(matches!(err, RpnGridError::Parse { line: 1, .. }));

        let err = parse_sheet_content("x 2\n").unwrap_err();
        match err {
            RpnGridError::Parse { message, .. } => assert_eq!(message, "Invalid column count: x"),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_read() {
        let err = parse_sheet_content("2 2\n1\n2\n3\n").unwrap_err();
        match err {
            RpnGridError::Parse { line, message } => {
                assert_eq!(line, 5);
                assert_eq!(message, "Expected 4 cells, found 3");
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_cell_line() {
        let err = parse_sheet_content("2 1\n1\n\n").unwrap_err();
        assert!(matches!(err, RpnGridError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_trailing_lines_ignored() {
        let grid = parse_sheet_content("1 1\n5\nextra\n").unwrap();
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_parse_sheet_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.txt");
        fs::write(&path, "2 1\n3\nA1 ++\n").unwrap();
        let grid = parse_sheet(&path).unwrap();
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_parse_sheet_reader() {
        let grid = parse_sheet_reader("1 1\n42\n".as_bytes()).unwrap();
        assert_eq!(grid.get(&CellRef::new(0, 0)).unwrap().content(), "42");
    }
}
