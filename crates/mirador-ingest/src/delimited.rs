// SPDX-License-Identifier: Apache-2.0

use crate::{IngestError, SourceSpec};
use std::fs;

/// A decoded delimited source: one header row plus data rows, all text.
/// Typed mapping happens one layer up; nothing downstream touches columns
/// by name.
#[derive(Debug, Clone, Default)]
pub struct DelimitedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DelimitedTable {
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolves every required column or fails naming the first missing one.
    pub fn require_columns(&self, required: &[&str]) -> Result<Vec<usize>, IngestError> {
        required
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| IngestError(format!("missing required column: {name}")))
            })
            .collect()
    }

    /// Cell text by index; rows shorter than the header read as empty cells.
    #[must_use]
    pub fn cell<'a>(&self, row: &'a [String], index: usize) -> &'a str {
        row.get(index).map_or("", |cell| cell.as_str())
    }
}

pub fn read_delimited(spec: &SourceSpec) -> Result<DelimitedTable, IngestError> {
    let bytes = fs::read(&spec.path)
        .map_err(|e| IngestError(format!("unreadable source {}: {e}", spec.path.display())))?;
    let text = spec.encoding.decode(&bytes);
    parse_delimited(&text, spec.delimiter)
}

pub fn parse_delimited(text: &str, delimiter: char) -> Result<DelimitedTable, IngestError> {
    let mut lines = text.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| IngestError("empty source: no header row".to_string()))?;
    let header_line = header_line.strip_prefix('\u{feff}').unwrap_or(header_line);

    let headers: Vec<String> = split_record(header_line, delimiter)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError("empty source: blank header row".to_string()));
    }

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(split_record(line, delimiter));
    }
    Ok(DelimitedTable { headers, rows })
}

// Quote-aware field split: double quotes wrap a field, doubled quotes inside
// a quoted field escape a literal quote. Carriage returns from CRLF sources
// are trimmed off the final field.
fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' && current.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if current.ends_with('\r') {
        current.pop();
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceEncoding;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn parses_header_and_rows() {
        let table = parse_delimited("a;b;c\n1;2;3\n4;5;6\n", ';').expect("parse");
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters_and_quotes() {
        let table = parse_delimited("name,desc\n\"Quito, centro\",\"say \"\"hi\"\"\"\n", ',')
            .expect("parse");
        assert_eq!(table.rows[0], vec!["Quito, centro", "say \"hi\""]);
    }

    #[test]
    fn strips_bom_and_carriage_returns() {
        let table = parse_delimited("\u{feff}a;b\r\n1;2\r\n", ';').expect("parse");
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn require_columns_names_the_missing_one() {
        let table = parse_delimited("Provincia;Arma\nX;Y\n", ';').expect("parse");
        let err = table.require_columns(&["Provincia", "Sexo"]).unwrap_err();
        assert!(err.0.contains("Sexo"), "got: {}", err.0);
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let table = parse_delimited("a;b;c\n1;2\n", ';').expect("parse");
        assert_eq!(table.cell(&table.rows[0], 2), "");
    }

    #[test]
    fn read_delimited_reports_unreadable_paths() {
        let spec = SourceSpec {
            path: PathBuf::from("/nonexistent/source.csv"),
            delimiter: ';',
            encoding: SourceEncoding::Utf8,
        };
        let err = read_delimited(&spec).unwrap_err();
        assert!(err.0.contains("unreadable source"));
    }

    #[test]
    fn read_delimited_decodes_the_declared_encoding() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("h.csv");
        std::fs::write(&path, b"EVENTO\nINTOXICACI\xD3N\n").expect("write fixture");
        let table = read_delimited(&SourceSpec {
            path,
            delimiter: ';',
            encoding: SourceEncoding::Latin1,
        })
        .expect("read");
        assert_eq!(table.rows[0][0], "INTOXICACIÓN");
    }
}
