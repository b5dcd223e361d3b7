use crate::error::{Result, SyncError};
use crate::tabular::{Cell, Row};

/// Parses CSV text into header-keyed rows. First record is the header row;
/// fully blank records are skipped; short records pad with empty cells.
pub fn parse_csv(data: &str) -> Result<Vec<Row>> {
    let mut records = parse_records(data)?.into_iter();
    let Some(headers) = records.next() else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for record in records {
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut row = Row::new();
        for (index, header) in headers.iter().enumerate() {
            let value = record.get(index).cloned().unwrap_or_default();
            let cell = if value.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(value)
            };
            row.push(header.clone(), cell);
        }
        rows.push(row);
    }
    Ok(rows)
}

// RFC 4180-ish: quoted fields may contain commas and newlines, a doubled
// quote inside a quoted field is a literal quote, CRLF and LF both end
// records.
fn parse_records(data: &str) -> Result<Vec<Vec<String>>> {
    let data = data.strip_prefix('\u{feff}').unwrap_or(data);

    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = data.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                if record.len() > 1 || !record[0].is_empty() {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            other => field.push(other),
        }
    }

    if in_quotes {
        return Err(SyncError::Parse("unterminated quoted field".to_string()));
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::parse_csv;
    use crate::error::SyncError;
    use crate::tabular::Cell;

    fn text(row: &crate::tabular::Row, index: usize) -> String {
        row.cells()[index].1.as_text()
    }

    #[test]
    fn parses_headers_and_rows() {
        let rows = parse_csv("Nombre,Telefono\nana,5551112222\nluis,5553334444\n")
            .expect("parse csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells()[0].0, "Nombre");
        assert_eq!(text(&rows[0], 0), "ana");
        assert_eq!(text(&rows[1], 1), "5553334444");
    }

    #[test]
    fn quoted_fields_keep_commas_and_escaped_quotes() {
        let rows = parse_csv("Name,Notes\n\"Doe, Jane\",\"says \"\"maybe\"\"\"\n")
            .expect("parse csv");
        assert_eq!(text(&rows[0], 0), "Doe, Jane");
        assert_eq!(text(&rows[0], 1), "says \"maybe\"");
    }

    #[test]
    fn quoted_fields_may_span_lines() {
        let rows = parse_csv("Name,Notes\nana,\"line one\nline two\"\n").expect("parse csv");
        assert_eq!(text(&rows[0], 1), "line one\nline two");
    }

    #[test]
    fn handles_crlf_and_missing_final_newline() {
        let rows = parse_csv("Name\r\nana\r\nluis").expect("parse csv");
        assert_eq!(rows.len(), 2);
        assert_eq!(text(&rows[1], 0), "luis");
    }

    #[test]
    fn skips_blank_records_and_pads_short_ones() {
        let rows = parse_csv("Name,Phone\n\n,\nana\n").expect("parse csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(text(&rows[0], 0), "ana");
        assert_eq!(rows[0].cells()[1].1, Cell::Empty);
    }

    #[test]
    fn strips_utf8_bom() {
        let rows = parse_csv("\u{feff}Name\nana\n").expect("parse csv");
        assert_eq!(rows[0].cells()[0].0, "Name");
    }

    #[test]
    fn unterminated_quote_is_a_parse_error() {
        let err = parse_csv("Name\n\"ana\n").expect_err("should fail");
        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse_csv("").expect("parse csv").is_empty());
        assert!(parse_csv("Name,Phone\n").expect("parse csv").is_empty());
    }
}
