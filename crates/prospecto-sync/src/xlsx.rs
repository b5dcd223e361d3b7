use crate::error::{Result, SyncError};
use crate::tabular::{Cell, Row};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads the first worksheet, first record as headers. Fully blank records
/// are dropped; uploads routinely carry trailing formatted-but-empty rows.
pub fn read_xlsx(path: &Path) -> Result<Vec<Row>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|err| SyncError::Parse(format!("open workbook: {err}")))?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(SyncError::Parse("workbook has no sheets".to_string()));
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| SyncError::Parse(format!("read sheet {sheet_name}: {err}")))?;

    let mut records = range.rows();
    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(|cell| to_cell(cell).as_text()).collect();

    let mut rows = Vec::new();
    for record in records {
        let mut row = Row::new();
        let mut blank = true;
        for (index, header) in headers.iter().enumerate() {
            let cell = record.get(index).map(to_cell).unwrap_or(Cell::Empty);
            if !cell.is_blank() {
                blank = false;
            }
            row.push(header.clone(), cell);
        }
        if !blank {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::Error(err) => Cell::Text(format!("#ERR({err:?})")),
        Data::DateTime(value) => Cell::Text(value.to_string()),
        Data::DateTimeIso(value) => Cell::Text(value.clone()),
        Data::DurationIso(value) => Cell::Text(value.clone()),
    }
}
