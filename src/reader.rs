//! スプレッドシート読み込み
//!
//! calamine でシートを読み、Excelと同じ行番号・列位置を保ったまま `SheetRow` にする。
//! 使用範囲がA1から始まっていなくても、先頭の空行・空列を補って絶対位置を合わせる。

use crate::error::{ImportError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use eval_import_common::{CellValue, SheetRow};
use std::path::Path;

/// calamine のセルを `CellValue` に変換
pub fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

/// 範囲を行に変換
pub fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    let (start_row, start_col) = match range.start() {
        Some(start) => start,
        None => return Vec::new(),
    };

    range
        .rows()
        .enumerate()
        .map(|(i, cells)| {
            let mut values = vec![CellValue::Empty; start_col as usize];
            values.extend(cells.iter().map(cell_from_data));
            // calamine は0始まり、Excelの行番号は1始まり
            SheetRow::new(start_row + i as u32 + 1, values)
        })
        .collect()
}

/// ワークブックを読み込み
///
/// シート名省略時はブック内の先頭シートを読む。Excelで最後に開いていた
/// アクティブシートは calamine から取れないため使わない。
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<Vec<SheetRow>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ImportError::SpreadsheetRead(format!("{}: {}", path.display(), e)))?;

    let range = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(ImportError::SheetNotFound(name.to_string()));
            }
            workbook
                .worksheet_range(name)
                .map_err(|e| ImportError::SpreadsheetRead(format!("{}: {}", name, e)))?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::SheetNotFound("(先頭シート)".to_string()))?
            .map_err(|e| ImportError::SpreadsheetRead(e.to_string()))?,
    };

    let rows = rows_from_range(&range);
    log::debug!("{}: {}行を読み込み", path.display(), rows.len());
    Ok(rows)
}
