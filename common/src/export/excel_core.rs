//! Excel生成（共通ライブラリ）
//!
//! report.rs の表定義を1表1シートのワークブックとして書き出す

use crate::error::{Error, Result};
use crate::report::{ReportCell, ReportTable};
use crate::splitter::MAX_COLUMNS;
use rust_xlsxwriter::*;
use std::path::Path;

/// 列幅の上限（文字数）
const MAX_COL_WIDTH: f64 = 60.0;

/// 列番号を xlsx の列に変換（最終列を超える場合はエラー）
fn column(col: usize) -> std::result::Result<u16, String> {
    if col >= MAX_COLUMNS {
        return Err(format!("列数がシートの上限 {} を超えています: {}", MAX_COLUMNS, col + 1));
    }
    u16::try_from(col).map_err(|e| format!("列番号変換エラー: {}", e))
}

fn cell_width(cell: &ReportCell) -> usize {
    match cell {
        ReportCell::Empty => 0,
        ReportCell::Int(i) => i.to_string().len(),
        ReportCell::Text(s) => s.chars().count(),
    }
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `tables` - シートごとの表（表の名前がシート名になる）
pub fn generate_report_buffer(tables: &[ReportTable]) -> std::result::Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    // フォーマット定義
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&table.name)
            .map_err(|e| format!("シート名設定エラー: {}", e))?;

        let mut widths: Vec<usize> = table.header.iter().map(|h| h.chars().count()).collect();

        for (col, title) in table.header.iter().enumerate() {
            worksheet.write_string_with_format(0, column(col)?, title, &header_format)
                .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
        }

        for (i, cells) in table.rows.iter().enumerate() {
            let row = (i + 1) as u32;
            for (col, cell) in cells.iter().enumerate() {
                let col_num = column(col)?;
                match cell {
                    ReportCell::Empty => {}
                    ReportCell::Int(v) => {
                        worksheet.write_number(row, col_num, *v as f64)
                            .map_err(|e| format!("数値書き込みエラー: {}", e))?;
                    }
                    ReportCell::Text(s) => {
                        worksheet.write_string(row, col_num, s)
                            .map_err(|e| format!("文字列書き込みエラー: {}", e))?;
                    }
                }
                if col >= widths.len() {
                    widths.resize(col + 1, 0);
                }
                widths[col] = widths[col].max(cell_width(cell));
            }
        }

        for (col, width) in widths.iter().enumerate() {
            if *width == 0 {
                continue;
            }
            let width = (*width as f64 + 2.0).min(MAX_COL_WIDTH);
            worksheet.set_column_width(column(col)?, width)
                .map_err(|e| format!("列幅設定エラー: {}", e))?;
        }

        worksheet.set_freeze_panes(1, 0)
            .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

/// ワークブックを生成してファイルに保存（親ディレクトリがなければ作成）
pub fn save_report(path: &Path, tables: &[ReportTable]) -> Result<()> {
    let buffer = generate_report_buffer(tables).map_err(Error::Report)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, buffer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::validation_errors_table;
    use crate::half::HalfIndex;
    use crate::validator::ValidationError;

    #[test]
    fn test_generate_report_buffer_not_empty() {
        let errors = vec![ValidationError::new(2, HalfIndex::First, "grade", "missing required field")];
        let buffer = generate_report_buffer(&[validation_errors_table(&errors)]).expect("Excel生成失敗");
        // xlsx は zip なので "PK" で始まる
        assert!(buffer.starts_with(b"PK"));
    }

    #[test]
    fn test_column_limit() {
        assert_eq!(column(0), Ok(0));
        assert_eq!(column(MAX_COLUMNS - 1), Ok(16_383));
        assert!(column(MAX_COLUMNS).is_err());
        assert!(column(usize::MAX).is_err());
    }

    #[test]
    fn test_table_wider_than_sheet_is_rejected() {
        let mut table = validation_errors_table(&[]);
        table.header = (0..=MAX_COLUMNS).map(|i| format!("c{}", i)).collect();
        assert!(generate_report_buffer(&[table]).is_err());
    }

    #[test]
    fn test_generate_report_buffer_empty_table() {
        let buffer = generate_report_buffer(&[validation_errors_table(&[])]).expect("Excel生成失敗");
        assert!(!buffer.is_empty());
    }
}
