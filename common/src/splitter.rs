//! 行分割
//!
//! 1行を左右2つのブロックに分け、空でないブロックだけを返す。
//! 左ブロックはA〜F列、右ブロックは `half2_offset` 列目から6列（既定15: P〜U列）。

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::half::{HalfIndex, RawHalf, HALF_WIDTH};

/// 右ブロックの既定開始列（0始まり）
pub const DEFAULT_HALF2_OFFSET: usize = 15;

/// 先頭のデータ行（1行目はヘッダー）
pub const FIRST_DATA_ROW: u32 = 2;

/// xlsx の最大列数（A〜XFD）
pub const MAX_COLUMNS: usize = 16_384;

/// 右ブロックの開始列が左ブロックと重ならず、シートの列数に収まるか確認
pub fn check_half2_offset(half2_offset: usize) -> Result<()> {
    if half2_offset < HALF_WIDTH {
        return Err(Error::Config(format!(
            "half2 offset {} overlaps the first half (columns 0..{})",
            half2_offset, HALF_WIDTH
        )));
    }
    if half2_offset > MAX_COLUMNS - HALF_WIDTH {
        return Err(Error::Config(format!(
            "half2 offset {} puts the second half past the last sheet column ({})",
            half2_offset, MAX_COLUMNS
        )));
    }
    Ok(())
}

/// シートの1行（行番号はExcelと同じ1始まり、セルは絶対列位置）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetRow {
    pub number: u32,
    pub cells: Vec<CellValue>,
}

impl SheetRow {
    pub fn new(number: u32, cells: Vec<CellValue>) -> Self {
        Self { number, cells }
    }
}

/// 分割後のブロック
#[derive(Debug, Clone, PartialEq)]
pub struct SplitHalf {
    pub row_number: u32,
    pub half_index: HalfIndex,
    pub raw: RawHalf,
}

fn slice_half(cells: &[CellValue], start: usize) -> RawHalf {
    let end = start.saturating_add(HALF_WIDTH).min(cells.len());
    if start >= end {
        return RawHalf::default();
    }
    RawHalf::from_slice(&cells[start..end])
}

/// 1行を分割（空ブロックは除外）
pub fn split_row(row: &SheetRow, half2_offset: usize) -> Vec<SplitHalf> {
    let halves = [
        (HalfIndex::First, slice_half(&row.cells, 0)),
        (HalfIndex::Second, slice_half(&row.cells, half2_offset)),
    ];

    halves
        .into_iter()
        .filter(|(_, raw)| !raw.is_empty())
        .map(|(half_index, raw)| SplitHalf {
            row_number: row.number,
            half_index,
            raw,
        })
        .collect()
}

/// 全行を分割
///
/// `first_data_row` より前の行（ヘッダー）は読み飛ばす。
pub fn split_rows(rows: &[SheetRow], half2_offset: usize, first_data_row: u32) -> Vec<SplitHalf> {
    rows.iter()
        .filter(|row| row.number >= first_data_row)
        .flat_map(|row| split_row(row, half2_offset))
        .collect()
}
