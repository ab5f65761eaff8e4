//! 半行（half）の型定義
//!
//! スプレッドシートの1行には同じ6項目のブロックが左右に2つ並ぶ。
//! - RawHalf: 抽出直後の未検証データ
//! - ValidatedHalf: 検証済みの型付きデータ

use crate::cell::CellValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ブロック内の項目数
pub const HALF_WIDTH: usize = 6;

/// 1ブロックの項目（列順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HalfField {
    GroupId,
    ChestNumber,
    CandidateName,
    AssessorName,
    Grade,
    Comment,
}

impl HalfField {
    /// 列順の全項目
    pub const ALL: [HalfField; HALF_WIDTH] = [
        HalfField::GroupId,
        HalfField::ChestNumber,
        HalfField::CandidateName,
        HalfField::AssessorName,
        HalfField::Grade,
        HalfField::Comment,
    ];

    /// 必須項目
    pub const REQUIRED: [HalfField; 4] = [
        HalfField::GroupId,
        HalfField::ChestNumber,
        HalfField::Grade,
        HalfField::Comment,
    ];

    /// 整数項目
    pub const INTEGER: [HalfField; 3] = [
        HalfField::GroupId,
        HalfField::ChestNumber,
        HalfField::Grade,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HalfField::GroupId => "group_id",
            HalfField::ChestNumber => "chest_number",
            HalfField::CandidateName => "candidate_name",
            HalfField::AssessorName => "assessor_name",
            HalfField::Grade => "grade",
            HalfField::Comment => "comment",
        }
    }

    /// ブロック先頭からの列位置
    pub fn position(&self) -> usize {
        match self {
            HalfField::GroupId => 0,
            HalfField::ChestNumber => 1,
            HalfField::CandidateName => 2,
            HalfField::AssessorName => 3,
            HalfField::Grade => 4,
            HalfField::Comment => 5,
        }
    }
}

impl fmt::Display for HalfField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 左右どちらのブロックか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HalfIndex {
    First,
    Second,
}

impl HalfIndex {
    pub fn number(&self) -> u8 {
        match self {
            HalfIndex::First => 1,
            HalfIndex::Second => 2,
        }
    }
}

impl From<HalfIndex> for u8 {
    fn from(h: HalfIndex) -> Self {
        h.number()
    }
}

impl TryFrom<u8> for HalfIndex {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(HalfIndex::First),
            2 => Ok(HalfIndex::Second),
            other => Err(format!("half index must be 1 or 2, got {}", other)),
        }
    }
}

impl fmt::Display for HalfIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// 未検証の1ブロック
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHalf {
    cells: [CellValue; HALF_WIDTH],
}

impl RawHalf {
    pub fn new(cells: [CellValue; HALF_WIDTH]) -> Self {
        Self { cells }
    }

    /// 行スライスから作成（不足分は空セルで埋める）
    pub fn from_slice(values: &[CellValue]) -> Self {
        let mut cells: [CellValue; HALF_WIDTH] = Default::default();
        for (cell, value) in cells.iter_mut().zip(values) {
            *cell = value.clone();
        }
        Self { cells }
    }

    pub fn get(&self, field: HalfField) -> &CellValue {
        &self.cells[field.position()]
    }

    /// 6項目すべてが空か
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

/// 検証済みの1ブロック
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedHalf {
    pub group_id: i64,
    pub chest_number: i64,
    pub candidate_name: Option<String>,
    pub assessor_name: Option<String>,
    pub grade: i64,
    /// 未入力は空文字列（nullにはしない）
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_positions_follow_column_order() {
        for (i, field) in HalfField::ALL.iter().enumerate() {
            assert_eq!(field.position(), i);
        }
    }

    #[test]
    fn test_raw_half_pads_short_slice() {
        let raw = RawHalf::from_slice(&[CellValue::Int(5), CellValue::Int(100)]);
        assert_eq!(raw.get(HalfField::GroupId), &CellValue::Int(5));
        assert_eq!(raw.get(HalfField::ChestNumber), &CellValue::Int(100));
        assert_eq!(raw.get(HalfField::Comment), &CellValue::Empty);
        assert!(!raw.is_empty());
    }

    #[test]
    fn test_raw_half_whitespace_only_is_empty() {
        let raw = RawHalf::from_slice(&[
            CellValue::text(" "),
            CellValue::Empty,
            CellValue::text("\t"),
        ]);
        assert!(raw.is_empty());
    }

    #[test]
    fn test_half_index_serde_as_number() {
        let json = serde_json::to_string(&HalfIndex::Second).expect("シリアライズ失敗");
        assert_eq!(json, "2");
        let parsed: HalfIndex = serde_json::from_str("1").expect("デシリアライズ失敗");
        assert_eq!(parsed, HalfIndex::First);
        assert!(serde_json::from_str::<HalfIndex>("3").is_err());
    }
}
