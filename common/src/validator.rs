//! ブロック単位の入力検証
//!
//! 必須項目と整数項目をすべてチェックし、エラーはまとめて返す（最初の1件で止めない）。

use crate::cell::CoerceError;
use crate::half::{HalfField, HalfIndex, RawHalf, ValidatedHalf};
use serde::{Deserialize, Serialize};

pub const MSG_MISSING_REQUIRED: &str = "missing required field";
pub const MSG_NOT_INTEGER: &str = "must be an integer";

/// 6項目のどれにも該当しないレコード単位のエラーに付ける項目名
pub const RECORD_FIELD: &str = "__record__";

/// 検証エラー（1件 = 1項目）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row_number: u32,
    pub half: HalfIndex,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(
        row_number: u32,
        half: HalfIndex,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row_number,
            half,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 1ブロックを検証
pub fn validate_half(
    raw: &RawHalf,
    row_number: u32,
    half: HalfIndex,
) -> Result<ValidatedHalf, Vec<ValidationError>> {
    let mut errors = Vec::new();

    for field in HalfField::REQUIRED {
        if raw.get(field).is_blank() {
            errors.push(ValidationError::new(row_number, half, field.name(), MSG_MISSING_REQUIRED));
        }
    }

    // 空欄は必須チェック側で報告済み
    for field in HalfField::INTEGER {
        if let Err(CoerceError::NotInteger) = raw.get(field).to_int() {
            errors.push(ValidationError::new(row_number, half, field.name(), MSG_NOT_INTEGER));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    build_record(raw).map_err(|message| {
        vec![ValidationError::new(row_number, half, RECORD_FIELD, message)]
    })
}

fn build_record(raw: &RawHalf) -> Result<ValidatedHalf, String> {
    let int = |field: HalfField| {
        raw.get(field)
            .to_int()
            .map_err(|e| format!("{}: cannot build integer ({:?})", field, e))
    };
    let text = |field: HalfField| {
        raw.get(field)
            .to_text()
            .map_err(|e| format!("{}: {}", field, e))
    };

    Ok(ValidatedHalf {
        group_id: int(HalfField::GroupId)?,
        chest_number: int(HalfField::ChestNumber)?,
        candidate_name: text(HalfField::CandidateName)?,
        assessor_name: text(HalfField::AssessorName)?,
        grade: int(HalfField::Grade)?,
        comment: text(HalfField::Comment)?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    fn cells(values: [CellValue; 6]) -> RawHalf {
        RawHalf::new(values)
    }

    fn valid_raw() -> RawHalf {
        cells([
            CellValue::Int(5),
            CellValue::Int(100),
            CellValue::text("דני"),
            CellValue::text("רון"),
            CellValue::Int(8),
            CellValue::text("ok"),
        ])
    }

    #[test]
    fn test_valid_half() {
        let half = validate_half(&valid_raw(), 2, HalfIndex::First).expect("検証失敗");
        assert_eq!(half.group_id, 5);
        assert_eq!(half.chest_number, 100);
        assert_eq!(half.candidate_name.as_deref(), Some("דני"));
        assert_eq!(half.grade, 8);
        assert_eq!(half.comment, "ok");
    }

    #[test]
    fn test_one_error_per_missing_required_field() {
        let raw = cells([
            CellValue::Empty,
            CellValue::text("  "),
            CellValue::text("name"),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Empty,
        ]);
        let errors = validate_half(&raw, 7, HalfIndex::Second).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["group_id", "chest_number", "grade", "comment"]);
        assert!(errors.iter().all(|e| e.message == MSG_MISSING_REQUIRED));
        assert!(errors.iter().all(|e| e.row_number == 7 && e.half == HalfIndex::Second));
    }

    #[test]
    fn test_float_string_coerces() {
        let raw = cells([
            CellValue::text("10.0"),
            CellValue::Float(100.0),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::text("9"),
            CellValue::text("x"),
        ]);
        let half = validate_half(&raw, 2, HalfIndex::First).expect("検証失敗");
        assert_eq!(half.group_id, 10);
        assert_eq!(half.chest_number, 100);
        assert_eq!(half.grade, 9);
        assert_eq!(half.candidate_name, None);
    }

    #[test]
    fn test_fractional_value_is_not_integer() {
        let raw = cells([
            CellValue::text("10.5"),
            CellValue::Int(100),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Int(8),
            CellValue::text("ok"),
        ]);
        let errors = validate_half(&raw, 4, HalfIndex::First).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "group_id");
        assert_eq!(errors[0].message, MSG_NOT_INTEGER);
    }

    #[test]
    fn test_missing_and_type_errors_are_collected_together() {
        let raw = cells([
            CellValue::text("abc"),
            CellValue::Int(100),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Float(7.5),
            CellValue::Empty,
        ]);
        let errors = validate_half(&raw, 2, HalfIndex::First).unwrap_err();
        let pairs: Vec<(&str, &str)> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("comment", MSG_MISSING_REQUIRED),
                ("group_id", MSG_NOT_INTEGER),
                ("grade", MSG_NOT_INTEGER),
            ]
        );
    }

    #[test]
    fn test_numeric_comment_becomes_text() {
        let raw = cells([
            CellValue::Int(1),
            CellValue::Int(2),
            CellValue::Empty,
            CellValue::Empty,
            CellValue::Int(3),
            CellValue::Int(42),
        ]);
        let half = validate_half(&raw, 2, HalfIndex::First).expect("検証失敗");
        assert_eq!(half.comment, "42");
    }

    #[test]
    fn test_error_cell_in_text_field_is_record_error() {
        let raw = cells([
            CellValue::Int(1),
            CellValue::Int(2),
            CellValue::Error("#REF!".to_string()),
            CellValue::Empty,
            CellValue::Int(3),
            CellValue::text("ok"),
        ]);
        let errors = validate_half(&raw, 11, HalfIndex::Second).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, RECORD_FIELD);
        assert!(errors[0].message.contains("candidate_name"));
    }
}
