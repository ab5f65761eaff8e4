//! セル値とその型変換
//!
//! スプレッドシートのセルは型タグ付きの値として扱う。
//! 整数への変換は全域関数で、変換できない値はエラー値として返す（panicしない）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// スプレッドシートの1セル
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Excelのシリアル日時
    DateTime(f64),
    /// #DIV/0! などのエラーセル
    Error(String),
}

/// 整数変換の失敗理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// 空セル
    Blank,
    /// 整数として解釈できない値
    NotInteger,
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// 空セル、または空白のみの文字列
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 整数に変換する
    ///
    /// - `Int` はそのまま
    /// - 小数部が0の `Float` は黙って整数化（42.0 → 42）
    /// - 文字列は前後の空白を除いて同じ規則で解釈（"10.0" → 10、"10.5" はエラー）
    pub fn to_int(&self) -> Result<i64, CoerceError> {
        match self {
            CellValue::Empty => Err(CoerceError::Blank),
            CellValue::Int(i) => Ok(*i),
            CellValue::Float(f) => integral_float(*f).ok_or(CoerceError::NotInteger),
            CellValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Err(CoerceError::Blank);
                }
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(i);
                }
                s.parse::<f64>()
                    .ok()
                    .and_then(integral_float)
                    .ok_or(CoerceError::NotInteger)
            }
            CellValue::Bool(_) | CellValue::DateTime(_) | CellValue::Error(_) => {
                Err(CoerceError::NotInteger)
            }
        }
    }

    /// 文字列として取り出す（空は `None`）
    ///
    /// エラーセルは文字列にできないので `Err` を返す。
    pub fn to_text(&self) -> Result<Option<String>, String> {
        match self {
            CellValue::Error(e) => Err(format!("cell contains spreadsheet error {}", e)),
            v if v.is_blank() => Ok(None),
            v => Ok(Some(v.to_string())),
        }
    }
}

fn integral_float(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) | CellValue::DateTime(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("   ").is_blank());
        assert!(CellValue::text("\t\n").is_blank());
        assert!(!CellValue::text(" a ").is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
    }

    #[test]
    fn test_to_int_integral_values() {
        assert_eq!(CellValue::Int(7).to_int(), Ok(7));
        assert_eq!(CellValue::Float(42.0).to_int(), Ok(42));
        assert_eq!(CellValue::text("10.0").to_int(), Ok(10));
        assert_eq!(CellValue::text(" 15 ").to_int(), Ok(15));
        assert_eq!(CellValue::text("-3").to_int(), Ok(-3));
    }

    #[test]
    fn test_to_int_rejects_fractions_and_garbage() {
        assert_eq!(CellValue::text("10.5").to_int(), Err(CoerceError::NotInteger));
        assert_eq!(CellValue::Float(8.25).to_int(), Err(CoerceError::NotInteger));
        assert_eq!(CellValue::text("abc").to_int(), Err(CoerceError::NotInteger));
        assert_eq!(CellValue::Float(f64::NAN).to_int(), Err(CoerceError::NotInteger));
        assert_eq!(CellValue::Float(f64::INFINITY).to_int(), Err(CoerceError::NotInteger));
        assert_eq!(CellValue::Bool(true).to_int(), Err(CoerceError::NotInteger));
        assert_eq!(CellValue::DateTime(45000.0).to_int(), Err(CoerceError::NotInteger));
    }

    #[test]
    fn test_to_int_blank() {
        assert_eq!(CellValue::Empty.to_int(), Err(CoerceError::Blank));
        assert_eq!(CellValue::text("  ").to_int(), Err(CoerceError::Blank));
    }

    #[test]
    fn test_to_text() {
        assert_eq!(CellValue::Empty.to_text(), Ok(None));
        assert_eq!(CellValue::text(" ").to_text(), Ok(None));
        assert_eq!(CellValue::text("ok").to_text(), Ok(Some("ok".to_string())));
        assert_eq!(CellValue::Int(5).to_text(), Ok(Some("5".to_string())));
        assert_eq!(CellValue::Float(5.0).to_text(), Ok(Some("5".to_string())));
        assert!(CellValue::Error("#N/A".to_string()).to_text().is_err());
    }
}
