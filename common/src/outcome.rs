//! 実行結果コード

use std::fmt;

/// 1回の実行の結果（プロセス終了コードに対応）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Duplicates,
    RuntimeError,
    ValidationErrors,
}

impl Outcome {
    pub fn code(&self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Duplicates => 2,
            Outcome::RuntimeError => 3,
            Outcome::ValidationErrors => 4,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Success => "success",
            Outcome::Duplicates => "duplicates-present",
            Outcome::RuntimeError => "runtime-error",
            Outcome::ValidationErrors => "validation-errors-present",
        };
        f.write_str(s)
    }
}
