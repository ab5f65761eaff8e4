//! Evaluation Import Common Library
//!
//! DBに依存しない検証・重複検出のコアとレポート表の定義

pub mod cell;
pub mod half;
pub mod splitter;
pub mod validator;
pub mod candidate;
pub mod duplicates;
pub mod audit;
pub mod report;
pub mod outcome;
pub mod error;
pub mod export;

pub use cell::{CellValue, CoerceError};
pub use half::{HalfField, HalfIndex, RawHalf, ValidatedHalf};
pub use splitter::{check_half2_offset, split_row, split_rows, SheetRow, SplitHalf, DEFAULT_HALF2_OFFSET, FIRST_DATA_ROW, MAX_COLUMNS};
pub use validator::{validate_half, ValidationError};
pub use candidate::{AssessorRole, InsertCandidate, NaturalKey, ResolvedIds};
pub use duplicates::{check_duplicates, DuplicateCheck, DuplicateRecord, DuplicateSource};
pub use audit::{AuditEntry, AuditLog, InsertStatus};
pub use report::{ReportCell, ReportTable};
pub use outcome::Outcome;
pub use error::{Error, Result};
