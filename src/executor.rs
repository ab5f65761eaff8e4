//! 登録実行
//!
//! 呼び出し側が開始したトランザクションの中で、候補を1件ずつ insert-or-ignore する。
//! 影響行数が0なら自然キーが既に存在したとみなしスキップとして記録する。
//! 途中でエラーが出たらそのまま返し、ロールバックは呼び出し側が行う。

use crate::error::Result;
use crate::progress::Progress;
use crate::store::ReferenceStore;
use eval_import_common::{AuditLog, InsertCandidate, InsertStatus};

/// 登録結果の集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub inserted: usize,
    pub skipped: usize,
    pub audit: AuditLog,
}

pub fn execute_inserts<S: ReferenceStore + ?Sized>(
    store: &mut S,
    candidates: &[InsertCandidate],
    progress: &Progress,
) -> Result<ExecutionSummary> {
    let mut summary = ExecutionSummary::default();

    for candidate in candidates {
        let affected = store.insert_or_ignore(candidate)?;
        let status = if affected > 0 {
            summary.inserted += 1;
            InsertStatus::Inserted
        } else {
            summary.skipped += 1;
            InsertStatus::Skipped
        };
        log::debug!(
            "行{} ブロック{}: {} (stage={}, assessor={}, soldier={})",
            candidate.row_number,
            candidate.half_index,
            status,
            candidate.stage,
            candidate.assessor_id,
            candidate.soldier_id
        );
        summary.audit.record(candidate, status);
        progress.inc(1);
    }

    Ok(summary)
}
