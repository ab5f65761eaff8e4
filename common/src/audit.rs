//! 登録結果の監査ログ

use crate::candidate::InsertCandidate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1件ごとの登録結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertStatus {
    Inserted,
    /// 自然キーが既に存在したため何もしなかった
    Skipped,
}

impl InsertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertStatus::Inserted => "inserted",
            InsertStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for InsertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub candidate: InsertCandidate,
    pub status: InsertStatus,
}

/// 監査ログ（実行順）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, candidate: &InsertCandidate, status: InsertStatus) {
        self.entries.push(AuditEntry {
            candidate: candidate.clone(),
            status,
        });
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn count(&self, status: InsertStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
