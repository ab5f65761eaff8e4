//! 参照ストアのインターフェース
//!
//! パイプラインはこのトレイト越しにDBへアクセスする。本番は `db::SqliteStore`、
//! テストではメモリ上の代替実装を渡す。

use crate::error::Result;
use eval_import_common::{AssessorRole, InsertCandidate, NaturalKey};
use std::collections::HashSet;

/// グループ役割の照会結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRole {
    pub myun_id: i64,
    pub assessor_id: i64,
}

pub trait ReferenceStore {
    /// 胸番号から参加者IDを引く（0件・複数件は `None`）
    fn lookup_participant(&self, chest_number: i64) -> Result<Option<i64>>;

    /// (group_id, stage, role) からグループ役割を引く（0件・複数件は `None`）
    fn lookup_group_role(
        &self,
        group_id: i64,
        stage: i64,
        role: AssessorRole,
    ) -> Result<Option<GroupRole>>;

    /// 渡したキーのうち登録済みのものを返す
    fn existing_keys(&self, keys: &[NaturalKey]) -> Result<HashSet<NaturalKey>>;

    /// 自然キーが未登録なら登録する。戻り値は影響行数（0 = スキップ）
    fn insert_or_ignore(&mut self, candidate: &InsertCandidate) -> Result<usize>;

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;
}
