//! 登録候補と参照解決まわりの型定義

use crate::half::{HalfIndex, ValidatedHalf};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// 重複判定に使う自然キー (stage, assessor_id, soldier_id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NaturalKey {
    pub stage: i64,
    pub assessor_id: i64,
    pub soldier_id: i64,
}

/// 評価者の役割
///
/// 左ブロックはグループ指揮官、右ブロックはグループ責任者の評価。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssessorRole {
    GroupCommander,
    GroupResponsible,
}

impl AssessorRole {
    /// ブロック位置 → 役割
    pub fn for_half(half: HalfIndex) -> Self {
        match half {
            HalfIndex::First => AssessorRole::GroupCommander,
            HalfIndex::Second => AssessorRole::GroupResponsible,
        }
    }

    /// `api_assessoringroup.role` に格納されている値
    pub fn stored_value(&self) -> &'static str {
        match self {
            AssessorRole::GroupCommander => "מפקד קבוצה",
            AssessorRole::GroupResponsible => "אחראי בטיחות",
        }
    }
}

/// 参照テーブルから解決した外部キー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedIds {
    pub soldier_id: i64,
    pub myun_id: i64,
    pub assessor_id: i64,
}

/// 登録候補（1ブロック = 1件）
///
/// 同一性は自然キーのみで判断する。それ以外の項目は監査用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertCandidate {
    pub row_number: u32,
    pub half_index: HalfIndex,
    pub group_id: i64,
    pub chest_number: i64,
    pub candidate_name: Option<String>,
    pub assessor_name: Option<String>,
    pub grade: i64,
    pub comment: String,
    pub stage: i64,
    pub assessor_id: i64,
    pub myun_id: i64,
    pub soldier_id: i64,
}

impl InsertCandidate {
    pub fn new(
        row_number: u32,
        half_index: HalfIndex,
        half: ValidatedHalf,
        stage: i64,
        ids: ResolvedIds,
    ) -> Self {
        Self {
            row_number,
            half_index,
            group_id: half.group_id,
            chest_number: half.chest_number,
            candidate_name: half.candidate_name,
            assessor_name: half.assessor_name,
            grade: half.grade,
            comment: half.comment,
            stage,
            assessor_id: ids.assessor_id,
            myun_id: ids.myun_id,
            soldier_id: ids.soldier_id,
        }
    }

    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            stage: self.stage,
            assessor_id: self.assessor_id,
            soldier_id: self.soldier_id,
        }
    }
}

impl PartialEq for InsertCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.natural_key() == other.natural_key()
    }
}

impl Eq for InsertCandidate {}

impl Hash for InsertCandidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.natural_key().hash(state);
    }
}
