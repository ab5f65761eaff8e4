//! 重複検出
//!
//! 2段階で自然キー (stage, assessor_id, soldier_id) の重複を探す。
//! 1. シート内重複: 同じキーが2回以上現れたら、その全出現を報告する
//! 2. DB既存重複: 全候補のキーを1回の問い合わせでDBと突き合わせる
//!
//! どちらかで重複が見つかった時点で登録は行わない。
//! シート内重複がある場合はDB照会自体を行わない。

use crate::candidate::{InsertCandidate, NaturalKey};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// 重複の検出元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSource {
    /// 同じシート内の別ブロックと衝突
    Batch,
    /// DBに登録済みのレコードと衝突
    Store,
}

impl DuplicateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateSource::Batch => "batch",
            DuplicateSource::Store => "store",
        }
    }
}

impl fmt::Display for DuplicateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 重複として報告する候補（監査用の全項目を保持）
///
/// 比較は検出元と自然キーだけで行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub source: DuplicateSource,
    pub candidate: InsertCandidate,
}

impl DuplicateRecord {
    pub fn key(&self) -> NaturalKey {
        self.candidate.natural_key()
    }
}

/// 重複チェックの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateCheck {
    Clean,
    InBatch(Vec<DuplicateRecord>),
    InStore(Vec<DuplicateRecord>),
}

impl DuplicateCheck {
    pub fn records(&self) -> &[DuplicateRecord] {
        match self {
            DuplicateCheck::Clean => &[],
            DuplicateCheck::InBatch(r) | DuplicateCheck::InStore(r) => r,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, DuplicateCheck::Clean)
    }
}

/// シート内重複を検出
///
/// 2回以上現れるキーは全出現を返す。並びはキーの初出順、同じキー内は入力順なので
/// 衝突している行が隣り合う。
pub fn find_batch_duplicates(candidates: &[InsertCandidate]) -> Vec<DuplicateRecord> {
    let mut groups: HashMap<NaturalKey, Vec<usize>> = HashMap::new();
    let mut order: Vec<NaturalKey> = Vec::new();

    for (i, c) in candidates.iter().enumerate() {
        let key = c.natural_key();
        let entry = groups.entry(key).or_default();
        if entry.is_empty() {
            order.push(key);
        }
        entry.push(i);
    }

    order
        .iter()
        .filter_map(|key| groups.get(key).filter(|idx| idx.len() > 1))
        .flatten()
        .map(|&i| DuplicateRecord {
            source: DuplicateSource::Batch,
            candidate: candidates[i].clone(),
        })
        .collect()
}

/// 候補のキー一覧（重複除去、初出順）
pub fn collect_keys(candidates: &[InsertCandidate]) -> Vec<NaturalKey> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(InsertCandidate::natural_key)
        .filter(|k| seen.insert(*k))
        .collect()
}

/// DBに既に存在するキーを持つ候補を抽出（入力順）
pub fn find_store_duplicates(
    candidates: &[InsertCandidate],
    existing: &HashSet<NaturalKey>,
) -> Vec<DuplicateRecord> {
    candidates
        .iter()
        .filter(|c| existing.contains(&c.natural_key()))
        .map(|c| DuplicateRecord {
            source: DuplicateSource::Store,
            candidate: c.clone(),
        })
        .collect()
}

/// 2段階の重複チェック
///
/// `existing_keys` はDBへの一括問い合わせ。シート内重複が見つかった場合は呼ばれない。
pub fn check_duplicates<F, E>(
    candidates: &[InsertCandidate],
    existing_keys: F,
) -> Result<DuplicateCheck, E>
where
    F: FnOnce(&[NaturalKey]) -> Result<HashSet<NaturalKey>, E>,
{
    let in_batch = find_batch_duplicates(candidates);
    if !in_batch.is_empty() {
        return Ok(DuplicateCheck::InBatch(in_batch));
    }

    if candidates.is_empty() {
        return Ok(DuplicateCheck::Clean);
    }

    let existing = existing_keys(&collect_keys(candidates))?;
    let in_store = find_store_duplicates(candidates, &existing);
    if in_store.is_empty() {
        Ok(DuplicateCheck::Clean)
    } else {
        Ok(DuplicateCheck::InStore(in_store))
    }
}
