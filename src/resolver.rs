//! 参照解決
//!
//! 検証済みブロックから (soldier_id, myun_id, assessor_id) を引く。
//! 2つの照会は片方が失敗してももう片方を必ず実行し、両方のエラーを一度に返す。

use crate::error::Result;
use crate::store::ReferenceStore;
use eval_import_common::{AssessorRole, HalfIndex, ResolvedIds, ValidatedHalf, ValidationError};

pub const MSG_PARTICIPANT_NOT_FOUND: &str = "participant not found or not unique";
pub const MSG_GROUP_ROLE_NOT_FOUND: &str = "assessoringroup not found or not unique";

/// 参照解決の結果
///
/// 外側の `Result` はDBアクセスの失敗、内側は検証エラー。
pub fn resolve<S: ReferenceStore + ?Sized>(
    store: &S,
    half: &ValidatedHalf,
    stage: i64,
    row_number: u32,
    half_index: HalfIndex,
) -> Result<std::result::Result<ResolvedIds, Vec<ValidationError>>> {
    let mut errors = Vec::new();

    let soldier_id = store.lookup_participant(half.chest_number)?;
    if soldier_id.is_none() {
        log::debug!("行{} ブロック{}: 胸番号 {} の参加者なし", row_number, half_index, half.chest_number);
        errors.push(ValidationError::new(
            row_number,
            half_index,
            "chest_number",
            MSG_PARTICIPANT_NOT_FOUND,
        ));
    }

    let role = AssessorRole::for_half(half_index);
    let group_role = store.lookup_group_role(half.group_id, stage, role)?;
    if group_role.is_none() {
        log::debug!(
            "行{} ブロック{}: group_id={} stage={} role={:?} の評価者なし",
            row_number, half_index, half.group_id, stage, role
        );
        errors.push(ValidationError::new(
            row_number,
            half_index,
            "group_id/stage",
            MSG_GROUP_ROLE_NOT_FOUND,
        ));
    }

    match (soldier_id, group_role) {
        (Some(soldier_id), Some(group_role)) => Ok(Ok(ResolvedIds {
            soldier_id,
            myun_id: group_role.myun_id,
            assessor_id: group_role.assessor_id,
        })),
        _ => Ok(Err(errors)),
    }
}
