//! レポートの表定義
//!
//! 検証エラー・重複・監査ログを「ヘッダー + 行」の表に変換する。
//! xlsx / CSV のどちらの出力もこの表を元に書き出す。

use crate::audit::AuditEntry;
use crate::candidate::InsertCandidate;
use crate::duplicates::DuplicateRecord;
use crate::half::{HalfField, HalfIndex, HALF_WIDTH};
use crate::splitter::MAX_COLUMNS;
use crate::validator::ValidationError;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 表のセル
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCell {
    Empty,
    Int(i64),
    Text(String),
}

impl ReportCell {
    pub fn to_text(&self) -> String {
        match self {
            ReportCell::Empty => String::new(),
            ReportCell::Int(i) => i.to_string(),
            ReportCell::Text(s) => s.clone(),
        }
    }
}

impl From<i64> for ReportCell {
    fn from(v: i64) -> Self {
        ReportCell::Int(v)
    }
}

impl From<u32> for ReportCell {
    fn from(v: u32) -> Self {
        ReportCell::Int(i64::from(v))
    }
}

impl From<&str> for ReportCell {
    fn from(v: &str) -> Self {
        ReportCell::Text(v.to_string())
    }
}

impl From<String> for ReportCell {
    fn from(v: String) -> Self {
        ReportCell::Text(v)
    }
}

impl From<Option<&String>> for ReportCell {
    fn from(v: Option<&String>) -> Self {
        v.map(|s| ReportCell::Text(s.clone())).unwrap_or(ReportCell::Empty)
    }
}

/// 1シート分の表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl ReportTable {
    fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

const CANDIDATE_COLUMNS: [&str; 12] = [
    "row_number",
    "half",
    "group_id",
    "chest_number",
    "candidate_name",
    "assessor_name",
    "grade",
    "comment",
    "stage",
    "assessor_id",
    "myun_id",
    "soldier_id",
];

fn candidate_cells(c: &InsertCandidate) -> Vec<ReportCell> {
    vec![
        c.row_number.into(),
        i64::from(c.half_index.number()).into(),
        c.group_id.into(),
        c.chest_number.into(),
        c.candidate_name.as_ref().into(),
        c.assessor_name.as_ref().into(),
        c.grade.into(),
        c.comment.as_str().into(),
        c.stage.into(),
        c.assessor_id.into(),
        c.myun_id.into(),
        c.soldier_id.into(),
    ]
}

/// 検証エラー一覧
pub fn validation_errors_table(errors: &[ValidationError]) -> ReportTable {
    let mut table = ReportTable::new("validation_errors", &["row_number", "half", "field", "message"]);
    for e in errors {
        table.rows.push(vec![
            e.row_number.into(),
            i64::from(e.half.number()).into(),
            e.field.as_str().into(),
            e.message.as_str().into(),
        ]);
    }
    table
}

/// 重複一覧（1件1行、検出元つき）
pub fn duplicates_table(records: &[DuplicateRecord]) -> ReportTable {
    let mut header = vec!["source"];
    header.extend(CANDIDATE_COLUMNS);
    let mut table = ReportTable::new("duplicates", &header);
    for r in records {
        let mut row = vec![ReportCell::from(r.source.as_str())];
        row.extend(candidate_cells(&r.candidate));
        table.rows.push(row);
    }
    table
}

fn half_cells(c: Option<&InsertCandidate>) -> Vec<ReportCell> {
    match c {
        None => vec![ReportCell::Empty; HALF_WIDTH],
        Some(c) => vec![
            c.group_id.into(),
            c.chest_number.into(),
            c.candidate_name.as_ref().into(),
            c.assessor_name.as_ref().into(),
            c.grade.into(),
            c.comment.as_str().into(),
        ],
    }
}

/// 重複を含む行を元シートと同じ左右レイアウトで再構成
///
/// 左ブロックはA列から、右ブロックは `half2_offset` 列目から並べ、
/// 末尾に行番号と重複しているブロック番号（"1" / "2" / "1,2"）を付ける。
pub fn duplicate_rows_layout_table(
    records: &[DuplicateRecord],
    candidates: &[InsertCandidate],
    half2_offset: usize,
) -> ReportTable {
    // シートの列数を超える隙間は作らない
    let gap = half2_offset
        .min(MAX_COLUMNS - HALF_WIDTH)
        .saturating_sub(HALF_WIDTH);

    let mut halves_by_row: HashMap<u32, HashMap<HalfIndex, &InsertCandidate>> = HashMap::new();
    for c in candidates {
        halves_by_row.entry(c.row_number).or_default().insert(c.half_index, c);
    }

    let mut flagged: BTreeMap<u32, BTreeSet<HalfIndex>> = BTreeMap::new();
    for r in records {
        flagged
            .entry(r.candidate.row_number)
            .or_default()
            .insert(r.candidate.half_index);
    }

    let field_names: Vec<&str> = HalfField::ALL.iter().map(HalfField::name).collect();
    let mut header: Vec<&str> = field_names.clone();
    header.extend(std::iter::repeat("").take(gap));
    header.extend(field_names);
    header.extend(["row_number", "duplicate_halves"]);
    let mut table = ReportTable::new("rows", &header);

    for (row_number, halves) in &flagged {
        let in_row = halves_by_row.get(row_number);
        let lookup = |h: HalfIndex| in_row.and_then(|m| m.get(&h).copied());

        let mut row = half_cells(lookup(HalfIndex::First));
        row.extend(std::iter::repeat(ReportCell::Empty).take(gap));
        row.extend(half_cells(lookup(HalfIndex::Second)));
        row.push((*row_number).into());
        let flags: Vec<String> = halves.iter().map(|h| h.number().to_string()).collect();
        row.push(flags.join(",").into());
        table.rows.push(row);
    }
    table
}

/// 登録実行ログ
pub fn audit_log_table(entries: &[AuditEntry]) -> ReportTable {
    let mut header: Vec<&str> = CANDIDATE_COLUMNS.to_vec();
    header.push("status");
    let mut table = ReportTable::new("insert_log", &header);
    for e in entries {
        let mut row = candidate_cells(&e.candidate);
        row.push(e.status.as_str().into());
        table.rows.push(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InsertStatus;
    use crate::duplicates::DuplicateSource;

    fn candidate(row: u32, half: HalfIndex) -> InsertCandidate {
        InsertCandidate {
            row_number: row,
            half_index: half,
            group_id: 5,
            chest_number: 100,
            candidate_name: Some("דני".to_string()),
            assessor_name: None,
            grade: 8,
            comment: "ok".to_string(),
            stage: 1,
            assessor_id: 9,
            myun_id: 2,
            soldier_id: 7,
        }
    }

    #[test]
    fn test_validation_errors_table() {
        let errors = vec![ValidationError::new(3, HalfIndex::Second, "grade", "must be an integer")];
        let table = validation_errors_table(&errors);
        assert_eq!(table.header, vec!["row_number", "half", "field", "message"]);
        assert_eq!(
            table.rows[0],
            vec![
                ReportCell::Int(3),
                ReportCell::Int(2),
                ReportCell::Text("grade".into()),
                ReportCell::Text("must be an integer".into()),
            ]
        );
    }

    #[test]
    fn test_duplicates_table_keeps_audit_context() {
        let records = vec![DuplicateRecord {
            source: DuplicateSource::Store,
            candidate: candidate(4, HalfIndex::First),
        }];
        let table = duplicates_table(&records);
        assert_eq!(table.header.len(), 13);
        assert_eq!(table.rows[0][0], ReportCell::Text("store".into()));
        assert_eq!(table.rows[0][5], ReportCell::Text("דני".into()));
        assert_eq!(table.rows[0][6], ReportCell::Empty);
    }

    #[test]
    fn test_layout_places_second_half_at_offset() {
        let candidates = vec![candidate(2, HalfIndex::First), candidate(2, HalfIndex::Second)];
        let records = vec![
            DuplicateRecord { source: DuplicateSource::Batch, candidate: candidates[0].clone() },
            DuplicateRecord { source: DuplicateSource::Batch, candidate: candidates[1].clone() },
        ];
        let table = duplicate_rows_layout_table(&records, &candidates, 15);

        // 6 + 9 + 6 + row_number + duplicate_halves
        assert_eq!(table.header.len(), 23);
        assert_eq!(table.header[15], "group_id");
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row[0], ReportCell::Int(5));
        assert_eq!(row[14], ReportCell::Empty);
        assert_eq!(row[15], ReportCell::Int(5));
        assert_eq!(row[21], ReportCell::Int(2));
        assert_eq!(row[22], ReportCell::Text("1,2".into()));
    }

    #[test]
    fn test_layout_gap_is_bounded_by_sheet_width() {
        let candidates = vec![candidate(2, HalfIndex::First)];
        let records = vec![DuplicateRecord {
            source: DuplicateSource::Batch,
            candidate: candidates[0].clone(),
        }];
        let table = duplicate_rows_layout_table(&records, &candidates, usize::MAX);

        // 右ブロックは最終6列に置かれる
        assert_eq!(table.header.len(), MAX_COLUMNS + 2);
        assert_eq!(table.rows[0].len(), MAX_COLUMNS + 2);
    }

    #[test]
    fn test_layout_leaves_missing_half_blank() {
        let candidates = vec![candidate(6, HalfIndex::Second)];
        let records = vec![DuplicateRecord {
            source: DuplicateSource::Store,
            candidate: candidates[0].clone(),
        }];
        let table = duplicate_rows_layout_table(&records, &candidates, 15);
        let row = &table.rows[0];
        assert!(row[..6].iter().all(|c| *c == ReportCell::Empty));
        assert_eq!(row[22], ReportCell::Text("2".into()));
    }

    #[test]
    fn test_audit_log_table_status_column() {
        let entries = vec![
            AuditEntry { candidate: candidate(2, HalfIndex::First), status: InsertStatus::Inserted },
            AuditEntry { candidate: candidate(3, HalfIndex::First), status: InsertStatus::Skipped },
        ];
        let table = audit_log_table(&entries);
        assert_eq!(table.header.last().map(String::as_str), Some("status"));
        assert_eq!(table.rows[1].last(), Some(&ReportCell::Text("skipped".into())));
    }
}
