//! 取り込みパイプライン
//!
//! 分割 → 検証 → 参照解決 → 重複チェック → 登録 の順に進める。
//! 検証・参照解決のエラーは全行分を集めてから判定し、1件でもあれば何も書き込まない。
//! 重複も同様に、見つかった時点でバッチ全体を止める。

use crate::error::Result;
use crate::executor::{execute_inserts, ExecutionSummary};
use crate::progress::Progress;
use crate::resolver::resolve;
use crate::store::ReferenceStore;
use eval_import_common::{
    check_duplicates, split_rows, validate_half, AuditLog, DuplicateCheck, DuplicateRecord,
    InsertCandidate, Outcome, SheetRow, ValidationError, DEFAULT_HALF2_OFFSET, FIRST_DATA_ROW,
};

/// 実行オプション
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub stage: i64,
    pub half2_offset: usize,
    pub first_data_row: u32,
    pub show_progress: bool,
}

impl ImportOptions {
    pub fn new(stage: i64) -> Self {
        Self {
            stage,
            half2_offset: DEFAULT_HALF2_OFFSET,
            first_data_row: FIRST_DATA_ROW,
            show_progress: false,
        }
    }
}

/// レポートの書き出し先
///
/// 本番はファイル（`export::FileReportSink`）、テストでは `MemorySink`。
pub trait ReportSink {
    fn validation_errors(&mut self, errors: &[ValidationError]) -> Result<()>;

    /// 重複レポート（`candidates` は行レイアウト再構成用の全候補）
    fn duplicates(&mut self, records: &[DuplicateRecord], candidates: &[InsertCandidate])
        -> Result<()>;

    /// 監査ログ（コミット前に書き出す）
    fn audit_log(&mut self, log: &AuditLog) -> Result<()>;

    /// ロールバック時に書き出し済みの監査ログを取り消す
    fn discard_audit_log(&mut self) -> Result<()>;
}

/// メモリ上に保持するだけのシンク
#[derive(Debug, Default)]
pub struct MemorySink {
    pub validation_errors: Vec<ValidationError>,
    pub duplicates: Vec<DuplicateRecord>,
    pub audit_log: Option<AuditLog>,
}

impl ReportSink for MemorySink {
    fn validation_errors(&mut self, errors: &[ValidationError]) -> Result<()> {
        self.validation_errors = errors.to_vec();
        Ok(())
    }

    fn duplicates(
        &mut self,
        records: &[DuplicateRecord],
        _candidates: &[InsertCandidate],
    ) -> Result<()> {
        self.duplicates = records.to_vec();
        Ok(())
    }

    fn audit_log(&mut self, log: &AuditLog) -> Result<()> {
        self.audit_log = Some(log.clone());
        Ok(())
    }

    fn discard_audit_log(&mut self) -> Result<()> {
        self.audit_log = None;
        Ok(())
    }
}

/// 検証・参照解決の結果
#[derive(Debug, Default)]
pub struct Collected {
    /// 空でないブロック数
    pub halves: usize,
    pub candidates: Vec<InsertCandidate>,
    pub errors: Vec<ValidationError>,
}

/// 1回の実行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: Outcome,
    pub halves: usize,
    pub candidates: usize,
    pub validation_errors: usize,
    pub duplicates: usize,
    pub inserted: usize,
    pub skipped: usize,
}

impl RunReport {
    fn new(outcome: Outcome, collected: &Collected) -> Self {
        Self {
            outcome,
            halves: collected.halves,
            candidates: collected.candidates.len(),
            validation_errors: collected.errors.len(),
            duplicates: 0,
            inserted: 0,
            skipped: 0,
        }
    }
}

/// 全行を分割・検証・参照解決し、候補とエラーを集める
///
/// 検証に失敗したブロックは参照解決しない。エラーは行・ブロック順に並ぶ。
pub fn collect_candidates<S: ReferenceStore + ?Sized>(
    store: &S,
    rows: &[SheetRow],
    options: &ImportOptions,
) -> Result<Collected> {
    let halves = split_rows(rows, options.half2_offset, options.first_data_row);
    let mut collected = Collected {
        halves: halves.len(),
        ..Collected::default()
    };

    let progress = Progress::bar(halves.len() as u64, "検証中", options.show_progress);
    for half in halves {
        progress.inc(1);
        let validated = match validate_half(&half.raw, half.row_number, half.half_index) {
            Ok(v) => v,
            Err(errors) => {
                collected.errors.extend(errors);
                continue;
            }
        };

        match resolve(store, &validated, options.stage, half.row_number, half.half_index)? {
            Ok(ids) => collected.candidates.push(InsertCandidate::new(
                half.row_number,
                half.half_index,
                validated,
                options.stage,
                ids,
            )),
            Err(errors) => collected.errors.extend(errors),
        }
    }
    progress.finish_clear();

    log::info!(
        "ブロック{}件: 候補{}件 / 検証エラー{}件",
        collected.halves,
        collected.candidates.len(),
        collected.errors.len()
    );
    Ok(collected)
}

/// 登録前までのチェック
///
/// 検証エラー・重複があればレポートを書き出して該当の結果を返す。
/// 問題がなければ `Outcome::Success` と集めた候補を返す。
fn prepare<S: ReferenceStore + ?Sized>(
    store: &S,
    rows: &[SheetRow],
    options: &ImportOptions,
    sink: &mut dyn ReportSink,
) -> Result<(RunReport, Collected)> {
    let collected = collect_candidates(store, rows, options)?;

    if !collected.errors.is_empty() {
        log::warn!("検証エラー{}件のため登録を中止", collected.errors.len());
        sink.validation_errors(&collected.errors)?;
        return Ok((RunReport::new(Outcome::ValidationErrors, &collected), collected));
    }

    let check = check_duplicates(&collected.candidates, |keys| {
        log::debug!("既存キー照会: {}件", keys.len());
        store.existing_keys(keys)
    })?;

    let mut report = RunReport::new(Outcome::Success, &collected);
    match &check {
        DuplicateCheck::Clean => {
            log::info!("重複なし");
        }
        DuplicateCheck::InBatch(records) => {
            log::warn!("シート内で重複するブロック{}件", records.len());
        }
        DuplicateCheck::InStore(records) => {
            log::warn!("登録済みレコードと重複するブロック{}件", records.len());
        }
    }
    if !check.is_clean() {
        sink.duplicates(check.records(), &collected.candidates)?;
        report.outcome = Outcome::Duplicates;
        report.duplicates = check.records().len();
    }

    Ok((report, collected))
}

/// 登録せずにチェックだけ行う
pub fn run_check<S: ReferenceStore + ?Sized>(
    store: &S,
    rows: &[SheetRow],
    options: &ImportOptions,
    sink: &mut dyn ReportSink,
) -> Result<RunReport> {
    let (report, _) = prepare(store, rows, options, sink)?;
    Ok(report)
}

/// チェックを通過したら1トランザクションで登録する
///
/// 登録中・監査ログ書き出し中・コミット時にエラーが出たら全件ロールバックし、
/// 書き出し済みの監査ログも取り消してエラーを返す。
pub fn run_import<S: ReferenceStore + ?Sized>(
    store: &mut S,
    rows: &[SheetRow],
    options: &ImportOptions,
    sink: &mut dyn ReportSink,
) -> Result<RunReport> {
    let (mut report, collected) = prepare(&*store, rows, options, sink)?;
    if !report.outcome.is_success() {
        return Ok(report);
    }

    let progress = Progress::bar(
        collected.candidates.len() as u64,
        "登録中",
        options.show_progress,
    );

    store.begin()?;
    let summary = match insert_and_log(store, &collected.candidates, &progress, sink) {
        Ok(summary) => summary,
        Err(e) => {
            progress.finish_err("登録失敗");
            abort(store, sink, &e);
            return Err(e);
        }
    };
    if let Err(e) = store.commit() {
        progress.finish_err("コミット失敗");
        abort(store, sink, &e);
        return Err(e);
    }
    progress.finish_clear();

    log::info!("登録{}件 / スキップ{}件", summary.inserted, summary.skipped);
    report.inserted = summary.inserted;
    report.skipped = summary.skipped;
    Ok(report)
}

fn insert_and_log<S: ReferenceStore + ?Sized>(
    store: &mut S,
    candidates: &[InsertCandidate],
    progress: &Progress,
    sink: &mut dyn ReportSink,
) -> Result<ExecutionSummary> {
    let summary = execute_inserts(store, candidates, progress)?;
    sink.audit_log(&summary.audit)?;
    Ok(summary)
}

fn abort<S: ReferenceStore + ?Sized>(
    store: &mut S,
    sink: &mut dyn ReportSink,
    cause: &crate::error::ImportError,
) {
    log::error!("ロールバックします: {}", cause);
    if let Err(e) = store.rollback() {
        log::error!("ロールバック失敗: {}", e);
    }
    if let Err(e) = sink.discard_audit_log() {
        log::error!("監査ログの取り消し失敗: {}", e);
    }
}
