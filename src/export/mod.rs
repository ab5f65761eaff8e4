pub mod csv;
pub mod excel;

use crate::cli::ReportFormat;
use crate::error::Result;
use crate::pipeline::ReportSink;
use eval_import_common::report::{
    audit_log_table, duplicate_rows_layout_table, duplicates_table, validation_errors_table,
};
use eval_import_common::{AuditLog, DuplicateRecord, InsertCandidate, ReportTable, ValidationError};
use std::path::{Path, PathBuf};

pub const VALIDATION_ERRORS_STEM: &str = "validation_errors";
pub const DUPLICATES_STEM: &str = "duplications_errors";
pub const AUDIT_LOG_FILE: &str = "insert_log.xlsx";

/// 拡張子からレポート形式を判定（不明なら xlsx）
pub fn format_for_path(path: &Path) -> ReportFormat {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
        .unwrap_or(ReportFormat::Xlsx)
}

/// 表を指定形式で書き出し
///
/// CSVは1ファイル1表なので先頭の表だけを書く。
pub fn write_tables(path: &Path, format: ReportFormat, tables: &[ReportTable]) -> Result<()> {
    match format {
        ReportFormat::Xlsx => excel::write_report(path, tables),
        ReportFormat::Csv => match tables.first() {
            Some(table) => self::csv::write_table(path, table),
            None => Ok(()),
        },
    }
}

/// レポートをファイルに書き出すシンク
///
/// エラーレポートは `dir` に、監査ログは `audit_path` に出力する。
pub struct FileReportSink {
    dir: PathBuf,
    format: ReportFormat,
    half2_offset: usize,
    audit_path: PathBuf,
    written: Vec<PathBuf>,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>, format: ReportFormat, half2_offset: usize) -> Self {
        let dir = dir.into();
        let audit_path = dir.join(AUDIT_LOG_FILE);
        Self {
            dir,
            format,
            half2_offset,
            audit_path,
            written: Vec::new(),
        }
    }

    /// 監査ログの出力先を変更（レポートフォルダはその親フォルダになる）
    pub fn with_audit_path(format: ReportFormat, half2_offset: usize, audit_path: PathBuf) -> Self {
        let dir = match audit_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            dir,
            format,
            half2_offset,
            audit_path,
            written: Vec::new(),
        }
    }

    pub fn report_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", stem, self.format.extension()))
    }

    pub fn audit_path(&self) -> &Path {
        &self.audit_path
    }

    /// これまでに書き出したファイル
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&mut self, path: PathBuf, format: ReportFormat, tables: &[ReportTable]) -> Result<()> {
        write_tables(&path, format, tables)?;
        log::info!("レポート出力: {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

impl ReportSink for FileReportSink {
    fn validation_errors(&mut self, errors: &[ValidationError]) -> Result<()> {
        let path = self.report_path(VALIDATION_ERRORS_STEM);
        self.write(path, self.format, &[validation_errors_table(errors)])
    }

    fn duplicates(
        &mut self,
        records: &[DuplicateRecord],
        candidates: &[InsertCandidate],
    ) -> Result<()> {
        let path = self.report_path(DUPLICATES_STEM);
        let tables = [
            duplicates_table(records),
            duplicate_rows_layout_table(records, candidates, self.half2_offset),
        ];
        self.write(path, self.format, &tables)
    }

    fn audit_log(&mut self, log: &AuditLog) -> Result<()> {
        let path = self.audit_path.clone();
        let format = format_for_path(&path);
        self.write(path, format, &[audit_log_table(log.entries())])
    }

    fn discard_audit_log(&mut self) -> Result<()> {
        if self.audit_path.exists() {
            std::fs::remove_file(&self.audit_path)?;
            log::warn!("監査ログを削除: {}", self.audit_path.display());
        }
        let audit_path = &self.audit_path;
        self.written.retain(|p| p != audit_path);
        Ok(())
    }
}
