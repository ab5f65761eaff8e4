//! Excel出力（CLI版）
//!
//! 共通ライブラリの excel_core でワークブックを生成する

use crate::error::{ImportError, Result};
use eval_import_common::export::excel_core;
use eval_import_common::ReportTable;
use std::path::Path;

pub fn write_report(path: &Path, tables: &[ReportTable]) -> Result<()> {
    if tables.is_empty() {
        return Err(ImportError::ReportGeneration("出力する表がありません".into()));
    }
    excel_core::save_report(path, tables)?;
    Ok(())
}
