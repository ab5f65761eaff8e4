//! CSV出力

use crate::error::Result;
use eval_import_common::ReportTable;
use std::path::Path;

pub fn write_table(path: &Path, table: &ReportTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = ::csv::Writer::from_path(path)?;
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_text()))?;
    }
    writer.flush()?;
    Ok(())
}
