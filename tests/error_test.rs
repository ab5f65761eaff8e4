//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use eval_import::error::ImportError;
use eval_import::reader;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイルを読み込んだ場合
#[test]
fn test_read_nonexistent_file() {
    let result = reader::read_sheet(Path::new("/nonexistent/path/12345.xlsx"), None);
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

/// Excelではないファイルを読み込んだ場合
#[test]
fn test_read_not_a_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("input.xlsx");
    std::fs::write(&path, "this is not a zip").unwrap();

    let result = reader::read_sheet(&path, None);
    assert!(matches!(result, Err(ImportError::SpreadsheetRead(_))));
}

/// ImportErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ImportError::Config("テスト設定エラー".to_string()),
        ImportError::FileNotFound("input.xlsx".to_string()),
        ImportError::SpreadsheetRead("壊れたファイル".to_string()),
        ImportError::SheetNotFound("Sheet9".to_string()),
        ImportError::ReportGeneration("Excel生成エラー".to_string()),
        ImportError::MissingDatabase,
        ImportError::DatabaseNotFound("eval.db".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingDatabaseエラーのメッセージ確認
#[test]
fn test_missing_database_message() {
    let display = format!("{}", ImportError::MissingDatabase);

    assert!(display.contains("--db"));
    assert!(display.contains("eval-import config"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ImportError = io_err.into();

    assert!(matches!(err, ImportError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// SQLiteエラーからの変換
#[test]
fn test_database_error_conversion() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let db_err = conn.execute("INSERT INTO missing_table VALUES (1)", []).unwrap_err();
    let err: ImportError = db_err.into();

    assert!(matches!(err, ImportError::Database(_)));
    assert!(format!("{}", err).contains("missing_table"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ImportError = json_err.into();

    assert!(matches!(err, ImportError::JsonParse(_)));
}

/// エラーチェーン（透過的エラー）
#[test]
fn test_common_error_transparent() {
    let common_err = eval_import_common::Error::Config("half2_offset too small".to_string());
    let err: ImportError = common_err.into();

    assert!(matches!(err, ImportError::Common(_)));
    // 透過的エラーなのでメッセージがそのまま表示される
    assert_eq!(format!("{}", err), "Config error: half2_offset too small");
}
