use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("データベースが指定されていません。`--db PATH` または `eval-import config --set-database PATH` で指定してください")]
    MissingDatabase,

    #[error("データベースファイルがありません: {0}（`--db` のパスを確認してください）")]
    DatabaseNotFound(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("スプレッドシート読み込みエラー: {0}")]
    SpreadsheetRead(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("データベースエラー: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("レポート出力エラー: {0}")]
    ReportGeneration(String),

    #[error("CSV出力エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] eval_import_common::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
