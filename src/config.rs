use crate::cli::ReportFormat;
use crate::error::{ImportError, Result};
use eval_import_common::splitter::{check_half2_offset, DEFAULT_HALF2_OFFSET, FIRST_DATA_ROW};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// DBパスを上書きする環境変数
pub const DATABASE_ENV: &str = "EVAL_IMPORT_DB";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: Option<PathBuf>,
    /// 右ブロックの開始列（0始まり）
    pub half2_offset: usize,
    /// ヘッダー行数（データは header_rows + 1 行目から）
    pub header_rows: u32,
    pub report_dir: PathBuf,
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ImportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("eval-import").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            database: None,
            half2_offset: DEFAULT_HALF2_OFFSET,
            header_rows: FIRST_DATA_ROW - 1,
            report_dir: PathBuf::from("logs"),
            report_format: ReportFormat::Xlsx,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_half2_offset(self.half2_offset)?;
        Ok(())
    }

    /// 先頭データ行の行番号（1始まり）
    pub fn first_data_row(&self) -> u32 {
        self.header_rows + 1
    }

    /// 使用するDBパス（引数 > 環境変数 > 設定ファイル）
    pub fn resolve_database(&self, cli_value: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = cli_value {
            return Ok(path);
        }
        // 環境変数を優先
        if let Ok(path) = std::env::var(DATABASE_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        self.database.clone().ok_or(ImportError::MissingDatabase)
    }

    pub fn set_database(&mut self, path: PathBuf) -> Result<()> {
        self.database = Some(path);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.half2_offset, 15);
        assert_eq!(config.first_data_row(), 2);
        assert_eq!(config.report_dir, PathBuf::from("logs"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"half2_offset": 8}"#).expect("パース失敗");
        assert_eq!(config.half2_offset, 8);
        assert_eq!(config.header_rows, 1);
        assert_eq!(config.report_format, ReportFormat::Xlsx);
    }

    #[test]
    fn test_overlapping_offset_is_rejected() {
        let config = Config { half2_offset: 3, ..Config::default() };
        assert!(matches!(config.validate(), Err(ImportError::Common(_))));
    }

    #[test]
    fn test_offset_beyond_sheet_width_is_rejected() {
        let config: Config =
            serde_json::from_str(r#"{"half2_offset": 20000}"#).expect("パース失敗");
        assert!(matches!(config.validate(), Err(ImportError::Common(_))));
    }

    #[test]
    fn test_cli_database_wins() {
        let config = Config { database: Some(PathBuf::from("saved.db")), ..Config::default() };
        let path = config
            .resolve_database(Some(PathBuf::from("arg.db")))
            .expect("DBパス解決失敗");
        assert_eq!(path, PathBuf::from("arg.db"));
    }
}
