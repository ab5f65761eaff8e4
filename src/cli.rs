use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eval-import")]
#[command(about = "評価シート（Excel）を検証し、重複チェックの上でDBに登録するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 入力シートと照合先の指定（import / check 共通）
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// 入力Excelファイル（xlsx/xls/ods）
    #[arg(long, required = true)]
    pub excel: PathBuf,

    /// 評価ステージ番号
    #[arg(long, required = true)]
    pub stage: i64,

    /// SQLiteデータベース（省略時は環境変数 EVAL_IMPORT_DB または設定ファイル）
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// 読み込むシート名（省略時は先頭シート。保存時のアクティブシートは見ない）
    #[arg(long)]
    pub sheet: Option<String>,

    /// 右ブロックの開始列（0始まり、既定15 = P列）
    #[arg(long)]
    pub half2_offset: Option<usize>,

    /// エラーレポートの形式 (xlsx/csv)
    #[arg(long)]
    pub report_format: Option<ReportFormat>,

    /// 進捗バーを表示しない
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 検証・重複チェックの上でDBに登録
    Import {
        #[command(flatten)]
        source: SourceArgs,

        /// 実行ログの出力先（デフォルト: logs/insert_log.xlsx）
        /// エラーレポートも同じフォルダに出力される
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 登録せずに検証・重複チェックのみ実行
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// エラーレポートの出力フォルダ（デフォルト: logs）
        #[arg(short, long)]
        report_dir: Option<PathBuf>,
    },

    /// 設定を表示・変更
    Config {
        /// 既定のデータベースを設定
        #[arg(long)]
        set_database: Option<PathBuf>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// レポート出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use xlsx or csv", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
