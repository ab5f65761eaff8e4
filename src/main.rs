use anyhow::Context;
use clap::Parser;
use eval_import::{cli, config, db, export, pipeline, reader};
use cli::{Cli, Commands, SourceArgs};
use config::Config;
use eval_import_common::{check_half2_offset, Outcome};
use export::FileReportSink;
use pipeline::{ImportOptions, RunReport};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help / --version は正常終了
            return if e.use_stderr() {
                ExitCode::from(Outcome::RuntimeError.code())
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(outcome) => ExitCode::from(outcome.code()),
        Err(e) => {
            eprintln!("\n❌ エラー: {:#}", e);
            ExitCode::from(Outcome::RuntimeError.code())
        }
    }
}

/// 入力・DB・オフセットの解決結果
struct Prepared {
    database: PathBuf,
    options: ImportOptions,
    format: cli::ReportFormat,
}

fn prepare(source: &SourceArgs, config: &Config) -> anyhow::Result<Prepared> {
    let database = config.resolve_database(source.db.clone())?;
    let half2_offset = source.half2_offset.unwrap_or(config.half2_offset);
    check_half2_offset(half2_offset)?;

    let options = ImportOptions {
        stage: source.stage,
        half2_offset,
        first_data_row: config.first_data_row(),
        show_progress: !source.quiet,
    };
    Ok(Prepared {
        database,
        options,
        format: source.report_format.unwrap_or(config.report_format),
    })
}

fn read_rows(source: &SourceArgs) -> anyhow::Result<Vec<eval_import_common::SheetRow>> {
    println!("[1/3] シートを読み込み中...");
    let rows = reader::read_sheet(&source.excel, source.sheet.as_deref())
        .with_context(|| format!("読み込み失敗: {}", source.excel.display()))?;
    println!("✔ {}行を読み込み\n", rows.len());
    Ok(rows)
}

fn open_store(path: &std::path::Path) -> anyhow::Result<db::SqliteStore> {
    db::SqliteStore::open_existing(path).with_context(|| format!("DBを開けません: {}", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let config = Config::load()?;

    match cli.command {
        Commands::Import { source, output } => {
            println!("📋 eval-import - 評価シート登録 (stage {})", source.stage);
            println!("開始: {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

            let prepared = prepare(&source, &config)?;
            let rows = read_rows(&source)?;
            let mut store = open_store(&prepared.database)?;

            let mut sink = match output {
                Some(path) => FileReportSink::with_audit_path(
                    prepared.format,
                    prepared.options.half2_offset,
                    path,
                ),
                None => FileReportSink::new(
                    config.report_dir.clone(),
                    prepared.format,
                    prepared.options.half2_offset,
                ),
            };

            println!("[2/3] 検証・重複チェック中...");
            let report = pipeline::run_import(&mut store, &rows, &prepared.options, &mut sink)?;
            print_checks(&report);

            if report.outcome.is_success() {
                println!("[3/3] 登録完了");
                println!("✔ 登録: {}件 / スキップ: {}件", report.inserted, report.skipped);
                println!("✔ 実行ログ: {}", sink.audit_path().display());
            }
            print_written(&sink);
            print_outcome(report.outcome);
            Ok(report.outcome)
        }

        Commands::Check { source, report_dir } => {
            println!("🔍 eval-import - 登録前チェック (stage {})\n", source.stage);

            let prepared = prepare(&source, &config)?;
            let rows = read_rows(&source)?;
            let store = open_store(&prepared.database)?;

            let dir = report_dir.unwrap_or_else(|| config.report_dir.clone());
            let mut sink =
                FileReportSink::new(dir, prepared.format, prepared.options.half2_offset);

            println!("[2/3] 検証・重複チェック中...");
            let report = pipeline::run_check(&store, &rows, &prepared.options, &mut sink)?;
            print_checks(&report);
            if report.outcome.is_success() {
                println!("[3/3] 登録可能: {}件", report.candidates);
            }
            print_written(&sink);
            print_outcome(report.outcome);
            Ok(report.outcome)
        }

        Commands::Config { set_database, show } => {
            let mut config = config;

            if let Some(path) = set_database {
                config.set_database(path)?;
                println!("✔ データベースを設定しました");
            }

            if show {
                println!("設定:");
                println!(
                    "  データベース: {}",
                    config
                        .database
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".to_string())
                );
                println!("  右ブロック開始列: {}", config.half2_offset);
                println!("  ヘッダー行数: {}", config.header_rows);
                println!("  レポート出力先: {}", config.report_dir.display());
                println!("  レポート形式: {}", config.report_format);
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
            Ok(Outcome::Success)
        }
    }
}

fn print_checks(report: &RunReport) {
    println!("✔ ブロック: {}件 / 候補: {}件", report.halves, report.candidates);
    if report.validation_errors > 0 {
        println!("✘ 検証エラー: {}件", report.validation_errors);
    }
    if report.duplicates > 0 {
        println!("✘ 重複: {}件", report.duplicates);
    }
    println!();
}

fn print_written(sink: &FileReportSink) {
    for path in sink.written() {
        println!("- レポート: {}", path.display());
    }
}

fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Success => println!("\n✅ 完了"),
        Outcome::ValidationErrors => println!("\n⚠️ 検証エラーのため登録しませんでした"),
        Outcome::Duplicates => println!("\n⚠️ 重複があるため登録しませんでした"),
        Outcome::RuntimeError => println!("\n❌ 実行エラー"),
    }
}
