// ==========================================
// Betaflow 制造管理 - 批量导入命令行入口
// ==========================================
// 用法:
//   betaflow-import kinds
//   betaflow-import template <kind> [out_dir]
//   betaflow-import import <kind> <file>
// 数据库: BETAFLOW_DB_PATH，否则用户数据目录
// ==========================================

use betaflow_import::api::{
    ApiError, ImportApi, ImportApiResponse, UploadTypeInfo, DISPLAY_ERROR_LIMIT,
};
use betaflow_import::db::default_db_path;
use betaflow_import::domain::{ImportProgress, PipelineStage};
use betaflow_import::importer::{
    CancellationToken, ImportObserver, SchemaRegistry, TemplateGenerator,
};
use betaflow_import::logging;
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const USAGE: &str = "\
usage:
  betaflow-import kinds
  betaflow-import template <kind> [out_dir]
  betaflow-import import <kind> <file>

kinds: raw-materials | products | employees | machines";

/// 终端进度输出（stderr）
struct ConsoleProgress;

impl ImportObserver for ConsoleProgress {
    fn on_stage(&self, stage: PipelineStage) {
        tracing::debug!(stage = %stage, "阶段切换");
    }

    fn on_progress(&self, progress: ImportProgress) {
        let mut stderr = std::io::stderr();
        let _ = write!(
            stderr,
            "\r{}/{} ({:.0}%)",
            progress.processed,
            progress.total,
            progress.fraction() * 100.0
        );
        if progress.processed == progress.total {
            let _ = writeln!(stderr);
        }
    }
}

fn open_api(observer: Arc<dyn ImportObserver>) -> Result<ImportApi, Box<dyn Error>> {
    let db_path = default_db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let db_path = db_path.to_string_lossy().to_string();
    tracing::info!("使用数据库: {}", db_path);

    Ok(ImportApi::from_db_path_with_observer(&db_path, observer)?)
}

fn print_report(response: &ImportApiResponse) {
    println!("{}", response.summary);
    if !response.skipped_lines.is_empty() {
        println!("Skipped {} malformed line(s):", response.skipped_lines.len());
        for skipped in &response.skipped_lines {
            println!("  {}", skipped);
        }
    }
    if response.cancelled {
        println!("Import cancelled after {} row(s)", response.success + response.failure);
    }
    for line in response.error_preview(DISPLAY_ERROR_LIMIT) {
        println!("  {}", line);
    }
}

/// 模板只依赖静态 schema，不打开数据库
fn write_template(kind: &str, out_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let template = TemplateGenerator::file(ImportApi::parse_kind(kind)?);
    let path = out_dir.join(&template.file_name);
    std::fs::write(&path, format!("{}\n", template.content))?;
    Ok(path)
}

async fn run_import(kind: &str, file: &str) -> Result<i32, Box<dyn Error>> {
    let api = open_api(Arc::new(ConsoleProgress))?;

    // Ctrl-C: 停止后续行写入，已写入行保留
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("收到中断信号，正在取消导入");
            signal_token.cancel();
        }
    });

    match api.import_file_with_cancel(kind, file, &cancel).await {
        Ok(response) => {
            print_report(&response);
            Ok(if response.failure > 0 || response.cancelled { 1 } else { 0 })
        }
        Err(ApiError::ImportRejected { tier, errors }) => {
            eprintln!("Import rejected ({} validation), nothing was written:", tier);
            for message in &errors {
                eprintln!("  {}", message);
            }
            Ok(2)
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let code = match args.as_slice() {
        ["kinds"] => {
            for info in SchemaRegistry::supported_kinds()
                .into_iter()
                .map(UploadTypeInfo::for_kind)
            {
                println!(
                    "{:<14} {:<14} {}",
                    info.id,
                    info.title,
                    info.required_columns.join(",")
                );
            }
            0
        }
        ["template", kind] => {
            let path = write_template(kind, Path::new("."))?;
            println!("{}", path.display());
            0
        }
        ["template", kind, out_dir] => {
            let path = write_template(kind, Path::new(out_dir))?;
            println!("{}", path.display());
            0
        }
        ["import", kind, file] => run_import(kind, file).await?,
        _ => {
            eprintln!("{}", USAGE);
            64
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
