// ==========================================
// 钢结构材料清单转录 - 命令行入口
// ==========================================
// 用法: steel-bom-filler --document lista.docx --template modelo.xlsx [--config cfg.json] [--json]
// 退出码: 0 成功 / 2 材料表无可处理数据 / 1 错误
// ==========================================

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use steel_bom_filler::{logging, ConfigManager, ConvertError, FillOrchestrator, ProcessReport};

#[derive(Parser)]
#[command(name = "steel-bom-filler")]
#[command(about = "从 Word 材料表填充 Excel 钢材模板", long_about = None)]
#[command(version)]
struct Cli {
    /// Word 材料表（.docx）
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    document: PathBuf,

    /// Excel 模板（.xlsx），结果另存为 <文件名>_processado.xlsx
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    template: PathBuf,

    /// JSON 配置文件（缺省使用内置模板布局）
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// 以 JSON 输出处理报告与日志
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.json);

    tracing::info!("{} v{}", steel_bom_filler::APP_NAME, steel_bom_filler::VERSION);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_nothing_to_process() => {
            tracing::warn!("{}", err);
            eprintln!("警告: {}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("错误: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<(), ConvertError> {
    let config = ConfigManager::load(cli.config.as_deref())?.into_config();
    let report = FillOrchestrator::new(config).run(&cli.document, &cli.template)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| ConvertError::Other(anyhow::Error::new(e)))?;
        println!("{}", json);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &ProcessReport) {
    for item in &report.items {
        match item.outcome.row() {
            Some(row) => println!(
                "[OK]   #{:<3} {:<32} → 第 {} 行 ({})",
                item.line_number, item.description, row, item.section_code
            ),
            None => println!(
                "[--]   #{:<3} {:<32} → 未写入 ({})",
                item.line_number, item.description, item.section_code
            ),
        }
    }
    for item in report.unmatched_items() {
        if let steel_bom_filler::ItemOutcome::Unmatched { reason } = &item.outcome {
            println!("未写入 #{}: {}", item.line_number, reason);
        }
    }

    let summary = &report.summary;
    println!();
    println!(
        "共 {} 条，写入 {} 条，未写入 {} 条，隐藏 {} 行",
        summary.total_items, summary.written, summary.unmatched, summary.hidden_rows
    );
    println!("[文件] 已生成: {}", report.output_path);
}
