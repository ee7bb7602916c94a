use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use chapter_fix::{ChapterFixer, MissingInput, Settings, logger};

/// clap 的参数错误占用了 2
static MISSING_INPUT_EXIT: u8 = 3;

/// 根据章节标题修复会话文件中的 chapterNumber
#[derive(Parser)]
#[command(name = "chapter-fix")]
#[command(version)]
struct Cli {
    /// 会话文件路径，覆盖配置中的 session
    session: Option<PathBuf>,
    /// 配置文件（TOML），默认读取当前目录下的 chapter-fix.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// 备份文件扩展名，默认 json.bak
    #[arg(long)]
    backup_suffix: Option<String>,
    /// JSON 缩进空格数
    #[arg(long)]
    indent: Option<usize>,
    /// 只显示修复结果，不写任何文件
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn settings(self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(session) = self.session {
            settings.session = Some(session);
        }
        if let Some(suffix) = self.backup_suffix {
            settings.backup_suffix = suffix;
        }
        if let Some(indent) = self.indent {
            settings.indent = indent;
        }
        settings.dry_run |= self.dry_run;
        Ok(settings)
    }
}

fn run(cli: Cli) -> Result<()> {
    ChapterFixer::new(cli.settings()?)?.run()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<MissingInput>().is_some() => {
            error!("❌ 错误: {}", e);
            ExitCode::from(MISSING_INPUT_EXIT)
        }
        Err(e) => {
            error!("❌ 错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
