use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use notes_app::{Config, Logger, LoggerTrait, NotesApp, NotesStore};

/// 命令行笔记管理工具
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 笔记文件路径 (覆盖配置文件)
    #[clap(short, long)]
    file: Option<PathBuf>,

    /// 配置文件路径，不存在时创建默认配置
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// 运行日志文件路径 (覆盖配置文件)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// 不写入运行日志
    #[clap(long)]
    no_log: bool,

    /// 不使用颜色高亮
    #[clap(long)]
    no_color: bool,
}

/// 加载配置并应用命令行覆盖项
fn load_config(args: &Args, stdout_is_terminal: bool) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_or_create(path)?,
        None => match Config::default_config_path() {
            Ok(path) => Config::load_or_default(&path)?,
            Err(_) => Config::default(),
        },
    };

    if let Some(file) = &args.file {
        config.storage.notes_file = file.to_string_lossy().into_owned();
    }
    if let Some(log_file) = &args.log_file {
        config.logging.log_file = log_file.to_string_lossy().into_owned();
    }
    if args.no_log {
        config.logging.enabled = false;
    }
    // 输出被重定向时不写入颜色控制符
    if args.no_color || !stdout_is_terminal {
        config.display.highlight_matches = false;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args, io::stdout().is_terminal())?;

    // 初始化日志记录器，失败时不影响笔记功能
    let logger = match Logger::new(config.logging.enabled, Path::new(&config.logging.log_file)) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Logging setup failed: {:#}", err);
            Logger::disabled()
        }
    };
    let logger: Arc<dyn LoggerTrait> = Arc::new(logger);

    let store = NotesStore::new(&config.storage.notes_file, Arc::clone(&logger));
    let mut app = NotesApp::new(
        store,
        Arc::clone(&logger),
        io::stdin().lock(),
        io::stdout().lock(),
        config.display.clone(),
    );

    let result = app.run();

    if let Err(err) = logger.finalize() {
        eprintln!("Logging failed: {:#}", err);
    }

    result
}
