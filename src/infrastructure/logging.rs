use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Severe,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Severe => "SEVERE",
        }
    }
}

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log(&self, level: LogLevel, message: &str) -> Result<()>;
    fn finalize(&self) -> Result<()>;

    fn info(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    fn warning(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Warning, message)
    }

    fn severe(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Severe, message)
    }
}

/// 运行日志记录器，只追加写入，程序不会回读
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器，以追加模式打开日志文件
    pub fn new(enabled: bool, log_path: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("无法打开日志文件: {}", log_path.display()))?;

        let logger = Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            enabled: true,
        };

        logger.write_marker(&format!(
            "NotesApp session started: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;

        Ok(logger)
    }

    /// 不写入任何内容的日志记录器
    pub fn disabled() -> Self {
        Self {
            log_file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    fn write_marker(&self, message: &str) -> Result<()> {
        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# {}", message)?;
                file.flush()?;
            }
        }

        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log(&self, level: LogLevel, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {}: {}", timestamp, level.as_str(), message)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    /// 写入会话结束标记并关闭日志文件
    fn finalize(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        self.write_marker(&format!(
            "NotesApp session ended: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))?;

        if let Ok(mut file_guard) = self.log_file.lock() {
            file_guard.take();
        }

        Ok(())
    }
}
