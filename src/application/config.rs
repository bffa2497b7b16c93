use std::fs;
use std::path::{Component, Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用程序配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 笔记存储配置
    pub storage: StorageConfig,
    /// 运行日志配置
    pub logging: LoggingConfig,
    /// 显示相关配置
    pub display: DisplayConfig,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 笔记文件路径
    pub notes_file: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 是否写入运行日志
    pub enabled: bool,
    /// 运行日志文件路径
    pub log_file: String,
}

/// 显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 是否高亮匹配内容
    pub highlight_matches: bool,
    /// 列表后是否输出统计信息
    pub show_summary: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            notes_file: "notes.txt".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: "notesapp.log".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            highlight_matches: true,
            show_summary: true,
        }
    }
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("Created default config file: {}", config_path.display());
            Ok(config)
        }
    }

    /// 配置文件存在时加载，否则使用默认配置
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)
            .context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe()
            .context("无法获取程序路径")?;

        let exe_dir = exe_path.parent()
            .context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.storage.notes_file.trim().is_empty() {
            anyhow::bail!("notes_file 不能为空");
        }

        if self.logging.enabled {
            if self.logging.log_file.trim().is_empty() {
                anyhow::bail!("启用日志时 log_file 不能为空");
            }

            if normalize_path(&self.logging.log_file) == normalize_path(&self.storage.notes_file) {
                anyhow::bail!("log_file 不能与 notes_file 相同");
            }
        }

        Ok(())
    }
}

/// 去掉路径中的 `.` 分量，便于比较两个配置路径
fn normalize_path(path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
