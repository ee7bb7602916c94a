use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::store::{DEFAULT_BACKUP_SUFFIX, DEFAULT_INDENT};

static CONFIG_NAME: &str = "chapter-fix";

static ENV_PREFIX: &str = "CHAPTER_FIX";

static MAX_INDENT: usize = 16;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 待修复的会话文件
    #[serde(default)]
    pub session: Option<PathBuf>,
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// 只输出修复结果，不写文件
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: None,
            backup_suffix: default_backup_suffix(),
            indent: default_indent(),
            dry_run: false,
        }
    }
}

fn default_backup_suffix() -> String {
    DEFAULT_BACKUP_SUFFIX.to_owned()
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl Settings {
    /// 依次读取配置文件与 `CHAPTER_FIX_*` 环境变量。
    ///
    /// 未指定配置文件时读取当前目录下可选的 `chapter-fix.toml`。
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) => config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(true),
            None => config::File::with_name(CONFIG_NAME)
                .format(config::FileFormat::Toml)
                .required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("配置文件反序列化失败: {}", e))
    }

    pub fn validate(&self) -> Result<()> {
        let suffix = self.backup_suffix.as_str();
        if suffix.trim().is_empty() {
            anyhow::bail!("备份后缀不能为空");
        }
        if suffix.trim() != suffix || suffix.starts_with('.') || suffix.contains(['/', '\\']) {
            anyhow::bail!("备份后缀无效: {}", self.backup_suffix);
        }
        if self.indent > MAX_INDENT {
            anyhow::bail!("缩进不能超过 {}，当前为 {}", MAX_INDENT, self.indent);
        }
        Ok(())
    }

    pub fn session_path(&self) -> Result<&Path> {
        self.session
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("未指定会话文件"))
    }
}
