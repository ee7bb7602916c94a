use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::{info, instrument};

use crate::session::Session;

pub static DEFAULT_BACKUP_SUFFIX: &str = "json.bak";
pub static DEFAULT_INDENT: usize = 2;

/// 输入文件不存在，在任何读写之前报告
#[derive(Debug)]
pub struct MissingInput(pub PathBuf);

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 不存在", self.0.display())
    }
}

impl std::error::Error for MissingInput {}

/// 读入的会话：`raw` 为原始文档，用于写备份；`session` 为待修复的结构
#[derive(Debug, Clone)]
pub struct Loaded {
    pub raw: Value,
    pub session: Session,
}

#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
    backup_path: PathBuf,
    indent: usize,
}

impl SessionFile {
    pub fn open(path: impl Into<PathBuf>, backup_suffix: &str) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(MissingInput(path).into());
        }
        let backup_path = backup_path(&path, backup_suffix);
        if backup_path == path {
            anyhow::bail!("备份文件与原文件相同: {}", path.display());
        }
        Ok(Self {
            path,
            backup_path,
            indent: DEFAULT_INDENT,
        })
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    #[instrument(name = "fix", skip_all)]
    pub fn load(&self) -> Result<Loaded> {
        info!("正在读取 {}", self.path.display());
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("读取 {} 失败", self.path.display()))?;
        let raw: Value = serde_json::from_str(&text)
            .with_context(|| format!("{} 不是有效的 JSON", self.path.display()))?;
        let session = Session::from_value(raw.clone())
            .with_context(|| format!("{} 解析失败", self.path.display()))?;
        Ok(Loaded { raw, session })
    }

    /// 先写备份（原始文档），再覆盖原文件。两步之间没有原子性保证。
    #[instrument(name = "fix", skip_all)]
    pub fn save(&self, loaded: &Loaded) -> Result<()> {
        info!("正在创建备份: {}", self.backup_path.display());
        self.write_json(&self.backup_path, &loaded.raw)?;

        info!("正在写入修复后的数据: {}", self.path.display());
        self.write_json(&self.path, &loaded.session)?;

        info!("✅ 完成！");
        Ok(())
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let content = to_pretty_json(value, self.indent)?;
        fs::write(path, content).with_context(|| format!("写入 {} 失败", path.display()))
    }
}

/// 同目录同名，最后一个扩展名替换为备份后缀：`session.json` → `session.json.bak`
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    path.with_extension(suffix)
}

/// 非 ASCII 字符原样输出，不追加结尾换行
pub fn to_pretty_json<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}
