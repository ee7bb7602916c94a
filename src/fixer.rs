use anyhow::Result;
use tracing::info;

use crate::config::Settings;
use crate::repair::{RepairReport, repair};
use crate::store::SessionFile;

pub struct ChapterFixer {
    settings: Settings,
}

impl ChapterFixer {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// 读取、修复并写回会话文件。输入文件不存在时返回 [`crate::store::MissingInput`]。
    pub fn run(&self) -> Result<RepairReport> {
        let path = self.settings.session_path()?;
        let file = SessionFile::open(path, &self.settings.backup_suffix)?
            .with_indent(self.settings.indent);
        info!("会话文件: {}", file.path().display());

        let mut loaded = file.load()?;
        let report = repair(&mut loaded.session);

        if self.settings.dry_run {
            info!("试运行，未写入任何文件");
        } else {
            file.save(&loaded)?;
        }
        Ok(report)
    }
}
