use std::collections::BTreeMap;

use tracing::{info, instrument, warn};

use crate::extractor::{TitleRule, match_title};
use crate::session::Session;

/// 章节号的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberSource {
    Title(TitleRule),
    /// 标题无法识别，使用列表位置
    Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterOutcome {
    /// 从 1 开始的列表位置
    pub position: usize,
    pub previous: Option<u64>,
    pub number: u64,
    pub source: NumberSource,
}

impl ChapterOutcome {
    pub fn changed(&self) -> bool {
        self.previous != Some(self.number)
    }
}

/// 修复后仍然存在的序号问题，只做提示，不做修正
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    Duplicate { number: u64, positions: Vec<usize> },
    OutOfOrder { position: usize, previous: u64, number: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub outcomes: Vec<ChapterOutcome>,
    pub total: usize,
    pub updated: usize,
    pub fallbacks: usize,
}

impl RepairReport {
    pub fn unchanged(&self) -> usize {
        self.total - self.updated
    }

    pub fn numbers(&self) -> Vec<u64> {
        self.outcomes.iter().map(|o| o.number).collect()
    }

    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        let mut seen: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
        for outcome in &self.outcomes {
            seen.entry(outcome.number)
                .or_default()
                .push(outcome.position);
        }
        for (number, positions) in seen {
            if positions.len() > 1 {
                anomalies.push(Anomaly::Duplicate { number, positions });
            }
        }

        for pair in self.outcomes.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            if cur.number <= prev.number {
                anomalies.push(Anomaly::OutOfOrder {
                    position: cur.position,
                    previous: prev.number,
                    number: cur.number,
                });
            }
        }

        anomalies
    }
}

/// 根据标题修复每个章节的 `chapterNumber`，标题无法识别时退回到列表位置。
#[instrument(name = "fix", skip_all)]
pub fn repair(session: &mut Session) -> RepairReport {
    let total = session.chapters.len();
    info!("共 {} 个章节", total);

    let mut report = RepairReport {
        total,
        ..Default::default()
    };

    for (i, chapter) in session.chapters.iter_mut().enumerate() {
        let position = i + 1;
        let title = chapter.title().to_owned();

        let (number, source) = match match_title(&title) {
            Some(m) => (m.number, NumberSource::Title(m.rule)),
            None => {
                info!(
                    "Ch #{}: 无法从标题 \"{}\" 提取章节号，使用位置 {}",
                    position, title, position
                );
                report.fallbacks += 1;
                (position as u64, NumberSource::Position)
            }
        };

        let outcome = ChapterOutcome {
            position,
            previous: chapter.chapter_number,
            number,
            source,
        };

        if outcome.changed() {
            info!(
                "Ch #{}: \"{}\" → {} 改为 {}",
                position,
                title,
                display_number(outcome.previous),
                number
            );
            chapter.chapter_number = Some(number);
            report.updated += 1;
        } else {
            info!("Ch #{}: \"{}\" 章节号已正确: {}", position, title, number);
        }

        report.outcomes.push(outcome);
    }

    info!("汇总:");
    info!("  章节总数: {}", report.total);
    info!("  已更新: {}", report.updated);
    info!("  原本正确: {}", report.unchanged());
    info!("  按位置回退: {}", report.fallbacks);

    for anomaly in report.anomalies() {
        match anomaly {
            Anomaly::Duplicate { number, positions } => {
                warn!("章节号 {} 重复出现在位置 {:?}", number, positions)
            }
            Anomaly::OutOfOrder {
                position,
                previous,
                number,
            } => warn!(
                "Ch #{}: 章节号 {} 不大于前一章的 {}",
                position, number, previous
            ),
        }
    }

    report
}

fn display_number(number: Option<u64>) -> String {
    match number {
        Some(n) => n.to_string(),
        None => "null".to_owned(),
    }
}
