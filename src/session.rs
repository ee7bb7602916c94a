pub mod chapter;

pub use chapter::Chapter;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static CHAPTERS_KEY: &str = "chapters";

/// 小说会话文件的顶层对象
///
/// `chapters` 之外的键不做解析，写回时位置与内容保持不变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Session {
    pub chapters: Vec<Chapter>,
    fields: Map<String, Value>,
}

impl Session {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        let mut fields = Map::new();
        fields.insert(CHAPTERS_KEY.to_owned(), Value::Array(Vec::new()));
        Self { chapters, fields }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).context("会话文件结构无效")
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).context("会话序列化失败")
    }
}

impl TryFrom<Map<String, Value>> for Session {
    type Error = anyhow::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        let chapters = match fields.get(CHAPTERS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let Value::Object(map) = item else {
                        anyhow::bail!("第 {} 个章节不是对象", i + 1);
                    };
                    Chapter::try_from(map.clone())
                        .with_context(|| format!("第 {} 个章节无效", i + 1))
                })
                .collect::<Result<_>>()?,
            Some(other) => anyhow::bail!("chapters 必须是数组，实际为: {}", other),
        };

        Ok(Self { chapters, fields })
    }
}

impl From<Session> for Map<String, Value> {
    fn from(session: Session) -> Self {
        let mut fields = session.fields;
        // 原文件没有 chapters 或为 null 时不补写
        if let Some(slot) = fields.get_mut(CHAPTERS_KEY) {
            if !slot.is_null() || !session.chapters.is_empty() {
                *slot = Value::Array(
                    session
                        .chapters
                        .into_iter()
                        .map(|chapter| Value::Object(chapter.into()))
                        .collect(),
                );
            }
        }
        fields
    }
}
