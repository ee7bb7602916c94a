use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static TITLE_KEY: &str = "title";
static NUMBER_KEY: &str = "chapterNumber";

/// 会话文件中的单个章节
///
/// 只读取 `title` 与 `chapterNumber`，其余字段原样保存在 `fields` 中，
/// 写回时保持原有顺序。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Chapter {
    pub title: Option<String>,
    pub chapter_number: Option<u64>,
    fields: Map<String, Value>,
}

impl Chapter {
    pub fn new(title: Option<&str>, chapter_number: Option<u64>) -> Self {
        let mut fields = Map::new();
        if let Some(title) = title {
            fields.insert(TITLE_KEY.to_owned(), Value::String(title.to_owned()));
        }
        if let Some(number) = chapter_number {
            fields.insert(NUMBER_KEY.to_owned(), Value::from(number));
        }
        Self {
            title: title.map(str::to_owned),
            chapter_number,
            fields,
        }
    }

    /// 缺失或为 null 的标题视为空字符串
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl TryFrom<Map<String, Value>> for Chapter {
    type Error = anyhow::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        let title = match fields.get(TITLE_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(title)) => Some(title.clone()),
            Some(other) => anyhow::bail!("章节标题必须是字符串，实际为: {}", other),
        };
        // 负数、小数、字符串等都视为缺失，修复时会被覆盖为整数
        let chapter_number = fields.get(NUMBER_KEY).and_then(Value::as_u64);

        Ok(Self {
            title,
            chapter_number,
            fields,
        })
    }
}

impl From<Chapter> for Map<String, Value> {
    fn from(chapter: Chapter) -> Self {
        let mut fields = chapter.fields;
        if let Some(number) = chapter.chapter_number {
            fields.insert(NUMBER_KEY.to_owned(), Value::from(number));
        }
        fields
    }
}
