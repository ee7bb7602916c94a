use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// 标题中章节号的识别规则，按优先级排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRule {
    /// `Chapter 12` / `Ch 12` / `Ch. 12`，不区分大小写
    English,
    /// `第12章`
    ArabicMarker,
    /// 标题开头的数字：`12. 标题`、`12 - 标题`
    LeadingNumber,
    /// `第三章`，仅支持一到十的单个汉字
    ChineseNumeral,
}

impl fmt::Display for TitleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TitleRule::English => "Chapter N",
            TitleRule::ArabicMarker => "第N章",
            TitleRule::LeadingNumber => "N. 标题",
            TitleRule::ChineseNumeral => "第一章",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleMatch {
    pub rule: TitleRule,
    pub number: u64,
}

static RULES: LazyLock<Vec<(TitleRule, Regex)>> = LazyLock::new(|| {
    [
        (TitleRule::English, r"(?i)(?:Chapter|Ch\.?)\s+(\d+)"),
        (TitleRule::ArabicMarker, r"第(\d+)章"),
        (TitleRule::LeadingNumber, r"^(\d+)[.\-\s]"),
        (TitleRule::ChineseNumeral, r"第([一二三四五六七八九十]+)章"),
    ]
    .into_iter()
    .map(|(rule, pattern)| (rule, Regex::new(pattern).expect("正则表达式编译失败")))
    .collect()
});

impl TitleRule {
    fn number(self, caps: &Captures) -> Option<u64> {
        let captured = &caps[1];
        match self {
            TitleRule::ChineseNumeral => chinese_numeral(captured),
            _ => decimal_number(captured),
        }
    }
}

/// 各书写系统中数字 0 的码位，`\d` 匹配的其余数字按 0-9 连续排列
static DIGIT_ZEROS: &[u32] = &[
    0x0030, // ASCII
    0x0660, // 阿拉伯-印度
    0x06F0, // 扩展阿拉伯-印度
    0x07C0, // 西非书面文字
    0x0966, // 天城文
    0x09E6, // 孟加拉文
    0x0A66, // 古木基文
    0x0AE6, // 古吉拉特文
    0x0B66, // 奥里亚文
    0x0BE6, // 泰米尔文
    0x0C66, // 泰卢固文
    0x0CE6, // 卡纳达文
    0x0D66, // 马拉雅拉姆文
    0x0E50, // 泰文
    0x0ED0, // 老挝文
    0x0F20, // 藏文
    0x1040, // 缅甸文
    0x17E0, // 高棉文
    0x1810, // 蒙古文
    0xFF10, // 全角
];

fn digit_value(c: char) -> Option<u64> {
    let code = c as u32;
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .map(|zero| u64::from(code - zero))
}

/// 全角等非 ASCII 数字按数值折算；未收录的数字或溢出时返回 None
fn decimal_number(s: &str) -> Option<u64> {
    s.chars().try_fold(0u64, |acc, c| {
        acc.checked_mul(10)?.checked_add(digit_value(c)?)
    })
}

/// 单个汉字数字转为数值，多字组合（如“十一”）不做拆解
fn chinese_numeral(s: &str) -> Option<u64> {
    let mut chars = s.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let value = match c {
        '一' => 1,
        '二' => 2,
        '三' => 3,
        '四' => 4,
        '五' => 5,
        '六' => 6,
        '七' => 7,
        '八' => 8,
        '九' => 9,
        '十' => 10,
        _ => return None,
    };
    Some(value)
}

/// 按规则顺序匹配标题，命中第一条规则即返回。
///
/// 命中的规则若取不出数值（数字溢出、多字汉字数字），整个标题视为无章节号，
/// 不再尝试后面的规则。
pub fn match_title(title: &str) -> Option<TitleMatch> {
    if title.is_empty() {
        return None;
    }

    for (rule, regex) in RULES.iter() {
        let Some(caps) = regex.captures(title) else {
            continue;
        };
        let number = rule.number(&caps)?;
        return Some(TitleMatch {
            rule: *rule,
            number,
        });
    }
    None
}

pub fn extract_chapter_number(title: &str) -> Option<u64> {
    match_title(title).map(|m| m.number)
}
