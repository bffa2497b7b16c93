use chrono::{Local, NaiveDateTime};

/// 笔记时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 替换笔记中换行符的可见标记
pub const LINE_BREAK_MARKER: &str = "␤";

/// 一条带时间戳的笔记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl Note {
    /// 使用当前本地时间创建笔记
    pub fn new(text: &str) -> Self {
        Self::with_timestamp(text, Local::now().naive_local())
    }

    pub fn with_timestamp(text: &str, timestamp: NaiveDateTime) -> Self {
        // 一条笔记只占一行
        let text = text
            .replace("\r\n", LINE_BREAK_MARKER)
            .replace(['\n', '\r'], LINE_BREAK_MARKER);

        Self { timestamp, text }
    }

    /// 格式化为文件中的一行（不含换行符）
    pub fn to_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format(TIMESTAMP_FORMAT), self.text)
    }

    /// 解析文件中的一行，格式不符时返回 None
    pub fn parse_line(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('[')?;
        let (stamp, text) = rest.split_once("] ")?;
        let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;

        Some(Self {
            timestamp,
            text: text.to_string(),
        })
    }
}

/// 不区分大小写的子串匹配
pub fn line_matches(line: &str, keyword: &str) -> bool {
    line.to_lowercase().contains(&keyword.to_lowercase())
}
