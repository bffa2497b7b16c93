use std::borrow::Cow;
use std::io::Write;

use anyhow::Result;
use humansize::{format_size, BINARY};
use regex::{Captures, RegexBuilder};

use crate::application::MenuChoice;
use crate::domain::Note;

/// 格式化文件大小
pub fn format_file_size(size: u64) -> String {
    format_size(size, BINARY)
}

/// 输出主菜单
pub fn print_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "========= Notes App =========")?;
    for choice in MenuChoice::ALL {
        writeln!(out, "{}. {}", choice.number(), choice.label())?;
    }
    write!(out, "Enter choice: ")?;
    out.flush()?;
    Ok(())
}

/// 输出提示语，不换行
pub fn print_prompt<W: Write>(out: &mut W, prompt: &str) -> Result<()> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    Ok(())
}

/// 不区分大小写地高亮关键字
pub fn highlight_keyword<'a>(text: &'a str, keyword: &str) -> Cow<'a, str> {
    if keyword.is_empty() {
        return Cow::Borrowed(text);
    }

    match RegexBuilder::new(&regex::escape(keyword)).case_insensitive(true).build() {
        Ok(matcher) => matcher.replace_all(text, |caps: &Captures| {
            format!("\x1b[1;31m{}\x1b[0m", &caps[0])
        }),
        Err(_) => Cow::Borrowed(text),
    }
}

/// 输出一条笔记
///
/// 关闭高亮时原样输出文件中的行；开启时时间戳变暗，并高亮匹配的关键字。
pub fn print_note<W: Write>(
    out: &mut W,
    line: &str,
    keyword: Option<&str>,
    highlight: bool,
) -> Result<()> {
    if !highlight {
        writeln!(out, "{}", line)?;
        return Ok(());
    }

    let keyword = keyword.unwrap_or("");
    match Note::parse_line(line) {
        Some(note) => {
            let stamp = &line[..line.len() - note.text.len()];
            writeln!(
                out,
                "\x1b[2;37m{}\x1b[0m{}",
                stamp,
                highlight_keyword(&note.text, keyword)
            )?;
        }
        None => writeln!(out, "{}", highlight_keyword(line, keyword))?,
    }

    Ok(())
}

/// 列表统计
#[derive(Debug, Default)]
pub struct ListingSummary {
    pub shown: u64,
    pub file_size: Option<u64>,
}

impl ListingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查看全部笔记后的统计
    pub fn print_total<W: Write>(&self, out: &mut W) -> Result<()> {
        let noun = if self.shown == 1 { "note" } else { "notes" };
        match self.file_size {
            Some(size) => writeln!(out, "Total: {} {}, {}", self.shown, noun, format_file_size(size))?,
            None => writeln!(out, "Total: {} {}", self.shown, noun)?,
        }
        Ok(())
    }

    /// 搜索后的统计
    pub fn print_matches<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Matches: {}", self.shown)?;
        Ok(())
    }
}
