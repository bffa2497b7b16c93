use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Split, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::error::{IoOp, NotesError, NotesResult};
use crate::domain::note::{line_matches, Note};
use crate::infrastructure::{LogLevel, LoggerTrait};

/// 确认删除全部笔记所需的输入
pub const CONFIRMATION_TOKEN: &str = "yes";

/// 清空操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Cancelled,
}

/// 笔记文件存储
///
/// 每个操作独立打开文件，完成一次读写后即释放句柄，不在调用之间保留状态。
pub struct NotesStore {
    path: PathBuf,
    logger: Arc<dyn LoggerTrait>,
}

impl NotesStore {
    pub fn new(path: impl Into<PathBuf>, logger: Arc<dyn LoggerTrait>) -> Self {
        Self {
            path: path.into(),
            logger,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件不存在时创建空文件，返回是否新建了文件
    pub fn ensure_exists(&self) -> NotesResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.failure(IoOp::Create, err))?;
        }

        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(_) => {
                self.record(
                    LogLevel::Info,
                    &format!("Notes file created successfully: {}", self.path.display()),
                );
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(err) => Err(self.failure(IoOp::Create, err)),
        }
    }

    /// 以当前时间追加一条笔记
    pub fn add(&self, text: &str) -> NotesResult<Note> {
        let note = Note::new(text);
        self.append(&note)?;
        Ok(note)
    }

    /// 追加一条已格式化的笔记
    pub fn append(&self, note: &Note) -> NotesResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| self.failure(IoOp::Open, err))?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", note.to_line())
            .and_then(|_| writer.flush())
            .map_err(|err| self.failure(IoOp::Write, err))?;

        self.record(LogLevel::Info, &format!("Note added: {}", note.text));
        Ok(())
    }

    /// 按文件顺序逐行读取全部笔记，每次调用都重新从磁盘读取
    pub fn list_all(&self) -> NotesResult<NoteLines> {
        let file = File::open(&self.path).map_err(|err| self.failure(IoOp::Open, err))?;

        Ok(NoteLines {
            lines: BufReader::new(file).split(b'\n'),
            path: self.path.clone(),
        })
    }

    /// 不区分大小写地搜索包含关键字的笔记
    pub fn search(&self, keyword: &str) -> NotesResult<MatchingLines> {
        Ok(MatchingLines {
            lines: self.list_all()?,
            keyword: keyword.to_string(),
        })
    }

    /// 确认输入为 "yes"（不区分大小写）时清空文件，其他输入一律取消
    pub fn clear_all(&self, confirmation: &str) -> NotesResult<ClearOutcome> {
        if !is_confirmed(confirmation) {
            self.record(LogLevel::Info, "Delete operation cancelled.");
            return Ok(ClearOutcome::Cancelled);
        }

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|err| self.failure(IoOp::Truncate, err))?;

        self.record(LogLevel::Warning, "All notes deleted by user.");
        Ok(ClearOutcome::Cleared)
    }

    /// 笔记文件大小（字节）
    pub fn size_on_disk(&self) -> NotesResult<u64> {
        fs::metadata(&self.path)
            .map(|meta| meta.len())
            .map_err(|err| NotesError::io(IoOp::Read, &self.path, err))
    }

    fn failure(&self, op: IoOp, err: io::Error) -> NotesError {
        let err = NotesError::io(op, &self.path, err);
        self.record(LogLevel::Severe, &err.to_string());
        err
    }

    fn record(&self, level: LogLevel, message: &str) {
        if let Err(err) = self.logger.log(level, message) {
            eprintln!("Logging failed: {}", err);
        }
    }
}

/// 判断删除确认输入
pub fn is_confirmed(confirmation: &str) -> bool {
    confirmation.trim().eq_ignore_ascii_case(CONFIRMATION_TOKEN)
}

/// 笔记文件的逐行迭代器，迭代器释放时关闭文件
///
/// 按字节切分行，非 UTF-8 内容以替换字符解码，只有真正的读取失败才返回错误。
pub struct NoteLines {
    lines: Split<BufReader<File>>,
    path: PathBuf,
}

impl Iterator for NoteLines {
    type Item = NotesResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = &self.path;
        self.lines.next().map(|line| {
            line.map(|bytes| decode_line(&bytes))
                .map_err(|err| NotesError::io(IoOp::Read, path, err))
        })
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// 匹配关键字的笔记迭代器，读取错误原样传出
pub struct MatchingLines {
    lines: NoteLines,
    keyword: String,
}

impl MatchingLines {
    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Iterator for MatchingLines {
    type Item = NotesResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            match line {
                Ok(line) if line_matches(&line, &self.keyword) => return Some(Ok(line)),
                Ok(_) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}
