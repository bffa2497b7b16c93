use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 失败的文件操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoOp {
    Create,
    Open,
    Read,
    Write,
    Truncate,
}

impl IoOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoOp::Create => "create",
            IoOp::Open => "open",
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Truncate => "truncate",
        }
    }
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 笔记操作错误
#[derive(Debug, Error)]
pub enum NotesError {
    /// 文件创建、打开、读写或截断失败
    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 无效的用户输入
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NotesError {
    pub fn io(op: IoOp, path: &Path, source: io::Error) -> Self {
        NotesError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// 失败的文件操作，输入错误时为 None
    pub fn io_op(&self) -> Option<IoOp> {
        match self {
            NotesError::Io { op, .. } => Some(*op),
            NotesError::InvalidInput(_) => None,
        }
    }
}

pub type NotesResult<T> = std::result::Result<T, NotesError>;
