// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{ClearOutcome, IoOp, Note, NotesError, NotesResult, NotesStore};
pub use application::{Config, MenuChoice, NotesApp};
pub use infrastructure::{LogLevel, Logger, LoggerTrait};
