use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::config::DisplayConfig;
use crate::application::MenuChoice;
use crate::domain::{ClearOutcome, NotesError, NotesResult, NotesStore};
use crate::infrastructure::LoggerTrait;
use crate::presentation::{self, ListingSummary};

pub const FAREWELL: &str = "Exiting Notes App. Goodbye!";

/// 交互式笔记会话
///
/// 读写对象是泛型的，程序中使用标准输入输出，测试中使用内存缓冲区。
pub struct NotesApp<R, W> {
    store: NotesStore,
    logger: Arc<dyn LoggerTrait>,
    input: R,
    output: W,
    display: DisplayConfig,
}

impl<R: BufRead, W: Write> NotesApp<R, W> {
    pub fn new(
        store: NotesStore,
        logger: Arc<dyn LoggerTrait>,
        input: R,
        output: W,
        display: DisplayConfig,
    ) -> Self {
        Self {
            store,
            logger,
            input,
            output,
            display,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// 运行菜单循环，直到用户退出或输入结束
    ///
    /// 笔记操作失败只影响当前操作；只有控制台读写失败才会返回错误。
    pub fn run(&mut self) -> Result<()> {
        if let Err(err) = self.store.ensure_exists() {
            writeln!(self.output, "Error: {}", err)?;
        }

        loop {
            presentation::print_menu(&mut self.output)?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                writeln!(self.output, "{}", FAREWELL)?;
                break;
            };

            match MenuChoice::parse(&line) {
                Ok(MenuChoice::AddNote) => self.add_note()?,
                Ok(MenuChoice::ViewAll) => self.view_notes()?,
                Ok(MenuChoice::Search) => self.search_notes()?,
                Ok(MenuChoice::DeleteAll) => self.delete_notes()?,
                Ok(MenuChoice::Exit) => {
                    writeln!(self.output, "{}", FAREWELL)?;
                    break;
                }
                Err(err) => {
                    self.record_warning(&err.to_string());
                    writeln!(self.output, "Invalid choice! Try again.")?;
                }
            }
        }

        Ok(())
    }

    fn add_note(&mut self) -> Result<()> {
        presentation::print_prompt(&mut self.output, "Enter your note (single line): ")?;
        let Some(text) = self.read_line()? else {
            return Ok(());
        };

        match self.store.add(&text) {
            Ok(_) => writeln!(self.output, "Note added successfully!")?,
            Err(err) => writeln!(self.output, "Error: could not save note ({})", err)?,
        }

        Ok(())
    }

    fn view_notes(&mut self) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "===== All Notes =====")?;

        let lines = match self.store.list_all() {
            Ok(lines) => lines,
            Err(err) => {
                writeln!(self.output, "Error: could not {} notes ({})", failed_op(&err), err)?;
                return Ok(());
            }
        };

        let mut summary = ListingSummary::new();
        if !self.print_lines(lines, None, &mut summary)? {
            return Ok(());
        }

        if summary.shown == 0 {
            writeln!(self.output, "No notes found!")?;
        } else if self.display.show_summary {
            summary.file_size = self.store.size_on_disk().ok();
            summary.print_total(&mut self.output)?;
        }

        Ok(())
    }

    fn search_notes(&mut self) -> Result<()> {
        presentation::print_prompt(&mut self.output, "Enter keyword to search: ")?;
        let Some(keyword) = self.read_line()? else {
            return Ok(());
        };

        writeln!(self.output)?;
        writeln!(self.output, "===== Search Results =====")?;

        let matches = match self.store.search(&keyword) {
            Ok(matches) => matches,
            Err(err) => {
                writeln!(self.output, "Error: could not {} notes ({})", failed_op(&err), err)?;
                return Ok(());
            }
        };

        let keyword = matches.keyword().to_string();
        let mut summary = ListingSummary::new();
        if !self.print_lines(matches, Some(&keyword), &mut summary)? {
            return Ok(());
        }

        if summary.shown == 0 {
            writeln!(self.output, "No notes matched your keyword.")?;
        } else if self.display.show_summary {
            summary.print_matches(&mut self.output)?;
        }

        Ok(())
    }

    fn delete_notes(&mut self) -> Result<()> {
        presentation::print_prompt(
            &mut self.output,
            "Are you sure you want to delete all notes? (yes/no): ",
        )?;
        let confirmation = self.read_line()?.unwrap_or_default();

        match self.store.clear_all(&confirmation) {
            Ok(ClearOutcome::Cleared) => writeln!(self.output, "All notes deleted!")?,
            Ok(ClearOutcome::Cancelled) => writeln!(self.output, "Delete operation cancelled.")?,
            Err(err) => writeln!(self.output, "Error: could not delete notes ({})", err)?,
        }

        Ok(())
    }

    /// 输出迭代到的每一行；读取中途失败时记录错误并返回 false
    fn print_lines<I>(
        &mut self,
        lines: I,
        keyword: Option<&str>,
        summary: &mut ListingSummary,
    ) -> Result<bool>
    where
        I: Iterator<Item = NotesResult<String>>,
    {
        for line in lines {
            match line {
                Ok(line) => {
                    presentation::print_note(
                        &mut self.output,
                        &line,
                        keyword,
                        self.display.highlight_matches,
                    )?;
                    summary.shown += 1;
                }
                Err(err) => {
                    self.report_read_error(&err)?;
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    fn report_read_error(&mut self, err: &NotesError) -> Result<()> {
        if let Err(log_err) = self.logger.severe(&err.to_string()) {
            eprintln!("Logging failed: {}", log_err);
        }
        writeln!(self.output, "Error: could not {} notes ({})", failed_op(err), err)?;
        Ok(())
    }

    fn record_warning(&self, message: &str) {
        if let Err(err) = self.logger.warning(message) {
            eprintln!("Logging failed: {}", err);
        }
    }

    /// 读取一行输入并去掉行尾换行符，输入结束时返回 None
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("无法读取标准输入")?;

        if read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }
}

/// 出错的文件操作名称，用于提示信息
fn failed_op(err: &NotesError) -> &'static str {
    err.io_op().map_or("read", |op| op.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IoOp;
    use crate::infrastructure::Logger;
    use std::fs;
    use std::io;
    use std::path::Path;
    use tempfile::tempdir;

    fn plain_display() -> DisplayConfig {
        DisplayConfig {
            highlight_matches: false,
            show_summary: false,
        }
    }

    fn run_session(notes_path: &Path, script: &str, display: DisplayConfig) -> String {
        let logger: Arc<dyn LoggerTrait> = Arc::new(Logger::disabled());
        let store = NotesStore::new(notes_path, Arc::clone(&logger));
        let mut app = NotesApp::new(store, logger, script.as_bytes(), Vec::new(), display);
        app.run().unwrap();
        String::from_utf8(app.into_output()).unwrap()
    }

    #[test]
    fn test_add_and_view_session() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");

        let output = run_session(&notes_path, "1\nBuy milk\n2\n5\n", plain_display());

        assert!(output.contains("Note added successfully!"));
        assert!(output.contains("===== All Notes ====="));
        assert!(output.contains("] Buy milk\n"));
        assert!(output.ends_with(&format!("{}\n", FAREWELL)));

        let content = fs::read_to_string(&notes_path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with("] Buy milk\n"));
    }

    #[test]
    fn test_view_empty_notes() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");

        let output = run_session(&notes_path, "2\n5\n", plain_display());

        assert!(notes_path.exists());
        assert!(output.contains("No notes found!"));
    }

    #[test]
    fn test_search_session() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");

        let script = "1\nCall mom\n1\nBuy milk\n1\nCall dad\n3\ncall\n3\ndentist\n5\n";
        let output = run_session(&notes_path, script, plain_display());

        let results = output.split("===== Search Results =====").nth(1).unwrap();
        let mom = results.find("Call mom").unwrap();
        let dad = results.find("Call dad").unwrap();
        assert!(mom < dad);
        assert!(output.contains("No notes matched your keyword."));
    }

    #[test]
    fn test_delete_cancelled_and_confirmed() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");

        let output = run_session(&notes_path, "1\nBuy milk\n4\nno\n5\n", plain_display());
        assert!(output.contains("Delete operation cancelled."));
        assert_eq!(fs::read_to_string(&notes_path).unwrap().lines().count(), 1);

        let output = run_session(&notes_path, "4\nYes\n2\n5\n", plain_display());
        assert!(output.contains("All notes deleted!"));
        assert!(output.contains("No notes found!"));
        assert!(fs::read_to_string(&notes_path).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_choice_is_logged_and_loop_continues() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");
        let log_path = temp_dir.path().join("notesapp.log");

        let logger: Arc<dyn LoggerTrait> = Arc::new(Logger::new(true, &log_path).unwrap());
        let store = NotesStore::new(&notes_path, Arc::clone(&logger));
        let mut app = NotesApp::new(store, logger, "abc\n9\n5\n".as_bytes(), Vec::new(), plain_display());
        app.run().unwrap();
        let output = String::from_utf8(app.into_output()).unwrap();

        assert_eq!(output.matches("Invalid choice! Try again.").count(), 2);
        assert_eq!(output.matches("========= Notes App =========").count(), 3);

        let log = fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("WARNING: Invalid input: menu choice is not a number"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");

        let output = run_session(&notes_path, "1\n", plain_display());
        assert!(output.ends_with(&format!("{}\n", FAREWELL)));
        assert!(fs::read_to_string(&notes_path).unwrap().is_empty());
    }

    #[test]
    fn test_windows_line_endings() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");

        run_session(&notes_path, "1\r\nBuy milk\r\n5\r\n", plain_display());

        let content = fs::read_to_string(&notes_path).unwrap();
        assert!(content.ends_with("] Buy milk\n"));
    }

    #[test]
    fn test_summary_output() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");

        let display = DisplayConfig {
            highlight_matches: false,
            show_summary: true,
        };
        let output = run_session(&notes_path, "1\nCall mom\n2\n3\nmom\n5\n", display);

        assert!(output.contains("Total: 1 note, "));
        assert!(output.contains("Matches: 1"));
    }

    #[test]
    fn test_unwritable_notes_path_is_not_fatal() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let notes_path = blocker.join("notes.txt");

        let output = run_session(&notes_path, "1\nBuy milk\n2\n5\n", plain_display());

        assert!(output.contains("Error: Failed to create"));
        assert!(output.contains("Error: could not save note"));
        assert!(output.contains("Error: could not open notes"));
        assert!(output.ends_with(&format!("{}\n", FAREWELL)));
    }

    #[test]
    fn test_invalid_utf8_note_is_listed_and_searchable() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");

        let mut content = b"[2024-03-09 07:05:01] Call mom\n".to_vec();
        content.extend_from_slice(b"[2024-03-09 07:06:00] caf\xE9\n");
        content.extend_from_slice(b"[2024-03-09 07:07:30] Call dad\n");
        fs::write(&notes_path, content).unwrap();

        let output = run_session(&notes_path, "2\n3\ndad\n5\n", plain_display());

        let listing = output.split("===== All Notes =====").nth(1).unwrap();
        assert!(listing.contains("Call mom"));
        assert!(listing.contains("caf\u{FFFD}"));
        assert!(listing.contains("Call dad"));

        let results = output.split("===== Search Results =====").nth(1).unwrap();
        assert!(results.contains("[2024-03-09 07:07:30] Call dad"));
        assert!(!output.contains("Error:"));
    }

    #[test]
    fn test_read_error_stops_listing() {
        let temp_dir = tempdir().unwrap();
        let notes_path = temp_dir.path().join("notes.txt");
        let log_path = temp_dir.path().join("notesapp.log");

        let logger: Arc<dyn LoggerTrait> = Arc::new(Logger::new(true, &log_path).unwrap());
        let store = NotesStore::new(&notes_path, Arc::clone(&logger));
        let mut app = NotesApp::new(store, logger, "".as_bytes(), Vec::new(), plain_display());

        let lines = vec![
            Ok("[2024-03-09 07:05:01] Call mom".to_string()),
            Err(NotesError::io(
                IoOp::Read,
                &notes_path,
                io::Error::new(io::ErrorKind::Other, "device error"),
            )),
            Ok("[2024-03-09 07:07:30] Call dad".to_string()),
        ];
        let mut summary = ListingSummary::new();
        let completed = app.print_lines(lines.into_iter(), None, &mut summary).unwrap();

        assert!(!completed);
        assert_eq!(summary.shown, 1);

        let output = String::from_utf8(app.into_output()).unwrap();
        assert!(output.contains("Call mom"));
        assert!(output.contains("Error: could not read notes"));
        assert!(!output.contains("Call dad"));

        let log = fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("SEVERE: Failed to read"));
    }
}
