use crate::domain::{NotesError, NotesResult};

/// 主菜单选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddNote,
    ViewAll,
    Search,
    DeleteAll,
    Exit,
}

impl MenuChoice {
    /// 按菜单顺序排列的全部选项
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::AddNote,
        MenuChoice::ViewAll,
        MenuChoice::Search,
        MenuChoice::DeleteAll,
        MenuChoice::Exit,
    ];

    pub fn number(&self) -> u32 {
        match self {
            MenuChoice::AddNote => 1,
            MenuChoice::ViewAll => 2,
            MenuChoice::Search => 3,
            MenuChoice::DeleteAll => 4,
            MenuChoice::Exit => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::AddNote => "Add Note",
            MenuChoice::ViewAll => "View All Notes",
            MenuChoice::Search => "Search Notes",
            MenuChoice::DeleteAll => "Delete All Notes",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.number() == number)
    }

    /// 解析用户输入的菜单编号
    pub fn parse(input: &str) -> NotesResult<Self> {
        let input = input.trim();
        let number: u32 = input
            .parse()
            .map_err(|_| NotesError::InvalidInput(format!("menu choice is not a number: {:?}", input)))?;

        Self::from_number(number)
            .ok_or_else(|| NotesError::InvalidInput(format!("no menu item {}", number)))
    }
}
