pub mod app;
pub mod config;
pub mod menu;

pub use app::NotesApp;
pub use config::{Config, DisplayConfig};
pub use menu::MenuChoice;
