pub mod display;

pub use display::{print_menu, print_note, print_prompt, ListingSummary};
