pub mod error;
pub mod note;
pub mod store;

pub use error::{IoOp, NotesError, NotesResult};
pub use note::Note;
pub use store::{ClearOutcome, MatchingLines, NoteLines, NotesStore};
