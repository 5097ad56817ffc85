pub mod chapter;
pub mod session;
pub mod subtopic;
pub mod suggestion;

pub use chapter::Chapter;
pub use session::{Exam, SessionType, StudySession};
pub use subtopic::{Subtopic, SubtopicStatus};
pub use suggestion::{SuggestionItem, SuggestionResult, SuggestionType, UNKNOWN_SUBJECT};
