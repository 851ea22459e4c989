pub mod quiz_session;
pub mod session_event;

pub use quiz_session::{Phase, QuestionOutcome, QuestionResult, QuizSession, SessionSnapshot};
pub use session_event::SessionEvent;
