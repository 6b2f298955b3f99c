pub mod quiz_session;
pub mod session_view;

pub use quiz_session::{QuizSession, SessionPhase, SessionSnapshot, TickOutcome};
pub use session_view::{PaletteEntry, QuestionStatus, SessionCounters};
