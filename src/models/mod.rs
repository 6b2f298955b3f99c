pub mod loaders;
pub mod question;
pub mod report;

pub use loaders::{extract_quiz_from_file, load_document_text, load_quiz_data, save_quiz_data, save_report};
pub use question::{AnswerKey, OptionLetter, Question, QuizData};
pub use report::{Performance, QuestionResult, QuizReport, ScoreData};
