pub mod mcq_extractor;
pub mod scoring;
pub mod text_cleaner;

pub use mcq_extractor::{extract_quiz, ExtractionStats, McqExtractor};
