pub mod quiz_json;
pub mod text_loader;

pub use quiz_json::{load_quiz_data, save_quiz_data, save_report};
pub use text_loader::{extract_quiz_from_file, load_document_text};
