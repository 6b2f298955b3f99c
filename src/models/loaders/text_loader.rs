use std::path::Path;
use tokio::fs;

use crate::error::{AppError, AppResult, IngestError};
use crate::models::question::QuizData;
use crate::services::mcq_extractor::McqExtractor;
use crate::services::text_cleaner::normalize_text;

/// 只能先转成纯文本再处理的格式
const BINARY_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "odt", "rtf"];

/// 读取文档并返回清洗后的文本
///
/// 纯文本按 UTF-8 读取（非法字节替换），统一换行并清理控制字符。
/// PDF / Word 之类的二进制格式不解码，直接提示用户转换。
pub async fn load_document_text(path: &Path) -> AppResult<String> {
    let path_str = path.display().to_string();

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if BINARY_EXTENSIONS.contains(&extension.as_str()) {
        return Err(IngestError::UnsupportedFormat { extension }.into());
    }

    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(AppError::file_not_found(path_str));
    }

    let bytes = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let text = String::from_utf8_lossy(&bytes);
    tracing::debug!("读取 {}：{} 字节", path_str, bytes.len());

    Ok(normalize_text(&text))
}

/// 读取文档并解析题目
///
/// 没有解析出任何题目时返回 `IngestError::NoQuestionsFound`
pub async fn extract_quiz_from_file(path: &Path) -> AppResult<QuizData> {
    let text = load_document_text(path).await?;
    let (data, stats) = McqExtractor::new().extract_with_stats(&text);

    if data.is_empty() {
        tracing::warn!(
            "{} 中没有识别出题目（共 {} 行，丢弃 {} 道不完整的题）",
            path.display(),
            stats.lines,
            stats.dropped_incomplete
        );
        return Err(IngestError::NoQuestionsFound.into());
    }

    tracing::info!(
        "成功解析 {} 道题，答案 {} 条",
        data.total_questions,
        data.answer_key.len()
    );
    Ok(data)
}
