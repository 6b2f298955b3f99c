//! 题目数据 / 成绩单的 JSON 交接
//!
//! 解析器产出的 `QuizData` 通过这里交给答题端，提交后的成绩单也从这里落盘。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

use crate::error::{AppError, AppResult};
use crate::models::question::QuizData;
use crate::models::report::QuizReport;

async fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let path_str = path.display().to_string();
    let content =
        serde_json::to_string_pretty(value).map_err(|e| AppError::json_parse_failed(&path_str, e))?;
    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(&path_str, e))?;
    tracing::debug!("已写入 {}", path_str);
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;
    serde_json::from_str(&content).map_err(|e| AppError::json_parse_failed(&path_str, e))
}

/// 保存题目数据
pub async fn save_quiz_data(path: &Path, data: &QuizData) -> AppResult<()> {
    write_json(path, data).await
}

/// 读取题目数据
pub async fn load_quiz_data(path: &Path) -> AppResult<QuizData> {
    read_json(path).await
}

/// 保存成绩单
pub async fn save_report(path: &Path, report: &QuizReport) -> AppResult<()> {
    write_json(path, report).await
}
