use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、日志文件和输出格式化的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::report::QuizReport;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n答题日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 把成绩追加到日志文件
pub fn append_report(log_file_path: &str, source: &str, report: &QuizReport) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    let data = &report.score_data;
    writeln!(
        file,
        "[{}] {} | 得分 {} / {} ({}%) | 答对 {} | 答错 {} | 未作答 {} | {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        source,
        data.score,
        data.max_score,
        report.percentage(),
        data.correct,
        data.incorrect,
        data.unattempted,
        if report.auto_submitted { "超时自动提交" } else { "手动提交" }
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(input_file: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 选择题练习模式");
    info!("📄 题目文件: {}", input_file);
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
pub fn log_quiz_loaded(total: usize, answers: usize, minutes: u32) {
    info!("✓ 解析出 {} 道题，答案 {} 条", total, answers);
    if answers < total {
        info!("💡 有 {} 道题缺少答案，作答后只会被判为错误或未作答", total - answers);
    }
    info!("⏱️ 限时 {} 分钟\n", minutes);
}

/// 打印最终成绩
pub fn print_final_stats(report: &QuizReport, log_file_path: &str) {
    let data = &report.score_data;
    info!("\n{}", "=".repeat(60));
    info!("📊 答题结果");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🎯 得分: {} / {} ({}%)", data.score, data.max_score, report.percentage());
    info!("✅ 答对: {}", data.correct);
    info!("❌ 答错: {}", data.incorrect);
    info!("⬜ 未作答: {}", data.unattempted);
    info!("{}", report.performance());
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("中文题干很长", 2), "中文...");
    }

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }
}
