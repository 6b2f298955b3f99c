//! 答题编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、读取题目文件、解析题目
//! 2. **会话驱动**：把终端指令交给 `QuizSession`，同时把倒计时信号转成 `tick()`
//! 3. **资源管理**：只在答题进行中持有 `Countdown`，交卷或退出时立即停止
//! 4. **结果输出**：打印成绩、追加日志、按配置保存成绩单
//!
//! 会话本身不知道时间和终端的存在，所有 IO 都留在这一层。

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ConfigError;
use crate::infrastructure::Countdown;
use crate::models::loaders::{extract_quiz_from_file, save_quiz_data, save_report};
use crate::models::question::QuizData;
use crate::models::report::QuizReport;
use crate::orchestrator::command::{CommandEffect, SessionCommand, HELP_TEXT};
use crate::utils::logging;
use crate::workflow::quiz_session::{QuizSession, SessionPhase, TickOutcome};
use crate::workflow::session_view::{self, QuestionStatus};

/// 应用主结构
pub struct App {
    config: Config,
    input_file: PathBuf,
    quiz: QuizData,
}

impl App {
    /// 初始化应用：读取并解析题目文件
    pub async fn initialize(config: Config) -> Result<Self> {
        let input_file = config
            .input_file
            .clone()
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingInputFile)?;

        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;
        logging::log_startup(&input_file.display().to_string());

        let quiz = extract_quiz_from_file(&input_file).await?;

        if let Some(path) = &config.quiz_data_file {
            save_quiz_data(Path::new(path), &quiz)
                .await
                .with_context(|| format!("无法保存题目数据: {}", path))?;
            info!("💾 题目数据已保存至: {}", path);
        }

        Ok(Self {
            config,
            input_file,
            quiz,
        })
    }

    pub fn quiz(&self) -> &QuizData {
        &self.quiz
    }

    /// 按配置创建新会话
    pub fn new_session(&self) -> QuizSession {
        match self.config.effective_time_limit() {
            Some(minutes) => QuizSession::with_time_limit(self.quiz.clone(), minutes),
            None => QuizSession::new(self.quiz.clone()),
        }
    }

    /// 运行应用主逻辑：从标准输入读取指令
    pub async fn run(&self) -> Result<Option<QuizReport>> {
        let session = self.new_session();
        logging::log_quiz_loaded(
            self.quiz.total_questions,
            self.quiz.answer_key.len(),
            session.time_limit_minutes(),
        );

        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        let report = run_session(session, stdin, &mut stdout).await?;

        match &report {
            Some(report) => self.finish(report).await?,
            None => warn!("⚠️ 未交卷退出，本次作答已丢弃"),
        }

        Ok(report)
    }

    /// 输出并保存成绩
    async fn finish(&self, report: &QuizReport) -> Result<()> {
        logging::append_report(
            &self.config.output_log_file,
            &self.input_file.display().to_string(),
            report,
        )?;

        if let Some(path) = &self.config.report_file {
            save_report(Path::new(path), report)
                .await
                .with_context(|| format!("无法保存成绩单: {}", path))?;
            info!("💾 成绩单已保存至: {}", path);
        }

        logging::print_final_stats(report, &self.config.output_log_file);
        Ok(())
    }
}

/// 一次循环等到的事件
enum Event {
    Line(Option<String>),
    Tick(Option<()>),
}

/// 驱动一次答题会话直到交卷或输入结束
///
/// - 倒计时只在 InProgress 期间存在
/// - 输入结束或 `quit` 视为放弃，返回 None
pub async fn run_session<R, W>(
    mut session: QuizSession,
    input: R,
    out: &mut W,
) -> Result<Option<QuizReport>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut clock: Option<(Countdown, mpsc::Receiver<()>)> = None;

    render_intro(&session, out)?;

    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            tick = next_tick(&mut clock) => Event::Tick(tick),
        };

        match event {
            Event::Line(None) => break,
            Event::Line(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let Some(command) = SessionCommand::parse(&line) else {
                    writeln!(out, "无法识别的指令: {}（输入 help 查看帮助）", line.trim())?;
                    continue;
                };
                if command == SessionCommand::Quit {
                    break;
                }

                match command.apply(&mut session) {
                    CommandEffect::Applied => {
                        if command == SessionCommand::Start {
                            clock = Some(Countdown::start());
                        }
                        match session.phase() {
                            SessionPhase::NotStarted => render_intro(&session, out)?,
                            SessionPhase::InProgress => render_question(&session, out)?,
                            SessionPhase::Submitted => {}
                        }
                    }
                    CommandEffect::Ignored => {
                        writeln!(out, "当前状态下该操作无效")?;
                    }
                    CommandEffect::Rejected(reason) => {
                        writeln!(out, "{}", reason)?;
                    }
                    CommandEffect::Display => match command {
                        SessionCommand::Help => writeln!(out, "{}", HELP_TEXT)?,
                        _ => render_status(&session, out)?,
                    },
                }
            }
            Event::Tick(None) => {
                clock = None;
            }
            Event::Tick(Some(())) => match session.tick() {
                TickOutcome::Expired => {
                    writeln!(out, "⏰ 时间到，已自动交卷")?;
                }
                TickOutcome::Running(remaining) if remaining % 60 == 0 => {
                    writeln!(out, "⏱️ 剩余时间 {}", session_view::format_clock(remaining))?;
                }
                _ => {}
            },
        }

        if session.is_submitted() {
            break;
        }
    }

    // 交卷或退出后停止计时
    if let Some((countdown, _rx)) = clock.take() {
        countdown.stop();
    }

    let report = session.report().cloned();
    if let Some(report) = &report {
        render_report(report, out)?;
    }
    Ok(report)
}

async fn next_tick(clock: &mut Option<(Countdown, mpsc::Receiver<()>)>) -> Option<()> {
    match clock {
        Some((_, rx)) => rx.recv().await,
        None => std::future::pending().await,
    }
}

// ========== 终端显示 ==========

fn render_intro<W: Write>(session: &QuizSession, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "共 {} 道题，限时 {} 分钟。输入 start 开始，help 查看指令。",
        session.quiz().questions.len(),
        session.time_limit_minutes()
    )?;
    Ok(())
}

fn render_question<W: Write>(session: &QuizSession, out: &mut W) -> Result<()> {
    let Some(question) = session.current_question() else {
        return Ok(());
    };
    let chosen = session.answer_for(question.question_number);

    writeln!(
        out,
        "\n[{}/{}] 剩余 {}{}",
        session.current_index() + 1,
        session.quiz().questions.len(),
        session_view::format_clock(session.time_remaining_seconds()),
        if session.is_paused() { "（已暂停）" } else { "" }
    )?;
    writeln!(out, "Q{}. {}", question.question_number, question.question)?;
    for (letter, text) in question.lettered_options() {
        let marker = if chosen == Some(letter) { "●" } else { " " };
        writeln!(out, " {} {}) {}", marker, letter, text)?;
    }
    if session.marked_for_review().contains(&question.question_number) {
        writeln!(out, "🔖 已标记复查")?;
    }
    Ok(())
}

fn render_status<W: Write>(session: &QuizSession, out: &mut W) -> Result<()> {
    let counters = session_view::counters(session);
    let phase = match session.phase() {
        SessionPhase::NotStarted => "未开始",
        SessionPhase::InProgress => "答题中",
        SessionPhase::Submitted => "已交卷",
    };
    writeln!(
        out,
        "{} | 剩余 {} | 已答 {} | 复查 {} | 已看 {} | 未看 {}",
        phase,
        session_view::format_clock(session.time_remaining_seconds()),
        counters.answered,
        counters.marked_for_review,
        counters.visited,
        counters.unvisited
    )?;

    let palette: Vec<String> = session_view::question_palette(session)
        .iter()
        .map(|entry| {
            let symbol = match entry.status {
                QuestionStatus::MarkedForReview => "R",
                QuestionStatus::Answered => "✓",
                QuestionStatus::VisitedUnanswered => "!",
                QuestionStatus::NotVisited => "·",
            };
            if entry.is_current {
                format!("[{}{}]", entry.question_number, symbol)
            } else {
                format!("{}{}", entry.question_number, symbol)
            }
        })
        .collect();
    writeln!(out, "{}", palette.join(" "))?;
    Ok(())
}

fn render_report<W: Write>(report: &QuizReport, out: &mut W) -> Result<()> {
    let data = &report.score_data;
    writeln!(out, "\n===== 成绩 =====")?;
    writeln!(out, "{}%  得分 {} / {}", report.percentage(), data.score, data.max_score)?;
    writeln!(
        out,
        "总题数 {} | 已答 {} | 答对 {} | 答错 {}",
        data.total_questions, data.attempted, data.correct, data.incorrect
    )?;
    writeln!(out, "{}", report.performance())?;

    for result in &report.results {
        let user = result.user_answer.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string());
        let correct = result
            .correct_answer
            .map(|l| l.to_string())
            .unwrap_or_else(|| "?".to_string());
        writeln!(
            out,
            "Q{}. {} | 作答 {} | 正确 {} | {}{}",
            result.question_number,
            logging::truncate_text(&result.question, 40),
            user,
            correct,
            result.marks_label(),
            if result.is_marked_for_review { "（复查）" } else { "" }
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mcq_extractor::extract_quiz;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    const TWO_QUESTIONS: &str = "1. What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\n\
        2. Capital of France?\nA) Rome\nB) Paris\nC) Oslo\nD) Bern\n\
        ANSWER KEY\n1. B\n2. B";

    fn session() -> QuizSession {
        QuizSession::new(extract_quiz(TWO_QUESTIONS))
    }

    #[tokio::test]
    async fn test_scripted_session() {
        let input: &[u8] = b"b\nstart\nb\nnext\na\nmark\nstatus\nsubmit\n";
        let mut out = Vec::new();

        let report = run_session(session(), input, &mut out)
            .await
            .unwrap()
            .expect("report");

        assert_eq!(report.score_data.correct, 1);
        assert_eq!(report.score_data.incorrect, 1);
        assert_eq!(report.score_data.score, 1.5);
        assert_eq!(report.percentage(), 38);
        assert!(report.results[1].is_marked_for_review);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("当前状态下该操作无效"));
        assert!(text.contains("Capital of France?"));
        assert!(text.contains("===== 成绩 ====="));
    }

    #[tokio::test]
    async fn test_quit_discards_session() {
        let input: &[u8] = b"start\na\nquit\n";
        let mut out = Vec::new();

        let report = run_session(session(), input, &mut out).await.unwrap();
        assert!(report.is_none());
    }

    #[tokio::test]
    async fn test_empty_quiz_rejected() {
        let input: &[u8] = b"start\n";
        let mut out = Vec::new();

        let report = run_session(QuizSession::new(QuizData::default()), input, &mut out)
            .await
            .unwrap();
        assert!(report.is_none());
        assert!(String::from_utf8(out).unwrap().contains("题目为空"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_auto_submits() {
        let (mut writer, reader) = tokio::io::duplex(64);
        writer.write_all(b"time 5\nstart\nb\n").await.unwrap();

        let mut out = Vec::new();
        let run = run_session(session(), BufReader::new(reader), &mut out);
        let report = tokio::time::timeout(Duration::from_secs(301), run)
            .await
            .expect("auto submit before timeout")
            .unwrap()
            .expect("report");

        assert!(report.auto_submitted);
        assert_eq!(report.time_remaining_seconds, 0);
        assert_eq!(report.score_data.correct, 1);
        assert_eq!(report.score_data.unattempted, 1);
        drop(writer);
    }
}
