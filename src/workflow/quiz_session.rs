//! 答题会话 - 流程层
//!
//! 核心职责：管理"一次答题"的完整生命周期
//!
//! 状态流转（单向）：
//! ```text
//! NotStarted --start()--> InProgress --submit() / 倒计时归零--> Submitted
//! ```
//!
//! - 所有操作都是同步的状态变更，不阻塞
//! - 非法操作（未开始就作答、给未作答的题加复查标记等）静默忽略，返回 `false`
//! - 计时由外部每秒调用一次 `tick()` 驱动，见 `infrastructure::countdown`
//! - 提交时生成一次成绩单并冻结，此后不再接受任何修改

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::question::{OptionLetter, Question, QuizData};
use crate::models::report::QuizReport;
use crate::services::scoring;

/// 可配置时长下限（分钟）
pub const MIN_TIME_LIMIT_MINUTES: u32 = 5;
/// 可配置时长上限（分钟）
pub const MAX_TIME_LIMIT_MINUTES: u32 = 180;
/// 默认每题分钟数
pub const DEFAULT_MINUTES_PER_QUESTION: u32 = 2;

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Submitted,
}

/// 一次 `tick()` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 不在计时状态（未开始 / 已暂停 / 已提交）
    Idle,
    /// 正常走秒，附带剩余秒数
    Running(u32),
    /// 时间耗尽，已自动提交
    Expired,
}

/// 会话快照，供展示层渲染
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub paused: bool,
    pub current_index: usize,
    pub current_question_number: Option<u32>,
    pub total_questions: usize,
    pub time_limit_minutes: u32,
    pub time_remaining_seconds: u32,
    pub answers: BTreeMap<u32, OptionLetter>,
    pub visited: BTreeSet<u32>,
    pub marked_for_review: BTreeSet<u32>,
}

/// 把时长限制在 [5, 180] 分钟
pub fn clamp_time_limit(minutes: u32) -> u32 {
    minutes.clamp(MIN_TIME_LIMIT_MINUTES, MAX_TIME_LIMIT_MINUTES)
}

/// 答题会话
///
/// 独占自己的状态，题目数据只读
#[derive(Debug)]
pub struct QuizSession {
    quiz: QuizData,
    answers: BTreeMap<u32, OptionLetter>,
    visited: BTreeSet<u32>,
    marked_for_review: BTreeSet<u32>,
    current_index: usize,
    time_limit_minutes: u32,
    time_remaining_seconds: u32,
    phase: SessionPhase,
    paused: bool,
    report: Option<QuizReport>,
}

impl QuizSession {
    /// 创建新会话，默认时长为每题 2 分钟
    pub fn new(quiz: QuizData) -> Self {
        let minutes = DEFAULT_MINUTES_PER_QUESTION.saturating_mul(quiz.questions.len() as u32);
        Self {
            quiz,
            answers: BTreeMap::new(),
            visited: BTreeSet::new(),
            marked_for_review: BTreeSet::new(),
            current_index: 0,
            time_limit_minutes: minutes,
            time_remaining_seconds: minutes.saturating_mul(60),
            phase: SessionPhase::NotStarted,
            paused: false,
            report: None,
        }
    }

    /// 创建会话并指定时长（分钟，超出范围会被截断）
    pub fn with_time_limit(quiz: QuizData, minutes: u32) -> Self {
        let mut session = Self::new(quiz);
        session.set_time_limit(minutes);
        session
    }

    // ========== 配置 ==========

    /// 设置时长，只在开始前有效
    pub fn set_time_limit(&mut self, minutes: u32) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }
        let clamped = clamp_time_limit(minutes);
        if clamped != minutes {
            debug!("[会话] 时长 {} 分钟超出范围，调整为 {} 分钟", minutes, clamped);
        }
        self.time_limit_minutes = clamped;
        self.time_remaining_seconds = clamped * 60;
        true
    }

    // ========== 状态流转 ==========

    /// 开始答题，同时开始计时
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.quiz.is_empty() {
            return Err(SessionError::EmptyQuiz);
        }
        if self.phase != SessionPhase::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        self.phase = SessionPhase::InProgress;
        info!(
            "[会话] 开始答题：{} 道题，限时 {} 分钟",
            self.quiz.questions.len(),
            self.time_limit_minutes
        );
        Ok(())
    }

    /// 手动提交
    pub fn submit(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        self.finish(false);
        true
    }

    /// 时钟走一秒，归零时自动提交
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::InProgress || self.paused {
            return TickOutcome::Idle;
        }
        self.time_remaining_seconds = self.time_remaining_seconds.saturating_sub(1);
        if self.time_remaining_seconds == 0 {
            info!("[会话] ⏰ 时间到，自动提交");
            self.finish(true);
            return TickOutcome::Expired;
        }
        TickOutcome::Running(self.time_remaining_seconds)
    }

    /// 暂停计时
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress || self.paused {
            return false;
        }
        self.paused = true;
        true
    }

    /// 恢复计时
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress || !self.paused {
            return false;
        }
        self.paused = false;
        true
    }

    // ========== 作答操作 ==========

    /// 作答（覆盖已有答案），同时标记为已访问
    pub fn select_answer(&mut self, question_number: u32, letter: OptionLetter) -> bool {
        if !self.is_in_progress() || !self.has_question(question_number) {
            return false;
        }
        self.answers.insert(question_number, letter);
        self.visited.insert(question_number);
        debug!("[会话] 第 {} 题作答 {}", question_number, letter);
        true
    }

    /// 给当前题作答
    pub fn answer_current(&mut self, letter: OptionLetter) -> bool {
        match self.current_question_number() {
            Some(number) => self.select_answer(number, letter),
            None => false,
        }
    }

    /// 跳转到任意题（不要求相邻）
    pub fn navigate_to(&mut self, index: usize) -> bool {
        if !self.is_in_progress() {
            return false;
        }
        let Some(number) = self.quiz.question_at(index).map(|q| q.question_number) else {
            return false;
        };
        self.current_index = index;
        self.visited.insert(number);
        true
    }

    /// 切换当前题的复查标记，只有已作答的题可以标记
    pub fn toggle_review_mark(&mut self) -> bool {
        if !self.is_in_progress() {
            return false;
        }
        let Some(number) = self.current_question_number() else {
            return false;
        };
        if !self.answers.contains_key(&number) {
            return false;
        }
        if !self.marked_for_review.remove(&number) {
            self.marked_for_review.insert(number);
        }
        true
    }

    /// 清除当前题：答案、访问记录、复查标记一起清掉
    pub fn clear_answer(&mut self) -> bool {
        if !self.is_in_progress() {
            return false;
        }
        let Some(number) = self.current_question_number() else {
            return false;
        };
        self.answers.remove(&number);
        self.visited.remove(&number);
        self.marked_for_review.remove(&number);
        true
    }

    /// 保存并进入下一题，已经是最后一题时不动
    pub fn save_and_advance(&mut self) -> bool {
        if !self.is_in_progress() {
            return false;
        }
        let next = self.current_index + 1;
        if next >= self.quiz.questions.len() {
            return false;
        }
        self.navigate_to(next)
    }

    /// 回到上一题，不记录访问
    pub fn previous(&mut self) -> bool {
        if !self.is_in_progress() || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        true
    }

    // ========== 查询 ==========

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == SessionPhase::InProgress
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == SessionPhase::Submitted
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn quiz(&self) -> &QuizData {
        &self.quiz
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.question_at(self.current_index)
    }

    pub fn current_question_number(&self) -> Option<u32> {
        self.current_question().map(|q| q.question_number)
    }

    pub fn answers(&self) -> &BTreeMap<u32, OptionLetter> {
        &self.answers
    }

    pub fn answer_for(&self, question_number: u32) -> Option<OptionLetter> {
        self.answers.get(&question_number).copied()
    }

    pub fn visited(&self) -> &BTreeSet<u32> {
        &self.visited
    }

    pub fn marked_for_review(&self) -> &BTreeSet<u32> {
        &self.marked_for_review
    }

    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes
    }

    pub fn time_remaining_seconds(&self) -> u32 {
        self.time_remaining_seconds
    }

    /// 提交后的成绩单
    pub fn report(&self) -> Option<&QuizReport> {
        self.report.as_ref()
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            paused: self.paused,
            current_index: self.current_index,
            current_question_number: self.current_question_number(),
            total_questions: self.quiz.questions.len(),
            time_limit_minutes: self.time_limit_minutes,
            time_remaining_seconds: self.time_remaining_seconds,
            answers: self.answers.clone(),
            visited: self.visited.clone(),
            marked_for_review: self.marked_for_review.clone(),
        }
    }

    // ========== 内部 ==========

    fn has_question(&self, question_number: u32) -> bool {
        self.quiz
            .questions
            .iter()
            .any(|q| q.question_number == question_number)
    }

    /// 进入 Submitted 并冻结成绩单
    fn finish(&mut self, auto_submitted: bool) {
        let results =
            scoring::grade_questions(&self.quiz, &self.answers, &self.marked_for_review);
        let score_data = scoring::summarize(&results);

        self.phase = SessionPhase::Submitted;
        self.paused = false;
        self.report = Some(QuizReport {
            results,
            score_data,
            time_remaining_seconds: self.time_remaining_seconds,
            auto_submitted,
        });

        info!(
            "[会话] 已提交：得分 {} / {}（{}%），答对 {}，答错 {}，未作答 {}",
            score_data.score,
            score_data.max_score,
            scoring::percentage(&score_data),
            score_data.correct,
            score_data.incorrect,
            score_data.unattempted
        );
    }
}
