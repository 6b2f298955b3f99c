//! 会话展示数据
//!
//! 题号面板颜色、计数、倒计时文本都由会话当前状态现算，不存储。

use serde::Serialize;

use crate::workflow::quiz_session::QuizSession;

/// 题号面板上的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionStatus {
    /// 已作答且标记复查（优先显示）
    MarkedForReview,
    /// 已作答
    Answered,
    /// 看过但没作答
    VisitedUnanswered,
    /// 没看过
    NotVisited,
}

/// 面板上的一格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub index: usize,
    pub question_number: u32,
    pub status: QuestionStatus,
    pub is_current: bool,
}

/// 顶部计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    pub answered: usize,
    pub marked_for_review: usize,
    pub visited: usize,
    pub unvisited: usize,
}

/// 某道题的面板状态
pub fn question_status(session: &QuizSession, question_number: u32) -> QuestionStatus {
    if session.marked_for_review().contains(&question_number) {
        QuestionStatus::MarkedForReview
    } else if session.answers().contains_key(&question_number) {
        QuestionStatus::Answered
    } else if session.visited().contains(&question_number) {
        QuestionStatus::VisitedUnanswered
    } else {
        QuestionStatus::NotVisited
    }
}

/// 整个题号面板
pub fn question_palette(session: &QuizSession) -> Vec<PaletteEntry> {
    session
        .quiz()
        .questions
        .iter()
        .enumerate()
        .map(|(index, q)| PaletteEntry {
            index,
            question_number: q.question_number,
            status: question_status(session, q.question_number),
            is_current: index == session.current_index(),
        })
        .collect()
}

pub fn counters(session: &QuizSession) -> SessionCounters {
    let total = session.quiz().questions.len();
    let visited = session.visited().len();
    SessionCounters {
        answered: session.answers().len(),
        marked_for_review: session.marked_for_review().len(),
        visited,
        unvisited: total.saturating_sub(visited),
    }
}

/// 秒数格式化为 `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
