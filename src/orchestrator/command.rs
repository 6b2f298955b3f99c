//! 用户指令
//!
//! 把终端输入的一行文本解析成答题指令，再作用到会话上。

use crate::models::question::OptionLetter;
use crate::workflow::quiz_session::QuizSession;

/// 答题指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    /// 给当前题作答
    Answer(OptionLetter),
    /// 给指定题号作答
    AnswerQuestion(u32, OptionLetter),
    /// 跳到第 N 题（从 1 开始）
    Goto(usize),
    Next,
    Prev,
    Mark,
    Clear,
    Pause,
    Resume,
    TimeLimit(u32),
    Status,
    Submit,
    Help,
    Quit,
}

/// 指令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEffect {
    /// 状态已改变，需要重新显示
    Applied,
    /// 被会话忽略
    Ignored,
    /// 开始失败，附带原因
    Rejected(String),
    /// 只需显示信息
    Display,
}

impl SessionCommand {
    /// 解析一行输入，无法识别时返回 None
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let head = parts.next()?.to_lowercase();
        let arg1 = parts.next();
        let arg2 = parts.next();
        if parts.next().is_some() {
            return None;
        }

        let command = match (head.as_str(), arg1, arg2) {
            ("start" | "s", None, None) => SessionCommand::Start,
            ("next" | "n" | "save", None, None) => SessionCommand::Next,
            ("prev" | "p", None, None) => SessionCommand::Prev,
            ("mark" | "m" | "review", None, None) => SessionCommand::Mark,
            ("clear", None, None) => SessionCommand::Clear,
            ("pause", None, None) => SessionCommand::Pause,
            ("resume", None, None) => SessionCommand::Resume,
            ("status" | "st", None, None) => SessionCommand::Status,
            ("submit", None, None) => SessionCommand::Submit,
            ("help" | "h" | "?", None, None) => SessionCommand::Help,
            ("quit" | "q" | "exit", None, None) => SessionCommand::Quit,
            ("goto" | "g", Some(n), None) => SessionCommand::Goto(n.parse::<usize>().ok().filter(|n| *n > 0)?),
            ("time", Some(m), None) => SessionCommand::TimeLimit(m.parse::<u32>().ok()?),
            ("answer" | "ans", Some(n), Some(l)) => {
                SessionCommand::AnswerQuestion(n.parse::<u32>().ok()?, OptionLetter::parse(l)?)
            }
            (letter, None, None) => SessionCommand::Answer(OptionLetter::parse(letter)?),
            _ => return None,
        };
        Some(command)
    }

    /// 作用到会话上
    pub fn apply(self, session: &mut QuizSession) -> CommandEffect {
        let changed = match self {
            SessionCommand::Start => {
                return match session.start() {
                    Ok(()) => CommandEffect::Applied,
                    Err(e) => CommandEffect::Rejected(e.to_string()),
                };
            }
            SessionCommand::Answer(letter) => session.answer_current(letter),
            SessionCommand::AnswerQuestion(number, letter) => session.select_answer(number, letter),
            SessionCommand::Goto(position) => session.navigate_to(position - 1),
            SessionCommand::Next => session.save_and_advance(),
            SessionCommand::Prev => session.previous(),
            SessionCommand::Mark => session.toggle_review_mark(),
            SessionCommand::Clear => session.clear_answer(),
            SessionCommand::Pause => session.pause(),
            SessionCommand::Resume => session.resume(),
            SessionCommand::TimeLimit(minutes) => session.set_time_limit(minutes),
            SessionCommand::Submit => session.submit(),
            SessionCommand::Status | SessionCommand::Help | SessionCommand::Quit => {
                return CommandEffect::Display;
            }
        };

        if changed {
            CommandEffect::Applied
        } else {
            CommandEffect::Ignored
        }
    }
}

/// 帮助文本
pub const HELP_TEXT: &str = "\
指令：
  start            开始答题
  a / b / c / d    给当前题作答
  answer N X       给第 N 题作答
  goto N           跳到第 N 题
  next / prev      下一题 / 上一题
  mark             切换复查标记（需先作答）
  clear            清除当前题
  pause / resume   暂停 / 继续计时
  time M           设置时长（分钟，5-180，开始前有效）
  status           查看进度
  submit           交卷
  quit             退出（不保存）";
