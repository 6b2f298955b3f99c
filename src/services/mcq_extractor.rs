//! 选择题解析服务 - 业务能力层
//!
//! 只负责"把一段松散排版的文本变成结构化题目"，不关心文件从哪来、题目怎么考。
//!
//! ## 解析流程
//! 1. 清洗控制字符，切成非空行
//! 2. 只有一行时，按题号 / 选项 / 答案表 / 分区标题重新断行
//! 3. 逐行分类，在"题目区"和"答案区"两个区域之间单向切换
//! 4. 只保留恰好 4 个选项的题目，最多 30 道，重新编号并同步答案表
//!
//! 解析是尽力而为的：格式不对的题目和答案行会被静默丢弃，不会报错。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::question::{AnswerKey, OptionLetter, Question, QuizData, OPTIONS_PER_QUESTION};
use crate::services::text_cleaner::{normalize_text, split_lines};

/// 最多保留的题目数量
pub const MAX_QUESTIONS: usize = 30;

/// 题目区里需要跳过的分区 / 标题关键字
const NOISE_KEYWORDS: &[&str] = &[
    "SECTION",
    "QUANTITATIVE",
    "REASONING",
    "GENERAL KNOWLEDGE",
    "PRACTICE TEST",
    "TOTAL QUESTIONS",
];

static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s*(.+)$").expect("question pattern"));

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-D])\)\s*(.+)$").expect("option pattern"));

static ANSWER_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Q?\s*(\d+)\s*[.):\-]?\s*\(?([A-D])\)?$").expect("answer line pattern")
});

/// 答案表标题，单词之间允许任意空白
static ANSWER_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)answer\s+key").expect("answer key pattern"));

/// 单行文本的断行点：题号、选项、答案表、分区标题
static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\d+\.\s|[A-D]\)\s|(?i:answer\s+key|logical\s+reasoning|quantitative\s+aptitude|general\s+knowledge|section|reasoning)",
    )
    .expect("split pattern")
});

/// 当前所在区域，只能从题目区进入答案区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Questions,
    AnswerKey,
}

/// 一行文本的分类结果
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    AnswerKeyHeader,
    QuestionStart { number: u32, text: &'a str },
    OptionLine { text: &'a str },
    Noise,
    Other,
}

/// 正在累积的题目
#[derive(Debug)]
struct PendingQuestion {
    number: u32,
    text: String,
    options: Vec<String>,
}

/// 一次解析的统计，用于日志
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStats {
    pub lines: usize,
    pub single_line_recovered: bool,
    pub complete_questions: usize,
    pub dropped_incomplete: usize,
    pub truncated: usize,
    pub answer_lines: usize,
}

/// 选择题解析器
///
/// 职责：
/// - 文本 -> `QuizData`
/// - 纯函数，不持有状态，同一输入总是得到同一输出
#[derive(Debug, Clone)]
pub struct McqExtractor {
    max_questions: usize,
}

impl McqExtractor {
    pub fn new() -> Self {
        Self {
            max_questions: MAX_QUESTIONS,
        }
    }

    /// 解析文本
    pub fn extract(&self, text: &str) -> QuizData {
        self.extract_with_stats(text).0
    }

    /// 解析文本并返回统计信息
    pub fn extract_with_stats(&self, text: &str) -> (QuizData, ExtractionStats) {
        let mut stats = ExtractionStats::default();

        let cleaned = normalize_text(text);
        let mut lines = split_lines(&cleaned);

        if lines.len() == 1 {
            lines = recover_single_line(&lines[0]);
            stats.single_line_recovered = true;
        }
        stats.lines = lines.len();

        let mut region = Region::Questions;
        let mut questions: Vec<PendingQuestion> = Vec::new();
        let mut answer_key = AnswerKey::new();
        let mut current: Option<PendingQuestion> = None;

        for line in &lines {
            if region == Region::AnswerKey {
                if let Some((number, letter)) = parse_answer_line(line) {
                    stats.answer_lines += 1;
                    answer_key.entry(number).or_insert(letter);
                }
                continue;
            }

            match classify(line) {
                LineKind::AnswerKeyHeader => {
                    region = Region::AnswerKey;
                }
                LineKind::Noise => {}
                LineKind::QuestionStart { number, text } => {
                    flush(current.take(), &mut questions, &mut stats);
                    current = Some(PendingQuestion {
                        number,
                        text: text.trim().to_string(),
                        options: Vec::with_capacity(OPTIONS_PER_QUESTION),
                    });
                }
                LineKind::OptionLine { text } => {
                    if let Some(q) = current.as_mut() {
                        if q.options.len() < OPTIONS_PER_QUESTION && !contains_noise(text) {
                            q.options.push(text.trim().to_string());
                        }
                    }
                }
                LineKind::Other => {
                    if let Some(q) = current.as_mut() {
                        if q.options.is_empty() {
                            q.text.push(' ');
                            q.text.push_str(line);
                        }
                    }
                }
            }
        }
        flush(current.take(), &mut questions, &mut stats);

        if questions.len() > self.max_questions {
            stats.truncated = questions.len() - self.max_questions;
            questions.truncate(self.max_questions);
        }

        let data = renumber(questions, &answer_key);

        debug!(
            "[解析] 行数 {}，单行恢复 {}，完整题目 {}，丢弃 {}，截断 {}，答案行 {}",
            stats.lines,
            stats.single_line_recovered,
            stats.complete_questions,
            stats.dropped_incomplete,
            stats.truncated,
            stats.answer_lines
        );

        (data, stats)
    }
}

impl Default for McqExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 使用默认配置解析文本
pub fn extract_quiz(text: &str) -> QuizData {
    McqExtractor::new().extract(text)
}

fn contains_noise(text: &str) -> bool {
    let upper = text.to_uppercase();
    NOISE_KEYWORDS.iter().any(|k| upper.contains(k))
}

fn classify(line: &str) -> LineKind<'_> {
    if ANSWER_KEY_RE.is_match(line) {
        return LineKind::AnswerKeyHeader;
    }

    if let Some(caps) = QUESTION_RE.captures(line) {
        if let (Some(number), Some(text)) = (caps.get(1), caps.get(2)) {
            if let Ok(number) = number.as_str().parse::<u32>() {
                return LineKind::QuestionStart {
                    number,
                    text: text.as_str(),
                };
            }
        }
    }

    if let Some(text) = OPTION_RE.captures(line).and_then(|caps| caps.get(2)) {
        return LineKind::OptionLine {
            text: text.as_str(),
        };
    }

    if contains_noise(line) {
        return LineKind::Noise;
    }

    LineKind::Other
}

/// 解析答案行，例如 `1. B`、`Q2: c`、`3-D`、`4 (A)`
fn parse_answer_line(line: &str) -> Option<(u32, OptionLetter)> {
    let caps = ANSWER_LINE_RE.captures(line)?;
    let number = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let letter = caps
        .get(2)?
        .as_str()
        .chars()
        .next()
        .and_then(OptionLetter::from_char)?;
    Some((number, letter))
}

/// 整篇文本挤在一行时，在每个断行点前插入换行后重新切分
fn recover_single_line(line: &str) -> Vec<String> {
    let split = SPLIT_RE.replace_all(line, "\n${0}");
    split_lines(&split)
}

/// 只有恰好 4 个选项的题目才会被保留
fn flush(pending: Option<PendingQuestion>, out: &mut Vec<PendingQuestion>, stats: &mut ExtractionStats) {
    let Some(q) = pending else {
        return;
    };
    if q.options.len() == OPTIONS_PER_QUESTION {
        stats.complete_questions += 1;
        out.push(q);
    } else {
        debug!(
            "[解析] 丢弃题目 {}：只有 {} 个选项",
            q.number,
            q.options.len()
        );
        stats.dropped_incomplete += 1;
    }
}

/// 从 1 开始重新编号，答案表跟着题目从原题号搬到新题号
fn renumber(questions: Vec<PendingQuestion>, source_key: &AnswerKey) -> QuizData {
    let mut answer_key = AnswerKey::new();
    let mut renumbered = Vec::with_capacity(questions.len());

    for (idx, q) in questions.into_iter().enumerate() {
        let new_number = idx as u32 + 1;
        if let Some(letter) = source_key.get(&q.number) {
            answer_key.insert(new_number, *letter);
        }
        renumbered.push(Question {
            question_number: new_number,
            question: q.text,
            options: q.options,
        });
    }

    QuizData::new(renumbered, answer_key)
}
