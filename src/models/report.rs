use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::models::question::OptionLetter;

/// 单题结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_number: u32,
    pub question: String,
    pub options: Vec<String>,
    pub user_answer: Option<OptionLetter>,
    /// 答案表中没有该题时为 None
    pub correct_answer: Option<OptionLetter>,
    pub is_correct: bool,
    pub is_attempted: bool,
    pub is_marked_for_review: bool,
}

impl QuestionResult {
    /// 本题得分：答对 +2，答错 -0.5，未作答 0
    pub fn marks(&self) -> f64 {
        if self.is_correct {
            2.0
        } else if self.is_attempted {
            -0.5
        } else {
            0.0
        }
    }

    /// 结果页上的标签
    pub fn marks_label(&self) -> &'static str {
        if !self.is_attempted {
            "未作答"
        } else if self.is_correct {
            "+2 分"
        } else {
            "-0.5 分"
        }
    }
}

/// 汇总统计
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreData {
    pub total_questions: usize,
    pub attempted: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unattempted: usize,
    pub score: f64,
    pub max_score: f64,
}

impl ScoreData {
    /// 得分百分比，四舍五入（.5 向上取整），不截断负数
    ///
    /// 满分为 0 时返回 0
    pub fn percentage(&self) -> i64 {
        if self.max_score <= 0.0 {
            return 0;
        }
        (100.0 * self.score / self.max_score + 0.5).floor() as i64
    }

    pub fn performance(&self) -> Performance {
        Performance::from_percentage(self.percentage())
    }
}

/// 成绩档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performance {
    Excellent,
    Good,
    KeepPracticing,
}

impl Performance {
    /// >=80 优秀，>=60 良好，其余继续练习
    pub fn from_percentage(percentage: i64) -> Self {
        if percentage >= 80 {
            Performance::Excellent
        } else if percentage >= 60 {
            Performance::Good
        } else {
            Performance::KeepPracticing
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Performance::Excellent => write!(f, "🎉 表现优秀！"),
            Performance::Good => write!(f, "👍 做得不错！"),
            Performance::KeepPracticing => write!(f, "💪 继续加油！"),
        }
    }
}

/// 提交时冻结的完整成绩单
///
/// 百分比和档位不单独保存，序列化时从 `score_data` 现算；
/// 读回时忽略这两个字段。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizReport {
    pub results: Vec<QuestionResult>,
    pub score_data: ScoreData,
    /// 剩余时间（秒），超时自动提交时为 0
    pub time_remaining_seconds: u32,
    pub auto_submitted: bool,
}

impl QuizReport {
    pub fn percentage(&self) -> i64 {
        self.score_data.percentage()
    }

    pub fn performance(&self) -> Performance {
        self.score_data.performance()
    }
}

impl Serialize for QuizReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QuizReport", 6)?;
        state.serialize_field("results", &self.results)?;
        state.serialize_field("scoreData", &self.score_data)?;
        state.serialize_field("percentage", &self.percentage())?;
        state.serialize_field("performance", &self.performance())?;
        state.serialize_field("timeRemainingSeconds", &self.time_remaining_seconds)?;
        state.serialize_field("autoSubmitted", &self.auto_submitted)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(correct: usize, incorrect: usize, total: usize) -> QuizReport {
        QuizReport {
            results: Vec::new(),
            score_data: ScoreData {
                total_questions: total,
                attempted: correct + incorrect,
                correct,
                incorrect,
                unattempted: total - correct - incorrect,
                score: 2.0 * correct as f64 - 0.5 * incorrect as f64,
                max_score: 2.0 * total as f64,
            },
            time_remaining_seconds: 0,
            auto_submitted: false,
        }
    }

    #[test]
    fn test_percentage_follows_score_data() {
        let mut report = report(1, 1, 2);
        assert_eq!(report.percentage(), 38);
        assert_eq!(report.performance(), Performance::KeepPracticing);

        report.score_data.score = 4.0;
        assert_eq!(report.percentage(), 100);
        assert_eq!(report.performance(), Performance::Excellent);
    }

    #[test]
    fn test_json_carries_derived_fields() {
        let report = report(4, 0, 5);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["percentage"], 80);
        assert_eq!(json["performance"], "Excellent");
        assert_eq!(json["scoreData"]["maxScore"], 10.0);

        let back: QuizReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
