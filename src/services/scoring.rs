//! 判分服务 - 业务能力层
//!
//! 只包含纯函数：输入题目、作答和复查标记，输出成绩。
//! 百分比、档位这类展示数据都从这里现算，不单独保存。

use std::collections::{BTreeMap, BTreeSet};

use crate::models::question::{OptionLetter, QuizData};
use crate::models::report::{Performance, QuestionResult, ScoreData};

/// 答对得分
pub const CORRECT_MARKS: f64 = 2.0;
/// 答错扣分
pub const INCORRECT_PENALTY: f64 = 0.5;

/// 逐题判分
pub fn grade_questions(
    quiz: &QuizData,
    answers: &BTreeMap<u32, OptionLetter>,
    marked_for_review: &BTreeSet<u32>,
) -> Vec<QuestionResult> {
    quiz.questions
        .iter()
        .map(|q| {
            let user_answer = answers.get(&q.question_number).copied();
            let correct_answer = quiz.correct_answer(q.question_number);
            let is_attempted = user_answer.is_some();
            // 答案表缺失时 correct_answer 为 None，永远不会判对
            let is_correct = is_attempted && correct_answer.is_some() && user_answer == correct_answer;

            QuestionResult {
                question_number: q.question_number,
                question: q.question.clone(),
                options: q.options.clone(),
                user_answer,
                correct_answer,
                is_correct,
                is_attempted,
                is_marked_for_review: marked_for_review.contains(&q.question_number),
            }
        })
        .collect()
}

/// 汇总：score = 2 × 答对 - 0.5 × 答错，满分 = 2 × 题数
pub fn summarize(results: &[QuestionResult]) -> ScoreData {
    let total_questions = results.len();
    let attempted = results.iter().filter(|r| r.is_attempted).count();
    let correct = results.iter().filter(|r| r.is_correct).count();
    let incorrect = attempted - correct;
    let unattempted = total_questions - attempted;

    ScoreData {
        total_questions,
        attempted,
        correct,
        incorrect,
        unattempted,
        score: CORRECT_MARKS * correct as f64 - INCORRECT_PENALTY * incorrect as f64,
        max_score: CORRECT_MARKS * total_questions as f64,
    }
}

/// 得分百分比，四舍五入（.5 向上取整），不截断负数
///
/// 满分为 0 时返回 0
pub fn percentage(score_data: &ScoreData) -> i64 {
    score_data.percentage()
}

/// 成绩档位
pub fn performance(score_data: &ScoreData) -> Performance {
    score_data.performance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{AnswerKey, Question};

    fn quiz(n: u32, key: &[(u32, OptionLetter)]) -> QuizData {
        let questions = (1..=n)
            .map(|i| Question {
                question_number: i,
                question: format!("Q{}?", i),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            })
            .collect();
        let answer_key: AnswerKey = key.iter().copied().collect();
        QuizData::new(questions, answer_key)
    }

    #[test]
    fn test_one_correct_one_wrong() {
        let quiz = quiz(2, &[(1, OptionLetter::A), (2, OptionLetter::B)]);
        let answers = BTreeMap::from([(1, OptionLetter::A), (2, OptionLetter::C)]);

        let results = grade_questions(&quiz, &answers, &BTreeSet::new());
        let data = summarize(&results);

        assert_eq!(data.score, 1.5);
        assert_eq!(data.max_score, 4.0);
        assert_eq!(percentage(&data), 38);
        assert_eq!(data.correct + data.incorrect + data.unattempted, data.total_questions);
    }

    #[test]
    fn test_missing_key_never_correct() {
        let quiz = quiz(2, &[(1, OptionLetter::A)]);
        let answers = BTreeMap::from([(2, OptionLetter::A)]);

        let results = grade_questions(&quiz, &answers, &BTreeSet::new());
        assert!(!results[0].is_attempted);
        assert!(!results[0].is_correct);
        assert!(results[1].is_attempted);
        assert!(!results[1].is_correct);
        assert_eq!(results[1].correct_answer, None);
        assert_eq!(results[1].marks(), -0.5);
    }

    #[test]
    fn test_negative_percentage_unclamped() {
        let quiz = quiz(4, &[(1, OptionLetter::A), (2, OptionLetter::A)]);
        let answers = BTreeMap::from([(1, OptionLetter::B), (2, OptionLetter::B)]);

        let data = summarize(&grade_questions(&quiz, &answers, &BTreeSet::new()));
        assert_eq!(data.score, -1.0);
        assert_eq!(percentage(&data), -12);
        assert_eq!(performance(&data), Performance::KeepPracticing);
    }

    #[test]
    fn test_zero_max_score_guarded() {
        let data = summarize(&[]);
        assert_eq!(data.max_score, 0.0);
        assert_eq!(percentage(&data), 0);
    }

    #[test]
    fn test_review_flag_carried() {
        let quiz = quiz(1, &[(1, OptionLetter::D)]);
        let answers = BTreeMap::from([(1, OptionLetter::D)]);
        let marked = BTreeSet::from([1]);

        let results = grade_questions(&quiz, &answers, &marked);
        assert!(results[0].is_marked_for_review);
        assert_eq!(results[0].marks_label(), "+2 分");
    }

    #[test]
    fn test_performance_bands() {
        assert_eq!(Performance::from_percentage(80), Performance::Excellent);
        assert_eq!(Performance::from_percentage(79), Performance::Good);
        assert_eq!(Performance::from_percentage(60), Performance::Good);
        assert_eq!(Performance::from_percentage(59), Performance::KeepPracticing);
    }
}
