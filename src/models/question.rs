use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 每道题固定的选项数量（A-D）
pub const OPTIONS_PER_QUESTION: usize = 4;

/// 选项字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; OPTIONS_PER_QUESTION] =
        [OptionLetter::A, OptionLetter::B, OptionLetter::C, OptionLetter::D];

    /// 选项在列表中的位置（A=0）
    pub fn index(self) -> usize {
        self as usize
    }

    /// 按位置取字母
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 从单个字符解析（大小写均可）
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLetter::A),
            'B' => Some(OptionLetter::B),
            'C' => Some(OptionLetter::C),
            'D' => Some(OptionLetter::D),
            _ => None,
        }
    }

    /// 从字符串解析，只接受恰好一个字母
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            OptionLetter::A => 'A',
            OptionLetter::B => 'B',
            OptionLetter::C => 'C',
            OptionLetter::D => 'D',
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// 一道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// 题号（重新编号后从 1 开始连续）
    pub question_number: u32,
    /// 题干
    pub question: String,
    /// 四个选项，按位置对应 A-D
    pub options: Vec<String>,
}

impl Question {
    /// 取某个字母对应的选项文本
    pub fn option(&self, letter: OptionLetter) -> Option<&str> {
        self.options.get(letter.index()).map(String::as_str)
    }

    /// 带字母的选项列表，用于展示
    pub fn lettered_options(&self) -> impl Iterator<Item = (OptionLetter, &str)> {
        self.options
            .iter()
            .enumerate()
            .filter_map(|(i, text)| OptionLetter::from_index(i).map(|l| (l, text.as_str())))
    }
}

/// 答案表：题号 -> 正确选项
pub type AnswerKey = BTreeMap<u32, OptionLetter>;

/// 解析器输出，会话引擎的输入
///
/// 创建之后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizData {
    pub questions: Vec<Question>,
    pub answer_key: AnswerKey,
    pub total_questions: usize,
}

impl QuizData {
    pub fn new(questions: Vec<Question>, answer_key: AnswerKey) -> Self {
        let total_questions = questions.len();
        Self {
            questions,
            answer_key,
            total_questions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn correct_answer(&self, question_number: u32) -> Option<OptionLetter> {
        self.answer_key.get(&question_number).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_letter_parse() {
        assert_eq!(OptionLetter::parse("b"), Some(OptionLetter::B));
        assert_eq!(OptionLetter::parse(" D "), Some(OptionLetter::D));
        assert_eq!(OptionLetter::parse("E"), None);
        assert_eq!(OptionLetter::parse("AB"), None);
        assert_eq!(OptionLetter::parse(""), None);
    }

    #[test]
    fn test_option_letter_index() {
        assert_eq!(OptionLetter::C.index(), 2);
        assert_eq!(OptionLetter::from_index(3), Some(OptionLetter::D));
        assert_eq!(OptionLetter::from_index(4), None);
    }

    #[test]
    fn test_quiz_data_json_shape() {
        let mut key = AnswerKey::new();
        key.insert(1, OptionLetter::B);
        let data = QuizData::new(
            vec![Question {
                question_number: 1,
                question: "What is 2+2?".to_string(),
                options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            }],
            key,
        );

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["totalQuestions"], 1);
        assert_eq!(json["answerKey"]["1"], "B");
        assert_eq!(json["questions"][0]["questionNumber"], 1);
    }
}
