use mcq_quiz::error::{AppError, IngestError, SessionError};
use mcq_quiz::models::{extract_quiz_from_file, load_quiz_data, save_quiz_data};
use mcq_quiz::services::scoring;
use mcq_quiz::{extract_quiz, OptionLetter, QuizSession, SessionPhase};
use std::path::PathBuf;
use tokio_test::{assert_err, assert_ok};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mcq_quiz_it_{}_{}", std::process::id(), name))
}

fn numbered_quiz(count: usize) -> String {
    let mut text = String::from("PRACTICE TEST\nSECTION A: GENERAL KNOWLEDGE\n");
    for n in 1..=count {
        text.push_str(&format!(
            "{n}. Sample question {n}?\nA) first\nB) second\nC) third\nD) fourth\n"
        ));
    }
    text.push_str("ANSWER KEY\n");
    for n in 1..=count {
        let letter = ["A", "B", "C", "D"][n % 4];
        text.push_str(&format!("{n}. {letter}\n"));
    }
    text
}

#[test]
fn test_scenario_single_question() {
    let data = extract_quiz("1. What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nANSWER KEY\n1. B");

    assert_eq!(data.total_questions, 1);
    assert_eq!(data.questions[0].options, vec!["3", "4", "5", "6"]);
    assert_eq!(data.answer_key.len(), 1);
    assert_eq!(data.correct_answer(1), Some(OptionLetter::B));
}

#[test]
fn test_extraction_properties() {
    let data = extract_quiz(&numbered_quiz(35));

    assert_eq!(data.total_questions, 30);
    for (idx, q) in data.questions.iter().enumerate() {
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.question_number as usize, idx + 1);
    }
    assert!(data
        .answer_key
        .keys()
        .all(|n| (1..=30).contains(n)));
    assert!(data.answer_key.get(&31).is_none());
    assert_eq!(data, extract_quiz(&numbered_quiz(35)));
}

#[test]
fn test_two_question_session_score() {
    let data = extract_quiz(
        "1. What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\n\
         2. Largest planet?\nA) Mars\nB) Venus\nC) Jupiter\nD) Mercury\n\
         ANSWER KEY\n1. B\n2. C",
    );
    let mut session = QuizSession::new(data);
    assert_ok!(session.start());

    session.select_answer(1, OptionLetter::B);
    session.select_answer(2, OptionLetter::A);
    assert!(session.submit());

    let report = session.report().expect("report");
    assert_eq!(report.score_data.score, 1.5);
    assert_eq!(report.score_data.max_score, 4.0);
    assert_eq!(report.percentage(), 38);
    assert_eq!(
        report.score_data.correct + report.score_data.incorrect + report.score_data.unattempted,
        report.score_data.total_questions
    );
    assert_eq!(scoring::percentage(&report.score_data), report.percentage());
}

#[test]
fn test_clear_marked_question() {
    let mut session = QuizSession::new(extract_quiz(&numbered_quiz(3)));
    assert_ok!(session.start());

    session.navigate_to(1);
    session.answer_current(OptionLetter::C);
    assert!(session.toggle_review_mark());
    assert!(session.clear_answer());

    assert!(!session.answers().contains_key(&2));
    assert!(!session.visited().contains(&2));
    assert!(!session.marked_for_review().contains(&2));
}

#[test]
fn test_timeout_freezes_answers() {
    let mut session = QuizSession::with_time_limit(extract_quiz(&numbered_quiz(2)), 5);
    assert_ok!(session.start());
    session.select_answer(1, OptionLetter::B);

    while session.phase() == SessionPhase::InProgress {
        session.tick();
    }

    let report = session.report().cloned().expect("report");
    assert!(report.auto_submitted);
    assert_eq!(report.score_data.attempted, 1);
    assert!(!session.select_answer(2, OptionLetter::A));
    assert_eq!(session.report(), Some(&report));
}

#[test]
fn test_empty_extraction_cannot_start() {
    let mut session = QuizSession::new(extract_quiz("no questions here"));
    assert_eq!(assert_err!(session.start()), SessionError::EmptyQuiz);
}

#[tokio::test]
async fn test_file_to_report_pipeline() {
    let source = temp_path("quiz.txt");
    let handoff = temp_path("quiz.json");
    tokio::fs::write(&source, numbered_quiz(4)).await.unwrap();

    let data = assert_ok!(extract_quiz_from_file(&source).await);
    assert_ok!(save_quiz_data(&handoff, &data).await);
    let loaded = assert_ok!(load_quiz_data(&handoff).await);
    assert_eq!(loaded, data);

    let mut session = QuizSession::new(loaded);
    assert_ok!(session.start());
    for q in &data.questions {
        let letter = data.correct_answer(q.question_number).unwrap();
        session.select_answer(q.question_number, letter);
    }
    session.submit();
    assert_eq!(session.report().unwrap().percentage(), 100);

    tokio::fs::remove_file(&source).await.unwrap();
    tokio::fs::remove_file(&handoff).await.unwrap();
}

#[tokio::test]
async fn test_binary_document_rejected() {
    let err = extract_quiz_from_file(&temp_path("paper.docx"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Ingest(IngestError::UnsupportedFormat { .. })));
}
