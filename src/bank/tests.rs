use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::io::Write;

use super::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(99)
}

fn titles(bank: &QuestionBank) -> Vec<String> {
    let mut titles: Vec<String> = bank.iter().map(|q| q.title.clone()).collect();
    titles.sort();
    titles
}

#[test]
fn loads_plain_list() {
    let payload = json!([
        { "id": 1, "title": "Q1", "options": { "A": "x", "B": "y" }, "answer": "B", "analysis": "because" },
        { "id": 2, "title": "Q2", "options": { "A": "x", "B": "y" }, "answer": "A" },
    ]);
    let (bank, report) = QuestionBank::from_payload(payload, &mut rng()).unwrap();
    assert_eq!(bank.len(), 2);
    assert_eq!(report.total, 2);
    assert_eq!(report.skipped_count(), 0);
}

#[test]
fn loads_questions_field() {
    let payload = json!({
        "name": "fund qualification",
        "questions": [{ "title": "Q1", "options": { "A": "x" }, "answer": "A" }],
    });
    let (bank, _report) = QuestionBank::from_payload(payload, &mut rng()).unwrap();
    assert_eq!(bank.len(), 1);
    assert_eq!(bank.get(0).unwrap().title, "Q1");
}

#[test]
fn skips_records_without_options() {
    let payload = json!([
        { "id": 1, "title": "Q1", "options": { "A": "x" }, "answer": "A" },
        { "id": 2, "title": "Q2", "answer": "A" },
        { "id": 3, "title": "Q3", "options": { "A": "x" }, "answer": "A" },
        { "id": 4, "title": "Q4" },
        { "id": 5, "title": "Q5", "options": { "B": "y" }, "answer": "B" },
    ]);
    let (bank, report) = QuestionBank::from_payload(payload, &mut rng()).unwrap();
    assert_eq!(bank.len(), 3);
    assert_eq!(report.skipped_count(), 2);
    assert_eq!(report.admitted(), 3);

    let positions: Vec<usize> = report.skipped.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![1, 3]);
    assert_eq!(report.skipped[0].id.as_deref(), Some("2"));
    assert!(matches!(report.skipped[0].reason, RecordError::MissingOptions));
}

#[test]
fn skips_malformed_records() {
    let payload = json!([
        "not a record",
        { "id": "b", "title": "Q", "options": ["x", "y"], "answer": "A" },
        { "id": "c", "title": "Q", "options": {}, "answer": "A" },
        { "id": "d", "title": "Q", "options": { "A": 3, "Z": "zed" }, "answer": "A" },
        { "id": "e", "title": "Q", "options": { "A": "x" }, "answer": "A" },
    ]);
    let (bank, report) = QuestionBank::from_payload(payload, &mut rng()).unwrap();
    assert_eq!(bank.len(), 1);
    assert_eq!(report.skipped_count(), report.total - bank.len());

    let reasons: Vec<&RecordError> = report.skipped.iter().map(|s| &s.reason).collect();
    assert!(matches!(reasons[0], RecordError::NotARecord));
    assert!(matches!(reasons[1], RecordError::OptionsNotARecord));
    assert!(matches!(reasons[2], RecordError::NoUsableOptions));
    assert!(matches!(reasons[3], RecordError::NoUsableOptions));
    assert_eq!(report.skipped[0].id, None);
}

#[test]
fn every_admitted_question_has_options() {
    let payload = json!([
        { "title": "Q1", "options": { "A": "x", "B": "y", "E": "ignored" }, "answer": "A" },
        { "title": "Q2", "options": { "c": "lower", "A": 1 }, "answer": "C" },
    ]);
    let (bank, _report) = QuestionBank::from_payload(payload, &mut rng()).unwrap();
    for question in bank.iter() {
        assert!(!question.options().is_empty());
    }
    let q2 = bank.iter().find(|q| q.title == "Q2").unwrap();
    assert_eq!(q2.options(), &[(Choice::C, "lower".to_owned())]);
    assert_eq!(q2.correct_choice(), Some(Choice::C));
}

#[test]
fn reads_scalar_fields_permissively() {
    let payload = json!([
        { "id": 17, "title": 42, "options": { "A": "x" }, "answer": " A ", "analysis": "  " },
        { "id": null, "options": { "A": "x" } },
    ]);
    let (bank, _report) = QuestionBank::from_payload(payload, &mut rng()).unwrap();
    let first = bank.iter().find(|q| q.id.is_some()).unwrap();
    assert_eq!(first.id.as_deref(), Some("17"));
    assert_eq!(first.title, "42");
    assert_eq!(first.answer, "A");
    assert_eq!(first.analysis, None);

    let second = bank.iter().find(|q| q.id.is_none()).unwrap();
    assert_eq!(second.title, "");
    assert_eq!(second.answer, "");
}

#[test]
fn admits_answer_outside_options() {
    let payload = json!([{ "title": "Q", "options": { "A": "x", "B": "y" }, "answer": "E" }]);
    let (bank, report) = QuestionBank::from_payload(payload, &mut rng()).unwrap();
    assert_eq!(report.skipped_count(), 0);
    let question = bank.get(0).unwrap();
    assert_eq!(question.correct_choice(), None);
    assert!(!question.is_correct(Choice::A));
}

#[test]
fn shuffle_is_a_permutation() {
    let records: Vec<serde_json::Value> = (0..50)
        .map(|i| json!({ "id": i, "title": format!("Q{:02}", i), "options": { "A": "x" }, "answer": "A" }))
        .collect();
    let (bank, _report) =
        QuestionBank::from_payload(serde_json::Value::Array(records), &mut rng()).unwrap();
    assert_eq!(bank.len(), 50);

    let expected: Vec<String> = (0..50).map(|i| format!("Q{:02}", i)).collect();
    assert_eq!(titles(&bank), expected);

    let in_order: Vec<String> = bank.iter().map(|q| q.title.clone()).collect();
    assert_ne!(in_order, expected);
}

#[test]
fn rejects_unexpected_payload_shape() {
    for payload in vec![json!("text"), json!(3), json!({ "items": [] }), json!({ "questions": {} })] {
        let result = QuestionBank::from_payload(payload, &mut rng());
        assert!(matches!(result, Err(PayloadError::UnexpectedShape)));
    }
}

#[test]
fn rejects_invalid_json() {
    let result = QuestionBank::from_json("[{", &mut rng());
    assert!(matches!(result, Err(PayloadError::Syntax(_))));
}

#[test]
fn load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let bank = QuestionBank::load(&dir.path().join("questions.json"));
    assert!(bank.is_empty());
}

#[test]
fn load_malformed_file_is_empty() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"questions\": 12}}").unwrap();
    let bank = QuestionBank::load(file.path());
    assert!(bank.is_empty());
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"questions": [{{"id": 1, "title": "基金", "options": {{"A": "是", "B": "否"}}, "answer": "A"}}]}}"#
    )
    .unwrap();
    let bank = QuestionBank::load(file.path());
    assert_eq!(bank.len(), 1);
    assert_eq!(bank.get(0).unwrap().option_text(Choice::B), Some("否"));
}
