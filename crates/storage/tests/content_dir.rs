use std::path::PathBuf;

use storage::repository::{ContentSource, StorageError};
use storage::JsonContentDir;

const QUESTIONS: &str = r#"[
  {"id": "2023-1-1", "exam_year": 2023, "round": 9, "subject": "Commercial law",
   "number": 1, "question": "Which clause is mandatory?", "options": ["a", "b", "c", "d"],
   "answer": "2", "explanation": "Art. 663", "memory_tip": "mandatory clauses"},
  {"id": "2022-1-4", "exam_year": 2022, "round": 8, "subject": "Agronomy",
   "number": 4, "question": "Pick all long-day plants", "options": ["a", "b", "c", "d"],
   "answer": "1,3"}
]"#;

const FLASHCARDS: &str = r#"[
  {"id": "fc-1", "subject": "Agronomy", "front": "Photoperiodism", "back": "Response to day length"}
]"#;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("study-content-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn loads_full_content_directory() {
    let dir = scratch_dir("full");
    std::fs::write(dir.join("questions.json"), QUESTIONS).unwrap();
    std::fs::write(dir.join("flashcards.json"), FLASHCARDS).unwrap();
    std::fs::write(
        dir.join("pass_rates.json"),
        r#"{"first": {"headers": ["year", "rate"], "data": [{"label": "2023", "values": ["52.1%"]}]}}"#,
    )
    .unwrap();
    std::fs::create_dir_all(dir.join("law")).unwrap();
    std::fs::write(dir.join("law").join("commercial.txt"), "Article 638 (Definition)").unwrap();
    std::fs::write(dir.join("law").join("notes.md"), "ignored").unwrap();

    let bundle = JsonContentDir::new(&dir).load_content().await.unwrap();

    assert_eq!(bundle.questions.len(), 2);
    assert!(bundle.questions[1].answer.is_multi());
    assert_eq!(bundle.flashcards.len(), 1);
    assert_eq!(bundle.law_texts.len(), 1);
    assert!(bundle.law_text("commercial").unwrap().contains("638"));
    assert!(bundle.pass_rate("first").is_some());
    assert!(bundle.pass_rate("second").is_none());
}

#[tokio::test]
async fn optional_files_may_be_missing() {
    let dir = scratch_dir("minimal");
    std::fs::write(dir.join("questions.json"), QUESTIONS).unwrap();
    std::fs::write(dir.join("flashcards.json"), FLASHCARDS).unwrap();

    let bundle = JsonContentDir::new(&dir).load_content().await.unwrap();
    assert!(bundle.pass_rates.is_empty());
    assert!(bundle.law_texts.is_empty());
}

#[tokio::test]
async fn missing_questions_fail_the_whole_load() {
    let dir = scratch_dir("no-questions");
    std::fs::write(dir.join("flashcards.json"), FLASHCARDS).unwrap();

    let err = JsonContentDir::new(&dir).load_content().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn malformed_json_fails_the_whole_load() {
    let dir = scratch_dir("malformed");
    std::fs::write(dir.join("questions.json"), "[{").unwrap();
    std::fs::write(dir.join("flashcards.json"), FLASHCARDS).unwrap();

    let err = JsonContentDir::new(&dir).load_content().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
