//! Progress statistics over the question bank and the stored snapshot.

use std::collections::{BTreeMap, HashMap};

use crate::model::{ContentBundle, ProgressSnapshot, Question, SolvedEntry};
use crate::scheduler::FlashcardScheduler;

/// Group name for solved questions that carry no memory tip.
pub const UNTAGGED_TIP: &str = "Other";

/// Cap on weak-point and recent-wrong listings.
pub const TOP_N: usize = 10;

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Headline numbers for the home and analytics screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub total_questions: usize,
    pub total_flashcards: usize,
    pub known_flashcards: usize,
    pub solved: usize,
    pub correct: usize,
    pub wrong: usize,
    /// Correct share of solved questions, in percent.
    pub accuracy: u32,
    /// Solved share of the whole bank, in percent.
    pub completion: u32,
    pub bookmarks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectStats {
    pub subject: String,
    pub total: usize,
    pub solved: usize,
    pub correct: usize,
    pub accuracy: u32,
    pub completion: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearStats {
    pub exam_year: u16,
    pub solved: usize,
    pub correct: usize,
    pub wrong: usize,
    pub accuracy: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeakPoint {
    pub tip: String,
    pub total: usize,
    pub wrong: usize,
    pub wrong_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentWrong {
    pub question: Question,
    pub entry: SolvedEntry,
}

#[must_use]
pub fn overview(content: &ContentBundle, progress: &ProgressSnapshot) -> Overview {
    let solved = progress.solved.len();
    let correct = progress.solved.values().filter(|e| e.correct).count();
    Overview {
        total_questions: content.questions.len(),
        total_flashcards: content.flashcards.len(),
        known_flashcards: FlashcardScheduler::known_count(progress),
        solved,
        correct,
        wrong: solved - correct,
        accuracy: percent(correct, solved),
        completion: percent(solved, content.questions.len()),
        bookmarks: progress.bookmarks.len(),
    }
}

/// Per-subject numbers, subjects in the order they first appear in the bank.
#[must_use]
pub fn subject_stats(questions: &[Question], progress: &ProgressSnapshot) -> Vec<SubjectStats> {
    let mut stats: Vec<SubjectStats> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for question in questions {
        let slot = *slots.entry(question.subject.as_str()).or_insert_with(|| {
            stats.push(SubjectStats {
                subject: question.subject.clone(),
                total: 0,
                solved: 0,
                correct: 0,
                accuracy: 0,
                completion: 0,
            });
            stats.len() - 1
        });
        let row = &mut stats[slot];
        row.total += 1;
        if let Some(entry) = progress.solved_entry(&question.id) {
            row.solved += 1;
            if entry.correct {
                row.correct += 1;
            }
        }
    }

    for row in &mut stats {
        row.accuracy = percent(row.correct, row.solved);
        row.completion = percent(row.solved, row.total);
    }
    stats
}

/// Per-exam-year numbers, years ascending.
#[must_use]
pub fn year_stats(questions: &[Question], progress: &ProgressSnapshot) -> Vec<YearStats> {
    let mut years: BTreeMap<u16, (usize, usize)> = BTreeMap::new();
    for question in questions {
        let (solved, correct) = years.entry(question.exam_year).or_default();
        if let Some(entry) = progress.solved_entry(&question.id) {
            *solved += 1;
            if entry.correct {
                *correct += 1;
            }
        }
    }

    years
        .into_iter()
        .map(|(exam_year, (solved, correct))| YearStats {
            exam_year,
            solved,
            correct,
            wrong: solved - correct,
            accuracy: percent(correct, solved),
        })
        .collect()
}

/// Memory-tip groups with the highest wrong rate among solved questions.
#[must_use]
pub fn weak_points(questions: &[Question], progress: &ProgressSnapshot) -> Vec<WeakPoint> {
    let mut groups: Vec<WeakPoint> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for question in questions {
        let Some(entry) = progress.solved_entry(&question.id) else {
            continue;
        };
        let tip = question
            .memory_tip
            .as_deref()
            .filter(|tip| !tip.is_empty())
            .unwrap_or(UNTAGGED_TIP);
        let slot = *slots.entry(tip).or_insert_with(|| {
            groups.push(WeakPoint {
                tip: tip.to_owned(),
                total: 0,
                wrong: 0,
                wrong_rate: 0,
            });
            groups.len() - 1
        });
        groups[slot].total += 1;
        if !entry.correct {
            groups[slot].wrong += 1;
        }
    }

    let mut weak: Vec<WeakPoint> = groups
        .into_iter()
        .filter(|group| group.wrong > 0)
        .map(|mut group| {
            group.wrong_rate = percent(group.wrong, group.total);
            group
        })
        .collect();
    weak.sort_by(|a, b| b.wrong_rate.cmp(&a.wrong_rate));
    weak.truncate(TOP_N);
    weak
}

/// Most recently missed questions, newest first.
#[must_use]
pub fn recent_wrong(questions: &[Question], progress: &ProgressSnapshot) -> Vec<RecentWrong> {
    let by_id: HashMap<_, _> = questions.iter().map(|q| (&q.id, q)).collect();

    let mut wrong: Vec<_> = progress
        .solved
        .iter()
        .filter(|(_, entry)| !entry.correct)
        .collect();
    wrong.sort_by(|a, b| b.1.last_date.cmp(&a.1.last_date));

    wrong
        .into_iter()
        .take(TOP_N)
        .filter_map(|(id, entry)| {
            by_id.get(id).map(|question| RecentWrong {
                question: (*question).clone(),
                entry: entry.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerKey, CardId, Flashcard, QuestionId};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn question(id: &str, year: u16, subject: &str, tip: Option<&str>) -> Question {
        Question {
            id: QuestionId::new(id),
            exam_year: year,
            round: 1,
            subject: subject.into(),
            number: 1,
            question: "?".into(),
            options: vec!["a".into(), "b".into()],
            answer: AnswerKey::parse("1"),
            explanation: String::new(),
            memory_tip: tip.map(str::to_owned),
        }
    }

    fn bank() -> Vec<Question> {
        vec![
            question("a", 2022, "Law", Some("duty of disclosure")),
            question("b", 2023, "Agronomy", Some("photoperiod")),
            question("c", 2022, "Law", Some("duty of disclosure")),
            question("d", 2023, "Law", None),
        ]
    }

    fn answer(progress: &mut ProgressSnapshot, id: &str, correct: bool, minutes: i64) {
        progress.record_answer(
            &QuestionId::new(id),
            if correct { 1 } else { 2 },
            correct,
            fixed_now() + Duration::minutes(minutes),
        );
    }

    #[test]
    fn overview_handles_empty_progress() {
        let content = ContentBundle {
            questions: bank(),
            ..ContentBundle::default()
        };
        let o = overview(&content, &ProgressSnapshot::new());
        assert_eq!(o.total_questions, 4);
        assert_eq!(o.solved, 0);
        assert_eq!(o.accuracy, 0);
        assert_eq!(o.completion, 0);
    }

    #[test]
    fn overview_counts_answers_and_cards() {
        let mut progress = ProgressSnapshot::new();
        answer(&mut progress, "a", true, 0);
        answer(&mut progress, "b", false, 1);
        answer(&mut progress, "c", true, 2);
        for _ in 0..3 {
            FlashcardScheduler::mark_known(&CardId::new("f"), &mut progress, fixed_now());
        }
        let content = ContentBundle {
            questions: bank(),
            flashcards: vec![Flashcard {
                id: CardId::new("f"),
                subject: "Law".into(),
                front: "F".into(),
                back: "B".into(),
            }],
            ..ContentBundle::default()
        };

        let o = overview(&content, &progress);
        assert_eq!((o.solved, o.correct, o.wrong), (3, 2, 1));
        assert_eq!(o.accuracy, 67);
        assert_eq!(o.completion, 75);
        assert_eq!(o.known_flashcards, 1);
        assert_eq!(o.total_flashcards, 1);
    }

    #[test]
    fn subject_stats_keep_first_appearance_order() {
        let mut progress = ProgressSnapshot::new();
        answer(&mut progress, "a", true, 0);
        answer(&mut progress, "d", false, 0);

        let stats = subject_stats(&bank(), &progress);
        assert_eq!(stats[0].subject, "Law");
        assert_eq!(stats[1].subject, "Agronomy");
        assert_eq!((stats[0].total, stats[0].solved, stats[0].correct), (3, 2, 1));
        assert_eq!(stats[0].accuracy, 50);
        assert_eq!(stats[0].completion, 67);
        assert_eq!(stats[1].accuracy, 0);
    }

    #[test]
    fn year_stats_are_ascending() {
        let mut progress = ProgressSnapshot::new();
        answer(&mut progress, "b", false, 0);
        let stats = year_stats(&bank(), &progress);
        assert_eq!(stats[0].exam_year, 2022);
        assert_eq!(stats[0].solved, 0);
        assert_eq!(stats[1].wrong, 1);
        assert_eq!(stats[1].accuracy, 0);
    }

    #[test]
    fn weak_points_rank_by_wrong_rate() {
        let mut progress = ProgressSnapshot::new();
        answer(&mut progress, "a", false, 0);
        answer(&mut progress, "c", true, 0);
        answer(&mut progress, "b", false, 0);
        answer(&mut progress, "d", true, 0);

        let weak = weak_points(&bank(), &progress);
        assert_eq!(weak.len(), 2);
        assert_eq!(weak[0].tip, "photoperiod");
        assert_eq!(weak[0].wrong_rate, 100);
        assert_eq!(weak[1].tip, "duty of disclosure");
        assert_eq!(weak[1].wrong_rate, 50);
    }

    #[test]
    fn recent_wrong_is_newest_first_and_skips_unknown_ids() {
        let mut progress = ProgressSnapshot::new();
        answer(&mut progress, "a", false, 1);
        answer(&mut progress, "c", false, 5);
        answer(&mut progress, "ghost", false, 9);
        answer(&mut progress, "b", true, 7);

        let recent = recent_wrong(&bank(), &progress);
        let ids: Vec<_> = recent.iter().map(|r| r.question.id.as_str()).collect();
        assert_eq!(ids, ["c", "a"]);
    }
}
