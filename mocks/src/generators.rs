//! Random test data generators using the fake crate
//!
//! Also exposes proptest strategies for property-based tests. Generated
//! subtasks never contain the column delimiter.

use chrono::{Duration, NaiveDate};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::FirstName;
use fake::Fake;
use proptest::prelude::*;
use rand::Rng;
use task_core::{Task, SUBTASK_DELIMITER};

fn strip_delimiter(text: String) -> String {
    text.replace(SUBTASK_DELIMITER, "")
}

/// Generate a realistic owner name
pub fn generate_name() -> String {
    strip_delimiter(FirstName().fake::<String>()).to_lowercase()
}

/// Generate a `YYYY-MM-DD` date within 2024
pub fn generate_date() -> String {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let offset = rand::thread_rng().gen_range(0..366);
    (start + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

/// Generate a short subtask description
pub fn generate_subtask() -> String {
    let text: String = Sentence(2..5).fake();
    let text = strip_delimiter(text);
    if text.trim().is_empty() {
        Word().fake()
    } else {
        text
    }
}

/// Generate a random task with realistic data
pub fn generate_random_task() -> Task {
    let count = rand::thread_rng().gen_range(0..5);
    Task::new(
        generate_name(),
        generate_date(),
        (0..count).map(|_| generate_subtask()).collect(),
    )
}

/// Generate multiple random tasks
pub fn generate_random_tasks(count: usize) -> Vec<Task> {
    (0..count).map(|_| generate_random_task()).collect()
}

/// Strategy for a single non-empty subtask without the delimiter
pub fn subtask_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .!?-]{1,24}"
}

/// Strategy for valid task keys
pub fn key_strategy() -> impl Strategy<Value = (String, String)> {
    (
        "[a-z][a-z0-9_-]{0,15}",
        (2000u32..2100, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
    )
}

/// Strategy for subtasks that may be empty
pub fn possibly_empty_subtask_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), subtask_strategy()]
}

/// Strategy for valid tasks, including empty subtasks the validator accepts
pub fn task_strategy() -> impl Strategy<Value = Task> {
    (
        key_strategy(),
        prop::collection::vec(possibly_empty_subtask_strategy(), 0..6)
            .prop_filter("single empty subtask", |subtasks| {
                !matches!(subtasks.as_slice(), [only] if only.is_empty())
            }),
    )
        .prop_map(|((name, date), subtasks)| Task::new(name, date, subtasks))
}
