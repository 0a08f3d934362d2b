//! Task list filtering and status sections.
//!
//! # Invariants
//! - Matching is case-insensitive substring search on the title.
//! - Sections always come in `TaskStatus::ALL` order, empty ones included.
//! - Relative task order inside a section matches collection order.

use crate::model::status::TaskStatus;
use crate::model::task::Task;

/// Tasks sharing one status, in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSection {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

/// Returns tasks whose title contains `query`, ignoring case.
///
/// A blank query matches every task.
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .collect()
}

/// Groups tasks by status.
pub fn group_by_status<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<StatusSection> {
    let mut sections = TaskStatus::ALL
        .iter()
        .map(|status| StatusSection {
            status: *status,
            tasks: Vec::new(),
        })
        .collect::<Vec<_>>();

    for task in tasks {
        if let Some(section) = sections
            .iter_mut()
            .find(|section| section.status == task.status)
        {
            section.tasks.push(task.clone());
        }
    }
    sections
}

/// Filter then group; the list screen's data source.
pub fn search_sections(tasks: &[Task], query: &str) -> Vec<StatusSection> {
    group_by_status(filter_tasks(tasks, query))
}
