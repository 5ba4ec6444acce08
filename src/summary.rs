//! Derived board statistics for the summary page.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Priority, Status, Task};

/// Board statistics, recomputed from the committed collection.
///
/// `urgent` counts urgent-priority tasks across the whole board, not just
/// the toDo lane. `next_due` is the earliest due date among tasks that are
/// not done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub to_do: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    pub urgent: usize,
    pub next_due: Option<NaiveDate>,
}

impl Summary {
    pub fn derive(tasks: &[Task]) -> Self {
        let count = |status: Status| tasks.iter().filter(|t| t.status == status).count();
        Self {
            total: tasks.len(),
            to_do: count(Status::ToDo),
            in_progress: count(Status::InProgress),
            await_feedback: count(Status::AwaitFeedback),
            done: count(Status::Done),
            urgent: tasks
                .iter()
                .filter(|t| t.priority == Priority::Urgent)
                .count(),
            next_due: tasks
                .iter()
                .filter(|t| t.status != Status::Done)
                .map(|t| t.due_date)
                .min(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, TaskId};

    fn task(name: &str, status: Status, priority: Priority, due: (i32, u32, u32)) -> Task {
        Task {
            id: TaskId::new(),
            name: name.to_string(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2).expect("date"),
            category: Category::ContactStory,
            priority,
            status,
            assigned_contacts: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    #[test]
    fn empty_board_has_zero_counts_and_no_deadline() {
        let summary = Summary::derive(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.urgent, 0);
        assert!(summary.next_due.is_none());
    }

    #[test]
    fn counts_follow_the_lanes() {
        let tasks = vec![
            task("a", Status::ToDo, Priority::Low, (2024, 5, 1)),
            task("b", Status::ToDo, Priority::Medium, (2024, 5, 2)),
            task("c", Status::InProgress, Priority::Low, (2024, 5, 3)),
            task("d", Status::AwaitFeedback, Priority::Low, (2024, 5, 4)),
            task("e", Status::Done, Priority::Low, (2024, 5, 5)),
        ];
        let summary = Summary::derive(&tasks);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.to_do, 2);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.await_feedback, 1);
        assert_eq!(summary.done, 1);
    }

    #[test]
    fn urgent_counts_the_whole_board() {
        let tasks = vec![
            task("a", Status::ToDo, Priority::Urgent, (2024, 5, 1)),
            task("b", Status::Done, Priority::Urgent, (2024, 5, 2)),
            task("c", Status::InProgress, Priority::Low, (2024, 5, 3)),
        ];
        assert_eq!(Summary::derive(&tasks).urgent, 2);
    }

    #[test]
    fn next_due_skips_finished_tasks() {
        let tasks = vec![
            task("a", Status::Done, Priority::Low, (2024, 4, 1)),
            task("b", Status::ToDo, Priority::Low, (2024, 5, 2)),
            task("c", Status::InProgress, Priority::Low, (2024, 5, 1)),
        ];
        assert_eq!(
            Summary::derive(&tasks).next_due,
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }
}
