//! Kanban board views and the lane transition machinery.
//!
//! The four lanes partition the task collection; any lane may move to any
//! other lane directly (a full graph, not a pipeline). Views are pure
//! derivations over the committed collection: they are recomputed after
//! every mutation and never cached. An empty lane is a distinct view state
//! carrying its placeholder message, including when a search filter
//! removes every card in a lane.

use crate::model::{Status, Task, TaskId};

/// Free-text board search: a task matches when its name or description
/// contains the query, case-insensitive. `None` matches everything.
pub fn matches_filter(task: &Task, filter: Option<&str>) -> bool {
    let Some(query) = filter else {
        return true;
    };
    let query = query.to_lowercase();
    task.name.to_lowercase().contains(&query) || task.description.to_lowercase().contains(&query)
}

/// What a lane shows: cards, or an explicit "no tasks" placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum LaneContent<'a> {
    Empty { message: &'static str },
    Cards(Vec<&'a Task>),
}

/// One lane of the derived board.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneView<'a> {
    pub status: Status,
    pub content: LaneContent<'a>,
}

impl<'a> LaneView<'a> {
    /// Derive one lane from the committed collection, honoring the filter.
    pub fn derive(tasks: &'a [Task], status: Status, filter: Option<&str>) -> Self {
        let cards: Vec<&Task> = tasks
            .iter()
            .filter(|task| task.status == status && matches_filter(task, filter))
            .collect();
        let content = if cards.is_empty() {
            LaneContent::Empty {
                message: status.empty_message(),
            }
        } else {
            LaneContent::Cards(cards)
        };
        Self { status, content }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, LaneContent::Empty { .. })
    }

    pub fn cards(&self) -> &[&'a Task] {
        match &self.content {
            LaneContent::Empty { .. } => &[],
            LaneContent::Cards(cards) => cards,
        }
    }
}

/// The whole derived board: all four lanes in order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView<'a> {
    pub lanes: [LaneView<'a>; 4],
}

impl<'a> BoardView<'a> {
    pub fn derive(tasks: &'a [Task], filter: Option<&str>) -> Self {
        Self {
            lanes: Status::ALL.map(|status| LaneView::derive(tasks, status, filter)),
        }
    }

    pub fn lane(&self, status: Status) -> &LaneView<'a> {
        let index = match status {
            Status::ToDo => 0,
            Status::InProgress => 1,
            Status::AwaitFeedback => 2,
            Status::Done => 3,
        };
        &self.lanes[index]
    }
}

/// The one-in-flight drag state. At most one card is being dragged at a
/// time; dropping it yields the transition to apply and clears the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    current: Option<TaskId>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, id: TaskId) {
        self.current = Some(id);
    }

    pub fn dragging(&self) -> Option<TaskId> {
        self.current
    }

    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Complete the drag over a drop target. Returns the task to move, or
    /// `None` when nothing was being dragged (a drop out of nowhere).
    pub fn drop_on(&mut self, _target: Status) -> Option<TaskId> {
        self.current.take()
    }
}
