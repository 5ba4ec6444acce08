//! Task draft buffer.
//!
//! A single mutable scratch record for "the task currently being composed
//! or edited". A fresh draft starts as `{status: toDo}` with everything
//! else unset; an edit draft is hydrated from an existing task and keeps
//! its id. Direct inputs, assignment toggles, subtask edits and the
//! priority selection all merge into the buffer; `finish` turns it into a
//! committable task once validation passes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Category, ContactId, Priority, Status, Subtask, Task, TaskId};

/// Per-field validity of a draft. `true` means the field is filled in;
/// nothing here is an error. The caller presents the failing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub title: bool,
    pub description: bool,
    pub due_date: bool,
    pub category: bool,
    pub priority: bool,
}

impl ValidationReport {
    pub fn is_submittable(self) -> bool {
        self.title && self.description && self.due_date && self.category && self.priority
    }

    /// Names of the fields still missing, for presentation.
    pub fn missing_fields(self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.title {
            missing.push("title");
        }
        if !self.description {
            missing.push("description");
        }
        if !self.due_date {
            missing.push("due date");
        }
        if !self.category {
            missing.push("category");
        }
        if !self.priority {
            missing.push("priority");
        }
        missing
    }
}

/// The draft buffer.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Status,
    pub assigned_contacts: Vec<ContactId>,
    pub subtasks: Vec<Subtask>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskDraft {
    /// Fresh composer state: the task will land in the toDo lane.
    pub fn new() -> Self {
        Self::with_status(Status::ToDo)
    }

    /// Fresh composer opened into a specific lane.
    pub fn with_status(status: Status) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            due_date: None,
            category: None,
            priority: None,
            status,
            assigned_contacts: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    /// Edit buffer hydrated from an existing task; `finish` will overwrite
    /// that task rather than create a new one.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.name.clone(),
            description: task.description.clone(),
            due_date: Some(task.due_date),
            category: Some(task.category),
            priority: Some(task.priority),
            status: task.status,
            assigned_contacts: task.assigned_contacts.clone(),
            subtasks: task.subtasks.clone(),
        }
    }

    // =========================================================================
    // Contact assignment (toggle semantics: selecting twice unselects)
    // =========================================================================

    /// Returns whether the contact is assigned after the toggle.
    pub fn toggle_contact(&mut self, id: ContactId) -> bool {
        if let Some(index) = self.assigned_contacts.iter().position(|c| *c == id) {
            self.assigned_contacts.remove(index);
            false
        } else {
            self.assigned_contacts.push(id);
            true
        }
    }

    pub fn is_assigned(&self, id: ContactId) -> bool {
        self.assigned_contacts.contains(&id)
    }

    // =========================================================================
    // Subtasks
    // =========================================================================

    /// Append a subtask. Empty and whitespace-only names are a no-op;
    /// returns whether a subtask was added.
    pub fn add_subtask(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.subtasks.push(Subtask::new(name));
        true
    }

    /// Overwrite a subtask's name in place, leaving its completion flag
    /// untouched. A stale index is ignored.
    pub fn rename_subtask(&mut self, index: usize, name: impl Into<String>) {
        if let Some(subtask) = self.subtasks.get_mut(index) {
            subtask.name = name.into();
        }
    }

    /// Remove a subtask; later subtasks shift down one index. Returns
    /// whether anything was removed.
    pub fn remove_subtask(&mut self, index: usize) -> bool {
        if index < self.subtasks.len() {
            self.subtasks.remove(index);
            true
        } else {
            false
        }
    }

    /// Flip a subtask between complete and incomplete. A stale index is
    /// ignored and never touches another subtask.
    pub fn toggle_subtask(&mut self, index: usize) {
        if let Some(subtask) = self.subtasks.get_mut(index) {
            subtask.is_complete = !subtask.is_complete;
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    pub fn validate(&self) -> ValidationReport {
        ValidationReport {
            title: !self.title.trim().is_empty(),
            description: !self.description.trim().is_empty(),
            due_date: self.due_date.is_some(),
            category: self.category.is_some(),
            priority: self.priority.is_some(),
        }
    }

    /// Convert the draft into a committable task, assigning a fresh id for
    /// a new task. An incomplete draft comes back as the validation report.
    pub fn finish(self) -> std::result::Result<Task, ValidationReport> {
        let report = self.validate();
        let (Some(due_date), Some(category), Some(priority)) =
            (self.due_date, self.category, self.priority)
        else {
            return Err(report);
        };
        if !report.is_submittable() {
            return Err(report);
        }
        Ok(Task {
            id: self.id.unwrap_or_default(),
            name: self.title,
            description: self.description,
            due_date,
            category,
            priority,
            status: self.status,
            assigned_contacts: self.assigned_contacts,
            subtasks: self.subtasks,
        })
    }
}
