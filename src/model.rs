//! Domain model for kb.
//!
//! The serialized field names follow the documents in the remote store
//! (`taskName`, `subTasks`, `isComplete` as 0/1, lane names
//! `toDo`/`inProgress`/`awaitFeedback`/`done`). Tasks and contacts carry
//! durable ids; assignments reference contacts by id, not by position, so
//! re-sorting the contact book never invalidates them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed contact icon palette. New contacts cycle through it by
/// contact count modulo palette size.
pub const CONTACT_COLORS: [&str; 15] = [
    "#6E52FF", "#FF7A00", "#FF5EB3", "#9327FF", "#00BEE8", "#1FD7C1", "#FF745E", "#FFA35E",
    "#FC71FF", "#FFC701", "#0038FF", "#C3FF2B", "#FFE62B", "#FF4646", "#FFBB2B",
];

/// Color for the next contact given the current contact count.
pub fn contact_color(contact_count: usize) -> &'static str {
    CONTACT_COLORS[contact_count % CONTACT_COLORS.len()]
}

/// Durable task identity, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Durable contact identity, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub Uuid);

impl ContactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The four board lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    ToDo,
    InProgress,
    AwaitFeedback,
    Done,
}

impl Status {
    /// All lanes in board order.
    pub const ALL: [Status; 4] = [
        Status::ToDo,
        Status::InProgress,
        Status::AwaitFeedback,
        Status::Done,
    ];

    /// Human lane label.
    pub fn label(self) -> &'static str {
        match self {
            Status::ToDo => "To do",
            Status::InProgress => "In progress",
            Status::AwaitFeedback => "Await feedback",
            Status::Done => "Done",
        }
    }

    /// Placeholder shown when a lane has no cards.
    pub fn empty_message(self) -> &'static str {
        match self {
            Status::ToDo => "No tasks To do",
            Status::InProgress => "No tasks In progress",
            Status::AwaitFeedback => "No tasks Await feedback",
            Status::Done => "No tasks Done",
        }
    }

    /// The wire name, also used as the drop target's category attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::ToDo => "toDo",
            Status::InProgress => "inProgress",
            Status::AwaitFeedback => "awaitFeedback",
            Status::Done => "done",
        }
    }

    /// Parse a wire/category name into a lane.
    pub fn parse(value: &str) -> Option<Status> {
        match value {
            "toDo" => Some(Status::ToDo),
            "inProgress" => Some(Status::InProgress),
            "awaitFeedback" => Some(Status::AwaitFeedback),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Priority> {
        match value {
            "urgent" => Some(Priority::Urgent),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Technical Task")]
    TechnicalTask,
    #[serde(rename = "Contact Story")]
    ContactStory,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::TechnicalTask => "Technical Task",
            Category::ContactStory => "Contact Story",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        match value {
            "Technical Task" => Some(Category::TechnicalTask),
            "Contact Story" => Some(Category::ContactStory),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account. Identity is the email address; the record is
/// mutated only by password reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A contact book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: ContactId,
    pub name: String,
    pub mail: String,
    pub phone: String,
    pub color: String,
}

impl Contact {
    /// Two-letter signature: first letters of the first two name parts, or
    /// first and last letter of a single-part name, uppercased.
    pub fn initials(&self) -> String {
        let mut parts = self.name.split_whitespace();
        let first = match parts.next() {
            Some(part) => part,
            None => return String::new(),
        };
        let lead = first.chars().next().map(|c| c.to_ascii_uppercase());
        let trail = match parts.next() {
            Some(second) => second.chars().next(),
            None => first.chars().last(),
        }
        .map(|c| c.to_ascii_uppercase());

        lead.into_iter().chain(trail).collect()
    }
}

/// A subtask owned by its parent task. `isComplete` travels as 0/1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub name: String,
    #[serde(rename = "isComplete", with = "int_flag")]
    pub is_complete: bool,
}

impl Subtask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_complete: false,
        }
    }
}

/// Completion state over a task's subtasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubtaskProgress {
    pub completed: usize,
    pub total: usize,
}

impl SubtaskProgress {
    pub fn ratio(self) -> f64 {
        self.completed as f64 / self.total as f64
    }

    pub fn percent(self) -> f64 {
        self.ratio() * 100.0
    }
}

/// A board task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: TaskId,
    #[serde(rename = "taskName")]
    pub name: String,
    #[serde(rename = "taskDescription")]
    pub description: String,
    #[serde(rename = "taskDate")]
    pub due_date: NaiveDate,
    #[serde(rename = "taskCategoryValue")]
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    #[serde(rename = "assignedContacts", default)]
    pub assigned_contacts: Vec<ContactId>,
    #[serde(rename = "subTasks", default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Subtask completion, recomputed on every read. `None` when the task
    /// has no subtasks (no progress bar).
    pub fn subtask_progress(&self) -> Option<SubtaskProgress> {
        if self.subtasks.is_empty() {
            return None;
        }
        Some(SubtaskProgress {
            completed: self.subtasks.iter().filter(|s| s.is_complete).count(),
            total: self.subtasks.len(),
        })
    }
}

/// Resolve assignment ids against the contact book, silently dropping ids
/// that no longer resolve (deleted contacts).
pub fn resolve_contacts<'a>(ids: &[ContactId], contacts: &'a [Contact]) -> Vec<&'a Contact> {
    ids.iter()
        .filter_map(|id| contacts.iter().find(|contact| contact.id == *id))
        .collect()
}

/// Serialize a bool as the integers 0/1, matching the stored documents.
mod int_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        match raw {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "expected 0 or 1 for isComplete, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: TaskId::new(),
            name: "Design".to_string(),
            description: "Draft UI".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
            category: Category::TechnicalTask,
            priority: Priority::Urgent,
            status: Status::ToDo,
            assigned_contacts: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    #[test]
    fn wire_field_names_match_stored_documents() {
        let value = serde_json::to_value(sample_task()).expect("serialize");
        let object = value.as_object().expect("object");
        for key in [
            "taskName",
            "taskDescription",
            "taskDate",
            "taskCategoryValue",
            "priority",
            "status",
            "assignedContacts",
            "subTasks",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object["status"], "toDo");
        assert_eq!(object["priority"], "urgent");
        assert_eq!(object["taskCategoryValue"], "Technical Task");
        assert_eq!(object["taskDate"], "2024-05-01");
    }

    #[test]
    fn subtask_completion_travels_as_integer() {
        let mut subtask = Subtask::new("write spec");
        let value = serde_json::to_value(&subtask).expect("serialize");
        assert_eq!(value["isComplete"], 0);

        subtask.is_complete = true;
        let value = serde_json::to_value(&subtask).expect("serialize");
        assert_eq!(value["isComplete"], 1);

        let parsed: Subtask =
            serde_json::from_value(serde_json::json!({"name": "x", "isComplete": 1}))
                .expect("deserialize");
        assert!(parsed.is_complete);
    }

    #[test]
    fn progress_is_none_without_subtasks() {
        let task = sample_task();
        assert!(task.subtask_progress().is_none());
    }

    #[test]
    fn progress_counts_completed_subtasks() {
        let mut task = sample_task();
        task.subtasks.push(Subtask::new("write spec"));
        task.subtasks.push(Subtask::new("review spec"));
        task.subtasks[0].is_complete = true;

        let progress = task.subtask_progress().expect("progress");
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 2);
        assert!((progress.ratio() - 0.5).abs() < f64::EPSILON);
        assert!((progress.percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn initials_for_two_part_names() {
        let contact = Contact {
            id: ContactId::new(),
            name: "Ada Lovelace".to_string(),
            mail: "ada@example.net".to_string(),
            phone: "123".to_string(),
            color: CONTACT_COLORS[0].to_string(),
        };
        assert_eq!(contact.initials(), "AL");
    }

    #[test]
    fn initials_for_single_part_names() {
        let contact = Contact {
            id: ContactId::new(),
            name: "Cher".to_string(),
            mail: "cher@example.net".to_string(),
            phone: "123".to_string(),
            color: CONTACT_COLORS[1].to_string(),
        };
        assert_eq!(contact.initials(), "CR");
    }

    #[test]
    fn palette_cycles_by_count() {
        assert_eq!(contact_color(0), CONTACT_COLORS[0]);
        assert_eq!(contact_color(14), CONTACT_COLORS[14]);
        assert_eq!(contact_color(15), CONTACT_COLORS[0]);
        assert_eq!(contact_color(31), CONTACT_COLORS[1]);
    }

    #[test]
    fn stale_assignments_resolve_to_nothing() {
        let kept = Contact {
            id: ContactId::new(),
            name: "Ada Lovelace".to_string(),
            mail: "ada@example.net".to_string(),
            phone: "123".to_string(),
            color: CONTACT_COLORS[0].to_string(),
        };
        let deleted = ContactId::new();
        let contacts = vec![kept.clone()];

        let resolved = resolve_contacts(&[deleted, kept.id], &contacts);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, kept.id);
    }

    #[test]
    fn lane_names_round_trip() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("archived"), None);
    }
}
