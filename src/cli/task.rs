//! kb task and subtask command implementations.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::Context;
use crate::draft::TaskDraft;
use crate::error::{Error, Result};
use crate::model::{Category, ContactId, Priority, Status, Task, TaskId};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub due: String,
    pub category: String,
    pub priority: String,
    pub lane: String,
    pub assign: Vec<Uuid>,
    pub subtasks: Vec<String>,
}

pub struct EditOptions {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub toggle_assign: Vec<Uuid>,
}

fn parse_due(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!("invalid due date '{raw}', expected YYYY-MM-DD"))
    })
}

fn parse_category(raw: &str) -> Result<Category> {
    Category::parse(raw).ok_or_else(|| {
        Error::InvalidArgument(format!(
            "unknown category '{raw}' (expected \"Technical Task\" or \"Contact Story\")"
        ))
    })
}

fn parse_priority(raw: &str) -> Result<Priority> {
    Priority::parse(raw).ok_or_else(|| {
        Error::InvalidArgument(format!("unknown priority '{raw}' (expected urgent|medium|low)"))
    })
}

fn parse_lane(raw: &str) -> Result<Status> {
    Status::parse(raw).ok_or_else(|| Error::InvalidArgument(format!("unknown lane '{raw}'")))
}

fn finish_draft(draft: TaskDraft) -> Result<Task> {
    draft.finish().map_err(|report| {
        Error::InvalidArgument(format!(
            "task is missing: {}",
            report.missing_fields().join(", ")
        ))
    })
}

pub async fn run_add(ctx: Context, options: OutputOptions, opts: AddOptions) -> Result<()> {
    let Context { mut repo, .. } = ctx;

    let mut draft = TaskDraft::with_status(parse_lane(&opts.lane)?);
    draft.title = opts.title;
    draft.description = opts.description;
    draft.due_date = Some(parse_due(&opts.due)?);
    draft.category = Some(parse_category(&opts.category)?);
    draft.priority = Some(parse_priority(&opts.priority)?);

    for raw in &opts.assign {
        let id = ContactId(*raw);
        if repo.contact(id).is_none() {
            return Err(Error::ContactNotFound(*raw));
        }
        draft.toggle_contact(id);
    }
    for name in &opts.subtasks {
        draft.add_subtask(name);
    }

    let task = finish_draft(draft)?;
    let id = repo.commit_task(task).await?;
    let task = repo.task(id).ok_or(Error::TaskNotFound(id.0))?;

    let mut human = HumanOutput::new("Task added to board");
    human.push_summary("task", task.name.clone());
    human.push_summary("lane", task.status.label());
    human.push_summary("id", id.to_string());

    emit_success(options, "task add", task, Some(&human))
}

pub async fn run_edit(ctx: Context, options: OutputOptions, opts: EditOptions) -> Result<()> {
    let Context { mut repo, .. } = ctx;
    let id = TaskId(opts.id);
    let task = repo.task(id).ok_or(Error::TaskNotFound(opts.id))?;

    let mut draft = TaskDraft::from_task(task);
    if let Some(title) = opts.title {
        draft.title = title;
    }
    if let Some(description) = opts.description {
        draft.description = description;
    }
    if let Some(due) = opts.due {
        draft.due_date = Some(parse_due(&due)?);
    }
    if let Some(category) = opts.category {
        draft.category = Some(parse_category(&category)?);
    }
    if let Some(priority) = opts.priority {
        draft.priority = Some(parse_priority(&priority)?);
    }
    for raw in &opts.toggle_assign {
        draft.toggle_contact(ContactId(*raw));
    }

    let task = finish_draft(draft)?;
    repo.commit_task(task).await?;
    let task = repo.task(id).ok_or(Error::TaskNotFound(id.0))?;

    let mut human = HumanOutput::new("Task saved");
    human.push_summary("task", task.name.clone());

    emit_success(options, "task edit", task, Some(&human))
}

pub fn run_show(ctx: Context, options: OutputOptions, id: Uuid) -> Result<()> {
    let task = ctx.repo.task(TaskId(id)).ok_or(Error::TaskNotFound(id))?;

    let mut human = HumanOutput::new(task.name.clone());
    human.push_summary("description", task.description.clone());
    human.push_summary("due", task.due_date.to_string());
    human.push_summary("category", task.category.to_string());
    human.push_summary("priority", task.priority.to_string());
    human.push_summary("lane", task.status.label());
    let assigned = crate::model::resolve_contacts(&task.assigned_contacts, ctx.repo.contacts());
    if !assigned.is_empty() {
        let names: Vec<&str> = assigned.iter().map(|c| c.name.as_str()).collect();
        human.push_summary("assigned", names.join(", "));
    }
    for (index, subtask) in task.subtasks.iter().enumerate() {
        let mark = if subtask.is_complete { "x" } else { " " };
        human.push_detail(format!("[{mark}] {index}: {}", subtask.name));
    }

    emit_success(options, "task show", task, Some(&human))
}

#[derive(Serialize)]
struct DeletedBody {
    task: TaskId,
}

pub async fn run_rm(ctx: Context, options: OutputOptions, id: Uuid) -> Result<()> {
    let Context { mut repo, .. } = ctx;
    let id = TaskId(id);
    repo.delete_task(id).await?;

    let human = HumanOutput::new("Task deleted");
    emit_success(options, "task rm", &DeletedBody { task: id }, Some(&human))
}

// =============================================================================
// Subtasks
// =============================================================================

async fn edit_subtasks<F>(ctx: Context, id: Uuid, apply: F) -> Result<(Context, bool)>
where
    F: FnOnce(&mut TaskDraft) -> bool,
{
    let Context { mut repo, config } = ctx;
    let task_id = TaskId(id);
    let task = repo.task(task_id).ok_or(Error::TaskNotFound(id))?;

    let mut draft = TaskDraft::from_task(task);
    let changed = apply(&mut draft);
    if changed {
        repo.commit_task(finish_draft(draft)?).await?;
    }
    Ok((Context { repo, config }, changed))
}

pub async fn run_subtask_add(
    ctx: Context,
    options: OutputOptions,
    task: Uuid,
    name: String,
) -> Result<()> {
    let (ctx, added) = edit_subtasks(ctx, task, |draft| draft.add_subtask(&name)).await?;
    let task = ctx.repo.task(TaskId(task)).ok_or(Error::TaskNotFound(task))?;

    let human = if added {
        let mut human = HumanOutput::new("Subtask added");
        human.push_summary("subtasks", task.subtasks.len().to_string());
        human
    } else {
        HumanOutput::new("Blank subtask name, nothing added")
    };

    emit_success(options, "subtask add", task, Some(&human))
}

pub async fn run_subtask_rename(
    ctx: Context,
    options: OutputOptions,
    task: Uuid,
    index: usize,
    name: String,
) -> Result<()> {
    let (ctx, _) = edit_subtasks(ctx, task, |draft| {
        draft.rename_subtask(index, name.clone());
        true
    })
    .await?;
    let task = ctx.repo.task(TaskId(task)).ok_or(Error::TaskNotFound(task))?;

    let human = HumanOutput::new("Subtask renamed");
    emit_success(options, "subtask rename", task, Some(&human))
}

pub async fn run_subtask_rm(
    ctx: Context,
    options: OutputOptions,
    task: Uuid,
    index: usize,
) -> Result<()> {
    let (ctx, removed) = edit_subtasks(ctx, task, |draft| draft.remove_subtask(index)).await?;
    let task = ctx.repo.task(TaskId(task)).ok_or(Error::TaskNotFound(task))?;

    let human = if removed {
        HumanOutput::new("Subtask removed")
    } else {
        HumanOutput::new(format!("No subtask at index {index}"))
    };

    emit_success(options, "subtask rm", task, Some(&human))
}

pub async fn run_subtask_toggle(
    ctx: Context,
    options: OutputOptions,
    task: Uuid,
    index: usize,
) -> Result<()> {
    let Context { mut repo, .. } = ctx;
    let id = TaskId(task);
    repo.toggle_subtask(id, index).await?;
    let task = repo.task(id).ok_or(Error::TaskNotFound(id.0))?;

    let mut human = HumanOutput::new("Subtask toggled");
    if let Some(progress) = task.subtask_progress() {
        human.push_summary(
            "progress",
            format!("{}/{}", progress.completed, progress.total),
        );
    }

    emit_success(options, "subtask toggle", task, Some(&human))
}
