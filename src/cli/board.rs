//! kb board command implementations.

use serde::Serialize;
use uuid::Uuid;

use crate::board::{BoardView, LaneContent};
use crate::cli::Context;
use crate::error::{Error, Result};
use crate::model::{Status, Task, TaskId};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::summary::Summary;

#[derive(Serialize)]
struct LaneBody {
    lane: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<&'static str>,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct BoardBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    lanes: Vec<LaneBody>,
}

pub fn run_show(ctx: Context, options: OutputOptions, filter: Option<String>) -> Result<()> {
    let view = BoardView::derive(ctx.repo.tasks(), filter.as_deref());

    let mut human = HumanOutput::new(match &filter {
        Some(query) => format!("Board (filter: {query})"),
        None => "Board".to_string(),
    });
    for lane in &view.lanes {
        match &lane.content {
            LaneContent::Empty { message } => {
                human.push_detail(format!("{}: {message}", lane.status.label()));
            }
            LaneContent::Cards(cards) => {
                human.push_detail(format!("{} ({})", lane.status.label(), cards.len()));
                for card in cards {
                    let progress = card
                        .subtask_progress()
                        .map(|p| format!(" [{}/{}]", p.completed, p.total))
                        .unwrap_or_default();
                    human.push_detail(format!(
                        "  - {} ({}){}  {}",
                        card.name, card.priority, progress, card.id
                    ));
                }
            }
        }
    }

    let body = BoardBody {
        filter,
        lanes: view
            .lanes
            .iter()
            .map(|lane| LaneBody {
                lane: lane.status.as_str(),
                placeholder: match lane.content {
                    LaneContent::Empty { message } => Some(message),
                    LaneContent::Cards(_) => None,
                },
                tasks: lane.cards().iter().map(|card| (*card).clone()).collect(),
            })
            .collect(),
    };

    emit_success(options, "board", &body, Some(&human))
}

#[derive(Serialize)]
struct MoveBody {
    task: TaskId,
    lane: &'static str,
}

pub async fn run_move(
    ctx: Context,
    options: OutputOptions,
    task: Uuid,
    lane: String,
) -> Result<()> {
    let status = Status::parse(&lane)
        .ok_or_else(|| Error::InvalidArgument(format!("unknown lane '{lane}'")))?;
    let id = TaskId(task);

    let Context { mut repo, .. } = ctx;
    repo.move_task(id, status).await?;

    let task = repo.task(id).ok_or(Error::TaskNotFound(id.0))?;
    let mut human = HumanOutput::new("Task moved");
    human.push_summary("task", task.name.clone());
    human.push_summary("lane", status.label());

    emit_success(
        options,
        "move",
        &MoveBody {
            task: id,
            lane: status.as_str(),
        },
        Some(&human),
    )
}

pub fn run_summary(ctx: Context, options: OutputOptions) -> Result<()> {
    let summary = Summary::derive(ctx.repo.tasks());

    let mut human = HumanOutput::new("Summary");
    human.push_summary("tasks in board", summary.total.to_string());
    human.push_summary("to do", summary.to_do.to_string());
    human.push_summary("in progress", summary.in_progress.to_string());
    human.push_summary("awaiting feedback", summary.await_feedback.to_string());
    human.push_summary("done", summary.done.to_string());
    human.push_summary("urgent", summary.urgent.to_string());
    if let Some(due) = summary.next_due {
        human.push_summary("upcoming deadline", due.to_string());
    }

    emit_success(options, "summary", &summary, Some(&human))
}
