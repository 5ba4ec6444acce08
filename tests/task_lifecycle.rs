//! End-to-end task flow over the in-memory backend: compose a draft,
//! commit it, derive the board, move it across lanes, and track subtask
//! progress.

use std::sync::Arc;

use kb::board::{BoardView, DragState};
use kb::config::StoreConfig;
use kb::draft::TaskDraft;
use kb::model::{Category, Priority, Status};
use kb::repo::Repository;
use kb::store::MemoryStore;

fn design_draft() -> TaskDraft {
    let mut draft = TaskDraft::new();
    draft.title = "Design".to_string();
    draft.description = "Draft UI".to_string();
    draft.due_date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1);
    draft.category = Some(Category::TechnicalTask);
    draft.priority = Some(Priority::Urgent);
    draft
}

async fn repo_on(store: Arc<MemoryStore>) -> Repository<Arc<MemoryStore>> {
    let mut repo = Repository::new(store, &StoreConfig::default());
    repo.load().await.expect("load");
    repo
}

#[tokio::test]
async fn submitted_task_lands_in_todo_and_nowhere_else() {
    let mut repo = repo_on(Arc::new(MemoryStore::new())).await;

    let task = design_draft().finish().expect("submittable");
    let id = repo.commit_task(task).await.expect("commit");

    let view = BoardView::derive(repo.tasks(), None);
    let todo = view.lane(Status::ToDo);
    assert_eq!(todo.cards().len(), 1);
    assert_eq!(todo.cards()[0].id, id);
    for status in [Status::InProgress, Status::AwaitFeedback, Status::Done] {
        assert!(view.lane(status).is_empty());
    }
}

#[tokio::test]
async fn moving_to_done_updates_every_lane_view() {
    let mut repo = repo_on(Arc::new(MemoryStore::new())).await;
    let id = repo
        .commit_task(design_draft().finish().expect("submittable"))
        .await
        .expect("commit");

    repo.move_task(id, Status::Done).await.expect("move");
    assert_eq!(repo.task(id).expect("task").status, Status::Done);

    let view = BoardView::derive(repo.tasks(), None);
    assert!(view.lane(Status::ToDo).is_empty());
    assert_eq!(view.lane(Status::Done).cards().len(), 1);
}

#[tokio::test]
async fn drag_and_drop_is_one_transition_at_a_time() {
    let mut repo = repo_on(Arc::new(MemoryStore::new())).await;
    let id = repo
        .commit_task(design_draft().finish().expect("submittable"))
        .await
        .expect("commit");

    let mut drag = DragState::new();
    drag.begin(id);
    let dropped = drag.drop_on(Status::AwaitFeedback).expect("in flight");
    repo.move_task(dropped, Status::AwaitFeedback)
        .await
        .expect("move");

    assert!(drag.dragging().is_none());
    let view = BoardView::derive(repo.tasks(), None);
    assert_eq!(view.lane(Status::AwaitFeedback).cards().len(), 1);
}

#[tokio::test]
async fn half_finished_subtasks_report_half_progress() {
    let mut repo = repo_on(Arc::new(MemoryStore::new())).await;

    let mut draft = design_draft();
    assert!(draft.add_subtask("write spec"));
    assert!(draft.add_subtask("review spec"));
    let id = repo
        .commit_task(draft.finish().expect("submittable"))
        .await
        .expect("commit");

    repo.toggle_subtask(id, 0).await.expect("toggle");

    let progress = repo
        .task(id)
        .expect("task")
        .subtask_progress()
        .expect("progress");
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.total, 2);
    assert!((progress.ratio() - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn search_narrows_the_board_to_matching_tasks() {
    let mut repo = repo_on(Arc::new(MemoryStore::new())).await;
    repo.commit_task(design_draft().finish().expect("submittable"))
        .await
        .expect("commit");

    let mut other = design_draft();
    other.title = "Cleanup".to_string();
    other.description = "Remove dead code".to_string();
    repo.commit_task(other.finish().expect("submittable"))
        .await
        .expect("commit");

    let view = BoardView::derive(repo.tasks(), Some("design"));
    let names: Vec<&str> = view
        .lane(Status::ToDo)
        .cards()
        .iter()
        .map(|task| task.name.as_str())
        .collect();
    assert_eq!(names, vec!["Design"]);
}

#[tokio::test]
async fn committed_draft_round_trips_through_the_store() {
    let store = Arc::new(MemoryStore::new());

    let task = design_draft().finish().expect("submittable");
    let mut repo = repo_on(Arc::clone(&store)).await;
    repo.commit_task(task.clone()).await.expect("commit");

    // A second session hydrating from the same store sees the same task.
    let other_session = repo_on(store).await;
    assert_eq!(other_session.tasks(), &[task]);
}

#[tokio::test]
async fn deleting_a_task_empties_its_lane() {
    let store = Arc::new(MemoryStore::new());
    let mut repo = repo_on(Arc::clone(&store)).await;
    let id = repo
        .commit_task(design_draft().finish().expect("submittable"))
        .await
        .expect("commit");

    repo.delete_task(id).await.expect("delete");

    let reloaded = repo_on(store).await;
    assert!(reloaded.tasks().is_empty());
    let view = BoardView::derive(reloaded.tasks(), None);
    assert!(view.lane(Status::ToDo).is_empty());
}
