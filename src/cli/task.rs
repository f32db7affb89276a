//! taskboard task command implementations

use super::Context;
use crate::backend::TaskBackend;
use crate::board::{BoardController, TaskForm};
use crate::error::{Error, Result};
use crate::output::{emit_success, short_id, task_line, HumanOutput};
use crate::reorder::{DropTarget, MovePlan};
use crate::task::{Task, TaskStatus};

pub(super) struct NewOptions {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

pub(super) struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

pub(super) struct MoveOptions {
    pub id: String,
    pub onto: Option<String>,
    pub column: Option<TaskStatus>,
}

#[derive(serde::Serialize)]
struct ListReport<'a> {
    total: usize,
    tasks: Vec<&'a Task>,
}

#[derive(serde::Serialize)]
struct RemoveReport<'a> {
    id: &'a str,
    removed: bool,
}

#[derive(serde::Serialize)]
struct MoveReport<'a> {
    moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a MovePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<&'a Task>,
}

/// Match a full id or a unique prefix of one.
fn resolve_id<B: TaskBackend>(board: &BoardController<B>, input: &str) -> Result<String> {
    let input = input.trim();
    if board.state().find(input).is_some() {
        return Ok(input.to_string());
    }
    if input.is_empty() {
        return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
    }

    let matches: Vec<&Task> = board
        .state()
        .tasks
        .iter()
        .filter(|task| task.id.starts_with(input))
        .collect();
    match matches.as_slice() {
        [task] => Ok(task.id.clone()),
        [] => Err(Error::TaskNotFound(input.to_string())),
        many => Err(Error::InvalidArgument(format!(
            "id prefix '{input}' matches {} tasks: {}",
            many.len(),
            many.iter().map(|task| short_id(&task.id)).collect::<Vec<_>>().join(", ")
        ))),
    }
}

fn describe(human: &mut HumanOutput, task: &Task) {
    human.push_summary("id", task.id.as_str());
    human.push_summary("status", task.status.as_str());
    human.push_summary("order", task.order.to_string());
    if let Some(description) = &task.description {
        human.push_summary("description", description.as_str());
    }
    human.push_summary("updated", task.updated_at.to_rfc3339());
}

pub(super) async fn run_new(ctx: &Context, options: NewOptions) -> Result<()> {
    let mut board = ctx.open_board().await?;
    let task = board
        .submit_form(TaskForm {
            id: None,
            title: options.title,
            description: options.description,
            status: options.status,
        })
        .await?;

    let mut human = ctx.human(format!("taskboard task new: {}", task_line(&task)));
    describe(&mut human, &task);
    human.push_next_step(format!("taskboard task move {} --column in-progress", short_id(&task.id)));

    emit_success(ctx.output, "task new", &task, Some(&human))
}

pub(super) async fn run_edit(ctx: &Context, options: EditOptions) -> Result<()> {
    let mut board = ctx.open_board().await?;
    let id = resolve_id(&board, &options.id)?;

    if options.title.is_none() && options.description.is_none() && options.status.is_none() {
        return Err(Error::InvalidArgument(
            "nothing to change: pass --title, --description, or --status".to_string(),
        ));
    }

    // The form always carries a title; keep the current one when not given.
    let title = match options.title {
        Some(title) => title,
        None => board.find(&id)?.title.clone(),
    };
    let task = board
        .submit_form(TaskForm {
            id: Some(id),
            title,
            description: options.description,
            status: options.status,
        })
        .await?;

    let mut human = ctx.human(format!("taskboard task edit: {}", task_line(&task)));
    describe(&mut human, &task);

    emit_success(ctx.output, "task edit", &task, Some(&human))
}

pub(super) async fn run_rm(ctx: &Context, id: &str) -> Result<()> {
    let mut board = ctx.open_board().await?;
    let id = resolve_id(&board, id)?;
    board.delete(&id).await?;

    let human = ctx.human(format!("taskboard task rm: removed {}", short_id(&id)));
    emit_success(
        ctx.output,
        "task rm",
        &RemoveReport {
            id: &id,
            removed: true,
        },
        Some(&human),
    )
}

pub(super) async fn run_list(ctx: &Context, status: Option<TaskStatus>) -> Result<()> {
    let board = ctx.open_board().await?;

    let statuses: Vec<TaskStatus> = match status {
        Some(status) => vec![status],
        None => TaskStatus::ALL.to_vec(),
    };
    let tasks: Vec<&Task> = statuses
        .iter()
        .flat_map(|status| board.state().column(*status))
        .collect();

    let header = match status {
        Some(status) => format!("taskboard task list: {} {status} task(s)", tasks.len()),
        None => format!("taskboard task list: {} task(s)", tasks.len()),
    };
    let mut human = ctx.human(header);
    let search = board.state().ui.search_term.as_str();
    if !search.is_empty() {
        human.push_summary("search", search);
    }
    for task in &tasks {
        human.push_detail(task_line(task));
    }
    if tasks.is_empty() {
        human.push_next_step("taskboard task new <title>");
    }

    emit_success(
        ctx.output,
        "task list",
        &ListReport {
            total: tasks.len(),
            tasks,
        },
        Some(&human),
    )
}

pub(super) async fn run_show(ctx: &Context, id: &str) -> Result<()> {
    let board = ctx.open_board().await?;
    let id = resolve_id(&board, id)?;
    let task = board.find(&id)?;

    let mut human = ctx.human(task.title.as_str());
    describe(&mut human, task);
    human.push_summary("created", task.created_at.to_rfc3339());

    emit_success(ctx.output, "task show", task, Some(&human))
}

/// Simulates a drag: pick the task up, then release it on the target.
pub(super) async fn run_move(ctx: &Context, options: MoveOptions) -> Result<()> {
    let mut board = ctx.open_board().await?;
    let id = resolve_id(&board, &options.id)?;

    let target = match (options.onto, options.column) {
        (Some(onto), _) => DropTarget::Task(resolve_id(&board, &onto)?),
        (None, Some(column)) => DropTarget::Column(column),
        (None, None) => {
            return Err(Error::InvalidArgument(
                "pass --onto <task> or --column <status>".to_string(),
            ))
        }
    };

    board.drag_start(&id);
    let plan = board.drag_end(&id, target).await?;
    let task = board.state().find(&id);

    let mut human = match (&plan, task) {
        (Some(plan), Some(task)) => {
            let mut human = ctx.human(format!("taskboard task move: {}", task_line(task)));
            if plan.changes_status() {
                human.push_summary("column", format!("{} -> {}", plan.from, plan.status));
            }
            human.push_summary("position", (plan.index + 1).to_string());
            human.push_summary("order", plan.order.to_string());
            human
        }
        _ => ctx.human(format!("taskboard task move: {} stays put", short_id(&id))),
    };
    human.push_next_step("taskboard board");

    emit_success(
        ctx.output,
        "task move",
        &MoveReport {
            moved: plan.is_some(),
            plan: plan.as_ref(),
            task,
        },
        Some(&human),
    )
}
