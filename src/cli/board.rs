//! Board rendering and the saved search term

use super::Context;
use crate::error::{Error, Result};
use crate::output::{emit_success, task_line};
use crate::store::Action;
use crate::task::{Task, TaskStatus};

pub(super) struct SearchOptions {
    pub term: Option<String>,
    pub clear: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardReport<'a> {
    search_term: &'a str,
    total: usize,
    columns: Vec<ColumnReport<'a>>,
}

#[derive(serde::Serialize)]
struct ColumnReport<'a> {
    status: TaskStatus,
    title: &'static str,
    tasks: Vec<&'a Task>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchReport<'a> {
    search_term: &'a str,
}

pub(super) async fn run_board(ctx: &Context) -> Result<()> {
    let board = ctx.open_board().await?;
    let search = board.state().ui.search_term.as_str();

    let columns: Vec<ColumnReport<'_>> = board
        .columns()
        .into_iter()
        .map(|column| ColumnReport {
            status: column.status,
            title: column.status.title(),
            tasks: column.tasks,
        })
        .collect();

    let mut human = ctx.human("taskboard board");
    if !search.is_empty() {
        human.push_summary("search", search);
    }
    for column in &columns {
        human.push_summary(column.title, column.tasks.len().to_string());
    }
    for column in &columns {
        for task in &column.tasks {
            human.push_detail(task_line(task));
        }
    }
    if board.state().tasks.is_empty() {
        human.push_next_step("taskboard task new <title>");
    } else if !search.is_empty() {
        human.push_next_step("taskboard search --clear");
    }

    let report = BoardReport {
        search_term: search,
        total: columns.iter().map(|column| column.tasks.len()).sum(),
        columns,
    };
    emit_success(ctx.output, "board", &report, Some(&human))
}

pub(super) fn run_search(ctx: &Context, options: SearchOptions) -> Result<()> {
    let term = if options.clear {
        String::new()
    } else {
        let term = options.term.unwrap_or_default();
        let term = term.trim();
        if term.is_empty() {
            return Err(Error::InvalidArgument(
                "search term cannot be empty; use --clear to remove it".to_string(),
            ));
        }
        term.to_string()
    };

    let mut state = ctx.initial_state()?;
    state.apply(Action::SetSearchTerm(term));
    ctx.save_ui(&state)?;
    tracing::info!(term = %state.ui.search_term, "saved search term");

    let header = if state.ui.search_term.is_empty() {
        "taskboard search: cleared".to_string()
    } else {
        format!("taskboard search: filtering by '{}'", state.ui.search_term)
    };
    let mut human = ctx.human(header);
    human.push_next_step("taskboard board");

    emit_success(
        ctx.output,
        "search",
        &SearchReport {
            search_term: &state.ui.search_term,
        },
        Some(&human),
    )
}
