mod support;

use predicates::str::contains;
use support::TestBoard;

#[test]
fn new_task_defaults_to_todo_and_is_listed() {
    let board = TestBoard::new();

    let data = board.json(&["task", "new", "Write docs"]);
    assert_eq!(data["status"], "todo");
    assert_eq!(data["order"], 1.0);
    assert!(data["id"].as_str().is_some_and(|id| !id.is_empty()));

    let list = board.json(&["task", "list"]);
    assert_eq!(list["total"], 1);
    assert_eq!(list["tasks"][0]["title"], "Write docs");

    let stored = board.read_json("tasks.json");
    assert_eq!(stored.as_array().map(Vec::len), Some(1));
}

#[test]
fn blank_title_is_a_user_error() {
    let board = TestBoard::new();

    let envelope = board.json_failure(&["task", "new", "   "], 2);
    assert_eq!(envelope["error"]["kind"], "user_error");
    assert!(!board.file("tasks.json").exists());
}

#[test]
fn move_onto_task_reorders_column() {
    let board = TestBoard::new();
    let one = board.new_task("Task 1", "todo");
    board.new_task("Task 2", "todo");
    let three = board.new_task("Task 3", "todo");

    let data = board.json(&["task", "move", &three, "--onto", &one]);
    assert_eq!(data["moved"], true);
    assert_eq!(data["plan"]["index"], 0);

    assert_eq!(board.column_titles("todo"), vec!["Task 3", "Task 1", "Task 2"]);
}

#[test]
fn move_down_lands_after_target() {
    let board = TestBoard::new();
    let one = board.new_task("Task 1", "todo");
    board.new_task("Task 2", "todo");
    let three = board.new_task("Task 3", "todo");

    board.json(&["task", "move", &one, "--onto", &three]);
    assert_eq!(board.column_titles("todo"), vec!["Task 2", "Task 3", "Task 1"]);
}

#[test]
fn move_onto_task_in_other_column_changes_status() {
    let board = TestBoard::new();
    let todo = board.new_task("Todo", "todo");
    let first = board.new_task("Doing A", "in-progress");
    board.new_task("Doing B", "in-progress");

    let data = board.json(&["task", "move", &todo, "--onto", &first]);
    assert_eq!(data["task"]["status"], "in_progress");

    assert!(board.column_titles("todo").is_empty());
    assert_eq!(
        board.column_titles("in-progress"),
        vec!["Todo", "Doing A", "Doing B"]
    );
}

#[test]
fn move_to_column_appends_at_end() {
    let board = TestBoard::new();
    let todo = board.new_task("Todo", "todo");
    board.new_task("Done A", "done");
    board.new_task("Done B", "done");

    let data = board.json(&["task", "move", &todo, "--column", "done"]);
    assert_eq!(data["plan"]["order"], 3.0);
    assert_eq!(board.column_titles("done"), vec!["Done A", "Done B", "Todo"]);
}

#[test]
fn move_onto_itself_is_a_no_op() {
    let board = TestBoard::new();
    let id = board.new_task("Solo", "todo");

    let data = board.json(&["task", "move", &id, "--onto", &id]);
    assert_eq!(data["moved"], false);
}

#[test]
fn move_requires_a_target() {
    let board = TestBoard::new();
    let id = board.new_task("Solo", "todo");

    board.cmd().args(["task", "move", &id]).assert().code(2);
}

#[test]
fn edit_updates_fields_and_keeps_title() {
    let board = TestBoard::new();
    let id = board.new_task("Draft", "todo");

    let data = board.json(&["task", "edit", &id, "--description", "details", "--status", "done"]);
    assert_eq!(data["title"], "Draft");
    assert_eq!(data["description"], "details");
    assert_eq!(data["status"], "done");

    let data = board.json(&["task", "edit", &id, "--description", ""]);
    assert!(data.get("description").is_none());
}

#[test]
fn edit_without_changes_is_rejected() {
    let board = TestBoard::new();
    let id = board.new_task("Draft", "todo");

    board.json_failure(&["task", "edit", &id], 2);
}

#[test]
fn ids_can_be_given_by_prefix() {
    let board = TestBoard::new();
    let id = board.new_task("Prefixed", "todo");

    let data = board.json(&["task", "show", &id[..8]]);
    assert_eq!(data["id"], id.as_str());
}

#[test]
fn rm_deletes_one_task() {
    let board = TestBoard::new();
    let keep = board.new_task("Keep", "todo");
    let drop = board.new_task("Drop", "todo");

    let data = board.json(&["task", "rm", &drop]);
    assert_eq!(data["removed"], true);

    let list = board.json(&["task", "list"]);
    assert_eq!(list["total"], 1);
    assert_eq!(list["tasks"][0]["id"], keep.as_str());
}

#[test]
fn unknown_task_is_a_user_error() {
    let board = TestBoard::new();
    board.new_task("Only", "todo");

    let envelope = board.json_failure(&["task", "show", "does-not-exist"], 2);
    assert_eq!(envelope["command"], "task show");
    assert_eq!(envelope["error"]["details"]["id"], "does-not-exist");
}

#[test]
fn invalid_status_is_rejected_by_parser() {
    let board = TestBoard::new();
    board
        .cmd()
        .args(["task", "new", "Bad", "--status", "blocked"])
        .assert()
        .code(2)
        .stderr(contains("unknown task status"));
}

#[test]
fn human_output_lists_tasks() {
    let board = TestBoard::new();
    board.new_task("Human readable", "todo");

    board
        .cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(contains("taskboard task list: 1 task(s)"))
        .stdout(contains("[todo] Human readable"));
}
