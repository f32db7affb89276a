use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn taskboard_help_works() {
    Command::cargo_bin("taskboard")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("kanban board"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "init", "register", "login", "logout", "whoami", "task", "board", "search",
    ];

    for cmd in subcommands {
        Command::cargo_bin("taskboard")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn task_subcommand_help_works() {
    for sub in ["new", "edit", "rm", "list", "show", "move"] {
        Command::cargo_bin("taskboard")
            .expect("binary")
            .args(["task", sub, "--help"])
            .assert()
            .success();
    }
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("taskboard")
        .expect("binary")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}
