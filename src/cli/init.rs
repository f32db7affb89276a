//! taskboard init command implementation
//!
//! Creates the data directory and a default `.taskboard.toml`.

use std::path::PathBuf;

use super::Context;
use crate::config::BackendKind;
use crate::error::Result;
use crate::output::emit_success;
use crate::storage::CONFIG_FILE;

#[derive(serde::Serialize)]
struct InitReport {
    dir: PathBuf,
    backend: BackendKind,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    dir: bool,
    config: bool,
}

pub(super) fn run(ctx: &Context) -> Result<()> {
    let storage = &ctx.storage;
    let created_dir = !storage.root().exists();
    storage.init()?;

    let created_config = !storage.is_initialized();
    if created_config {
        // Flags like --backend given at init time become the saved defaults.
        ctx.config.save(&storage.config_file())?;
        tracing::info!(path = %storage.config_file().display(), "wrote config");
    }

    let report = InitReport {
        dir: storage.root().to_path_buf(),
        backend: ctx.config.board.backend,
        created: InitCreated {
            dir: created_dir,
            config: created_config,
        },
    };

    let mut created_items = Vec::new();
    if created_dir {
        created_items.push(format!("{}/", storage.root().display()));
    }
    if created_config {
        created_items.push(CONFIG_FILE.to_string());
    }

    let header = if created_items.is_empty() {
        "taskboard init: nothing to do".to_string()
    } else {
        "taskboard init: initialized".to_string()
    };

    let mut human = ctx.human(header);
    human.push_summary("dir", storage.root().display().to_string());
    human.push_summary("backend", report.backend.as_str());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_next_step("taskboard task new <title>");
    human.push_next_step("taskboard board");

    emit_success(ctx.output, "init", &report, Some(&human))
}
