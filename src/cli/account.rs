//! Account commands: register, login, logout, whoami

use super::Context;
use crate::api::Credentials;
use crate::auth;
use crate::error::Result;
use crate::output::emit_success;
use crate::store::BoardState;
use crate::task::User;

pub(super) struct CredentialOptions {
    pub email: String,
    pub password: String,
}

impl CredentialOptions {
    fn credentials(&self) -> Credentials {
        Credentials::new(self.email.trim(), self.password.as_str())
    }
}

#[derive(serde::Serialize)]
struct RegisterReport<'a> {
    email: &'a str,
}

#[derive(serde::Serialize)]
struct SessionReport<'a> {
    user: Option<&'a User>,
    authenticated: bool,
}

pub(super) async fn run_register(ctx: &Context, options: CredentialOptions) -> Result<()> {
    let credentials = options.credentials();
    let client = ctx.api_client()?;
    auth::register(&client, &credentials).await?;

    let mut human = ctx.human(format!("taskboard register: created {}", credentials.email));
    human.push_next_step("taskboard login --email <email> --password <password>");

    emit_success(
        ctx.output,
        "register",
        &RegisterReport {
            email: &credentials.email,
        },
        Some(&human),
    )
}

pub(super) async fn run_login(ctx: &Context, options: CredentialOptions) -> Result<()> {
    let credentials = options.credentials();
    let mut client = ctx.api_client()?;
    let mut state = BoardState::new();
    let user = auth::login(&mut client, &ctx.storage, &mut state, &credentials).await?;

    let mut human = ctx.human(format!("taskboard login: signed in as {}", user.email));
    human.push_summary("user", user.id.as_str());
    human.push_summary("api", client.base_url());
    human.push_next_step("taskboard --backend remote board");

    emit_success(
        ctx.output,
        "login",
        &SessionReport {
            user: Some(&user),
            authenticated: true,
        },
        Some(&human),
    )
}

pub(super) async fn run_logout(ctx: &Context) -> Result<()> {
    let mut client = ctx.api_client()?;
    let mut state = BoardState::new();
    auth::logout(&mut client, &ctx.storage, &mut state).await?;

    let human = ctx.human("taskboard logout: session cleared");
    emit_success(
        ctx.output,
        "logout",
        &SessionReport {
            user: None,
            authenticated: false,
        },
        Some(&human),
    )
}

pub(super) async fn run_whoami(ctx: &Context) -> Result<()> {
    let client = ctx.api_client()?;
    let mut state = BoardState::new();
    auth::init_auth(&client, &mut state).await;
    let user = auth::require_auth(&state)?;

    let mut human = ctx.human(user.email.as_str());
    human.push_summary("id", user.id.as_str());

    emit_success(
        ctx.output,
        "whoami",
        &SessionReport {
            user: Some(user),
            authenticated: true,
        },
        Some(&human),
    )
}
