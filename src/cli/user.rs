//! kb user command implementations.

use serde::Serialize;

use crate::auth::{self, MailRelay, GUEST_USERNAME};
use crate::cli::Context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(Serialize)]
struct AccountBody {
    username: String,
    email: String,
}

pub async fn run_register(
    ctx: Context,
    options: OutputOptions,
    username: String,
    email: String,
    password: String,
) -> Result<()> {
    let Context { mut repo, .. } = ctx;
    repo.register_user(username.clone(), email.clone(), password)
        .await?;

    let mut human = HumanOutput::new("You signed up successfully");
    human.push_summary("username", username.clone());

    emit_success(
        options,
        "user register",
        &AccountBody { username, email },
        Some(&human),
    )
}

#[derive(Serialize)]
struct SessionBody {
    username: String,
    guest: bool,
}

pub fn run_login(
    ctx: Context,
    options: OutputOptions,
    email: String,
    password: String,
    guest: bool,
) -> Result<()> {
    let session = if guest {
        SessionBody {
            username: GUEST_USERNAME.to_string(),
            guest: true,
        }
    } else {
        let user = ctx
            .repo
            .login(&email, &password)
            .ok_or_else(|| Error::InvalidArgument("wrong password or email".to_string()))?;
        SessionBody {
            username: user.username.clone(),
            guest: false,
        }
    };

    let mut human = HumanOutput::new("Logged in");
    human.push_summary("username", session.username.clone());

    emit_success(options, "user login", &session, Some(&human))
}

pub async fn run_reset_password(
    ctx: Context,
    options: OutputOptions,
    email: String,
    password: String,
) -> Result<()> {
    let Context { mut repo, .. } = ctx;
    repo.reset_password(&email, password).await?;

    let human = HumanOutput::new("You reset your password");
    emit_success(
        options,
        "user reset-password",
        &serde_json::json!({ "email": email }),
        Some(&human),
    )
}

pub async fn run_forgot_password(ctx: Context, options: OutputOptions, email: String) -> Result<()> {
    let relay = MailRelay::new(&ctx.config.mail)?;
    auth::request_password_reset(&ctx.repo, &relay, &email).await?;

    let human = HumanOutput::new("Reset instructions sent");
    emit_success(
        options,
        "user forgot-password",
        &serde_json::json!({ "email": email }),
        Some(&human),
    )
}
