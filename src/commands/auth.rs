use crate::auth::SessionService;
use crate::cli::{AuthCommand, LoginArgs};
use crate::context::AppContext;
use crate::error::AppResult;

use super::prompt_required;

pub async fn run(ctx: &AppContext, command: AuthCommand) -> AppResult<()> {
    match command {
        AuthCommand::Login(args) => login(ctx, args).await,
        AuthCommand::Status => {
            let status = SessionService::status(&ctx.profile, &ctx.token_store)?;
            let text = if status.logged_in {
                let who = status
                    .name
                    .as_deref()
                    .or(status.email.as_deref())
                    .map(|who| format!(" as {who}"))
                    .unwrap_or_default();
                format!("{}: logged in{who} ({})", status.profile, ctx.client.base_url())
            } else {
                format!("{}: logged out", status.profile)
            };

            ctx.output.emit(&text, &status)
        }
        AuthCommand::Logout => {
            let status = SessionService::logout(&ctx.profile, &ctx.token_store)?;
            let text = format!("{}: logged out", status.profile);
            ctx.output.emit(&text, &status)
        }
    }
}

async fn login(ctx: &AppContext, args: LoginArgs) -> AppResult<()> {
    let token = match args.token {
        Some(token) => token,
        None => {
            println!(
                "Sign in to OneBox in your browser and paste the session token for profile `{}`.",
                ctx.profile
            );
            prompt_required("Session token: ")?
        }
    };

    let status = SessionService::login(&ctx.profile, &token, &ctx.client, &ctx.token_store).await?;
    let text = match status.email.as_deref() {
        Some(email) => format!("{}: logged in as {email}", status.profile),
        None => format!("{}: logged in", status.profile),
    };
    ctx.output.emit(&text, &status)
}
