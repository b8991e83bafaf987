use crate::cli::{Cli, Command};
use crate::commands;
use crate::commands::mutate::MoveKind;
use crate::context::AppContext;
use crate::error::AppResult;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose: _,
        command,
    } = cli;

    let ctx = AppContext::bootstrap(profile, json)?;

    match command {
        Command::Auth(args) => commands::auth::run(&ctx, args.command).await,
        Command::Accounts(args) => commands::accounts::run(&ctx, args.command).await,
        Command::List(args) => commands::list::run(&ctx, args).await,
        Command::Show(args) => commands::show::run(&ctx, args).await,
        Command::Star(args) => commands::mutate::star(&ctx, args).await,
        Command::Archive(args) => commands::mutate::run(&ctx, MoveKind::Archive, args).await,
        Command::Unarchive(args) => commands::mutate::run(&ctx, MoveKind::Unarchive, args).await,
        Command::Trash(args) => commands::mutate::run(&ctx, MoveKind::Trash, args).await,
        Command::Counts(args) => commands::counts::run(&ctx, args).await,
        Command::Sync(args) => commands::sync::run(&ctx, args).await,
        Command::Download(args) => commands::download::run(&ctx, args).await,
    }
}
