use serde::Serialize;

use crate::api::MailApi;
use crate::api::models::Account;
use crate::cli::{AccountsCommand, AddAccountArgs, UseAccountArgs};
use crate::config;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::output::OutputMode;
use crate::store::{AccountStore, Store};

use super::prompt_required;

#[derive(Debug, Serialize)]
struct AccountList<'a> {
    selected: Option<&'a str>,
    accounts: &'a [Account],
}

pub async fn run(ctx: &AppContext, command: AccountsCommand) -> AppResult<()> {
    match command {
        AccountsCommand::Ls => list(ctx).await,
        AccountsCommand::Add(args) => add(ctx, args).await,
        AccountsCommand::Use(args) => use_account(ctx, args).await,
    }
}

async fn list(ctx: &AppContext) -> AppResult<()> {
    let client = ctx.authorized_client().await?;
    let mut accounts = AccountStore::default();
    accounts.prefer(ctx.settings.default_account());
    accounts.replace(client.list_accounts().await?);

    let selected = accounts.selected_id();
    if ctx.output.mode() == OutputMode::Text {
        if accounts.accounts().is_empty() {
            println!("0 accounts. run `onebox accounts add --email <address>`");
            return Ok(());
        }

        for account in accounts.accounts() {
            let marker = if Some(account.id.as_str()) == selected {
                "*"
            } else {
                " "
            };
            println!(
                "{marker} {} [{}] {} unread (id: {})",
                account.email, account.provider, account.unread, account.id
            );
        }
        return Ok(());
    }

    ctx.output.emit(
        "",
        &AccountList {
            selected,
            accounts: accounts.accounts(),
        },
    )
}

async fn add(ctx: &AppContext, args: AddAccountArgs) -> AppResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_required(&format!("App password for {}: ", args.email))?,
    };

    let client = ctx.authorized_client().await?;
    let mut store = Store::new(client);
    let account = store.add_account(args.email.trim(), &password).await?;

    let text = format!("connected {} ({})", account.email, account.provider);
    ctx.output.emit(&text, &account)
}

/// Makes an account the profile default after checking it exists.
async fn use_account(ctx: &AppContext, args: UseAccountArgs) -> AppResult<()> {
    let client = ctx.authorized_client().await?;
    let mut accounts = AccountStore::default();
    accounts.replace(client.list_accounts().await?);
    accounts.select(&args.account)?;
    let Some(account) = accounts.selected() else {
        return Ok(());
    };

    let mut settings = ctx.settings.clone();
    settings.default_account = Some(account.email.clone());
    config::save_settings(&ctx.paths, &ctx.profile, &settings)?;

    let text = format!("{}: default account is {}", ctx.profile, account.email);
    ctx.output.emit(&text, account)
}
