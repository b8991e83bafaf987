use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::api::models::{Category, Folder};

#[derive(Debug, Parser)]
#[command(name = "onebox", version, about = "OneBox mail client")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Auth(AuthArgs),
    Accounts(AccountsArgs),
    List(ListArgs),
    Show(ShowArgs),
    Star(StarArgs),
    Archive(MoveArgs),
    Unarchive(MoveArgs),
    Trash(MoveArgs),
    Counts(CountsArgs),
    Sync(SyncArgs),
    Download(DownloadArgs),
}

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    Login(LoginArgs),
    Status,
    Logout,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long, help = "Session token from the OneBox web login")]
    pub token: Option<String>,
}

#[derive(Debug, Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    Ls,
    Add(AddAccountArgs),
    Use(UseAccountArgs),
}

#[derive(Debug, Args)]
pub struct AddAccountArgs {
    #[arg(long, help = "Mailbox address")]
    pub email: String,
    #[arg(long, help = "App password (prompted when omitted)")]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct UseAccountArgs {
    #[arg(help = "Account id or email address")]
    pub account: String,
}

/// Options that pick the page of mail a command works on.
#[derive(Debug, Clone, Default, Args)]
pub struct ViewArgs {
    #[arg(long, help = "Account id or email (defaults to the profile's account)")]
    pub account: Option<String>,
    #[arg(long, default_value_t = Folder::Inbox, help = "Folder: inbox, archive or trash")]
    pub folder: Folder,
    #[arg(long, default_value_t = 1, help = "Page number (1-based)")]
    pub page: u32,
    #[arg(long, visible_alias = "q", help = "Free-text search")]
    pub search: Option<String>,
    #[arg(
        long = "filter",
        value_parser = parse_filter,
        action = ArgAction::Append,
        help = "Category filter as category=value (repeatable)"
    )]
    pub filters: Vec<(Category, String)>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long, conflicts_with_all = ["first", "prev", "next"], help = "Jump to the last page")]
    pub last: bool,
    #[arg(long, conflicts_with_all = ["prev", "next"], help = "Jump to the first page")]
    pub first: bool,
    #[arg(long, conflicts_with = "next", help = "Go back one page")]
    pub prev: bool,
    #[arg(long, help = "Go forward one page")]
    pub next: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(help = "Email id")]
    pub id: String,
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(long, help = "Only print the header, not the body")]
    pub collapsed: bool,
}

#[derive(Debug, Args)]
pub struct StarArgs {
    #[arg(help = "Email id")]
    pub id: String,
    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    #[arg(required = true, num_args = 1.., help = "Email ids")]
    pub ids: Vec<String>,
    #[command(flatten)]
    pub view: ViewArgs,
    #[arg(short = 'y', long, help = "Skip the confirmation prompt")]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct CountsArgs {
    #[arg(long, help = "Account id or email")]
    pub account: Option<String>,
    #[arg(long, default_value_t = Folder::Inbox, help = "Folder: inbox, archive or trash")]
    pub folder: Folder,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[arg(long, help = "Account id or email")]
    pub account: Option<String>,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    #[arg(help = "Email id")]
    pub id: String,
    #[arg(long, help = "Attachment filename (all attachments when omitted)")]
    pub attachment: Option<String>,
    #[arg(long, help = "Output directory")]
    pub out: Option<PathBuf>,
    #[command(flatten)]
    pub view: ViewArgs,
}

fn parse_filter(raw: &str) -> Result<(Category, String), String> {
    let (category, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected category=value, got `{raw}`"))?;
    let category = category.parse::<Category>().map_err(|err| err.to_string())?;
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("missing value for `{category}`"));
    }

    Ok((category, value.to_string()))
}
