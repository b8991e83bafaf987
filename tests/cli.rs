use clap::Parser;
use onebox::api::models::{Category, Folder};
use onebox::cli::{AccountsCommand, AuthCommand, Cli, Command};

#[test]
fn parses_auth_login_with_token() {
    let cli = Cli::try_parse_from(["onebox", "auth", "login", "--token", "abc"])
        .expect("cli parse should work");
    match cli.command {
        Command::Auth(auth) => match auth.command {
            AuthCommand::Login(login) => assert_eq!(login.token.as_deref(), Some("abc")),
            _ => panic!("expected login"),
        },
        _ => panic!("expected auth command"),
    }
}

#[test]
fn parses_accounts_add() {
    let cli = Cli::try_parse_from(["onebox", "accounts", "add", "--email", "me@example.com"])
        .expect("cli parse should work");
    match cli.command {
        Command::Accounts(accounts) => match accounts.command {
            AccountsCommand::Add(add) => {
                assert_eq!(add.email, "me@example.com");
                assert!(add.password.is_none());
            }
            _ => panic!("expected add"),
        },
        _ => panic!("expected accounts command"),
    }
}

#[test]
fn parses_list_view_options() {
    let cli = Cli::try_parse_from([
        "onebox",
        "list",
        "--folder",
        "archive",
        "--page",
        "3",
        "--q",
        "invoice",
        "--filter",
        "priority=High",
        "--filter",
        "action-required=Reply Needed",
        "--next",
    ])
    .expect("cli parse should work");

    match cli.command {
        Command::List(list) => {
            assert_eq!(list.view.folder, Folder::Archive);
            assert_eq!(list.view.page, 3);
            assert_eq!(list.view.search.as_deref(), Some("invoice"));
            assert_eq!(
                list.view.filters,
                vec![
                    (Category::Priority, "High".to_string()),
                    (Category::ActionRequired, "Reply Needed".to_string()),
                ]
            );
            assert!(list.next);
        }
        _ => panic!("expected list command"),
    }
}

#[test]
fn list_defaults_to_first_inbox_page() {
    let cli = Cli::try_parse_from(["onebox", "list"]).expect("cli parse should work");
    match cli.command {
        Command::List(list) => {
            assert_eq!(list.view.folder, Folder::Inbox);
            assert_eq!(list.view.page, 1);
            assert!(list.view.filters.is_empty());
        }
        _ => panic!("expected list command"),
    }
}

#[test]
fn rejects_conflicting_page_flags() {
    assert!(Cli::try_parse_from(["onebox", "list", "--next", "--prev"]).is_err());
    assert!(Cli::try_parse_from(["onebox", "list", "--first", "--last"]).is_err());
}

#[test]
fn rejects_malformed_filter() {
    assert!(Cli::try_parse_from(["onebox", "list", "--filter", "priority"]).is_err());
    assert!(Cli::try_parse_from(["onebox", "list", "--filter", "mood=happy"]).is_err());
}

#[test]
fn parses_trash_with_many_ids() {
    let cli = Cli::try_parse_from(["onebox", "trash", "a", "b", "c", "-y"])
        .expect("cli parse should work");
    match cli.command {
        Command::Trash(args) => {
            assert_eq!(args.ids, ["a", "b", "c"]);
            assert!(args.yes);
        }
        _ => panic!("expected trash command"),
    }
}

#[test]
fn archive_requires_an_id() {
    assert!(Cli::try_parse_from(["onebox", "archive"]).is_err());
}

#[test]
fn global_flags_work_after_subcommand() {
    let cli = Cli::try_parse_from(["onebox", "counts", "--json", "-vv", "--profile", "work"])
        .expect("cli parse should work");
    assert!(cli.json);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.profile, "work");
    assert!(matches!(cli.command, Command::Counts(_)));
}
