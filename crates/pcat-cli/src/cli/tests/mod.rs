//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_list_and_names() {
    assert!(matches!(parse(&["pcat", "list"]).command, CliCommand::List));
    assert!(matches!(parse(&["pcat", "names"]).command, CliCommand::Names));
}

#[test]
fn cli_parse_show() {
    match parse(&["pcat", "show", "地震速報"]).command {
        CliCommand::Show { name } => assert_eq!(name, "地震速報"),
        _ => panic!("expected Show"),
    }
}

#[test]
fn cli_parse_show_requires_name() {
    assert!(Cli::try_parse_from(["pcat", "show"]).is_err());
}

#[test]
fn cli_parse_status_refresh() {
    assert!(matches!(parse(&["pcat", "status"]).command, CliCommand::Status));
    assert!(matches!(parse(&["pcat", "refresh"]).command, CliCommand::Refresh));
}

#[test]
fn cli_parse_global_url_override() {
    let cli = parse(&["pcat", "refresh", "--url", "http://127.0.0.1:8080/plugins.json"]);
    assert_eq!(cli.url.as_deref(), Some("http://127.0.0.1:8080/plugins.json"));
    let cli = parse(&["pcat", "--url", "https://example.com/p.json", "list"]);
    assert_eq!(cli.url.as_deref(), Some("https://example.com/p.json"));
    assert!(parse(&["pcat", "list"]).url.is_none());
}

#[test]
fn cli_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["pcat", "install"]).is_err());
}
