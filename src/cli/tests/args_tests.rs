use clap::Parser;

use super::args::{CliArgs, Command, LogArgs, OutputFormat};
use crate::tracing_config::LogFormat;

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["gentype", "--catalog", "types.json", "declarations"])
        .expect("minimal args should parse");

    assert_eq!(args.catalog, std::path::PathBuf::from("types.json"));
    assert_eq!(args.format, OutputFormat::Text);
    assert!(!args.no_cache);
    assert!(!args.no_color);
    assert_eq!(args.logging, LogArgs::default());
    assert_eq!(args.command, Command::Declarations);
}

#[test]
fn parses_subtype_command() {
    let args = CliArgs::try_parse_from([
        "gentype",
        "-c",
        "types.json",
        "--format",
        "JSON",
        "--no-cache",
        "subtype",
        "Map<String,Long>",
        "StringKeyMap",
    ])
    .expect("subtype args should parse");

    assert_eq!(args.format, OutputFormat::Json);
    assert!(args.no_cache);
    assert_eq!(
        args.command,
        Command::Subtype {
            ancestor: "Map<String,Long>".to_string(),
            target: "StringKeyMap".to_string(),
        }
    );
}

#[test]
fn parses_supertype_and_ancestors() {
    let args = CliArgs::try_parse_from([
        "gentype", "--catalog", "t.json", "supertype", "StringIntMap", "Map",
    ])
    .expect("supertype args should parse");
    assert_eq!(
        args.command,
        Command::Supertype {
            ty: "StringIntMap".to_string(),
            ancestor: "Map".to_string(),
        }
    );

    let args = CliArgs::try_parse_from(["gentype", "--catalog", "t.json", "ancestors", "List<Byte>"])
        .expect("ancestors args should parse");
    assert_eq!(
        args.command,
        Command::Ancestors {
            ty: "List<Byte>".to_string(),
        }
    );
}

#[test]
fn requires_catalog_and_command() {
    assert!(CliArgs::try_parse_from(["gentype", "resolve", "String"]).is_err());
    assert!(CliArgs::try_parse_from(["gentype", "--catalog", "t.json"]).is_err());
    assert!(
        CliArgs::try_parse_from(["gentype", "--catalog", "t.json", "--format", "yaml", "declarations"])
            .is_err()
    );
}

#[test]
fn parses_logging_flags() {
    let args = CliArgs::try_parse_from([
        "gentype",
        "-c",
        "types.json",
        "--log",
        "gentype_solver=debug",
        "--log-format",
        "TREE",
        "--trace-queries",
        "ancestors",
        "HashMap<String,Long>",
    ])
    .expect("logging args should parse");

    assert_eq!(
        args.logging,
        LogArgs {
            log: Some("gentype_solver=debug".to_string()),
            log_format: Some(LogFormat::Tree),
            trace_queries: true,
        }
    );
}
