use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_patch_with_files() {
    let cli = Cli::parse_from([
        "sqlpatch",
        "-p",
        "/srv/app",
        "patch",
        "--no-backup",
        "--file",
        "a.sql",
        "-f",
        "b.sql",
    ]);
    assert_eq!(cli.global.project_dir, PathBuf::from("/srv/app"));
    match cli.command {
        Commands::Patch(args) => {
            assert!(args.no_backup);
            assert_eq!(args.files, vec![PathBuf::from("a.sql"), PathBuf::from("b.sql")]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::parse_from(["sqlpatch", "version", "-v", "-d", ":memory:"]);
    assert!(cli.global.verbose);
    assert_eq!(cli.global.database.as_deref(), Some(":memory:"));
    assert!(matches!(cli.command, Commands::Version));
}

#[test]
fn test_split_output_default() {
    let cli = Cli::parse_from(["sqlpatch", "split", "0001~users.sql"]);
    match cli.command {
        Commands::Split(args) => {
            assert_eq!(args.output, SplitOutput::Text);
            assert_eq!(args.file, PathBuf::from("0001~users.sql"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
