#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_build_with_env_and_disabled_plugins() {
        let cli = Cli::parse_from([
            "solid", "build", "site", "--env", "staging", "--disable", "lint", "--disable",
            "deploy",
        ]);
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.run.app, "site");
                assert_eq!(args.run.env.as_deref(), Some("staging"));
                assert_eq!(args.run.disable, vec!["lint", "deploy"]);
                assert!(args.run.project.cwd.is_none());
            }
            other => panic!("expected build, got {other:?}"),
        }
    }

    #[test]
    fn test_dev_with_project_dir() {
        let cli = Cli::parse_from(["solid", "dev", "api", "--cwd", "/srv/app", "-c", "alt.toml"]);
        match cli.command {
            Command::Dev(args) => {
                assert_eq!(args.run.app, "api");
                assert_eq!(args.run.project.cwd, Some(PathBuf::from("/srv/app")));
                assert_eq!(args.run.project.config, Some(PathBuf::from("alt.toml")));
            }
            other => panic!("expected dev, got {other:?}"),
        }
    }

    #[test]
    fn test_build_requires_app() {
        assert!(Cli::try_parse_from(["solid", "build"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["solid", "-v", "-q", "list"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["solid", "list", "--no-color", "--verbose"]);
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn test_check_example() {
        let cli = Cli::parse_from(["solid", "check", "--example"]);
        assert!(matches!(cli.command, Command::Check(args) if args.example));
    }
}
