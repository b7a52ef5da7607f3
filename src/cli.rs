use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gh-standup")]
#[command(author, version)]
#[command(
    about = "Generate AI-powered standup reports from your GitHub activity",
    long_about = "gh-standup collects your recent commits, pull requests, issues and code \
                  reviews from the GitHub search API and asks a GitHub Models model to turn \
                  them into a first-person standup report."
)]
pub struct Cli {
    /// Number of days to look back for activity
    #[arg(short, long, value_name = "DAYS", allow_negative_numbers = true)]
    pub days: Option<i64>,

    /// GitHub Models model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Repository to generate standup for (owner/repo)
    #[arg(short, long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// User to generate standup for (defaults to authenticated user)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Path to config file (default: ~/.config/gh-standup/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dry run - print the activity digest without calling the model
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Config,
}

impl Cli {
    /// Validate CLI arguments
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref repo) = self.repo {
            let valid = matches!(
                repo.split('/').collect::<Vec<_>>().as_slice(),
                [owner, name] if !owner.is_empty() && !name.is_empty()
            );
            if !valid {
                return Err(format!(
                    "Invalid repository '{}': expected owner/repo",
                    repo
                ));
            }
        }

        if let Some(ref model) = self.model {
            if model.trim().is_empty() {
                return Err("--model must not be empty".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_basic() {
        let cli = Cli::parse_from(vec!["gh-standup"]);
        assert!(cli.days.is_none());
        assert!(cli.model.is_none());
        assert!(cli.repo.is_none());
        assert!(cli.user.is_none());
        assert!(cli.command.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_parse_short_options() {
        let cli = Cli::parse_from(vec![
            "gh-standup",
            "-d",
            "3",
            "-m",
            "openai/gpt-4o-mini",
            "-r",
            "octo/hello",
            "-u",
            "octocat",
        ]);
        assert_eq!(cli.days, Some(3));
        assert_eq!(cli.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(cli.repo.as_deref(), Some("octo/hello"));
        assert_eq!(cli.user.as_deref(), Some("octocat"));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_negative_days() {
        let cli = Cli::parse_from(vec!["gh-standup", "--days", "-2"]);
        assert_eq!(cli.days, Some(-2));
    }

    #[test]
    fn test_cli_init_command() {
        let cli = Cli::parse_from(vec!["gh-standup", "init", "--force"]);
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }

    #[test]
    fn test_cli_validation_bad_repo() {
        for repo in ["octo", "octo/", "/hello", "octo/hello/extra"] {
            let cli = Cli::parse_from(vec!["gh-standup", "--repo", repo]);
            assert!(cli.validate().is_err(), "{} should be rejected", repo);
        }
    }

    #[test]
    fn test_cli_verbose_count() {
        let cli = Cli::parse_from(vec!["gh-standup", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
