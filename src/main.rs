mod ai;
mod cli;
mod config;
mod error;
mod github;
mod orchestrator;
mod progress;

use ai::prompt::{format_activities, NO_ACTIVITY};
use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use github::collector::CollectObserver;
use github::{ActivityCounts, Timespan};
use orchestrator::Orchestrator;
use progress::SearchSpinners;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Validate CLI arguments
    if let Err(e) = cli.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Handle subcommands
    if let Some(command) = &cli.command {
        return handle_command(command, cli.config.as_deref());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default()?,
    };
    let config = apply_cli_overrides(config, &cli);

    // Token problems surface here, before any request is made
    let orchestrator = Orchestrator::new(&config, !cli.dry_run)?;

    let options = RunOptions {
        user: cli.user.as_deref(),
        repo: cli.repo.as_deref(),
        days: config.default_days,
        model: &config.default_model,
        dry_run: cli.dry_run,
    };
    let spinners = SearchSpinners::default();
    standup(&orchestrator, &options, &spinners, &mut std::io::stdout()).await
}

/// Inputs of one report run after config and CLI are merged
struct RunOptions<'a> {
    user: Option<&'a str>,
    repo: Option<&'a str>,
    days: i64,
    model: &'a str,
    dry_run: bool,
}

/// Collect activity and write the digest, the no-activity sentence or the
/// report to `out`. Status lines go to stderr.
async fn standup(
    orchestrator: &Orchestrator,
    options: &RunOptions<'_>,
    observer: &dyn CollectObserver,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let timespan = Timespan::days_back(options.days)?;

    let user = match options.user {
        Some(user) => user.to_string(),
        None => {
            eprintln!("Getting authenticated GitHub user...");
            let user = orchestrator
                .resolve_user(None)
                .await
                .context("failed to get current user")?;
            eprintln!("Found user: {}", user);
            user
        }
    };

    eprintln!(
        "Analyzing GitHub activity for {} ({} to {})",
        user,
        timespan.start.format("%Y-%m-%d"),
        timespan.end.format("%Y-%m-%d")
    );

    let collection = orchestrator
        .collect_activity(&user, options.repo, &timespan, observer)
        .await
        .context("failed to collect GitHub activity")?;
    if let Some(err) = &collection.commit_search_error {
        tracing::debug!(error = ?err, "commits omitted from this report");
    }
    let activities = collection.activities;

    if options.dry_run {
        writeln!(out, "{}", format_activities(&activities))?;
        return Ok(());
    }

    if activities.is_empty() {
        writeln!(out, "{}", NO_ACTIVITY)?;
        return Ok(());
    }

    writeln!(out, "Found {} activities", activities.len())?;
    writeln!(out, "   {}", ActivityCounts::from_activities(&activities))?;
    out.flush()?;

    let spinner = progress::spinner(format!(
        "Generating standup report using {}...",
        options.model
    ));
    let report = orchestrator.generate_report(&activities, options.model).await;
    match &report {
        Ok(_) => spinner.finish_with_message("Report generated successfully!"),
        Err(_) => spinner.abandon_with_message("Report generation failed"),
    }
    let report = report.context("failed to generate standup report")?;

    writeln!(out, "\n{}", "=".repeat(50))?;
    writeln!(out, "STANDUP REPORT")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "{}", report)?;

    Ok(())
}

fn handle_command(command: &Commands, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    match command {
        Commands::Init { force } => {
            if config_path.exists() && !force {
                bail!(
                    "Config file already exists at: {} (use --force to overwrite)",
                    config_path.display()
                );
            }

            Config::create_default_at(&config_path)?;
            println!("✓ Created config file at: {}", config_path.display());
            println!("\nTo authenticate with GitHub, either:");
            println!("  1. Set the GITHUB_TOKEN (or GH_TOKEN) environment variable");
            println!("  2. Add github_token to the config file:");
            println!("     github_token = \"ghp_YOUR_TOKEN_HERE\"");
        }
        Commands::Config => {
            let config = if config_path.exists() {
                Config::load_from(&config_path)?
            } else {
                Config::default()
            };
            let toml_str = toml::to_string_pretty(&config)?;
            println!("Current configuration ({}):\n", config_path.display());
            println!("{}", toml_str);
        }
    }
    Ok(())
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(days) = cli.days {
        config.default_days = days;
    }

    if let Some(ref model) = cli.model {
        config.default_model = model.clone();
    }

    config
}

/// Log to stderr; `-v` enables info, `-vv` debug, RUST_LOG takes precedence
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai::ReportGenerator;
    use github::client::GitHubClient;
    use github::collector::SilentObserver;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> Config {
        Config {
            github_api_url: server.uri(),
            models_api_url: format!("{}/inference/chat/completions", server.uri()),
            ..Config::default()
        }
    }

    fn with_generator(server: &MockServer) -> Orchestrator {
        let config = test_config(server);
        Orchestrator::from_parts(
            GitHubClient::new(&config.github_api_url, None).unwrap(),
            Some(ReportGenerator::with_token(Some("test-token".to_string()), &config).unwrap()),
        )
    }

    fn options(dry_run: bool) -> RunOptions<'static> {
        RunOptions {
            user: Some("octocat"),
            repo: None,
            days: 1,
            model: "openai/gpt-4o",
            dry_run,
        }
    }

    async fn mount_searches(server: &MockServer, issue_items: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": issue_items })))
            .expect(3)
            .mount(server)
            .await;
    }

    async fn mount_completion(server: &MockServer, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/inference/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "  I shipped search.  " } }]
            })))
            .expect(calls)
            .mount(server)
            .await;
    }

    async fn run_to_string(orchestrator: &Orchestrator, options: &RunOptions<'_>) -> String {
        let mut out = Vec::new();
        standup(orchestrator, options, &SilentObserver, &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_empty_run_skips_model() {
        let server = MockServer::start().await;
        mount_searches(&server, json!([])).await;
        mount_completion(&server, 0).await;

        let output = run_to_string(&with_generator(&server), &options(false)).await;
        assert_eq!(output, "No GitHub activity found for the specified period.\n");
    }

    #[tokio::test]
    async fn test_run_prints_counts_and_report() {
        let server = MockServer::start().await;
        mount_searches(
            &server,
            json!([{
                "number": 5,
                "title": "Add search",
                "body": "Adds search",
                "html_url": "https://github.com/octo/hello/pull/5",
                "repository_url": "https://api.github.com/repos/octo/hello",
                "created_at": "2024-05-06T15:00:00Z"
            }]),
        )
        .await;
        mount_completion(&server, 1).await;

        let output = run_to_string(&with_generator(&server), &options(false)).await;
        let rule = "=".repeat(50);
        assert_eq!(
            output,
            format!(
                "Found 3 activities\n   0 commits, 1 pull requests, 1 issues, 1 reviews\n\n{rule}\nSTANDUP REPORT\n{rule}\nI shipped search.\n"
            )
        );
    }

    #[tokio::test]
    async fn test_dry_run_needs_no_generator() {
        let server = MockServer::start().await;
        mount_searches(&server, json!([])).await;
        mount_completion(&server, 0).await;

        let orchestrator = Orchestrator::new(&test_config(&server), false).unwrap();
        let output = run_to_string(&orchestrator, &options(true)).await;
        assert_eq!(output, "No GitHub activity found for the specified period.\n");
    }

    #[tokio::test]
    async fn test_out_of_range_days_fails_before_any_request() {
        let server = MockServer::start().await;
        mount_completion(&server, 0).await;

        let orchestrator = with_generator(&server);
        let options = RunOptions {
            days: i64::MAX,
            ..options(false)
        };
        let mut out = Vec::new();
        let err = standup(&orchestrator, &options, &SilentObserver, &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--days is out of range"));
        assert!(out.is_empty());
    }
}
