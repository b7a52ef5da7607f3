use crate::ai::ReportGenerator;
use crate::config::Config;
use crate::error::{Result, StandupError};
use crate::github::client::GitHubClient;
use crate::github::collector::{ActivityCollector, Collection, CollectObserver};
use crate::github::{Activity, Timespan};
use tracing::info;

/// Orchestrator for coordinating one standup run
pub struct Orchestrator {
    github: GitHubClient,
    generator: Option<ReportGenerator>,
}

impl Orchestrator {
    /// Create a new orchestrator.
    ///
    /// With `with_generator` set, a missing token fails here, before any network call.
    pub fn new(config: &Config, with_generator: bool) -> Result<Self> {
        let generator = if with_generator {
            Some(ReportGenerator::new(config)?)
        } else {
            None
        };

        let token = config.github_token();
        let github = GitHubClient::new(&config.github_api_url, token.as_deref())?;

        Ok(Self::from_parts(github, generator))
    }

    pub(crate) fn from_parts(github: GitHubClient, generator: Option<ReportGenerator>) -> Self {
        Self { github, generator }
    }

    /// Use the given user, or look up the authenticated one
    pub async fn resolve_user(&self, user: Option<&str>) -> Result<String> {
        match user {
            Some(user) => Ok(user.to_string()),
            None => {
                let login = self.github.current_user().await?;
                info!(%login, "resolved authenticated user");
                Ok(login)
            }
        }
    }

    /// Collect activity for `user` in the window
    pub async fn collect_activity(
        &self,
        user: &str,
        repo: Option<&str>,
        timespan: &Timespan,
        observer: &dyn CollectObserver,
    ) -> Result<Collection> {
        ActivityCollector::new(&self.github)
            .with_observer(observer)
            .collect(user, repo, timespan)
            .await
    }

    /// Generate the standup report
    pub async fn generate_report(&self, activities: &[Activity], model: &str) -> Result<String> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            StandupError::config("report generation is disabled for this run")
        })?;
        generator.generate(activities, model).await
    }
}
