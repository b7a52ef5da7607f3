use crate::error::{Result, StandupError};
use crate::github::client::{CommitItem, GitHubClient, IssueItem};
use crate::github::search::SearchQuery;
use crate::github::{Activity, ActivityKind, Timespan};
use std::future::Future;
use tracing::{debug, info};

/// Receives progress events while activity is being collected
pub trait CollectObserver {
    fn search_started(&self, _kind: ActivityKind) {}
    fn search_finished(&self, _kind: ActivityKind, _found: usize) {}
    /// The search failed but collection continues without it
    fn search_skipped(&self, _kind: ActivityKind, _error: &StandupError) {}
    fn search_failed(&self, _kind: ActivityKind, _error: &StandupError) {}
}

/// Observer that ignores every event
pub struct SilentObserver;

impl CollectObserver for SilentObserver {}

/// Result of a collection run
#[derive(Debug)]
pub struct Collection {
    /// Commits, pull requests, issues, reviews, in that order
    pub activities: Vec<Activity>,
    /// Set when the commit search failed; `activities` then holds no commits
    pub commit_search_error: Option<StandupError>,
}

/// Gathers a user's activity through the GitHub search API
pub struct ActivityCollector<'a> {
    client: &'a GitHubClient,
    observer: &'a dyn CollectObserver,
}

impl<'a> ActivityCollector<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self {
            client,
            observer: &SilentObserver,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn CollectObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Run the four searches in sequence.
    ///
    /// A failed commit search is absorbed into [`Collection::commit_search_error`];
    /// any other failure aborts the whole collection.
    pub async fn collect(
        &self,
        user: &str,
        repo: Option<&str>,
        timespan: &Timespan,
    ) -> Result<Collection> {
        let mut activities = Vec::new();

        // Commit search is often restricted, so its failure is not fatal
        self.observer.search_started(ActivityKind::Commit);
        let commit_search_error = match self.commits(user, repo, timespan).await {
            Ok(commits) => {
                info!(count = commits.len(), "commit search finished");
                log_activities(&commits);
                self.observer
                    .search_finished(ActivityKind::Commit, commits.len());
                activities.extend(commits);
                None
            }
            Err(e) => {
                info!(error = %e, "commit search skipped");
                self.observer.search_skipped(ActivityKind::Commit, &e);
                Some(e)
            }
        };

        let prs = self
            .required(
                ActivityKind::PullRequest,
                self.pull_requests(user, repo, timespan),
            )
            .await?;
        activities.extend(prs);

        let issues = self
            .required(ActivityKind::Issue, self.issues(user, repo, timespan))
            .await?;
        activities.extend(issues);

        let reviews = self
            .required(ActivityKind::Review, self.reviews(user, repo, timespan))
            .await?;
        activities.extend(reviews);

        Ok(Collection {
            activities,
            commit_search_error,
        })
    }

    async fn required<F>(&self, kind: ActivityKind, search: F) -> Result<Vec<Activity>>
    where
        F: Future<Output = Result<Vec<Activity>>>,
    {
        self.observer.search_started(kind);
        match search.await {
            Ok(found) => {
                info!(kind = kind.plural(), count = found.len(), "search finished");
                log_activities(&found);
                self.observer.search_finished(kind, found.len());
                Ok(found)
            }
            Err(e) => {
                self.observer.search_failed(kind, &e);
                Err(StandupError::search(kind.plural(), e))
            }
        }
    }

    async fn commits(
        &self,
        user: &str,
        repo: Option<&str>,
        timespan: &Timespan,
    ) -> Result<Vec<Activity>> {
        let query = SearchQuery::new()
            .qualifier("author", user)
            .date_range("committer-date", timespan)
            .repo(repo);
        let items = self.client.search_commits(&query).await?;
        Ok(items.iter().map(commit_activity).collect())
    }

    async fn pull_requests(
        &self,
        user: &str,
        repo: Option<&str>,
        timespan: &Timespan,
    ) -> Result<Vec<Activity>> {
        let query = SearchQuery::new()
            .qualifier("author", user)
            .date_range("created", timespan)
            .repo(repo)
            .item_type("pr");
        let items = self.client.search_issues(&query).await?;
        Ok(items.iter().map(pull_request_activity).collect())
    }

    async fn issues(
        &self,
        user: &str,
        repo: Option<&str>,
        timespan: &Timespan,
    ) -> Result<Vec<Activity>> {
        let query = SearchQuery::new()
            .qualifier("author", user)
            .date_range("created", timespan)
            .repo(repo)
            .item_type("issue");
        let items = self.client.search_issues(&query).await?;
        Ok(items.iter().map(issue_activity).collect())
    }

    async fn reviews(
        &self,
        user: &str,
        repo: Option<&str>,
        timespan: &Timespan,
    ) -> Result<Vec<Activity>> {
        let query = SearchQuery::new()
            .qualifier("reviewed-by", user)
            .date_range("created", timespan)
            .repo(repo)
            .item_type("pr");
        let items = self.client.search_issues(&query).await?;
        Ok(items.iter().map(review_activity).collect())
    }
}

fn log_activities(activities: &[Activity]) {
    for activity in activities {
        debug!(
            url = %activity.url,
            created_at = %activity.created_at,
            title = %activity.title,
            "collected activity"
        );
    }
}

fn commit_activity(item: &CommitItem) -> Activity {
    let message = &item.commit.message;
    Activity {
        kind: ActivityKind::Commit,
        repository: item.repository_name(),
        title: message.lines().next().unwrap_or_default().to_string(),
        description: message.clone(),
        url: item.html_url.clone(),
        created_at: item.authored_at(),
    }
}

fn pull_request_activity(item: &IssueItem) -> Activity {
    Activity {
        kind: ActivityKind::PullRequest,
        repository: item.repository_name(),
        title: format!("PR #{}: {}", item.number, item.title),
        description: item.body.clone().unwrap_or_default(),
        url: item.html_url.clone(),
        created_at: item.created_at,
    }
}

fn issue_activity(item: &IssueItem) -> Activity {
    Activity {
        kind: ActivityKind::Issue,
        repository: item.repository_name(),
        title: format!("Issue #{}: {}", item.number, item.title),
        description: item.body.clone().unwrap_or_default(),
        url: item.html_url.clone(),
        created_at: item.created_at,
    }
}

fn review_activity(item: &IssueItem) -> Activity {
    Activity {
        kind: ActivityKind::Review,
        repository: item.repository_name(),
        title: format!("Reviewed PR #{}: {}", item.number, item.title),
        description: format!("Reviewed pull request: {}", item.title),
        url: item.html_url.clone(),
        created_at: item.created_at,
    }
}
