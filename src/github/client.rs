use crate::error::{Result, StandupError};
use crate::github::search::SearchQuery;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::debug;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Minimal GitHub REST client: identity lookup and the two search endpoints
pub struct GitHubClient {
    base_url: String,
    client: Client,
}

impl GitHubClient {
    /// Create a new client. Without a token only public data is searchable and `/user` fails.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| StandupError::config("GitHub token contains invalid characters"))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(concat!("gh-standup/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Login of the authenticated user
    pub async fn current_user(&self) -> Result<String> {
        let user: User = self.get("user", &[]).await?;
        Ok(user.login)
    }

    /// Search commits, newest committer date first
    pub async fn search_commits(&self, query: &SearchQuery) -> Result<Vec<CommitItem>> {
        let q = query.to_string();
        let response: SearchResponse<CommitItem> = self
            .get(
                "search/commits",
                &[("q", q.as_str()), ("sort", "committer-date"), ("order", "desc")],
            )
            .await?;
        Ok(response.items)
    }

    /// Search issues and pull requests, newest first
    pub async fn search_issues(&self, query: &SearchQuery) -> Result<Vec<IssueItem>> {
        let q = query.to_string();
        let response: SearchResponse<IssueItem> = self
            .get(
                "search/issues",
                &[("q", q.as_str()), ("sort", "created"), ("order", "desc")],
            )
            .await?;
        Ok(response.items)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, ?query, "GitHub API request");

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StandupError::GitHubApi {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct SearchResponse<T> {
    #[serde(default)]
    items: Vec<T>,
}

/// Repository reference embedded in search results
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    #[serde(default)]
    pub full_name: String,
}

/// One item of `/search/commits`
#[derive(Debug, Clone, Deserialize)]
pub struct CommitItem {
    #[serde(default)]
    pub html_url: String,
    pub repository: Option<RepositoryRef>,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub message: String,
    pub author: Option<GitActor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitActor {
    pub date: Option<DateTime<Utc>>,
}

impl CommitItem {
    pub fn repository_name(&self) -> String {
        self.repository
            .as_ref()
            .map(|repo| repo.full_name.clone())
            .unwrap_or_default()
    }

    /// Commit author date
    pub fn authored_at(&self) -> DateTime<Utc> {
        self.commit
            .author
            .as_ref()
            .and_then(|author| author.date)
            .unwrap_or_default()
    }
}

/// One item of `/search/issues`, either an issue or a pull request
#[derive(Debug, Clone, Deserialize)]
pub struct IssueItem {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub repository_url: String,
    pub repository: Option<RepositoryRef>,
    pub created_at: DateTime<Utc>,
}

impl IssueItem {
    /// owner/name from the embedded repository, else from `repository_url`
    pub fn repository_name(&self) -> String {
        if let Some(repo) = self.repository.as_ref().filter(|r| !r.full_name.is_empty()) {
            return repo.full_name.clone();
        }
        repo_from_api_url(&self.repository_url).unwrap_or_default()
    }
}

/// Extract `owner/name` from `https://api.github.com/repos/owner/name`
fn repo_from_api_url(url: &str) -> Option<String> {
    static REPO_PATH: OnceLock<Option<Regex>> = OnceLock::new();
    let re = REPO_PATH
        .get_or_init(|| Regex::new(r"/repos/([^/]+/[^/]+)/?$").ok())
        .as_ref()?;
    re.captures(url.trim())
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_repo_from_api_url() {
        assert_eq!(
            repo_from_api_url("https://api.github.com/repos/rust-lang/rust"),
            Some("rust-lang/rust".to_string())
        );
        assert_eq!(repo_from_api_url("https://api.github.com/users/octocat"), None);
        assert_eq!(repo_from_api_url(""), None);

        // repeated lookups share one compiled pattern
        assert_eq!(
            repo_from_api_url(" https://api.github.com/repos/octo/hello/ "),
            Some("octo/hello".to_string())
        );
    }

    #[test]
    fn test_search_response_without_items() {
        let issues: SearchResponse<IssueItem> =
            serde_json::from_value(serde_json::json!({ "total_count": 0 })).unwrap();
        assert!(issues.items.is_empty());

        let commits: SearchResponse<CommitItem> =
            serde_json::from_value(serde_json::json!({ "total_count": 0 })).unwrap();
        assert!(commits.items.is_empty());
    }

    #[test]
    fn test_issue_item_decoding() {
        let json = serde_json::json!({
            "number": 7,
            "title": "Crash on start",
            "body": null,
            "html_url": "https://github.com/octo/hello/issues/7",
            "repository_url": "https://api.github.com/repos/octo/hello",
            "created_at": "2024-05-06T10:00:00Z"
        });

        let item: IssueItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.number, 7);
        assert!(item.body.is_none());
        assert_eq!(item.repository_name(), "octo/hello");
    }

    #[test]
    fn test_commit_item_decoding_with_offset_date() {
        let json = serde_json::json!({
            "html_url": "https://github.com/octo/hello/commit/abc123",
            "repository": { "full_name": "octo/hello" },
            "commit": {
                "message": "Fix it\n\nDetails",
                "author": { "date": "2024-05-06T12:00:00.000+02:00" }
            }
        });

        let item: CommitItem = serde_json::from_value(json).unwrap();
        assert_eq!(item.repository_name(), "octo/hello");
        assert_eq!(item.authored_at().to_rfc3339(), "2024-05-06T10:00:00+00:00");
    }

    #[tokio::test]
    async fn test_current_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "login": "octocat" })),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), Some("test-token")).unwrap();
        assert_eq!(client.current_user().await.unwrap(), "octocat");
    }

    #[tokio::test]
    async fn test_current_user_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "message": "Requires authentication" })),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None).unwrap();
        let err = client.current_user().await.unwrap_err();
        assert!(matches!(err, StandupError::GitHubApi { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_search_issues_sends_encoded_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", "author:octocat type:pr"))
            .and(query_param("sort", "created"))
            .and(query_param("order", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 0,
                "items": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None).unwrap();
        let query = SearchQuery::new()
            .qualifier("author", "octocat")
            .item_type("pr");
        let items = client.search_issues(&query).await.unwrap();
        assert!(items.is_empty());
    }
}
