use thiserror::Error;

/// Main error type for gh-standup
#[derive(Error, Debug)]
pub enum StandupError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// HTTP transport and response decoding errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GitHub REST API answered with a non-success status
    #[error("GitHub API request failed with status {status}: {message}")]
    GitHubApi { status: u16, message: String },

    /// GitHub Models API errors
    #[error("GitHub Models API error: {0}")]
    ModelsApi(String),

    /// The completion call succeeded but carried no choices
    #[error("no response generated from the model")]
    EmptyCompletion,

    /// No token available for the completion endpoint
    #[error("no GitHub token found: set GITHUB_TOKEN or GH_TOKEN, or add github_token to the config file")]
    MissingToken,

    /// One search sub-query of the collector failed
    #[error("failed to get {what}")]
    Search {
        what: &'static str,
        #[source]
        source: Box<StandupError>,
    },
}

/// Result type alias for gh-standup operations
pub type Result<T> = std::result::Result<T, StandupError>;

impl StandupError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new GitHub Models API error
    pub fn models_api<S: Into<String>>(msg: S) -> Self {
        Self::ModelsApi(msg.into())
    }

    /// Wrap a sub-query failure with the name of what was being fetched
    pub fn search(what: &'static str, source: StandupError) -> Self {
        Self::Search {
            what,
            source: Box::new(source),
        }
    }
}
