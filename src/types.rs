use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A repository identified by its owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Repo {
    owner: String,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    MissingSeparator,
    EmptyOwner,
    EmptyName,
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::MissingSeparator => write!(f, "expected 'owner/name'"),
            RepoError::EmptyOwner => write!(f, "owner must not be empty"),
            RepoError::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl std::error::Error for RepoError {}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, RepoError> {
        let owner = owner.into();
        let name = name.into();
        if owner.is_empty() {
            return Err(RepoError::EmptyOwner);
        }
        if name.is_empty() {
            return Err(RepoError::EmptyName);
        }
        Ok(Self { owner, name })
    }

    /// Parses an `owner/name` string.
    pub fn parse(s: &str) -> Result<Self, RepoError> {
        let (owner, name) = s.split_once('/').ok_or(RepoError::MissingSeparator)?;
        if name.contains('/') {
            return Err(RepoError::MissingSeparator);
        }
        Repo::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One unit of work for a polling cycle: an open pull request that may have
/// been freshly approved. Built from the REST listing payload and discarded
/// when the cycle ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub repo: Repo,
    pub number: u64,
    /// API URL of the pull request; the reviews route is derived from it.
    pub url: String,
}

impl PullRequestRef {
    /// Builds a reference from a listing entry, or `None` when the entry is
    /// missing its number or URL.
    pub fn from_rest(repo: Repo, raw: RestPullRequest) -> Option<Self> {
        let number = raw.number?;
        let url = raw.url.filter(|url| !url.is_empty())?;
        Some(Self { repo, number, url })
    }
}

/// Review verdict states. Anything other than an approval is carried
/// verbatim but never acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    Approved,
    Other(String),
}

impl ReviewState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "APPROVED" => ReviewState::Approved,
            other => ReviewState::Other(other.to_string()),
        }
    }
}

/// A reviewer's verdict on a pull request, from either the reviews endpoint
/// or a `reviewed` issue event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub state: ReviewState,
    pub reviewer: String,
    /// Absent for reviews that were never submitted; such records are never
    /// considered fresh.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// An existing issue comment, scanned for previously posted meme URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<SearchIssue>,
}

/// A single issue-search hit. Only the repository reference is consumed;
/// hits without one are dropped during tracking.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchIssue {
    #[serde(default)]
    pub repository_url: Option<String>,
}

/// Pull request entry as returned by the open-PR listing endpoint. Fields
/// are optional so malformed entries can be skipped rather than failing the
/// whole listing.
#[derive(Debug, Deserialize)]
pub struct RestPullRequest {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RestUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct RestReview {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub user: Option<RestUser>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl RestReview {
    pub fn into_record(self) -> ReviewRecord {
        ReviewRecord {
            state: ReviewState::parse(self.state.as_deref().unwrap_or_default()),
            reviewer: self.user.map(|user| user.login).unwrap_or_default(),
            submitted_at: self.submitted_at,
        }
    }
}

/// Issue timeline entry. Only `reviewed` events carry review information;
/// everything else maps to `None`.
#[derive(Debug, Deserialize)]
pub struct RestIssueEvent {
    pub event: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub actor: Option<RestUser>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RestIssueEvent {
    pub fn into_record(self) -> Option<ReviewRecord> {
        if self.event != "reviewed" {
            return None;
        }
        Some(ReviewRecord {
            state: ReviewState::parse(self.state.as_deref().unwrap_or_default()),
            reviewer: self.actor.map(|actor| actor.login).unwrap_or_default(),
            submitted_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RestComment {
    #[serde(default)]
    pub body: Option<String>,
}

impl RestComment {
    pub fn into_record(self) -> CommentRecord {
        CommentRecord {
            body: self.body.unwrap_or_default(),
        }
    }
}

/// The forge surface the polling cycle runs against. Implemented for the
/// real GitHub REST API and for in-memory doubles in tests.
#[async_trait]
pub trait Forge {
    /// The most recently updated closed pull requests reviewed by `user`.
    async fn search_reviewed_pull_requests(&self, user: &str) -> Result<Vec<SearchIssue>>;

    /// Open pull requests for a repository, newest first.
    async fn open_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequestRef>>;

    /// Reviews for a pull request. A missing reviews resource yields an
    /// empty list, not an error.
    async fn pull_request_reviews(&self, pr: &PullRequestRef) -> Result<Vec<ReviewRecord>>;

    /// Review records synthesized from the issue-event timeline.
    async fn issue_events(&self, repo: &Repo, number: u64) -> Result<Vec<ReviewRecord>>;

    /// Existing comments on a pull request.
    async fn issue_comments(&self, repo: &Repo, number: u64) -> Result<Vec<CommentRecord>>;

    /// Posts a new comment.
    async fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()>;
}
