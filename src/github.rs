use std::process::Command;

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::{
    search::{SEARCH_PAGE_SIZE, reviewed_search_query},
    types::{
        CommentRecord, Forge, PullRequestRef, Repo, RestComment, RestIssueEvent, RestPullRequest,
        RestReview, ReviewRecord, SearchIssue, SearchResponse,
    },
};

pub fn get_github_token() -> Result<String> {
    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        return Ok(token);
    }

    if let Ok(token) = std::env::var("GH_TOKEN") {
        return Ok(token);
    }

    let output = Command::new("gh").args(["auth", "token"]).output()?;

    if !output.status.success() {
        anyhow::bail!("Failed to get GitHub token from gh CLI. Please run 'gh auth login' first");
    }

    let token = String::from_utf8(output.stdout)?.trim().to_string();

    if token.is_empty() {
        anyhow::bail!("Empty token returned from gh CLI");
    }

    Ok(token)
}

/// Creates an authenticated GitHub client using available credentials.
pub async fn setup_github_client() -> Result<Octocrab> {
    let token = get_github_token().context("Failed to obtain GitHub authentication token")?;
    Octocrab::builder()
        .personal_token(token)
        .build()
        .context("Failed to create GitHub client")
}

/// Derives the reviews route from a pull request's API URL.
pub fn reviews_route(pr_url: &str) -> Result<String> {
    let url =
        Url::parse(pr_url).with_context(|| format!("Failed to parse URL: '{}'", pr_url))?;
    Ok(format!("{}/reviews", url.path()))
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    sort: &'a str,
    order: &'a str,
    per_page: u8,
}

#[derive(Serialize)]
struct ListPullsParams<'a> {
    state: &'a str,
    sort: &'a str,
    direction: &'a str,
}

/// The real forge, backed by the GitHub REST API.
pub struct GitHub {
    crab: Octocrab,
}

impl GitHub {
    pub fn new(crab: Octocrab) -> Self {
        Self { crab }
    }

    pub async fn from_env() -> Result<Self> {
        Ok(Self::new(setup_github_client().await?))
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn search_reviewed_pull_requests(&self, user: &str) -> Result<Vec<SearchIssue>> {
        let query = reviewed_search_query(user);
        let response: SearchResponse = self
            .crab
            .get(
                "/search/issues",
                Some(&SearchParams {
                    q: &query,
                    sort: "updated",
                    order: "desc",
                    per_page: SEARCH_PAGE_SIZE,
                }),
            )
            .await
            .context("searching recently reviewed pull requests")?;
        Ok(response.items)
    }

    async fn open_pull_requests(&self, repo: &Repo) -> Result<Vec<PullRequestRef>> {
        let route = format!("/repos/{}/{}/pulls", repo.owner(), repo.name());
        let raw: Vec<RestPullRequest> = self
            .crab
            .get(
                &route,
                Some(&ListPullsParams {
                    state: "open",
                    sort: "created",
                    direction: "desc",
                }),
            )
            .await
            .with_context(|| format!("listing open pull requests for {}", repo))?;

        Ok(raw
            .into_iter()
            .filter_map(|pull| {
                let number = pull.number;
                match PullRequestRef::from_rest(repo.clone(), pull) {
                    Some(pr) => Some(pr),
                    None => {
                        warn!(
                            repo = %repo,
                            number = ?number,
                            "skipping pull request with missing reference fields"
                        );
                        None
                    }
                }
            })
            .collect())
    }

    async fn pull_request_reviews(&self, pr: &PullRequestRef) -> Result<Vec<ReviewRecord>> {
        let route = reviews_route(&pr.url)?;
        match self.crab.get::<Vec<RestReview>, _, _>(&route, None::<&()>).await {
            Ok(reviews) => Ok(reviews.into_iter().map(RestReview::into_record).collect()),
            // A pull request with no reviews resource reads as "no reviews".
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                Ok(Vec::new())
            }
            Err(err) => Err(err)
                .with_context(|| format!("fetching reviews for {}#{}", pr.repo, pr.number)),
        }
    }

    async fn issue_events(&self, repo: &Repo, number: u64) -> Result<Vec<ReviewRecord>> {
        let route = format!(
            "/repos/{}/{}/issues/{}/events",
            repo.owner(),
            repo.name(),
            number
        );
        let events: Vec<RestIssueEvent> = self
            .crab
            .get(&route, None::<&()>)
            .await
            .with_context(|| format!("fetching issue events for {}#{}", repo, number))?;
        Ok(events
            .into_iter()
            .filter_map(RestIssueEvent::into_record)
            .collect())
    }

    async fn issue_comments(&self, repo: &Repo, number: u64) -> Result<Vec<CommentRecord>> {
        let route = format!(
            "/repos/{}/{}/issues/{}/comments",
            repo.owner(),
            repo.name(),
            number
        );
        let comments: Vec<RestComment> = self
            .crab
            .get(&route, None::<&()>)
            .await
            .with_context(|| format!("fetching comments for {}#{}", repo, number))?;
        Ok(comments.into_iter().map(RestComment::into_record).collect())
    }

    async fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()> {
        let route = format!(
            "/repos/{}/{}/issues/{}/comments",
            repo.owner(),
            repo.name(),
            number
        );
        let _: serde_json::Value = self
            .crab
            .post(&route, Some(&serde_json::json!({ "body": body })))
            .await
            .with_context(|| format!("posting comment on {}#{}", repo, number))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviews_route_is_derived_from_the_api_url_path() {
        let route =
            reviews_route("https://api.github.com/repos/acme/widgets/pulls/42").unwrap();
        assert_eq!(route, "/repos/acme/widgets/pulls/42/reviews");
    }

    #[test]
    fn reviews_route_rejects_unparseable_urls() {
        assert!(reviews_route("not a url").is_err());
    }
}
