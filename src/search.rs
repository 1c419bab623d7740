use std::collections::BTreeSet;

use anyhow::Result;
use tracing::debug;

use crate::types::{Forge, Repo, SearchIssue};

/// Search page size: only this many of the most recently updated closed PRs
/// feed each polling cycle.
pub const SEARCH_PAGE_SIZE: u8 = 5;

/// Pull request states for GitHub search queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    #[allow(dead_code)]
    Open,
    Closed,
}

impl SearchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchState::Open => "open",
            SearchState::Closed => "closed",
        }
    }
}

#[derive(Debug)]
pub struct SearchQueryBuilder {
    terms: Vec<String>,
}

impl SearchQueryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn reviewed_by(&mut self, user: &str) -> &mut Self {
        self.terms.push(format!("reviewed-by:{}", user));
        self
    }

    pub fn pr_type(&mut self) -> &mut Self {
        self.terms.push("type:pr".to_string());
        self
    }

    pub fn state(&mut self, state: SearchState) -> &mut Self {
        self.terms.push(format!("state:{}", state.as_str()));
        self
    }

    pub fn build(&self) -> String {
        self.terms.join(" ")
    }
}

/// The search query for closed pull requests recently reviewed by `user`.
pub fn reviewed_search_query(user: &str) -> String {
    let mut builder = SearchQueryBuilder::new();
    builder
        .reviewed_by(user)
        .pr_type()
        .state(SearchState::Closed);
    builder.build()
}

/// Extracts the distinct repositories named by a search payload. Hits with
/// no usable repository reference are dropped; duplicates collapse.
pub fn repositories_from_search(items: &[SearchIssue]) -> BTreeSet<Repo> {
    items
        .iter()
        .filter_map(|item| item.repository_url.as_deref())
        .filter_map(repo_from_repository_url)
        .collect()
}

/// Parses `owner/name` out of an API repository URL of the form
/// `https://api.github.com/repos/{owner}/{name}`.
pub fn repo_from_repository_url(url: &str) -> Option<Repo> {
    let mut segments = url.split('/').skip_while(|segment| *segment != "repos");
    segments.next()?;
    let owner = segments.next()?;
    let name = segments.next()?;
    Repo::new(owner, name).ok()
}

/// Builds the set of repositories touched by the user's recent reviews.
///
/// The set is rebuilt from empty on every call; there is deliberately no
/// memory across polling cycles.
pub async fn track_approved_repositories<F>(forge: &F, user: &str) -> Result<BTreeSet<Repo>>
where
    F: Forge + Sync,
{
    let items = forge.search_reviewed_pull_requests(user).await?;
    let repos = repositories_from_search(&items);
    debug!(hits = items.len(), repos = repos.len(), "tracked recently reviewed repositories");
    Ok(repos)
}

/// Keeps only repositories owned by one of the configured organizations.
/// The owner segment must equal an organization name exactly.
pub fn filter_by_organization(repos: BTreeSet<Repo>, organizations: &[String]) -> Vec<Repo> {
    repos
        .into_iter()
        .filter(|repo| organizations.iter().any(|org| org == repo.owner()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(repository_url: Option<&str>) -> SearchIssue {
        SearchIssue {
            repository_url: repository_url.map(str::to_string),
        }
    }

    #[test]
    fn reviewed_query_names_user_type_and_state() {
        assert_eq!(
            reviewed_search_query("octocat"),
            "reviewed-by:octocat type:pr state:closed"
        );
    }

    #[test]
    fn repositories_collapse_duplicates_and_skip_missing_references() {
        let items = vec![
            hit(Some("https://api.github.com/repos/orgA/repo1")),
            hit(Some("https://api.github.com/repos/orgA/repo1")),
            hit(None),
            hit(Some("https://api.github.com/repos/orgB/repo2")),
        ];

        let repos = repositories_from_search(&items);
        assert_eq!(repos.len(), 2);
        assert!(repos.contains(&Repo::new("orgA", "repo1").unwrap()));
        assert!(repos.contains(&Repo::new("orgB", "repo2").unwrap()));
    }

    #[test]
    fn repository_url_parsing_requires_repos_segment() {
        assert_eq!(
            repo_from_repository_url("https://api.github.com/repos/acme/widgets"),
            Some(Repo::new("acme", "widgets").unwrap())
        );
        assert_eq!(repo_from_repository_url("https://api.github.com/repos/acme"), None);
        assert_eq!(repo_from_repository_url("https://example.com/acme/widgets"), None);
    }

    #[test]
    fn organization_filter_matches_owner_segment_exactly() {
        let repos: BTreeSet<Repo> = [
            Repo::new("orgA", "repo1").unwrap(),
            Repo::new("orgAB", "repo2").unwrap(),
            Repo::new("other", "repo3").unwrap(),
            Repo::new("orgB", "repo4").unwrap(),
        ]
        .into_iter()
        .collect();

        let orgs = vec!["orgA".to_string(), "orgB".to_string()];
        let kept = filter_by_organization(repos, &orgs);
        assert_eq!(
            kept,
            vec![
                Repo::new("orgA", "repo1").unwrap(),
                Repo::new("orgB", "repo4").unwrap(),
            ]
        );
    }

    #[test]
    fn empty_organization_list_keeps_nothing() {
        let repos: BTreeSet<Repo> = [Repo::new("orgA", "repo1").unwrap()].into_iter().collect();
        assert!(filter_by_organization(repos, &[]).is_empty());
    }
}
