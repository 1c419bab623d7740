use anyhow::Result;
use futures::future;

use crate::types::{Forge, PullRequestRef, Repo};

/// Lists open pull requests for every repository, issuing all listing
/// requests concurrently with no cap and flattening the results in input
/// order. A single repository failure fails the whole batch.
pub async fn open_pull_requests_for_repos<F>(
    forge: &F,
    repos: &[Repo],
) -> Result<Vec<PullRequestRef>>
where
    F: Forge + Sync,
{
    let per_repo =
        future::try_join_all(repos.iter().map(|repo| forge.open_pull_requests(repo))).await?;
    Ok(per_repo.into_iter().flatten().collect())
}
