use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future;
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    memes::{already_celebrated, meme_comment_body, random_meme},
    pulls::open_pull_requests_for_repos,
    review::{is_freshly_approved, review_records},
    search::{filter_by_organization, track_approved_repositories},
    types::{Forge, PullRequestRef},
};

/// What happened to a single candidate pull request during a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// A meme comment was posted.
    Posted,
    /// No fresh approval by the configured user.
    NotApproved,
    /// A catalog meme is already present in the comments.
    AlreadyCelebrated,
    /// The comment POST failed; logged and dropped, never retried.
    PostFailed,
}

/// Aggregate counts for one polling cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub repos_tracked: usize,
    pub repos_matched: usize,
    pub candidates: usize,
    pub posted: usize,
    pub already_celebrated: usize,
    pub not_approved: usize,
    pub post_failures: usize,
    pub pull_errors: usize,
}

/// Runs one full polling cycle: track recently reviewed repositories,
/// filter them to the configured organizations, list their open pull
/// requests, and process every candidate concurrently.
///
/// Tracking and listing failures abort the cycle and surface as `Err`;
/// every later failure is contained at the per-pull-request boundary.
pub async fn run_cycle<F>(forge: &F, config: &Config) -> Result<CycleSummary>
where
    F: Forge + Sync,
{
    let now = Utc::now();

    let tracked = track_approved_repositories(forge, &config.username).await?;
    let repos_tracked = tracked.len();
    let matched = filter_by_organization(tracked, &config.organizations);
    debug!(
        tracked = repos_tracked,
        matched = matched.len(),
        "filtered repositories by organization"
    );

    let candidates = open_pull_requests_for_repos(forge, &matched).await?;

    let outcomes = future::join_all(
        candidates
            .iter()
            .map(|pr| process_pull_request(forge, config, pr, now)),
    )
    .await;

    let mut summary = CycleSummary {
        repos_tracked,
        repos_matched: matched.len(),
        candidates: candidates.len(),
        ..Default::default()
    };

    for (pr, outcome) in candidates.iter().zip(outcomes) {
        match outcome {
            Ok(PullOutcome::Posted) => summary.posted += 1,
            Ok(PullOutcome::NotApproved) => summary.not_approved += 1,
            Ok(PullOutcome::AlreadyCelebrated) => summary.already_celebrated += 1,
            Ok(PullOutcome::PostFailed) => summary.post_failures += 1,
            Err(err) => {
                summary.pull_errors += 1;
                error!(
                    repo = %pr.repo,
                    number = pr.number,
                    "failed to process pull request: {err:#}"
                );
            }
        }
    }

    Ok(summary)
}

async fn process_pull_request<F>(
    forge: &F,
    config: &Config,
    pr: &PullRequestRef,
    now: DateTime<Utc>,
) -> Result<PullOutcome>
where
    F: Forge + Sync,
{
    let records = review_records(forge, pr).await?;
    if !is_freshly_approved(&records, &config.username, now) {
        return Ok(PullOutcome::NotApproved);
    }

    let comments = match forge.issue_comments(&pr.repo, pr.number).await {
        Ok(comments) => comments,
        Err(err) => {
            warn!(
                repo = %pr.repo,
                number = pr.number,
                "failed to fetch comments, assuming none: {err:#}"
            );
            Vec::new()
        }
    };
    if already_celebrated(&comments) {
        debug!(repo = %pr.repo, number = pr.number, "meme already present, skipping");
        return Ok(PullOutcome::AlreadyCelebrated);
    }

    let meme = random_meme();
    match forge
        .create_comment(&pr.repo, pr.number, &meme_comment_body(meme))
        .await
    {
        Ok(()) => {
            info!(repo = %pr.repo, number = pr.number, meme, "posted celebration meme");
            Ok(PullOutcome::Posted)
        }
        Err(err) => {
            warn!(
                repo = %pr.repo,
                number = pr.number,
                "failed to post meme comment: {err:#}"
            );
            Ok(PullOutcome::PostFailed)
        }
    }
}
