use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::types::{Forge, PullRequestRef, ReviewRecord, ReviewState};

/// Trailing window in which an approval still counts as fresh.
pub fn freshness_window() -> Duration {
    Duration::minutes(5)
}

/// Collects the review records for a pull request.
///
/// Native reviews win; only when none exist is the issue-event timeline
/// consulted. Event fetch failures degrade to an empty record set so one
/// flaky timeline read cannot take down the cycle.
pub async fn review_records<F>(forge: &F, pr: &PullRequestRef) -> Result<Vec<ReviewRecord>>
where
    F: Forge + Sync,
{
    let reviews = forge.pull_request_reviews(pr).await?;
    if !reviews.is_empty() {
        return Ok(reviews);
    }

    match forge.issue_events(&pr.repo, pr.number).await {
        Ok(events) => Ok(events),
        Err(err) => {
            warn!(
                repo = %pr.repo,
                number = pr.number,
                "failed to fetch issue events, treating as unreviewed: {err:#}"
            );
            Ok(Vec::new())
        }
    }
}

/// Whether `records` show an approval by `user` submitted strictly inside
/// the freshness window ending at `now`.
///
/// The first record whose state and reviewer match is the one tested for
/// freshness; a stale first approval is not rescued by a fresher one later
/// in the list.
pub fn is_freshly_approved(records: &[ReviewRecord], user: &str, now: DateTime<Utc>) -> bool {
    let cutoff = now - freshness_window();
    records
        .iter()
        .find(|record| record.state == ReviewState::Approved && record.reviewer == user)
        .is_some_and(|record| record.submitted_at.is_some_and(|at| at > cutoff))
}
