//! Lgtmeme: celebratory memes for freshly approved pull requests.
//!
//! Polls GitHub on an interval for pull requests the configured user has
//! recently approved and posts a meme comment on each one exactly once.
//! Detection reconciles the issue-search endpoint, per-repository open PR
//! listings, and review or issue-event records, then gates posting on the
//! comments already present. Approval state lives only in process memory
//! and is rebuilt from scratch every cycle.

pub mod cli;
pub mod config;
pub mod cycle;
pub mod github;
pub mod memes;
pub mod pulls;
pub mod review;
pub mod search;
pub mod types;

pub use cli::Cli;
pub use config::Config;
pub use cycle::{CycleSummary, PullOutcome, run_cycle};
pub use github::GitHub;
pub use types::{
    CommentRecord, Forge, PullRequestRef, Repo, RepoError, ReviewRecord, ReviewState, SearchIssue,
};
