use anyhow::{Context, Result};

pub const USERNAME_VAR: &str = "LGTMEME_USERNAME";
pub const ORGS_VAR: &str = "LGTMEME_ORGS";

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// The user whose approvals are celebrated.
    pub username: String,
    /// Organizations whose repositories are eligible for comments.
    pub organizations: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let username = std::env::var(USERNAME_VAR)
            .with_context(|| format!("{} must be set", USERNAME_VAR))?
            .trim()
            .to_string();
        if username.is_empty() {
            anyhow::bail!("{} must not be empty", USERNAME_VAR);
        }

        let raw_orgs =
            std::env::var(ORGS_VAR).with_context(|| format!("{} must be set", ORGS_VAR))?;
        let organizations = parse_organizations(&raw_orgs);
        if organizations.is_empty() {
            anyhow::bail!("{} must name at least one organization", ORGS_VAR);
        }

        Ok(Self {
            username,
            organizations,
        })
    }
}

/// Splits a comma-separated organization list, dropping empty entries.
pub fn parse_organizations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|org| !org.is_empty())
        .map(str::to_string)
        .collect()
}
