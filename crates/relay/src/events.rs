//! Typed GitHub webhook payloads.
//!
//! Only the fields the relay renders are modelled. Everything else in the
//! payload is ignored, and a missing or ill-typed required field fails the
//! whole request with [`RelayError::MalformedPayload`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::RelayError;

/// Header carrying the GitHub event name.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Header carrying the GitHub delivery GUID.
pub const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// A GitHub webhook delivery, selected by its event name.
#[derive(Debug, Clone)]
pub enum GitHubEvent {
    /// `ping`, sent when a hook is created
    Ping(PingEvent),
    /// `pull_request`
    PullRequest(PullRequestEvent),
    /// `issues`
    Issues(IssuesEvent),
    /// `check_run`
    CheckRun(CheckRunEvent),
    /// Any other event name; the body is not inspected
    Unsupported(String),
}

impl GitHubEvent {
    /// Decode a delivery body according to its event name.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MalformedPayload`] if a supported event's body
    /// does not match its schema.
    pub fn parse(event_type: &str, body: &[u8]) -> Result<Self, RelayError> {
        Ok(match event_type {
            "ping" => Self::Ping(decode("ping", body)?),
            "pull_request" => Self::PullRequest(decode("pull_request", body)?),
            "issues" => Self::Issues(decode("issues", body)?),
            "check_run" => Self::CheckRun(decode("check_run", body)?),
            other => Self::Unsupported(other.to_string()),
        })
    }

    /// The GitHub event name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Ping(_) => "ping",
            Self::PullRequest(_) => "pull_request",
            Self::Issues(_) => "issues",
            Self::CheckRun(_) => "check_run",
            Self::Unsupported(name) => name,
        }
    }
}

fn decode<T: DeserializeOwned>(event: &'static str, body: &[u8]) -> Result<T, RelayError> {
    serde_json::from_slice(body).map_err(|source| RelayError::MalformedPayload { event, source })
}

// =============================================================================
// Shared objects
// =============================================================================

/// Kind of GitHub account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum AccountKind {
    /// Human user
    #[default]
    User,
    /// GitHub App or bot account
    Bot,
    /// Organization
    Organization,
    /// Anything GitHub adds later
    #[serde(other)]
    Other,
}

impl AccountKind {
    /// Name as GitHub spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Bot => "Bot",
            Self::Organization => "Organization",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GitHub user, bot, or organization.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Login name
    pub login: String,
    /// Account type
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
}

/// GitHub repository.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// Full name (owner/repo)
    pub full_name: String,
    /// HTML URL
    pub html_url: String,
}

// =============================================================================
// ping
// =============================================================================

/// `ping` event.
#[derive(Debug, Clone, Deserialize)]
pub struct PingEvent {
    /// The hook that was just created
    pub hook: Hook,
    /// Present for repository hooks
    #[serde(default)]
    pub repository: Option<Repository>,
    /// Present for organization hooks
    #[serde(default)]
    pub organization: Option<Organization>,
}

/// Webhook configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Hook {
    /// `Organization`, `Repository`, `App`, ...
    #[serde(rename = "type")]
    pub kind: String,
}

impl Hook {
    /// Whether the hook was installed on an organization.
    #[must_use]
    pub fn is_organization(&self) -> bool {
        self.kind == "Organization"
    }
}

/// Organization that owns a hook.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    /// Organization login
    pub login: String,
}

// =============================================================================
// pull_request
// =============================================================================

/// `pull_request` event.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    /// Action type (opened, closed, synchronize, ...)
    pub action: String,
    /// User who triggered the event
    pub sender: Account,
    /// Pull request details
    pub pull_request: PullRequest,
    /// Repository info
    pub repository: Repository,
}

/// GitHub pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR HTML URL
    pub html_url: String,
    /// Source branch
    pub head: GitRef,
    /// Target branch
    pub base: GitRef,
    /// Author
    pub user: Account,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Whether the PR was merged (null while open)
    #[serde(default)]
    pub merged: Option<bool>,
    /// Who merged it
    #[serde(default)]
    pub merged_by: Option<Account>,
    /// Number of files changed
    pub changed_files: u64,
    /// Lines added
    pub additions: u64,
    /// Lines removed
    pub deletions: u64,
    /// Number of review comments
    pub review_comments: u64,
}

impl PullRequest {
    /// Whether the PR was merged.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.merged.unwrap_or(false)
    }
}

/// Git reference (branch)
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
}

// =============================================================================
// issues
// =============================================================================

/// `issues` event.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesEvent {
    /// Action type (opened, closed, edited, ...)
    pub action: String,
    /// User who triggered the event
    #[serde(default)]
    pub sender: Option<Account>,
    /// The issue
    pub issue: Issue,
    /// Repository info
    pub repository: Repository,
}

/// GitHub issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Issue title
    pub title: String,
    /// Issue HTML URL
    pub html_url: String,
}

// =============================================================================
// check_run
// =============================================================================

/// `check_run` event.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunEvent {
    /// Action type (created, completed, rerequested, ...)
    pub action: String,
    /// User who triggered the event
    #[serde(default)]
    pub sender: Option<Account>,
    /// The check run
    pub check_run: CheckRun,
    /// Repository info
    pub repository: Repository,
}

/// GitHub check run.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRun {
    /// Check name
    pub name: String,
    /// Check HTML URL
    pub html_url: String,
    /// `success`, `failure`, ... (null until completed)
    #[serde(default)]
    pub conclusion: Option<String>,
    /// Check output
    #[serde(default)]
    pub output: CheckRunOutput,
}

impl CheckRun {
    /// Whether the run concluded with a failure.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.conclusion.as_deref() == Some("failure")
    }
}

/// Output of a check run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckRunOutput {
    /// Short summary, if the check provided one
    #[serde(default)]
    pub summary: Option<String>,
}
