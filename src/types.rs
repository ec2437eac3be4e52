use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

const BASE_QUERY: &str = "is:open+is:pr+archived:false";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Created,
    ReviewRequested,
}

impl Category {
    // Canonical rendering order.
    pub const ALL: [Category; 2] = [Category::Created, Category::ReviewRequested];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ReviewRequested => "review-requested",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Created => "🔨",
            Self::ReviewRequested => "👀",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Created => "Pull Requests Created by",
            Self::ReviewRequested => "Review Requests for",
        }
    }

    // Filters are joined with literal '+' so the string can be passed through
    // as the q= parameter without further encoding.
    pub fn search_query(self, login: &str) -> String {
        match self {
            Self::Created => format!("{BASE_QUERY}+author:{login}"),
            Self::ReviewRequested => format!("{BASE_QUERY}+user-review-requested:{login}"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "review-requested" => Ok(Self::ReviewRequested),
            other => Err(Error::UnsupportedCategory(other.to_string())),
        }
    }
}

// GitHub omits fields it has no value for, so everything is optional on the
// wire; missing title/url/updated_at is surfaced as InvalidIssueData when the
// issue is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub title: Option<String>,
    pub html_url: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn display_fields(&self) -> Result<(&str, &str, DateTime<Utc>), Error> {
        match (self.title.as_deref(), self.html_url.as_deref(), self.updated_at) {
            (Some(title), Some(url), Some(updated_at)) => Ok((title, url, updated_at)),
            _ => Err(Error::InvalidIssueData),
        }
    }
}

#[derive(Debug)]
pub struct IssueBatch {
    pub category: Category,
    pub outcome: Result<Vec<Issue>, Error>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported pull request category: {0}")]
    UnsupportedCategory(String),
    #[error("failed to resolve GitHub identity: {0}")]
    IdentityResolution(String),
    #[error("failed to fetch pull requests: {0}")]
    Fetch(String),
    #[error("fetching {0} pull requests did not finish before the deadline")]
    DeadlineExceeded(Category),
    #[error("received invalid issue data from GitHub")]
    InvalidIssueData,
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
