use serde::{Deserialize, Serialize};

/// Placeholder for a context label that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// Where the user was seen (submission domain, `r/<subreddit>`), or [`NOT_AVAILABLE`].
    #[serde(rename = "site")]
    pub origin_site: String,
}

impl UserRecord {
    /// Builds a record from raw page text. Returns `None` for a blank username;
    /// a blank or missing origin becomes [`NOT_AVAILABLE`].
    pub fn new(username: &str, origin_site: Option<&str>) -> Option<Self> {
        let username = username.trim();
        if username.is_empty() {
            return None;
        }
        let origin_site = origin_site
            .map(str::trim)
            .filter(|site| !site.is_empty())
            .unwrap_or(NOT_AVAILABLE);
        Some(Self {
            username: username.to_string(),
            origin_site: origin_site.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub key: String,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub assignee: Option<String>,
    pub column: Option<String>,
}

impl IssueRecord {
    /// A record carrying only its key.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: None,
            issue_type: None,
            assignee: None,
            column: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub title: Option<String>,
    pub url: Option<String>,
    pub video_id: Option<String>,
    pub channel: Option<String>,
    pub views_text: Option<String>,
    pub duration_text: Option<String>,
    pub published_time_text: Option<String>,
}
