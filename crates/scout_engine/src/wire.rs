use scout_core::{IssueRecord, UserRecord, VideoRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Inbound request from the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    #[serde(alias = "GET_USERNAMES")]
    GetUsers,
    #[serde(alias = "GET_JIRA_ISSUES")]
    GetIssues,
    GetVideos,
}

impl Request {
    pub fn from_json(raw: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Users { users: Vec<UserRecord> },
    Issues { issues: Vec<IssueRecord> },
    Videos { videos: Vec<VideoRecord> },
}

impl Response {
    /// The empty answer for `request`, used when the page has no matching extractor.
    pub fn empty_for(request: Request) -> Self {
        match request {
            Request::GetUsers => Response::Users { users: Vec::new() },
            Request::GetIssues => Response::Issues { issues: Vec::new() },
            Request::GetVideos => Response::Videos { videos: Vec::new() },
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Response::Users { users } => users.len(),
            Response::Issues { issues } => issues.len(),
            Response::Videos { videos } => videos.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Unsolicited message to the popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    NewUsersDetected { users: Vec<UserRecord> },
}
