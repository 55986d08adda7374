use crate::{ExtractionPurpose, UserRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the Reddit user extraction and feed the result back as `Msg::Extracted`.
    Extract(ExtractionPurpose),
    /// Deliver newly seen users to the popup. Best effort.
    NotifyNewUsers(Vec<UserRecord>),
}
