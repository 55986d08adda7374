use crate::UserRecord;

/// Why an extraction was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPurpose {
    /// Initial population of the seen set; never notifies.
    Baseline,
    /// Debounced re-check after page changes; notifies about new users.
    Recheck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// DOM mutation batch observed. `qualifies` is the cheap shape check on the
    /// added subtrees (do they contain username-bearing anchors).
    Mutation { url: String, qualifies: bool },
    /// Page scrolled; infinite scroll may append content without a qualifying mutation.
    Scrolled { url: String },
    /// Clock advanced; fires due timers.
    Tick,
    /// Result of an extraction requested through [`crate::Effect::Extract`].
    Extracted {
        purpose: ExtractionPurpose,
        users: Vec<UserRecord>,
    },
}
