use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::{detect_site, Debouncer, Identified, SiteKind, UserRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Settle delay before the seen set is first populated.
    pub baseline_delay_ms: u64,
    /// Quiet period required before a re-check runs.
    pub debounce_quiet_ms: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            baseline_delay_ms: 1000,
            debounce_quiet_ms: 1000,
        }
    }
}

impl MonitorSettings {
    pub fn baseline_delay(&self) -> Duration {
        Duration::from_millis(self.baseline_delay_ms)
    }

    pub fn debounce_quiet(&self) -> Duration {
        Duration::from_millis(self.debounce_quiet_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Idle,
    PendingRecheck,
}

/// Per-page change monitor. Owns the seen-identity set, the last seen URL and
/// the debounce timer; driven by [`crate::update`].
#[derive(Debug, Clone)]
pub struct ChangeMonitor {
    pub(crate) state: MonitorState,
    pub(crate) site: SiteKind,
    pub(crate) last_url: String,
    pub(crate) seen: HashSet<String>,
    pub(crate) debounce: Debouncer,
    pub(crate) baseline_due: Option<Instant>,
}

impl ChangeMonitor {
    /// Creates the monitor for the page at `url`. On Reddit the baseline
    /// population is scheduled after the settle delay.
    pub fn new(url: &str, now: Instant, settings: &MonitorSettings) -> Self {
        let site = detect_site(url);
        let baseline_due = (site == SiteKind::Reddit).then(|| now + settings.baseline_delay());
        Self {
            state: MonitorState::Idle,
            site,
            last_url: url.to_string(),
            seen: HashSet::new(),
            debounce: Debouncer::new(settings.debounce_quiet()),
            baseline_due,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn site(&self) -> SiteKind {
        self.site
    }

    pub fn last_url(&self) -> &str {
        &self.last_url
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn has_seen(&self, username: &str) -> bool {
        self.seen.contains(username)
    }

    /// Earliest instant at which a `Tick` would do something.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.baseline_due, self.debounce.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Forgets every seen identity.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Records `users` as seen and returns those not seen before, in order.
    pub fn recheck(&mut self, users: Vec<UserRecord>) -> Vec<UserRecord> {
        users
            .into_iter()
            .filter(|user| match user.identity() {
                Some(identity) => self.seen.insert(identity.to_string()),
                None => false,
            })
            .collect()
    }

    pub(crate) fn absorb_baseline(&mut self, users: &[UserRecord]) {
        self.seen
            .extend(users.iter().filter_map(|u| u.identity()).map(str::to_string));
    }
}
