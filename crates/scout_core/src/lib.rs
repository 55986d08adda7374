//! Pagescout core: records, site selection and the pure change-monitor state machine.
mod debounce;
mod effect;
mod identity;
mod msg;
mod records;
mod site;
mod state;
mod update;

pub use debounce::Debouncer;
pub use effect::Effect;
pub use identity::{dedupe_first_seen, FirstSeen, Identified};
pub use msg::{ExtractionPurpose, Msg};
pub use records::{IssueRecord, UserRecord, VideoRecord, NOT_AVAILABLE};
pub use site::{detect_site, SiteKind};
pub use state::{ChangeMonitor, MonitorSettings, MonitorState};
pub use update::update;
