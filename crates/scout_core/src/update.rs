use std::time::Instant;

use scout_logging::{scout_debug, scout_info};

use crate::{detect_site, ChangeMonitor, Effect, ExtractionPurpose, MonitorState, Msg, SiteKind};

/// Applies a message to the monitor and returns the effects the host must run.
pub fn update(monitor: &mut ChangeMonitor, msg: Msg, now: Instant) -> Vec<Effect> {
    match msg {
        Msg::Mutation { url, qualifies } => {
            check_navigation(monitor, url);
            if qualifies && monitor.site == SiteKind::Reddit {
                scout_debug!("qualifying mutation, scheduling re-check");
                schedule_recheck(monitor, now);
            }
            Vec::new()
        }
        Msg::Scrolled { url } => {
            if detect_site(&url) == SiteKind::Reddit {
                scout_debug!("scroll observed, scheduling re-check");
                schedule_recheck(monitor, now);
            }
            Vec::new()
        }
        Msg::Tick => {
            let mut effects = Vec::new();
            if monitor.baseline_due.is_some_and(|due| now >= due) {
                monitor.baseline_due = None;
                if monitor.site == SiteKind::Reddit {
                    effects.push(Effect::Extract(ExtractionPurpose::Baseline));
                }
            }
            if monitor.debounce.fire_if_due(now) {
                monitor.state = MonitorState::Idle;
                if monitor.site == SiteKind::Reddit {
                    effects.push(Effect::Extract(ExtractionPurpose::Recheck));
                }
            }
            effects
        }
        Msg::Extracted {
            purpose: ExtractionPurpose::Baseline,
            users,
        } => {
            monitor.absorb_baseline(&users);
            scout_info!("baseline initialized with {} usernames", monitor.seen_count());
            Vec::new()
        }
        Msg::Extracted {
            purpose: ExtractionPurpose::Recheck,
            users,
        } => {
            let fresh = monitor.recheck(users);
            if fresh.is_empty() {
                Vec::new()
            } else {
                scout_info!("{} new usernames detected", fresh.len());
                vec![Effect::NotifyNewUsers(fresh)]
            }
        }
    }
}

fn check_navigation(monitor: &mut ChangeMonitor, url: String) {
    if monitor.last_url == url {
        return;
    }
    monitor.site = detect_site(&url);
    monitor.last_url = url;
    if monitor.site == SiteKind::Reddit {
        scout_info!("navigation detected, clearing seen usernames");
        monitor.reset();
    }
}

fn schedule_recheck(monitor: &mut ChangeMonitor, now: Instant) {
    monitor.state = MonitorState::PendingRecheck;
    monitor.debounce.schedule(now);
}
