use std::time::Duration;

use async_trait::async_trait;
use scout_logging::scout_debug;

/// Round limit and the wait between nudging a source and re-reading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    pub max_rounds: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: u32,
    /// Items first discovered in this round.
    pub new_items: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSummary {
    pub rounds: u32,
    pub plateaued: bool,
}

/// A source polled round by round.
#[async_trait(?Send)]
pub trait PollRound {
    /// Nudges the source so more content may appear (scroll, click, ...).
    async fn advance(&mut self, round: u32);
    /// Re-reads the source after the wait; returns how many new items it found.
    async fn harvest(&mut self, round: u32) -> usize;
}

/// Runs `advance → wait → harvest` until `plateau` holds for a round or the
/// budget is spent.
pub async fn poll_until<P, F>(budget: PollBudget, source: &mut P, plateau: F) -> PollSummary
where
    P: PollRound + ?Sized,
    F: Fn(&RoundReport) -> bool,
{
    for round in 1..=budget.max_rounds {
        source.advance(round).await;
        tokio::time::sleep(budget.delay).await;
        let new_items = source.harvest(round).await;
        let report = RoundReport { round, new_items };
        scout_debug!("poll round {}: {} new items", round, new_items);
        if plateau(&report) {
            return PollSummary {
                rounds: round,
                plateaued: true,
            };
        }
    }
    PollSummary {
        rounds: budget.max_rounds,
        plateaued: false,
    }
}
