//! Pagescout engine: site extractors over DOM snapshots, the progressive
//! loader, and the agent that wires them to requests and the change monitor.
mod config;
mod detect;
mod document;
mod engine;
mod extract;
mod hacker_news;
mod host;
mod issue_board;
mod layout;
mod poll;
mod reddit;
mod video_feed;
mod wire;

pub use config::{BoardSettings, ConfigError, EngineConfig, VideoSettings};
pub use detect::{Detector, DetectorPipeline};
pub use document::{Document, PageSnapshot};
pub use engine::ContentAgent;
pub use extract::UserExtractor;
pub use hacker_news::HackerNewsExtractor;
pub use host::{ChannelNotifier, DeliveryError, Notifier, PageHost, StaticPage};
pub use issue_board::{IssueBoardExtractor, VIRTUAL_LIST};
pub use layout::{InlineStyleLayout, Layout, NoLayout};
pub use poll::{poll_until, PollBudget, PollRound, PollSummary, RoundReport};
pub use reddit::{
    added_content_has_users, ProfileLinkDetector, RedditExtractor, UsernameClassDetector,
};
pub use video_feed::{clean_title, video_id_of, VideoError, VideoFeedExtractor};
pub use wire::{Notification, Request, Response, WireError};
