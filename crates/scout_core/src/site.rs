use scout_logging::scout_debug;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SiteKind {
    HackerNews,
    Reddit,
    IssueBoard,
    VideoFeed,
    #[default]
    Unknown,
}

/// Classifies a page by the hostname of its URL.
pub fn detect_site(url: &str) -> SiteKind {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
    else {
        return SiteKind::Unknown;
    };

    let site = if host == "news.ycombinator.com" {
        SiteKind::HackerNews
    } else if host.contains("reddit.com") {
        SiteKind::Reddit
    } else if host.contains("atlassian.net") {
        SiteKind::IssueBoard
    } else if host.contains("youtube.com") {
        SiteKind::VideoFeed
    } else {
        SiteKind::Unknown
    };
    scout_debug!("detect_site host={} site={:?}", host, site);
    site
}
