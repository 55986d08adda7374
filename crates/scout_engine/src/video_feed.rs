use std::collections::HashSet;

use ego_tree::NodeId;
use lazy_static::lazy_static;
use regex::Regex;
use scout_core::{FirstSeen, VideoRecord};
use scout_logging::{scout_debug, scout_info};
use scraper::ElementRef;
use url::Url;

use crate::document::{attr, first_in, select_in, text_of};
use crate::{Document, VideoSettings};

const CONTAINERS: [&str; 5] = [
    "ytd-rich-item-renderer",
    "ytd-video-renderer",
    "ytd-grid-video-renderer",
    "ytd-compact-video-renderer",
    "ytd-playlist-video-renderer",
];
const WATCH_LINK: &str = r#"a[href*="/watch?v="]"#;
const METADATA_ITEMS: [&str; 3] = [
    "#metadata-line span",
    ".inline-metadata-item",
    "#metadata span",
];
const BOILERPLATE: [&str; 12] = [
    "subscribe",
    "subscribed",
    "go to channel",
    "share",
    "more actions",
    "watch later",
    "add to queue",
    "play all",
    "mix",
    "shorts",
    "view full playlist",
    "now playing",
];

lazy_static! {
    static ref TRAILING_CLOCK: Regex = Regex::new(r"\s*\d{1,2}(?::\d{2}){1,2}\s*$").unwrap();
    // At least two comma-joined units, as in "5 minutes, 3 seconds"; a lone
    // "100 Seconds" is part of the title.
    static ref TRAILING_SPOKEN: Regex = Regex::new(
        r"(?i)\s*\d+\s+(?:hours?|minutes?|seconds?)(?:\s*,\s*\d+\s+(?:hours?|minutes?|seconds?))+\s*$"
    )
    .unwrap();
    static ref DURATION: Regex = Regex::new(r"^\d{1,2}(?::\d{2}){1,2}$").unwrap();
}

#[derive(Debug, Clone, Copy)]
enum Source {
    Text,
    Attr(&'static str),
}

/// One step of a fallback chain: where to look and what to read there.
#[derive(Debug, Clone, Copy)]
struct FieldRule {
    css: &'static str,
    source: Source,
}

impl FieldRule {
    const fn text(css: &'static str) -> Self {
        Self {
            css,
            source: Source::Text,
        }
    }

    const fn attr(css: &'static str, name: &'static str) -> Self {
        Self {
            css,
            source: Source::Attr(name),
        }
    }

    fn read(&self, element: ElementRef<'_>) -> Option<String> {
        match self.source {
            Source::Text => Some(text_of(element)),
            Source::Attr(name) => attr(element, name).map(str::to_string),
        }
    }
}

static TITLE_RULES: [FieldRule; 7] = [
    FieldRule::attr("#video-title", "title"),
    FieldRule::text("#video-title"),
    FieldRule::attr("a#video-title-link", "title"),
    FieldRule::attr("a#video-title-link", "aria-label"),
    FieldRule::attr("#video-title", "aria-label"),
    FieldRule::text("h3 a"),
    FieldRule::text("h3"),
];
static URL_RULES: [FieldRule; 5] = [
    FieldRule::attr("a#video-title-link", "href"),
    FieldRule::attr("a#video-title", "href"),
    FieldRule::attr("a#thumbnail", "href"),
    FieldRule::attr(WATCH_LINK, "href"),
    FieldRule::attr(r#"a[href^="/shorts/"]"#, "href"),
];
static CHANNEL_RULES: [FieldRule; 5] = [
    FieldRule::text("ytd-channel-name a"),
    FieldRule::text("#channel-name a"),
    FieldRule::text("#channel-name #text"),
    FieldRule::text("#byline a"),
    FieldRule::text(r#"a[href^="/@"]"#),
];
static DURATION_RULES: [FieldRule; 4] = [
    FieldRule::text("ytd-thumbnail-overlay-time-status-renderer #text"),
    FieldRule::text("ytd-thumbnail-overlay-time-status-renderer span"),
    FieldRule::text(".badge-shape-wiz__text"),
    FieldRule::attr("ytd-thumbnail-overlay-time-status-renderer", "aria-label"),
];

/// Values produced by `rules` inside `scope`, in chain order.
fn candidates<'a>(
    scope: ElementRef<'a>,
    rules: &'static [FieldRule],
) -> impl Iterator<Item = String> + 'a {
    rules.iter().flat_map(move |rule| {
        select_in(scope, rule.css)
            .into_iter()
            .filter_map(move |element| rule.read(element))
    })
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VideoError {
    #[error("video container has neither a watch url nor a video id")]
    MissingIdentity,
}

/// Video listings of a feed, search or watch-page sidebar.
#[derive(Debug, Default)]
pub struct VideoFeedExtractor {
    settings: VideoSettings,
}

impl VideoFeedExtractor {
    pub fn new(settings: VideoSettings) -> Self {
        Self { settings }
    }

    /// Container pass, then a broad pass over watch links when the first came up short.
    pub fn extract(&self, doc: &Document) -> Vec<VideoRecord> {
        let max = self.settings.max_videos;
        let mut found = FirstSeen::new();

        for container in containers(doc) {
            if found.len() >= max {
                break;
            }
            match self.extract_video(doc, container) {
                Ok(video) => {
                    found.push(video);
                }
                Err(err) => scout_debug!("skipping video container: {}", err),
            }
        }
        let primary = found.len();

        if primary < self.settings.broad_pass_threshold {
            self.broad_pass(doc, &mut found);
        }
        scout_info!(
            "video feed: {} videos ({} from containers)",
            found.len(),
            primary
        );
        found.into_vec()
    }

    fn extract_video(
        &self,
        doc: &Document,
        container: ElementRef<'_>,
    ) -> Result<VideoRecord, VideoError> {
        let min_title = self.settings.min_title_chars;
        let title = candidates(container, &TITLE_RULES)
            .map(|raw| clean_title(&raw))
            .find(|title| title.chars().count() >= min_title);
        let url = candidates(container, &URL_RULES).find_map(|href| doc.resolve(&href));
        let video_id = url.as_ref().and_then(video_id_of);
        if url.is_none() && video_id.is_none() {
            return Err(VideoError::MissingIdentity);
        }

        let channel = candidates(container, &CHANNEL_RULES).find(|text| !text.is_empty());
        let duration_text =
            candidates(container, &DURATION_RULES).find(|text| DURATION.is_match(text));
        let metadata = metadata_texts(container);
        let views_text = metadata.iter().find(|text| is_view_count(text)).cloned();
        let published_time_text = metadata
            .iter()
            .find(|text| is_published_time(text))
            .cloned();

        Ok(VideoRecord {
            title,
            url: url.map(String::from),
            video_id,
            channel,
            views_text,
            duration_text,
            published_time_text,
        })
    }

    fn broad_pass(&self, doc: &Document, found: &mut FirstSeen<VideoRecord>) {
        let before = found.len();
        for anchor in doc.select(WATCH_LINK) {
            if found.len() >= self.settings.max_videos {
                break;
            }
            let Some(url) = attr(anchor, "href").and_then(|href| doc.resolve(href)) else {
                continue;
            };
            if found.contains(url.as_str()) {
                continue;
            }
            let Some(title) = self.broad_title(anchor) else {
                continue;
            };
            found.push(VideoRecord {
                title: Some(title),
                video_id: video_id_of(&url),
                url: Some(url.into()),
                ..VideoRecord::default()
            });
        }
        scout_debug!("video feed broad pass added {}", found.len() - before);
    }

    fn broad_title(&self, anchor: ElementRef<'_>) -> Option<String> {
        let sources = [
            attr(anchor, "title").map(str::to_string),
            attr(anchor, "aria-label").map(str::to_string),
            first_in(anchor, "#video-title").map(text_of),
            Some(text_of(anchor)),
        ];
        sources
            .into_iter()
            .flatten()
            .map(|raw| clean_title(&raw))
            .find(|title| self.is_plausible_title(title))
    }

    fn is_plausible_title(&self, title: &str) -> bool {
        if title.chars().count() < self.settings.min_broad_title_chars {
            return false;
        }
        let lower = title.to_lowercase();
        !(BOILERPLATE.contains(&lower.as_str())
            || lower.starts_with("go to channel")
            || lower.starts_with("subscribe"))
    }
}

/// Containers of every known shape, each element once, in shape order.
fn containers(doc: &Document) -> Vec<ElementRef<'_>> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    CONTAINERS
        .iter()
        .flat_map(|css| doc.select(css))
        .filter(|container| seen.insert(container.id()))
        .collect()
}

fn metadata_texts(container: ElementRef<'_>) -> Vec<String> {
    METADATA_ITEMS
        .iter()
        .flat_map(|css| select_in(container, css))
        .map(text_of)
        .filter(|text| !text.is_empty())
        .collect()
}

fn is_view_count(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("view") || lower.contains("watching")
}

fn is_published_time(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.ends_with(" ago")
        || lower.starts_with("streamed")
        || lower.starts_with("premiered")
        || lower.starts_with("scheduled")
}

/// Strips trailing duration text (`12:34`, `5 minutes, 3 seconds`) that leaks
/// into accessible names.
pub fn clean_title(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_spoken = TRAILING_SPOKEN.replace(&collapsed, "");
    TRAILING_CLOCK.replace(&without_spoken, "").trim().to_string()
}

/// `v=` query parameter, or the id of a `/shorts/<id>` link.
pub fn video_id_of(url: &Url) -> Option<String> {
    if let Some((_, id)) = url.query_pairs().find(|(name, _)| name == "v") {
        return Some(id.into_owned()).filter(|id| !id.is_empty());
    }
    let mut segments = url.path_segments()?;
    match (segments.next(), segments.next()) {
        (Some("shorts"), Some(id)) if !id.is_empty() => Some(id.to_string()),
        _ => None,
    }
}
