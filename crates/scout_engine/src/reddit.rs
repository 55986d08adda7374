use lazy_static::lazy_static;
use regex::Regex;
use scout_core::{UserRecord, NOT_AVAILABLE};
use scout_logging::scout_debug;
use scraper::{ElementRef, Html};

use crate::document::{attr, closest, first_in, selector, text_of};
use crate::{Detector, DetectorPipeline, Document, UserExtractor};

const PROFILE_LINK: &str = r#"a[href^="/user/"]"#;
const USERNAME_LINK: &str = "a.text-neutral-content-strong";
const USERNAME_LINK_LOOSE: &str = r#"a[class*="text-neutral-content-strong"]"#;
const SUBREDDIT_LINK: &str = r#"a[href^="/r/"]"#;
const CONTEXT_BOUNDARY: &str = r#"[data-testid*="search"], .search-result, article, .comment, [class*="search"], [class*="comment"], [class*="post"]"#;

lazy_static! {
    static ref PROFILE_PATH: Regex = Regex::new(r"^/user/([^/]+)/").unwrap();
    static ref USERNAME_SHAPE: Regex = Regex::new(r"^[A-Za-z0-9_-]{3,}$").unwrap();
    static ref SUBREDDIT_PATH: Regex = Regex::new(r"^/r/([^/]+)").unwrap();
}

/// Usernames from profile links (`/user/<name>/`).
#[derive(Debug, Default)]
pub struct ProfileLinkDetector;

impl Detector<UserRecord> for ProfileLinkDetector {
    fn name(&self) -> &'static str {
        "profile-link"
    }

    fn detect(&self, doc: &Document) -> Vec<UserRecord> {
        doc.select(PROFILE_LINK)
            .into_iter()
            .filter_map(|link| {
                let href = attr(link, "href")?;
                let username = PROFILE_PATH.captures(href)?.get(1)?.as_str();
                UserRecord::new(username, Some(&subreddit_context(link)))
            })
            .collect()
    }
}

/// Usernames from anchors styled as author names.
#[derive(Debug, Default)]
pub struct UsernameClassDetector;

impl Detector<UserRecord> for UsernameClassDetector {
    fn name(&self) -> &'static str {
        "username-class"
    }

    fn detect(&self, doc: &Document) -> Vec<UserRecord> {
        doc.select(USERNAME_LINK)
            .into_iter()
            .filter_map(|link| {
                let text = text_of(link);
                if !looks_like_username(&text) {
                    return None;
                }
                UserRecord::new(&text, Some(&subreddit_context(link)))
            })
            .collect()
    }
}

fn looks_like_username(text: &str) -> bool {
    USERNAME_SHAPE.is_match(text) && !text.starts_with("r/")
}

/// `r/<name>` of the post, comment or search result holding `element`, else "N/A".
fn subreddit_context(element: ElementRef<'_>) -> String {
    closest(element, CONTEXT_BOUNDARY)
        .and_then(|boundary| first_in(boundary, SUBREDDIT_LINK))
        .and_then(|link| attr(link, "href"))
        .and_then(|href| SUBREDDIT_PATH.captures(href))
        .and_then(|caps| caps.get(1))
        .map(|name| format!("r/{}", name.as_str()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Reddit usernames from every detector, first detector's record winning.
pub struct RedditExtractor {
    pipeline: DetectorPipeline<UserRecord>,
}

impl RedditExtractor {
    pub fn new() -> Self {
        Self {
            pipeline: DetectorPipeline::new()
                .with(ProfileLinkDetector)
                .with(UsernameClassDetector),
        }
    }
}

impl Default for RedditExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl UserExtractor for RedditExtractor {
    fn extract_users(&self, doc: &Document) -> Vec<UserRecord> {
        let users = self.pipeline.run(doc);
        scout_debug!("reddit: {} unique usernames", users.len());
        users
    }
}

/// Cheap shape check on a subtree added to the page: does it hold anything a
/// Reddit username detector would look at.
pub fn added_content_has_users(fragment_html: &str) -> bool {
    let fragment = Html::parse_fragment(fragment_html);
    [USERNAME_LINK_LOOSE, PROFILE_LINK]
        .into_iter()
        .filter_map(selector)
        .any(|sel| fragment.select(&sel).next().is_some())
}
