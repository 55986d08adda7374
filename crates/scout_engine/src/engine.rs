use std::collections::VecDeque;
use std::time::Instant;

use scout_core::{detect_site, update, ChangeMonitor, Effect, Msg, SiteKind, UserRecord};
use scout_logging::{scout_debug, scout_info};

use crate::{
    added_content_has_users, Document, EngineConfig, HackerNewsExtractor, IssueBoardExtractor,
    Layout, Notification, Notifier, PageHost, PageSnapshot, RedditExtractor, Request, Response,
    UserExtractor, VideoFeedExtractor, WireError,
};

/// Per-page entry point: answers popup requests and drives the change monitor.
///
/// Construct one per page load. The host forwards requests, mutation batches,
/// scroll events and timer ticks; new Reddit usernames go out through the
/// [`Notifier`].
pub struct ContentAgent<N: Notifier> {
    monitor: ChangeMonitor,
    notifier: N,
    hacker_news: HackerNewsExtractor,
    reddit: RedditExtractor,
    board: IssueBoardExtractor,
    videos: VideoFeedExtractor,
}

impl<N: Notifier> ContentAgent<N> {
    pub fn new(url: &str, now: Instant, config: EngineConfig, notifier: N) -> Self {
        let site = detect_site(url);
        if site != SiteKind::Unknown {
            scout_info!("active on {:?} ({})", site, url);
        }
        Self {
            monitor: ChangeMonitor::new(url, now, &config.monitor),
            notifier,
            hacker_news: HackerNewsExtractor,
            reddit: RedditExtractor::new(),
            board: IssueBoardExtractor::new(config.board),
            videos: VideoFeedExtractor::new(config.videos),
        }
    }

    /// Replaces the geometry source used for the board's column fallback.
    pub fn with_layout(mut self, layout: Box<dyn Layout>) -> Self {
        self.board = self.board.with_layout(layout);
        self
    }

    pub fn monitor(&self) -> &ChangeMonitor {
        &self.monitor
    }

    /// When the host should next call [`Self::on_tick`].
    pub fn next_deadline(&self) -> Option<Instant> {
        self.monitor.next_deadline()
    }

    /// Answers one request. Pages without a matching extractor get an empty list.
    pub async fn handle<H: PageHost + ?Sized>(
        &self,
        request: Request,
        host: &mut H,
    ) -> Response {
        let page = host.snapshot().await;
        let site = detect_site(&page.url);
        scout_debug!("request {:?} on {:?}", request, site);

        match (request, site) {
            (Request::GetUsers, _) => match self.user_extractor(site) {
                Some(extractor) => Response::Users {
                    users: extractor.extract_users(&Document::parse(&page)),
                },
                None => Response::empty_for(request),
            },
            (Request::GetIssues, SiteKind::IssueBoard) => Response::Issues {
                issues: self.board.extract_from(&page, host).await,
            },
            (Request::GetVideos, SiteKind::VideoFeed) => Response::Videos {
                videos: self.videos.extract(&Document::parse(&page)),
            },
            _ => Response::empty_for(request),
        }
    }

    /// JSON in, JSON out.
    pub async fn handle_message<H: PageHost + ?Sized>(
        &self,
        raw: &str,
        host: &mut H,
    ) -> Result<String, WireError> {
        let request = Request::from_json(raw)?;
        self.handle(request, host).await.to_json()
    }

    /// A batch of DOM mutations; `added` holds the outer HTML of each added subtree.
    pub fn on_mutations(&mut self, page: &PageSnapshot, added: &[String], now: Instant) {
        let qualifies = detect_site(&page.url) == SiteKind::Reddit
            && added.iter().any(|fragment| added_content_has_users(fragment));
        let msg = Msg::Mutation {
            url: page.url.clone(),
            qualifies,
        };
        self.dispatch(page, msg, now);
    }

    pub fn on_scroll(&mut self, page: &PageSnapshot, now: Instant) {
        let msg = Msg::Scrolled {
            url: page.url.clone(),
        };
        self.dispatch(page, msg, now);
    }

    /// Fires due timers (baseline population, debounced re-check).
    pub fn on_tick(&mut self, page: &PageSnapshot, now: Instant) {
        self.dispatch(page, Msg::Tick, now);
    }

    fn user_extractor(&self, site: SiteKind) -> Option<&dyn UserExtractor> {
        match site {
            SiteKind::HackerNews => Some(&self.hacker_news),
            SiteKind::Reddit => Some(&self.reddit),
            _ => None,
        }
    }

    fn dispatch(&mut self, page: &PageSnapshot, msg: Msg, now: Instant) {
        let mut effects: VecDeque<Effect> = update(&mut self.monitor, msg, now).into();
        while let Some(effect) = effects.pop_front() {
            match effect {
                Effect::Extract(purpose) => {
                    let users = self.reddit.extract_users(&Document::parse(page));
                    let msg = Msg::Extracted { purpose, users };
                    effects.extend(update(&mut self.monitor, msg, now));
                }
                Effect::NotifyNewUsers(users) => self.deliver(users),
            }
        }
    }

    fn deliver(&self, users: Vec<UserRecord>) {
        let count = users.len();
        let notification = Notification::NewUsersDetected { users };
        match self.notifier.notify(&notification) {
            Ok(()) => scout_debug!("delivered {} new usernames", count),
            // Nobody may be listening; the popup asks again when it opens.
            Err(err) => scout_debug!("dropped new-user notification: {}", err),
        }
    }
}
