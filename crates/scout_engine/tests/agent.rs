use std::sync::mpsc;
use std::sync::Once;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use scout_core::{MonitorState, UserRecord};
use scout_engine::{
    ChannelNotifier, ContentAgent, DeliveryError, EngineConfig, Notification, Notifier,
    PageSnapshot, Request, Response, StaticPage, WireError,
};

const REDDIT: &str = "https://www.reddit.com/r/rust/";
const HN: &str = "https://news.ycombinator.com/";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scout_logging::initialize_for_tests);
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn reddit_page(names: &[&str]) -> PageSnapshot {
    let links: String = names
        .iter()
        .map(|name| format!(r#"<a href="/user/{name}/">u/{name}</a>"#))
        .collect();
    PageSnapshot::new(
        REDDIT,
        format!(r#"<article><a href="/r/rust/">r/rust</a>{links}</article>"#),
    )
}

fn profile_fragment(name: &str) -> Vec<String> {
    vec![format!(r#"<div><a href="/user/{name}/">{name}</a></div>"#)]
}

fn usernames(notification: Notification) -> Vec<String> {
    let Notification::NewUsersDetected { users } = notification;
    users.into_iter().map(|user| user.username).collect()
}

fn reddit_agent(start: Instant) -> (ContentAgent<ChannelNotifier>, mpsc::Receiver<Notification>) {
    let (tx, rx) = mpsc::channel();
    let notifier = ChannelNotifier::new(tx);
    let agent = ContentAgent::new(REDDIT, start, EngineConfig::default(), notifier);
    (agent, rx)
}

struct Unreachable;

impl Notifier for Unreachable {
    fn notify(&self, _notification: &Notification) -> Result<(), DeliveryError> {
        Err(DeliveryError::Failed("popup closed".to_string()))
    }
}

#[tokio::test]
async fn get_users_dispatches_by_site() {
    init_logging();
    let (agent, _rx) = reddit_agent(Instant::now());
    let html = r#"<table>
        <tr class="athing"><td><span class="titleline"><a>Show HN</a></span></td></tr>
        <tr><td><a class="hnuser">alice</a></td></tr>
    </table>"#;
    let mut host = StaticPage::new(PageSnapshot::new(HN, html));

    let response = agent.handle(Request::GetUsers, &mut host).await;

    assert_eq!(
        response,
        Response::Users {
            users: vec![UserRecord::new("alice", None).unwrap()]
        }
    );
}

#[tokio::test]
async fn wrong_site_requests_get_empty_lists() {
    init_logging();
    let (agent, _rx) = reddit_agent(Instant::now());
    let mut host = StaticPage::new(reddit_page(&["ferris"]));

    let issues = agent.handle(Request::GetIssues, &mut host).await;
    let videos = agent.handle(Request::GetVideos, &mut host).await;

    assert_eq!(issues, Response::Issues { issues: vec![] });
    assert_eq!(videos, Response::Videos { videos: vec![] });

    let mut elsewhere = StaticPage::new(PageSnapshot::new("https://example.com/", "<p>hi</p>"));
    assert!(agent.handle(Request::GetUsers, &mut elsewhere).await.is_empty());
}

#[tokio::test]
async fn json_messages_accept_legacy_names() {
    init_logging();
    let (agent, _rx) = reddit_agent(Instant::now());
    let mut host = StaticPage::new(reddit_page(&["ferris"]));

    let reply = agent
        .handle_message(r#"{"type":"GET_USERNAMES"}"#, &mut host)
        .await
        .unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&reply).unwrap(),
        serde_json::json!({"users": [{"username": "ferris", "site": "r/rust"}]})
    );

    let reply = agent
        .handle_message(r#"{"type":"GET_JIRA_ISSUES"}"#, &mut host)
        .await
        .unwrap();
    assert_eq!(reply, r#"{"issues":[]}"#);

    assert_eq!(Request::from_json(r#"{"type":"GET_VIDEOS"}"#).unwrap(), Request::GetVideos);
}

#[tokio::test]
async fn malformed_messages_are_rejected() {
    init_logging();
    let (agent, _rx) = reddit_agent(Instant::now());
    let mut host = StaticPage::new(reddit_page(&[]));

    for raw in [r#"{"type":"GET_EVERYTHING"}"#, "not json", "{}"] {
        let err = agent.handle_message(raw, &mut host).await.unwrap_err();
        assert!(matches!(err, WireError::Malformed(_)), "{raw}");
    }
}

#[test]
fn new_usernames_are_announced_once_after_quiet_period() {
    init_logging();
    let start = Instant::now();
    let (mut agent, rx) = reddit_agent(start);

    // Baseline: users already on the page are never announced.
    assert_eq!(agent.next_deadline(), Some(start + ms(1000)));
    agent.on_tick(&reddit_page(&["ferris"]), start + ms(1000));
    assert!(agent.monitor().has_seen("ferris"));
    assert!(rx.try_recv().is_err());

    // A burst of mutations is coalesced into one re-check.
    let grown = reddit_page(&["ferris", "crab_42"]);
    agent.on_mutations(&grown, &profile_fragment("crab_42"), start + ms(2000));
    agent.on_mutations(&grown, &profile_fragment("crab_42"), start + ms(2500));
    assert_eq!(agent.monitor().state(), MonitorState::PendingRecheck);
    agent.on_tick(&grown, start + ms(3000));
    assert!(rx.try_recv().is_err());
    agent.on_tick(&grown, start + ms(3500));

    assert_eq!(usernames(rx.try_recv().unwrap()), vec!["crab_42"]);
    assert!(rx.try_recv().is_err());
    assert_eq!(agent.monitor().state(), MonitorState::Idle);

    // Same page again: nothing new.
    agent.on_scroll(&grown, start + ms(4000));
    agent.on_tick(&grown, start + ms(5000));
    assert!(rx.try_recv().is_err());
}

#[test]
fn mutations_without_user_markup_are_ignored() {
    init_logging();
    let start = Instant::now();
    let (mut agent, rx) = reddit_agent(start);
    let page = reddit_page(&["ferris"]);

    agent.on_mutations(&page, &["<div>ad</div>".to_string()], start + ms(10));

    assert_eq!(agent.monitor().state(), MonitorState::Idle);
    assert_eq!(agent.next_deadline(), Some(start + ms(1000)));
    assert!(rx.try_recv().is_err());
}

#[test]
fn navigation_starts_a_fresh_seen_set() {
    init_logging();
    let start = Instant::now();
    let (mut agent, rx) = reddit_agent(start);
    agent.on_tick(&reddit_page(&["ferris"]), start + ms(1000));

    let moved = PageSnapshot {
        url: "https://www.reddit.com/r/programming/".to_string(),
        ..reddit_page(&["ferris"])
    };
    agent.on_mutations(&moved, &profile_fragment("ferris"), start + ms(2000));
    assert_eq!(agent.monitor().seen_count(), 0);
    agent.on_tick(&moved, start + ms(3000));

    assert_eq!(usernames(rx.try_recv().unwrap()), vec!["ferris"]);
}

#[test]
fn failed_delivery_is_not_fatal() {
    init_logging();
    let start = Instant::now();
    let mut config = EngineConfig::default();
    config.monitor.baseline_delay_ms = 5000;
    let mut agent = ContentAgent::new(REDDIT, start, config, Unreachable);

    let page = reddit_page(&["ferris"]);
    agent.on_mutations(&page, &profile_fragment("ferris"), start);
    agent.on_tick(&page, start + ms(1000));

    assert!(agent.monitor().has_seen("ferris"));
    assert_eq!(agent.monitor().state(), MonitorState::Idle);
    assert_eq!(agent.next_deadline(), Some(start + ms(5000)));
}

#[test]
fn other_sites_are_not_monitored() {
    init_logging();
    let start = Instant::now();
    let (tx, rx) = mpsc::channel();
    let notifier = ChannelNotifier::new(tx);
    let mut agent = ContentAgent::new(HN, start, EngineConfig::default(), notifier);
    let page = PageSnapshot::new(HN, r#"<a href="/user/x/">x</a>"#);

    agent.on_scroll(&page, start);
    agent.on_mutations(&page, &profile_fragment("xyz"), start);

    assert_eq!(agent.next_deadline(), None);
    agent.on_tick(&page, start + ms(5000));
    assert!(rx.try_recv().is_err());
}

#[test]
fn closed_channel_reports_no_listener() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let notifier = ChannelNotifier::new(tx);

    let result = notifier.notify(&Notification::NewUsersDetected { users: vec![] });

    assert_eq!(result, Err(DeliveryError::NoListener));
}

#[test]
fn notification_wire_shape() {
    let notification = Notification::NewUsersDetected {
        users: vec![UserRecord::new("crab_42", Some("r/rust")).unwrap()],
    };

    assert_eq!(
        serde_json::to_value(&notification).unwrap(),
        serde_json::json!({
            "type": "NEW_USERS_DETECTED",
            "users": [{"username": "crab_42", "site": "r/rust"}]
        })
    );
}
