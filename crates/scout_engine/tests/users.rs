use scout_core::{UserRecord, NOT_AVAILABLE};
use scout_engine::{
    added_content_has_users, Document, HackerNewsExtractor, PageSnapshot, RedditExtractor,
    UserExtractor,
};
use pretty_assertions::assert_eq;

const HN: &str = "https://news.ycombinator.com/news";
const REDDIT: &str = "https://www.reddit.com/r/rust/";

fn doc(url: &str, html: &str) -> Document {
    Document::parse(&PageSnapshot::new(url, html))
}

fn user(name: &str, site: &str) -> UserRecord {
    UserRecord::new(name, Some(site)).unwrap()
}

#[test]
fn hacker_news_author_without_site_gets_sentinel() {
    let html = r#"<table>
        <tr class="athing"><td><span class="titleline"><a href="item?id=1">Ask HN: x</a></span></td></tr>
        <tr><td class="subtext"><a class="hnuser" href="user?id=alice">alice</a></td></tr>
    </table>"#;

    let users = HackerNewsExtractor.extract_users(&doc(HN, html));

    assert_eq!(users, vec![user("alice", NOT_AVAILABLE)]);
    assert_eq!(users[0].origin_site, "N/A");
}

#[test]
fn hacker_news_keeps_order_duplicates_and_skips_partial_rows() {
    let html = r#"<table>
        <tr class="athing"><td><span class="titleline"><a>One</a> <span class="sitehost">(<span class="sitestr">github.com</span>)</span></span></td></tr>
        <tr><td class="subtext"><a class="hnuser">bob</a></td></tr>
        <tr class="athing"><td><span class="titleline"><a>Job ad</a></span></td></tr>
        <tr><td class="subtext">no author here</td></tr>
        <tr class="athing"><td><span class="titleline"><a>Two</a> <span class="sitestr">lwn.net</span></span></td></tr>
        <tr><td class="subtext"><a class="hnuser"> bob </a></td></tr>
        <tr class="athing"><td><span class="titleline"><a>Last row, no subtext</a></span></td></tr>
    </table>"#;

    let users = HackerNewsExtractor.extract_users(&doc(HN, html));

    assert_eq!(
        users,
        vec![user("bob", "github.com"), user("bob", "lwn.net")]
    );
}

#[test]
fn extractors_return_empty_on_unrelated_pages() {
    let page = doc(REDDIT, "<html><body><p>Nothing to see</p></body></html>");
    assert!(HackerNewsExtractor.extract_users(&page).is_empty());
    assert!(RedditExtractor::new().extract_users(&page).is_empty());
}

#[test]
fn reddit_merges_both_detectors_first_seen_wins() {
    let html = r#"
        <article>
            <a href="/r/rust/">r/rust</a>
            <a href="/user/ferris/">u/ferris</a>
            <a class="text-neutral-content-strong" href="/user/ferris/">ferris</a>
        </article>
        <div class="comment-tree">
            <a href="/r/programming/">r/programming</a>
            <a class="text-neutral-content-strong">crab_42</a>
            <a class="text-neutral-content-strong">ferris</a>
        </div>
        <div>
            <a href="/user/loner/">loner</a>
            <a href="/user/">malformed</a>
            <a href="/user/noslash">no trailing slash</a>
        </div>"#;

    let users = RedditExtractor::new().extract_users(&doc(REDDIT, html));

    assert_eq!(
        users,
        vec![
            user("ferris", "r/rust"),
            user("loner", NOT_AVAILABLE),
            user("crab_42", "r/programming"),
        ]
    );
}

#[test]
fn reddit_class_heuristic_rejects_non_usernames() {
    let html = r#"
        <div class="post">
            <a class="text-neutral-content-strong">ab</a>
            <a class="text-neutral-content-strong">r/rust</a>
            <a class="text-neutral-content-strong">12 comments</a>
            <a class="text-neutral-content-strong">valid-name</a>
        </div>"#;

    let users = RedditExtractor::new().extract_users(&doc(REDDIT, html));

    assert_eq!(users, vec![user("valid-name", NOT_AVAILABLE)]);
}

#[test]
fn reddit_union_has_each_username_once() {
    let links: String = ["a", "bbb", "ccc", "ddd"]
        .iter()
        .map(|name| format!(r#"<a href="/user/{name}/">u/{name}</a>"#))
        .collect();
    let classes: String = ["ccc", "ddd", "eee", "ccc"]
        .iter()
        .map(|name| format!(r#"<a class="text-neutral-content-strong">{name}</a>"#))
        .collect();
    let html = format!("<div>{links}{classes}</div>");

    let names: Vec<String> = RedditExtractor::new()
        .extract_users(&doc(REDDIT, &html))
        .into_iter()
        .map(|user| user.username)
        .collect();

    assert_eq!(names, vec!["a", "bbb", "ccc", "ddd", "eee"]);
}

#[test]
fn added_content_shape_check() {
    assert!(added_content_has_users(
        r#"<div><a href="/user/someone/">someone</a></div>"#
    ));
    assert!(added_content_has_users(
        r#"<shreddit-comment><a class="foo text-neutral-content-strong bar">x</a></shreddit-comment>"#
    ));
    assert!(!added_content_has_users(r#"<div><a href="/r/rust/">r/rust</a></div>"#));
    assert!(!added_content_has_users(""));
}
