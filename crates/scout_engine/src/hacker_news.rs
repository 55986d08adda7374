use scout_core::UserRecord;
use scout_logging::scout_debug;

use crate::document::{first_in, next_element_sibling, text_of};
use crate::{Document, UserExtractor};

const SUBMISSION_ROW: &str = "tr.athing";
const AUTHOR_LINK: &str = "a.hnuser";
const SITE_LABEL: &str = ".titleline .sitestr";

/// Submission authors from a Hacker News listing.
///
/// Keeps page order and does not deduplicate: an author with two submissions
/// appears twice.
#[derive(Debug, Default)]
pub struct HackerNewsExtractor;

impl UserExtractor for HackerNewsExtractor {
    fn extract_users(&self, doc: &Document) -> Vec<UserRecord> {
        let users: Vec<UserRecord> = doc
            .select(SUBMISSION_ROW)
            .into_iter()
            .filter_map(|submission| {
                // The author lives in the subtext row right after the submission.
                let subtext = next_element_sibling(submission)?;
                let author = first_in(subtext, AUTHOR_LINK)?;
                let site = first_in(submission, SITE_LABEL).map(text_of);
                UserRecord::new(&text_of(author), site.as_deref())
            })
            .collect();
        scout_debug!("hacker news: {} submission authors", users.len());
        users
    }
}
