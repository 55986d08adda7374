use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use scout_core::{FirstSeen, IssueRecord};
use scout_logging::{scout_debug, scout_info};
use scraper::ElementRef;

use crate::document::{attr, first_in, non_empty, select_in, text_of};
use crate::{
    poll_until, BoardSettings, Document, InlineStyleLayout, Layout, PageHost, PageSnapshot,
    PollRound,
};

const FOCUS_CONTAINER: &str = r#"[data-testid="platform-card.ui.card.focus-container"]"#;
const STATIC_SUMMARY: &str =
    r#"[data-component-selector="issue-field-summary-inline-edit.ui.read.static-summary"]"#;
const TYPE_ICONS: [&str; 2] = [
    r#"img[alt][class*="_1bsb7vkz"]"#,
    r#"[data-testid*="issue-type"] img[alt]"#,
];
const ASSIGNEE_TEXT: &str = "span[id][hidden]";
const ASSIGNEE_PREFIX: &str = "Assignee: ";
const COLUMN_NAME: &str = r#"[data-testid="platform-board-kit.common.ui.column-header.editable-title.column-title.column-name"]"#;
/// Scrollable wrapper of each virtualized column list.
pub const VIRTUAL_LIST: &str = r#"[data-testid="software-board.board-container.board.virtual-board.fast-virtual-list.fast-virtual-list-wrapper"]"#;

lazy_static! {
    // "BIP-253 [aroma,toi] Create subscribeHandler. Use the enter key to load the work item."
    static ref FOCUS_LABEL: Regex = Regex::new(r"^(\S+)\s+(.+)\.\s+Use the enter key").unwrap();
}

/// Issue cards of a Kanban board.
pub struct IssueBoardExtractor {
    settings: BoardSettings,
    layout: Box<dyn Layout>,
}

impl IssueBoardExtractor {
    pub fn new(settings: BoardSettings) -> Self {
        Self {
            settings,
            layout: Box::new(InlineStyleLayout),
        }
    }

    pub fn with_layout(mut self, layout: Box<dyn Layout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    /// Cards currently rendered, one record per key, in document order.
    pub fn extract_visible(&self, doc: &Document) -> Vec<IssueRecord> {
        self.cards(doc)
            .into_iter()
            .map(|(key, card)| self.extract_card(doc, card, key))
            .collect::<FirstSeen<_>>()
            .into_vec()
    }

    /// Immediate pass, then bounded scroll rounds when the board looks partially rendered.
    pub async fn extract<H: PageHost + ?Sized>(&self, host: &mut H) -> Vec<IssueRecord> {
        let page = host.snapshot().await;
        self.extract_from(&page, host).await
    }

    /// Like [`Self::extract`], starting from an already taken snapshot.
    pub async fn extract_from<H: PageHost + ?Sized>(
        &self,
        page: &PageSnapshot,
        host: &mut H,
    ) -> Vec<IssueRecord> {
        let visible = self.extract_visible(&Document::parse(page));
        scout_info!("issue board: {} cards immediately visible", visible.len());
        if visible.len() >= self.settings.fast_path_threshold {
            return visible;
        }

        let mut scan = BoardScan {
            extractor: self,
            host,
            found: visible.into_iter().collect(),
        };
        let plateau_after = self.settings.plateau_after_rounds;
        let summary = poll_until(self.settings.poll_budget(), &mut scan, |report| {
            report.new_items == 0 && report.round > plateau_after
        })
        .await;

        let issues = scan.found.into_vec();
        scout_info!(
            "issue board: {} cards after {} scroll rounds (plateaued: {})",
            issues.len(),
            summary.rounds,
            summary.plateaued
        );
        issues
    }

    fn card_selector(&self) -> String {
        let project = self.settings.project_key_prefix.as_deref().unwrap_or("");
        format!(r#"[id^="{}{}"]"#, self.settings.card_id_prefix, project)
    }

    fn cards<'a>(&self, doc: &'a Document) -> Vec<(String, ElementRef<'a>)> {
        doc.select(&self.card_selector())
            .into_iter()
            .filter_map(|card| {
                let key = card
                    .value()
                    .id()?
                    .strip_prefix(self.settings.card_id_prefix.as_str())?;
                (!key.is_empty()).then(|| (key.to_string(), card))
            })
            .collect()
    }

    fn extract_card(&self, doc: &Document, card: ElementRef<'_>, key: String) -> IssueRecord {
        let title = focus_label_title(card, &key).or_else(|| {
            first_in(card, STATIC_SUMMARY)
                .map(text_of)
                .and_then(non_empty)
        });
        let issue_type = TYPE_ICONS
            .iter()
            .find_map(|css| first_in(card, css).and_then(|img| attr(img, "alt")))
            .map(str::to_string);
        let assignee = first_in(card, ASSIGNEE_TEXT).and_then(|span| {
            let text = text_of(span);
            let name = text.strip_prefix(ASSIGNEE_PREFIX).unwrap_or(&text).trim();
            non_empty(name.to_string())
        });
        let column = column_by_ancestry(card).or_else(|| self.column_by_position(doc, card));

        IssueRecord {
            key,
            title,
            issue_type,
            assignee,
            column,
        }
    }

    /// Header whose left edge is horizontally closest to the card's.
    /// Equal distances keep the header that comes first in the document.
    fn column_by_position(&self, doc: &Document, card: ElementRef<'_>) -> Option<String> {
        let card_left = self.layout.left_offset(card)?;
        let mut closest: Option<(f64, ElementRef<'_>)> = None;
        for header in doc.select(COLUMN_NAME) {
            let Some(left) = self.layout.left_offset(header) else {
                continue;
            };
            let distance = (card_left - left).abs();
            if closest.map_or(true, |(best, _)| distance < best) {
                closest = Some((distance, header));
            }
        }
        closest.map(|(_, header)| text_of(header)).and_then(non_empty)
    }
}

impl Default for IssueBoardExtractor {
    fn default() -> Self {
        Self::new(BoardSettings::default())
    }
}

fn focus_label_title(card: ElementRef<'_>, key: &str) -> Option<String> {
    let label = first_in(card, FOCUS_CONTAINER).and_then(|focus| attr(focus, "aria-label"))?;
    let caps = FOCUS_LABEL.captures(label)?;
    if caps.get(1)?.as_str() != key {
        return None;
    }
    non_empty(caps.get(2)?.as_str().trim().to_string())
}

/// Walks up from the card to the first ancestor holding column headers. Only an
/// ancestor with exactly one header identifies the card's column; reaching one
/// with several means the card sits outside any column container.
fn column_by_ancestry(card: ElementRef<'_>) -> Option<String> {
    card.ancestors()
        .filter_map(ElementRef::wrap)
        .map(|ancestor| select_in(ancestor, COLUMN_NAME))
        .find(|headers| !headers.is_empty())
        .filter(|headers| headers.len() == 1)
        .and_then(|headers| non_empty(text_of(headers[0])))
}

/// Progressive-loader state: cards found so far, merged by key.
struct BoardScan<'a, H: ?Sized> {
    extractor: &'a IssueBoardExtractor,
    host: &'a mut H,
    found: FirstSeen<IssueRecord>,
}

#[async_trait(?Send)]
impl<'a, H: PageHost + ?Sized> PollRound for BoardScan<'a, H> {
    async fn advance(&mut self, _round: u32) {
        let step = self.extractor.settings.scroll_step_px;
        self.host.scroll_containers(VIRTUAL_LIST, step).await;
    }

    async fn harvest(&mut self, round: u32) -> usize {
        let page = self.host.snapshot().await;
        let doc = Document::parse(&page);
        let mut fresh = 0;
        for (key, card) in self.extractor.cards(&doc) {
            if self.found.contains(&key) {
                continue;
            }
            if self.found.push(self.extractor.extract_card(&doc, card, key)) {
                fresh += 1;
            }
        }
        scout_debug!(
            "issue board round {}: {} new cards, {} total",
            round,
            fresh,
            self.found.len()
        );
        fresh
    }
}
