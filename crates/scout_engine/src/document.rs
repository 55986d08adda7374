use scout_core::{detect_site, SiteKind};
use scout_logging::scout_warn;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Serialized DOM handed over by the host, with the URL it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Parsed snapshot. Reads are synchronous and never observe a partial page.
pub struct Document {
    url: String,
    base: Option<Url>,
    html: Html,
}

impl Document {
    pub fn parse(snapshot: &PageSnapshot) -> Self {
        Self {
            url: snapshot.url.clone(),
            base: Url::parse(&snapshot.url).ok(),
            html: Html::parse_document(&snapshot.html),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn site(&self) -> SiteKind {
        detect_site(&self.url)
    }

    /// All elements matching `css`, in document order. An invalid selector matches nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(sel) => self.html.select(&sel).collect(),
            None => Vec::new(),
        }
    }

    /// Resolves a possibly relative link against the page URL.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }
        match Url::parse(href) {
            Ok(url) => Some(url),
            Err(_) => self.base.as_ref().and_then(|base| base.join(href).ok()),
        }
    }
}

pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(err) => {
            scout_warn!("invalid selector {:?}: {:?}", css, err);
            None
        }
    }
}

/// Descendants of `scope` matching `css` (like `querySelectorAll`).
pub(crate) fn select_in<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => scope.select(&sel).collect(),
        None => Vec::new(),
    }
}

pub(crate) fn first_in<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    scope.select(&sel).next()
}

/// Nearest ancestor-or-self matching `css` (like `Element.closest`).
pub(crate) fn closest<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|candidate| sel.matches(candidate))
}

pub(crate) fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Text content with whitespace runs collapsed and trimmed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed attribute value; blank counts as missing.
pub(crate) fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{closest, first_in, next_element_sibling, text_of, Document, PageSnapshot};

    fn doc(html: &str) -> Document {
        Document::parse(&PageSnapshot::new("https://www.example.com/a/b", html))
    }

    #[test]
    fn closest_includes_self_and_walks_up() {
        let document = doc(r#"<article id="outer"><div class="post"><a id="x">x</a></div></article>"#);
        let anchor = document.select("a#x")[0];
        assert_eq!(closest(anchor, "a").map(|e| e.value().id()), Some(Some("x")));
        assert_eq!(
            closest(anchor, "article").and_then(|e| e.value().id()),
            Some("outer")
        );
        assert!(closest(anchor, "section").is_none());
    }

    #[test]
    fn sibling_skips_text_nodes() {
        let document = doc("<table><tr id=\"a\"><td>1</td></tr>\n  <tr id=\"b\"><td>2</td></tr></table>");
        let first = document.select("tr#a")[0];
        let next = next_element_sibling(first).unwrap();
        assert_eq!(next.value().id(), Some("b"));
        assert!(next_element_sibling(next).is_none());
    }

    #[test]
    fn text_is_collapsed() {
        let document = doc("<p>  hello \n   <b>big</b>   world </p>");
        let root = document.select("body")[0];
        assert_eq!(text_of(first_in(root, "p").unwrap()), "hello big world");
    }

    #[test]
    fn resolve_relative_and_rejects_fragments() {
        let document = doc("");
        assert_eq!(
            document.resolve("/watch?v=1").unwrap().as_str(),
            "https://www.example.com/watch?v=1"
        );
        assert!(document.resolve("#top").is_none());
        assert!(document.resolve("  ").is_none());
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let document = doc("<p>x</p>");
        assert!(document.select("p[").is_empty());
    }
}
