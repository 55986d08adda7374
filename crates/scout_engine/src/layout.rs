use lazy_static::lazy_static;
use regex::Regex;
use scraper::ElementRef;

use crate::document::attr;

/// Horizontal geometry of rendered elements, supplied by the host.
pub trait Layout {
    /// Left edge of `element` in page pixels, if known.
    fn left_offset(&self, element: ElementRef<'_>) -> Option<f64>;
}

lazy_static! {
    static ref LEFT_DECL: Regex =
        Regex::new(r"(?i)(?:^|;)\s*(?:left|inset-inline-start)\s*:\s*(-?\d+(?:\.\d+)?)px").unwrap();
    static ref TRANSLATE_X: Regex =
        Regex::new(r"(?i)translate(?:x|3d)?\(\s*(-?\d+(?:\.\d+)?)px").unwrap();
}

/// Reads offsets from inline styles, as virtualized boards position their
/// columns with `left: Npx` or `transform: translateX(Npx)`.
///
/// An element without its own offset takes the nearest positioned ancestor's.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineStyleLayout;

impl Layout for InlineStyleLayout {
    fn left_offset(&self, element: ElementRef<'_>) -> Option<f64> {
        std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .find_map(|el| attr(el, "style").and_then(inline_left))
    }
}

/// A layout that knows nothing; geometric fallbacks never match.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLayout;

impl Layout for NoLayout {
    fn left_offset(&self, _element: ElementRef<'_>) -> Option<f64> {
        None
    }
}

fn inline_left(style: &str) -> Option<f64> {
    LEFT_DECL
        .captures(style)
        .or_else(|| TRANSLATE_X.captures(style))
        .and_then(|caps| caps.get(1))
        .and_then(|value| value.as_str().parse().ok())
}
