//! Block-level line markers (`# `, `> `, `- `, `1. `).

use once_cell::sync::Lazy;
use regex::Regex;

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(#{1,6})|(>)|([-*])|(\d+)\.)\s").expect("line marker pattern is valid")
});

/// Marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMarker {
    None,
    /// `#` through `######`
    Heading(u8),
    /// `> `
    Quote,
    /// `- ` or `* `
    Bullet,
    /// `N. `
    Ordered(u64),
}

/// A line split into its marker prefix and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub marker: LineMarker,
    /// Marker text including its trailing whitespace character.
    pub prefix: &'a str,
    pub body: &'a str,
}

impl<'a> ParsedLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        let Some(caps) = MARKER_RE.captures(line) else {
            return Self {
                marker: LineMarker::None,
                prefix: "",
                body: line,
            };
        };
        let marker = if let Some(hashes) = caps.get(1) {
            #[allow(clippy::cast_possible_truncation)]
            LineMarker::Heading(hashes.as_str().len() as u8)
        } else if caps.get(2).is_some() {
            LineMarker::Quote
        } else if caps.get(3).is_some() {
            LineMarker::Bullet
        } else {
            let n = caps
                .get(4)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(u64::MAX);
            LineMarker::Ordered(n)
        };
        let end = caps.get(0).map_or(0, |m| m.end());
        Self {
            marker,
            prefix: &line[..end],
            body: &line[end..],
        }
    }

    /// True when the line starts with exactly `> `.
    pub fn is_canonical_quote(&self) -> bool {
        self.marker == LineMarker::Quote && self.prefix == "> "
    }

    /// True when the line starts with exactly `- `.
    pub fn is_canonical_bullet(&self) -> bool {
        self.marker == LineMarker::Bullet && self.prefix == "- "
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_has_no_marker() {
        let parsed = ParsedLine::parse("hello");
        assert_eq!(parsed.marker, LineMarker::None);
        assert_eq!(parsed.body, "hello");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(ParsedLine::parse("# a").marker, LineMarker::Heading(1));
        assert_eq!(ParsedLine::parse("### a").marker, LineMarker::Heading(3));
        assert_eq!(ParsedLine::parse("###### a").marker, LineMarker::Heading(6));
        assert_eq!(ParsedLine::parse("####### a").marker, LineMarker::None);
    }

    #[test]
    fn test_heading_requires_whitespace() {
        assert_eq!(ParsedLine::parse("#tag").marker, LineMarker::None);
    }

    #[test]
    fn test_quote_bullet_and_ordered() {
        let quote = ParsedLine::parse("> said");
        assert_eq!(quote.marker, LineMarker::Quote);
        assert_eq!(quote.body, "said");
        assert!(quote.is_canonical_quote());

        let star = ParsedLine::parse("* item");
        assert_eq!(star.marker, LineMarker::Bullet);
        assert!(!star.is_canonical_bullet());
        assert!(ParsedLine::parse("- item").is_canonical_bullet());

        let ordered = ParsedLine::parse("12. step");
        assert_eq!(ordered.marker, LineMarker::Ordered(12));
        assert_eq!(ordered.prefix, "12. ");
        assert_eq!(ordered.body, "step");
    }

    #[test]
    fn test_tab_after_quote_is_not_canonical() {
        let parsed = ParsedLine::parse(">\tx");
        assert_eq!(parsed.marker, LineMarker::Quote);
        assert!(!parsed.is_canonical_quote());
        assert_eq!(parsed.body, "x");
    }

    #[test]
    fn test_only_one_marker_is_parsed() {
        let parsed = ParsedLine::parse("- > nested");
        assert_eq!(parsed.marker, LineMarker::Bullet);
        assert_eq!(parsed.body, "> nested");
    }
}
