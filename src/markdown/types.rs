//! Rendered markdown types.

/// A text block's markdown laid out as styled rows at a fixed width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedText {
    lines: Vec<RenderedLine>,
}

impl RenderedText {
    pub(crate) const fn new(lines: Vec<RenderedLine>) -> Self {
        Self { lines }
    }

    /// Terminal rows the text occupies.
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }
}

/// One display row with its block kind and inline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    kind: LineType,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// A row drawn in one style, such as a blank row or a frame edge.
    pub const fn plain(content: String, kind: LineType) -> Self {
        Self {
            content,
            kind,
            spans: Vec::new(),
        }
    }

    pub fn blank() -> Self {
        Self::plain(String::new(), LineType::Empty)
    }

    pub const fn styled(content: String, kind: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            kind,
            spans,
        }
    }

    /// The row's text with all markup removed.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.kind
    }

    pub const fn is_blank(&self) -> bool {
        matches!(self.kind, LineType::Empty)
    }

    /// Inline runs, or `None` for a row drawn in one style.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Character styling inside a row. Flags combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub underline: bool,
    pub code: bool,
    pub link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub const fn plain(text: String) -> Self {
        Self::new(
            text,
            InlineStyle {
                emphasis: false,
                strong: false,
                underline: false,
                code: false,
                link: false,
            },
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// The markdown construct a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Paragraph,
    /// Heading level as written; levels past 3 are styled like 3.
    Heading(u8),
    /// Fenced or indented code, including its frame.
    Code,
    Quote,
    /// List item at a nesting depth starting from 1.
    ListItem(usize),
    Rule,
    /// Stand-in text for an image that is not drawn.
    Placeholder,
    Empty,
}
