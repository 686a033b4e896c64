//! Markdown parsing with comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeCodeBlock, NodeList, NodeValue};
use comrak::{Arena, Options, parse_document};
use unicode_width::UnicodeWidthStr;

use super::types::{InlineSpan, InlineStyle, LineType, RenderedLine, RenderedText};

/// Render markdown at 80 columns.
///
/// # Example
///
/// ```
/// let text = pagecraft::markdown::parse("# Hello\n\nWorld");
/// assert_eq!(text.height(), 3); // heading + blank + paragraph
/// ```
pub fn parse(source: &str) -> RenderedText {
    parse_with_layout(source, 80)
}

/// Render markdown wrapped to `width` columns.
///
/// Trailing blank rows are dropped so a rendered block hugs its content.
pub fn parse_with_layout(source: &str, width: u16) -> RenderedText {
    let arena = Arena::new();
    let mut options = Options::default();
    // Bare URLs render as links.
    options.extension.autolink = true;
    let root = parse_document(&arena, source, &options);

    let mut renderer = Renderer::new(usize::from(width.max(1)));
    renderer.node(root, 0, None);
    renderer.finish()
}

/// Accumulates display rows while walking the AST.
struct Renderer {
    lines: Vec<RenderedLine>,
    width: usize,
}

impl Renderer {
    const fn new(width: usize) -> Self {
        Self {
            lines: Vec::new(),
            width,
        }
    }

    fn finish(mut self) -> RenderedText {
        while self.lines.last().is_some_and(RenderedLine::is_blank) {
            self.lines.pop();
        }
        RenderedText::new(self.lines)
    }

    fn blank(&mut self) {
        self.lines.push(RenderedLine::blank());
    }

    fn node<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, marker: Option<String>) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                if self.lines.last().is_some_and(|l| !l.is_blank()) {
                    self.blank();
                }
                let mut spans = vec![InlineSpan::plain(format!(
                    "{} ",
                    "#".repeat(usize::from(heading.level))
                ))];
                spans.extend(inline_spans(node));
                self.wrapped(&spans, "", "", LineType::Heading(heading.level));
                self.blank();
            }
            NodeValue::Paragraph => {
                self.wrapped(&inline_spans(node), "", "", LineType::Paragraph);
                self.blank();
            }
            NodeValue::CodeBlock(code) => {
                self.code_block(code);
                self.blank();
            }
            NodeValue::List(list) => {
                self.list(node, list, depth);
                if depth == 0 {
                    self.blank();
                }
            }
            NodeValue::Item(_) => self.list_item(node, depth, marker),
            NodeValue::BlockQuote => {
                self.quote(node, 1);
                self.blank();
            }
            NodeValue::ThematicBreak => {
                self.lines.push(RenderedLine::plain(
                    "─".repeat(self.width.min(40)),
                    LineType::Rule,
                ));
                self.blank();
            }
            NodeValue::HtmlBlock(html) => {
                for raw in html.literal.lines() {
                    self.wrapped(
                        &[InlineSpan::plain(raw.to_string())],
                        "",
                        "",
                        LineType::Paragraph,
                    );
                }
                self.blank();
            }
            _ => {
                for child in node.children() {
                    self.node(child, depth, marker.clone());
                }
            }
        }
    }

    fn code_block(&mut self, code: &NodeCodeBlock) {
        const RIGHT_PADDING: usize = 1;
        let language = code.info.split_whitespace().next().unwrap_or("code");
        let body_width = code
            .literal
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .min(self.width.saturating_sub(4 + RIGHT_PADDING).max(1));
        let inner = body_width + 2 + RIGHT_PADDING;
        let label: String = format!(" {language} ").chars().take(inner).collect();
        let fill = inner.saturating_sub(label.chars().count());
        self.lines.push(RenderedLine::plain(
            format!("┌{label}{}┐", "─".repeat(fill)),
            LineType::Code,
        ));

        let code_style = InlineStyle {
            code: true,
            ..InlineStyle::default()
        };
        for raw in code.literal.lines() {
            let body: String = raw.chars().take(body_width).collect();
            let pad = body_width.saturating_sub(body.chars().count()) + RIGHT_PADDING;
            let spans = vec![
                InlineSpan::plain("│ ".to_string()),
                InlineSpan::new(body, code_style),
                InlineSpan::plain(format!("{} │", " ".repeat(pad))),
            ];
            self.lines
                .push(RenderedLine::styled(joined(&spans), LineType::Code, spans));
        }

        self.lines.push(RenderedLine::plain(
            format!("└{}┘", "─".repeat(inner)),
            LineType::Code,
        ));
    }

    fn list<'a>(&mut self, node: &'a AstNode<'a>, list: &NodeList, depth: usize) {
        let delimiter = match list.delimiter {
            ListDelimType::Paren => ')',
            ListDelimType::Period => '.',
        };
        let last = list.start + node.children().count().saturating_sub(1);
        let digits = last.to_string().len();

        for (index, child) in node.children().enumerate() {
            let marker = match list.list_type {
                ListType::Bullet => "• ".to_string(),
                ListType::Ordered => format!("{:>digits$}{delimiter} ", list.start + index),
            };
            self.node(child, depth + 1, Some(marker));
        }
    }

    fn list_item<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, marker: Option<String>) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let marker = marker.unwrap_or_else(|| "• ".to_string());
        let first = format!("{indent}{marker}");
        let hanging = format!("{indent}{}", " ".repeat(marker.chars().count()));
        let mut started = false;

        for child in node.children() {
            if matches!(child.data.borrow().value, NodeValue::Paragraph) {
                let prefix = if started { &hanging } else { &first };
                self.wrapped(
                    &inline_spans(child),
                    prefix,
                    &hanging,
                    LineType::ListItem(depth),
                );
                started = true;
            } else {
                self.node(child, depth, None);
            }
        }

        if !started {
            self.lines
                .push(RenderedLine::plain(first, LineType::ListItem(depth)));
        }
    }

    fn quote<'a>(&mut self, node: &'a AstNode<'a>, level: usize) {
        let prefix = format!("  {}", "│ ".repeat(level));
        for child in node.children() {
            let spans = match &child.data.borrow().value {
                NodeValue::BlockQuote => {
                    self.quote(child, level + 1);
                    continue;
                }
                NodeValue::Paragraph | NodeValue::Heading(_) => inline_spans(child),
                _ => {
                    for raw in plain_text(child).lines() {
                        self.wrapped(
                            &[InlineSpan::plain(raw.to_string())],
                            &prefix,
                            &prefix,
                            LineType::Quote,
                        );
                    }
                    continue;
                }
            };
            self.wrapped(&spans, &prefix, &prefix, LineType::Quote);
        }
    }

    fn wrapped(&mut self, spans: &[InlineSpan], first: &str, rest: &str, kind: LineType) {
        for row in wrap_spans(spans, self.width, first, rest) {
            self.lines
                .push(RenderedLine::styled(joined(&row), kind, row));
        }
    }
}

fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    fn walk<'a>(node: &'a AstNode<'a>, out: &mut String) {
        match &node.data.borrow().value {
            NodeValue::Text(t) => out.push_str(t),
            NodeValue::Code(c) => out.push_str(&c.literal),
            NodeValue::CodeBlock(c) => out.push_str(&c.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push('\n'),
            _ => node.children().for_each(|child| walk(child, out)),
        }
    }
    let mut out = String::new();
    walk(node, &mut out);
    out
}

fn inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    inline_children(node, InlineStyle::default(), &mut spans);
    spans
}

/// Walk the children of `node` in order.
///
/// Raw `<u>` and `</u>` tags arrive as separate sibling nodes, so underline
/// state is tracked across siblings here rather than by nesting.
fn inline_children<'a>(node: &'a AstNode<'a>, style: InlineStyle, spans: &mut Vec<InlineSpan>) {
    let mut current = style;
    for child in node.children() {
        if let NodeValue::HtmlInline(tag) = &child.data.borrow().value {
            match tag.trim().to_ascii_lowercase().as_str() {
                "<u>" => current.underline = true,
                "</u>" => current.underline = style.underline,
                _ => {}
            }
            continue;
        }
        inline_node(child, current, spans);
    }
}

fn inline_node<'a>(node: &'a AstNode<'a>, style: InlineStyle, spans: &mut Vec<InlineSpan>) {
    let nested = match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) => return,
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.clone(), style));
            return;
        }
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                emphasis: false,
                strong: false,
                ..style
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
            return;
        }
        NodeValue::Image(image) => {
            let alt = plain_text(node);
            let label = if alt.is_empty() { &image.url } else { &alt };
            spans.push(InlineSpan::new(format!("[Image: {label}]"), style));
            return;
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
            return;
        }
        NodeValue::Emph => InlineStyle {
            emphasis: true,
            ..style
        },
        NodeValue::Strong => InlineStyle {
            strong: true,
            ..style
        },
        NodeValue::Link(_) => InlineStyle { link: true, ..style },
        _ => style,
    };
    inline_children(node, nested, spans);
}

/// Greedy word wrap. `first` prefixes the first row, `rest` every row
/// after it. Whitespace never starts a wrapped row.
fn wrap_spans(spans: &[InlineSpan], width: usize, first: &str, rest: &str) -> Vec<Vec<InlineSpan>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut used = 0usize;
    let mut has_word = false;

    let open_row = |prefix: &str, row: &mut Vec<InlineSpan>, used: &mut usize| {
        if !prefix.is_empty() {
            row.push(InlineSpan::plain(prefix.to_string()));
        }
        *used = prefix.width();
    };
    open_row(first, &mut row, &mut used);

    for token in spans.iter().flat_map(split_words) {
        let token_width = token.text().width();
        let is_space = token.text().chars().all(char::is_whitespace);

        if used + token_width > width && has_word {
            rows.push(std::mem::take(&mut row));
            open_row(rest, &mut row, &mut used);
            has_word = false;
        }
        if is_space && !has_word {
            continue;
        }
        used += token_width;
        row.push(token);
        has_word |= !is_space;
    }

    rows.push(row);
    rows
}

/// Split a span into alternating word and whitespace runs.
fn split_words(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out: Vec<InlineSpan> = Vec::new();
    let mut run = String::new();
    let mut run_is_space = None;

    for ch in span.text().chars() {
        let is_space = ch.is_whitespace();
        if run_is_space.is_some_and(|prev| prev != is_space) {
            out.push(InlineSpan::new(std::mem::take(&mut run), span.style()));
        }
        run.push(ch);
        run_is_space = Some(is_space);
    }
    if !run.is_empty() {
        out.push(InlineSpan::new(run, span.style()));
    }
    out
}

fn joined(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}
