//! Markdown formatting actions on a text + selection pair.
//!
//! Every function here is pure: it takes the current text and selection and
//! returns the edited text with the selection to place afterwards. Offsets
//! are character offsets.

use super::buffer::Selection;
use super::marker::ParsedLine;

/// Placeholder used when a link is inserted without selected text.
pub const LINK_PLACEHOLDER: &str = "Link text";

/// A formatting action offered by the editor toolbar and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAction {
    Bold,
    Italic,
    Underline,
    Code,
    /// Heading level, 1 through 6. The editor offers 1 to 3.
    Heading(u8),
    Quote,
    BulletList,
    OrderedList,
}

impl FormatAction {
    /// Opening and closing markers for inline actions.
    pub const fn inline_markers(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Bold => Some(("**", "**")),
            Self::Italic => Some(("*", "*")),
            Self::Underline => Some(("<u>", "</u>")),
            Self::Code => Some(("`", "`")),
            Self::Heading(_) | Self::Quote | Self::BulletList | Self::OrderedList => None,
        }
    }

    pub const fn is_block(self) -> bool {
        self.inline_markers().is_none()
    }

    /// Short label for status messages.
    pub fn label(self) -> String {
        match self {
            Self::Bold => "bold".to_string(),
            Self::Italic => "italic".to_string(),
            Self::Underline => "underline".to_string(),
            Self::Code => "code".to_string(),
            Self::Heading(level) => format!("heading {level}"),
            Self::Quote => "quote".to_string(),
            Self::BulletList => "bullet list".to_string(),
            Self::OrderedList => "numbered list".to_string(),
        }
    }
}

/// Result of a formatting operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub selection: Selection,
}

/// Apply `action` to `text` with the given selection.
pub fn apply(text: &str, selection: Selection, action: FormatAction) -> Edit {
    let selection = clamp(text, selection);
    match action.inline_markers() {
        Some((before, after)) => wrap_inline(text, selection, before, after),
        None => transform_lines(text, selection, action),
    }
}

/// Replace the selection with a markdown link to `url`.
///
/// Returns `None` when `url` is blank. The caret lands right after the
/// inserted link.
pub fn insert_link(text: &str, selection: Selection, url: &str) -> Option<Edit> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let selection = clamp(text, selection);
    let (start, end) = byte_range(text, selection);
    let selected = &text[start..end];
    let label = if selected.is_empty() {
        LINK_PLACEHOLDER
    } else {
        selected
    };
    let link = format!("[{label}]({url})");
    let caret = selection.start() + link.chars().count();
    Some(Edit {
        text: format!("{}{link}{}", &text[..start], &text[end..]),
        selection: Selection::caret(caret),
    })
}

fn wrap_inline(text: &str, selection: Selection, before: &str, after: &str) -> Edit {
    let (start, end) = byte_range(text, selection);
    let selected = &text[start..end];
    let new_text = format!(
        "{}{before}{selected}{after}{}",
        &text[..start],
        &text[end..]
    );
    let inner_start = selection.start() + before.chars().count();
    let inner_end = inner_start + selected.chars().count();
    Edit {
        text: new_text,
        selection: Selection::new(inner_start, inner_end),
    }
}

fn transform_lines(text: &str, selection: Selection, action: FormatAction) -> Edit {
    let first = line_of(text, selection.start());
    let last = line_of(text, selection.end());
    let mut delta: isize = 0;

    let lines: Vec<String> = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i < first || i > last {
                return line.to_string();
            }
            let new_line = transform_line(line, action, i - first + 1);
            if i == first {
                delta = char_len(&new_line) - char_len(line);
            }
            new_line
        })
        .collect();

    let new_text = lines.join("\n");
    let max = new_text.chars().count();
    let caret = selection
        .start()
        .saturating_add_signed(delta)
        .min(max);
    Edit {
        text: new_text,
        selection: Selection::caret(caret),
    }
}

fn transform_line(line: &str, action: FormatAction, ordinal: usize) -> String {
    let parsed = ParsedLine::parse(line);
    match action {
        FormatAction::Heading(level) => {
            let hashes = "#".repeat(usize::from(level.clamp(1, 6)));
            format!("{hashes} {}", parsed.body)
        }
        FormatAction::Quote if parsed.is_canonical_quote() => parsed.body.to_string(),
        FormatAction::Quote => format!("> {}", parsed.body),
        FormatAction::BulletList if parsed.is_canonical_bullet() => parsed.body.to_string(),
        FormatAction::BulletList => format!("- {}", parsed.body),
        FormatAction::OrderedList => format!("{ordinal}. {}", parsed.body),
        FormatAction::Bold | FormatAction::Italic | FormatAction::Underline | FormatAction::Code => {
            line.to_string()
        }
    }
}

fn clamp(text: &str, selection: Selection) -> Selection {
    let len = text.chars().count();
    let start = selection.start().min(len);
    let end = selection.end().min(len);
    Selection::new(start, end)
}

/// Index of the line containing char offset `pos`.
fn line_of(text: &str, pos: usize) -> usize {
    text.chars().take(pos).filter(|c| *c == '\n').count()
}

fn byte_range(text: &str, selection: Selection) -> (usize, usize) {
    (
        byte_offset(text, selection.start()),
        byte_offset(text, selection.end()),
    )
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(i, _)| i)
}

#[allow(clippy::cast_possible_wrap)]
fn char_len(s: &str) -> isize {
    s.chars().count() as isize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, start: usize, end: usize, action: FormatAction) -> Edit {
        apply(text, Selection::new(start, end), action)
    }

    // --- Inline wrap ---

    #[test]
    fn test_bold_wraps_selection_and_keeps_it_selected() {
        let edit = run("hello world", 0, 5, FormatAction::Bold);
        assert_eq!(edit.text, "**hello** world");
        assert_eq!(edit.selection, Selection::new(2, 7));
    }

    #[test]
    fn test_italic_on_caret_inserts_pair_and_places_caret_between() {
        let edit = run("ab", 1, 1, FormatAction::Italic);
        assert_eq!(edit.text, "a**b");
        assert_eq!(edit.selection, Selection::caret(2));
    }

    #[test]
    fn test_underline_uses_raw_tag() {
        let edit = run("x", 0, 1, FormatAction::Underline);
        assert_eq!(edit.text, "<u>x</u>");
        assert_eq!(edit.selection, Selection::new(3, 4));
    }

    #[test]
    fn test_code_handles_multibyte_text() {
        let edit = run("héllo wörld", 6, 11, FormatAction::Code);
        assert_eq!(edit.text, "héllo `wörld`");
        assert_eq!(edit.selection, Selection::new(7, 12));
    }

    #[test]
    fn test_reversed_selection_is_normalized() {
        let edit = run("hello world", 5, 0, FormatAction::Bold);
        assert_eq!(edit.text, "**hello** world");
    }

    #[test]
    fn test_out_of_range_selection_is_clamped() {
        let edit = run("abc", 1, 40, FormatAction::Bold);
        assert_eq!(edit.text, "a**bc**");
    }

    // --- Block transforms ---

    #[test]
    fn test_bullet_applied_twice_restores_line() {
        let once = run("item", 0, 0, FormatAction::BulletList);
        assert_eq!(once.text, "- item");
        let twice = apply(&once.text, once.selection, FormatAction::BulletList);
        assert_eq!(twice.text, "item");
    }

    #[test]
    fn test_quote_toggles_off() {
        let edit = run("> said", 3, 3, FormatAction::Quote);
        assert_eq!(edit.text, "said");
        assert_eq!(edit.selection, Selection::caret(1));
    }

    #[test]
    fn test_quote_replaces_other_marker() {
        let edit = run("- item", 0, 0, FormatAction::Quote);
        assert_eq!(edit.text, "> item");
    }

    #[test]
    fn test_star_bullet_is_rewritten_not_toggled() {
        let edit = run("* item", 0, 0, FormatAction::BulletList);
        assert_eq!(edit.text, "- item");
    }

    #[test]
    fn test_ordered_list_numbers_from_one() {
        let text = "alpha\n7. beta\n- gamma";
        let edit = run(text, 0, text.len(), FormatAction::OrderedList);
        assert_eq!(edit.text, "1. alpha\n2. beta\n3. gamma");
    }

    #[test]
    fn test_ordered_list_is_not_toggled() {
        let edit = run("1. one", 0, 0, FormatAction::OrderedList);
        assert_eq!(edit.text, "1. one");
    }

    #[test]
    fn test_heading_rewrites_level() {
        let edit = run("### Title", 0, 0, FormatAction::Heading(1));
        assert_eq!(edit.text, "# Title");
        let again = apply(&edit.text, edit.selection, FormatAction::Heading(1));
        assert_eq!(again.text, "# Title");
    }

    #[test]
    fn test_heading_replaces_quote_marker() {
        let edit = run("> Title", 0, 0, FormatAction::Heading(2));
        assert_eq!(edit.text, "## Title");
    }

    #[test]
    fn test_only_touched_lines_change() {
        let text = "one\ntwo\nthree";
        // Selection inside "two" only.
        let edit = run(text, 5, 6, FormatAction::BulletList);
        assert_eq!(edit.text, "one\n- two\nthree");
    }

    #[test]
    fn test_caret_follows_first_line_delta() {
        let text = "one\ntwo";
        let edit = run(text, 1, 6, FormatAction::Heading(2));
        assert_eq!(edit.text, "## one\n## two");
        assert_eq!(edit.selection, Selection::caret(4));
    }

    #[test]
    fn test_caret_does_not_go_negative() {
        let edit = run("- x", 0, 0, FormatAction::BulletList);
        assert_eq!(edit.text, "x");
        assert_eq!(edit.selection, Selection::caret(0));
    }

    #[test]
    fn test_block_transform_on_empty_buffer() {
        let edit = run("", 0, 0, FormatAction::Quote);
        assert_eq!(edit.text, "> ");
        assert_eq!(edit.selection, Selection::caret(2));
    }

    // --- Links ---

    #[test]
    fn test_link_wraps_selection() {
        let edit = insert_link("see docs", Selection::new(4, 8), "https://x.dev").unwrap();
        assert_eq!(edit.text, "see [docs](https://x.dev)");
        assert_eq!(edit.selection, Selection::caret(25));
    }

    #[test]
    fn test_link_uses_placeholder_without_selection() {
        let edit = insert_link("", Selection::caret(0), "u").unwrap();
        assert_eq!(edit.text, "[Link text](u)");
        assert_eq!(edit.selection, Selection::caret(14));
    }

    #[test]
    fn test_blank_url_is_noop() {
        assert!(insert_link("abc", Selection::caret(1), "").is_none());
        assert!(insert_link("abc", Selection::caret(1), "   ").is_none());
    }
}
