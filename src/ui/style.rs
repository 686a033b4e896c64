//! Theming and color definitions.
//!
//! Markdown styles use ANSI colors that adapt to the terminal's palette,
//! with darker variants when the background is light.

use std::sync::{Mutex, OnceLock, PoisonError};

use ratatui::style::{Color, Modifier, Style};

use crate::markdown::{InlineStyle, LineType};

/// Terminal background brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Light,
    Dark,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<Background>>> = OnceLock::new();

fn background_override() -> &'static Mutex<Option<Background>> {
    BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None))
}

/// Force a background mode, or `None` to detect it from `COLORFGBG`.
pub fn set_background_mode(mode: Option<Background>) {
    *background_override()
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = mode;
}

pub fn is_light_background() -> bool {
    let forced = *background_override()
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    match forced {
        Some(mode) => mode == Background::Light,
        None => background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
            == Background::Light,
    }
}

/// `COLORFGBG` is `fg;bg` with ANSI indices; 7 and up are light.
fn background_from_colorfgbg(colorfgbg: Option<&str>) -> Background {
    let Some(value) = colorfgbg else {
        return Background::Dark;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    match bg.parse::<u8>() {
        Ok(index) if index >= 7 => Background::Light,
        _ => Background::Dark,
    }
}

const fn pick(light_bg: bool, light: Color, dark: Color) -> Color {
    if light_bg { light } else { dark }
}

/// Get the style for a given line type.
///
/// Headings deeper than three render like level three.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    let light_bg = is_light_background();
    match line_type {
        LineType::Heading(1) => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Cyan))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(pick(light_bg, Color::Indexed(22), Color::Green))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(pick(light_bg, Color::Indexed(58), Color::Yellow))
            .add_modifier(Modifier::BOLD),
        LineType::Code => Style::default()
            .fg(pick(light_bg, Color::Indexed(238), Color::Indexed(245)))
            .add_modifier(Modifier::DIM),
        LineType::Quote => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::ITALIC),
        LineType::Rule => Style::default()
            .fg(pick(light_bg, Color::Indexed(241), Color::Indexed(240)))
            .add_modifier(Modifier::DIM),
        LineType::Placeholder => Style::default()
            .fg(pick(light_bg, Color::Indexed(90), Color::Magenta))
            .add_modifier(Modifier::ITALIC),
        LineType::ListItem(_) | LineType::Paragraph | LineType::Empty => Style::default(),
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let light_bg = is_light_background();
    let mut style = base;

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if inline.link {
        style = style
            .add_modifier(Modifier::UNDERLINED)
            .fg(pick(light_bg, Color::Blue, Color::LightBlue));
    }
    if inline.code {
        style = style
            .fg(pick(light_bg, Color::Indexed(88), Color::Red))
            .add_modifier(Modifier::BOLD)
            .remove_modifier(Modifier::DIM);
    }

    style
}

/// Border of an unselected block card.
pub fn card_border() -> Style {
    Style::default().fg(pick(
        is_light_background(),
        Color::Indexed(248),
        Color::Indexed(240),
    ))
}

/// Border of the selected block card.
pub fn selected_border() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Muted text for placeholders and hints.
pub fn muted() -> Style {
    Style::default()
        .fg(pick(is_light_background(), Color::Indexed(243), Color::Indexed(245)))
        .add_modifier(Modifier::ITALIC)
}

/// Section titles inside panels and overlays.
pub fn section() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Highlighted choice in a prompt, or the active tab.
pub fn active_choice() -> Style {
    Style::default().bg(Color::Blue).fg(Color::White)
}

/// Selected text in the editor.
pub fn text_selection() -> Style {
    Style::default().bg(Color::Indexed(24)).fg(Color::White)
}

/// The editor caret.
pub fn caret() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}
