use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::model::{EditPanel, ImageSource, PreviewDevice, Prompt, Screen};
use crate::app::{App, Message, Model};
use crate::editor::{Direction, FormatAction};
use crate::page::{BlockKind, BlockWidth, ImageHeight};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if model.text_edit().is_some() && model.prompt.is_none() => {
                Some(Message::EditorInsertStr(text.replace("\r\n", "\n")))
            }
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        let up = matches!(mouse.kind, MouseEventKind::ScrollUp);
        let down = matches!(mouse.kind, MouseEventKind::ScrollDown);
        if !up && !down {
            return None;
        }
        if model.help_visible {
            return Some(if up {
                Message::HelpScrollUp(3)
            } else {
                Message::HelpScrollDown(3)
            });
        }
        if model.screen == Screen::Preview && model.prompt.is_none() {
            return Some(if up {
                Message::ScrollUp(3)
            } else {
                Message::ScrollDown(3)
            });
        }
        None
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
            return Some(Message::Quit);
        }

        if model.help_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScrollDown(1)),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScrollUp(1)),
                KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::HelpScrollDown(10)),
                KeyCode::PageUp => Some(Message::HelpScrollUp(10)),
                _ => Some(Message::HideHelp),
            };
        }

        if let Some(prompt) = &model.prompt {
            return Self::handle_prompt_key(key, prompt);
        }

        if let Some(panel) = &model.edit {
            return match panel {
                EditPanel::Text(edit) => Self::handle_text_editor_key(key, edit.preview),
                EditPanel::Image(edit) => Self::handle_image_editor_key(key, edit.source),
            };
        }

        match model.screen {
            Screen::Preview => Self::handle_preview_key(key),
            Screen::Build => Self::handle_build_key(key, model),
        }
    }

    fn handle_prompt_key(key: KeyEvent, prompt: &Prompt) -> Option<Message> {
        match (prompt, key.code) {
            (_, KeyCode::Esc) => Some(Message::CancelPrompt),
            (_, KeyCode::Enter) => Some(Message::ConfirmPrompt),
            (Prompt::Link { .. }, KeyCode::Backspace) => Some(Message::PromptInputBackspace),
            (Prompt::Link { .. }, KeyCode::Char(c))
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(Message::PromptInputChar(c))
            }
            (Prompt::Link { .. }, _) => None,
            (_, KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab) => {
                Some(Message::PromptChoiceUp)
            }
            (_, KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab) => {
                Some(Message::PromptChoiceDown)
            }
            (Prompt::Width { .. }, KeyCode::Char('1' | 'h')) => {
                Some(Message::ChooseWidth(BlockWidth::Half))
            }
            (Prompt::Width { .. }, KeyCode::Char('2' | 'f')) => {
                Some(Message::ChooseWidth(BlockWidth::Full))
            }
            (Prompt::Height { .. }, KeyCode::Char('1' | 's')) => {
                Some(Message::ChooseHeight(ImageHeight::Small))
            }
            (Prompt::Height { .. }, KeyCode::Char('2' | 'm')) => {
                Some(Message::ChooseHeight(ImageHeight::Medium))
            }
            (Prompt::Height { .. }, KeyCode::Char('3' | 'l')) => {
                Some(Message::ChooseHeight(ImageHeight::Large))
            }
            _ => None,
        }
    }

    fn handle_text_editor_key(key: KeyEvent, preview: bool) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        // Commands that work in both source and rendered view
        match key.code {
            KeyCode::Esc => return Some(Message::CancelEdit),
            KeyCode::Char('s') if ctrl => return Some(Message::SaveEdit),
            KeyCode::Char('p') if ctrl => return Some(Message::EditorTogglePreview),
            _ => {}
        }
        if preview {
            return match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Message::EditorPreviewScroll(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Message::EditorPreviewScroll(1)),
                KeyCode::PageUp => Some(Message::EditorPreviewScroll(-10)),
                KeyCode::PageDown | KeyCode::Char(' ') => Some(Message::EditorPreviewScroll(10)),
                _ => None,
            };
        }

        if ctrl {
            return match key.code {
                KeyCode::Char('b') => Some(Message::EditorFormat(FormatAction::Bold)),
                KeyCode::Char('i') => Some(Message::EditorFormat(FormatAction::Italic)),
                KeyCode::Char('u') => Some(Message::EditorFormat(FormatAction::Underline)),
                KeyCode::Char('`') => Some(Message::EditorFormat(FormatAction::Code)),
                KeyCode::Char('k') => Some(Message::EditorStartLink),
                KeyCode::Char('z' | 'Z') if shift => Some(Message::EditorRedo),
                KeyCode::Char('Z') => Some(Message::EditorRedo),
                KeyCode::Char('z') => Some(Message::EditorUndo),
                KeyCode::Char('y') => Some(Message::EditorRedo),
                KeyCode::Char('a') => Some(Message::EditorSelectAll),
                KeyCode::Left => Some(Message::EditorMoveWord(Direction::Left, shift)),
                KeyCode::Right => Some(Message::EditorMoveWord(Direction::Right, shift)),
                KeyCode::Home => Some(Message::EditorToStart(shift)),
                KeyCode::End => Some(Message::EditorToEnd(shift)),
                _ => None,
            };
        }

        if alt {
            return match key.code {
                KeyCode::Char('i') => Some(Message::EditorFormat(FormatAction::Italic)),
                KeyCode::Char('c') => Some(Message::EditorFormat(FormatAction::Code)),
                KeyCode::Char(c @ '1'..='3') => {
                    let level = c.to_digit(10).and_then(|d| u8::try_from(d).ok())?;
                    Some(Message::EditorFormat(FormatAction::Heading(level)))
                }
                KeyCode::Char('q') => Some(Message::EditorFormat(FormatAction::Quote)),
                KeyCode::Char('l') => Some(Message::EditorFormat(FormatAction::BulletList)),
                KeyCode::Char('o') => Some(Message::EditorFormat(FormatAction::OrderedList)),
                KeyCode::Left => Some(Message::EditorMoveWord(Direction::Left, shift)),
                KeyCode::Right => Some(Message::EditorMoveWord(Direction::Right, shift)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some(Message::EditorInsertChar(c)),
            KeyCode::Tab => Some(Message::EditorInsertStr("    ".to_string())),
            KeyCode::Enter => Some(Message::EditorNewline),
            KeyCode::Backspace => Some(Message::EditorBackspace),
            KeyCode::Delete => Some(Message::EditorDelete),
            KeyCode::Up => Some(Message::EditorMove(Direction::Up, shift)),
            KeyCode::Down => Some(Message::EditorMove(Direction::Down, shift)),
            KeyCode::Left => Some(Message::EditorMove(Direction::Left, shift)),
            KeyCode::Right => Some(Message::EditorMove(Direction::Right, shift)),
            KeyCode::Home => Some(Message::EditorHome(shift)),
            KeyCode::End => Some(Message::EditorEnd(shift)),
            _ => None,
        }
    }

    fn handle_image_editor_key(key: KeyEvent, source: ImageSource) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(Message::CancelEdit),
            KeyCode::Char('s') if ctrl => Some(Message::SaveEdit),
            KeyCode::Tab | KeyCode::BackTab => Some(Message::ImageToggleSource),
            KeyCode::Enter => match source {
                ImageSource::Url => Some(Message::SaveEdit),
                ImageSource::Upload => Some(Message::ImageUpload),
            },
            KeyCode::Backspace => Some(Message::ImageInputBackspace),
            KeyCode::Char(c) if !ctrl => Some(Message::ImageInputChar(c)),
            _ => None,
        }
    }

    fn handle_preview_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | 'p') => Some(Message::ClosePreview),
            KeyCode::Char('m') => Some(Message::TogglePreviewDevice),
            KeyCode::Char('1') => Some(Message::SetPreviewDevice(PreviewDevice::Desktop)),
            KeyCode::Char('2') => Some(Message::SetPreviewDevice(PreviewDevice::Mobile)),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollDown(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollUp(1)),
            KeyCode::Char(' ') | KeyCode::PageDown => Some(Message::PageDown),
            KeyCode::Char('b') | KeyCode::PageUp => Some(Message::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            _ => None,
        }
    }

    fn handle_build_key(key: KeyEvent, model: &Model) -> Option<Message> {
        match key.code {
            KeyCode::Char('t') => Some(Message::StartAddBlock(BlockKind::Text)),
            KeyCode::Char('i') => Some(Message::StartAddBlock(BlockKind::Image)),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Message::SelectNext),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                Some(Message::SelectPrevious)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectRowDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectRowUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::SelectFirst),
            KeyCode::Char('G') | KeyCode::End => Some(Message::SelectLast),
            KeyCode::Enter | KeyCode::Char('e') => {
                model.selected.map(|_| Message::EditSelected)
            }
            KeyCode::Char('d') | KeyCode::Delete => model.selected.map(Message::DeleteBlock),
            KeyCode::Char('p') => Some(Message::OpenPreview),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::Char('q') => Some(Message::Quit),
            _ => None,
        }
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}
