use crate::app::Model;
use crate::app::model::{
    EditPanel, ImageEdit, ImageSource, PreviewDevice, Prompt, Screen, TextEdit, ToastLevel,
};
use crate::editor::{Direction, FormatAction, FormatEngine};
use crate::image::is_inline_reference;
use crate::page::{Block, BlockContent, BlockId, BlockKind, BlockPatch, BlockWidth, ImageHeight};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Build canvas
    /// Select the next block in page order
    SelectNext,
    /// Select the previous block in page order
    SelectPrevious,
    /// Select a block in the row above
    SelectRowUp,
    /// Select a block in the row below
    SelectRowDown,
    /// Select the first block
    SelectFirst,
    /// Select the last block
    SelectLast,
    /// Open the edit panel for the selected block
    EditSelected,
    /// Remove a block immediately
    DeleteBlock(BlockId),

    // Block creation
    /// Open the width prompt for a new block of this kind
    StartAddBlock(BlockKind),
    /// Create the pending block with this width
    ChooseWidth(BlockWidth),
    /// Save the pending image reference with this height
    ChooseHeight(ImageHeight),
    /// Move the highlighted prompt option up
    PromptChoiceUp,
    /// Move the highlighted prompt option down
    PromptChoiceDown,
    /// Confirm the open prompt with its current value
    ConfirmPrompt,
    /// Dismiss the open prompt without side effects
    CancelPrompt,
    /// Type into the link prompt
    PromptInputChar(char),
    /// Delete the last character of the link prompt
    PromptInputBackspace,

    // Edit panel
    /// Close the edit panel, discarding changes
    CancelEdit,
    /// Write the edit panel back to its block
    SaveEdit,

    // Text editor
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Insert pasted text at the cursor
    EditorInsertStr(String),
    /// Split the line at the cursor (Enter)
    EditorNewline,
    /// Delete before the cursor (Backspace)
    EditorBackspace,
    /// Delete at the cursor (Delete)
    EditorDelete,
    /// Move the cursor; `true` extends the selection
    EditorMove(Direction, bool),
    /// Move by word; `true` extends the selection
    EditorMoveWord(Direction, bool),
    /// Move to line start
    EditorHome(bool),
    /// Move to line end
    EditorEnd(bool),
    /// Move to buffer start
    EditorToStart(bool),
    /// Move to buffer end
    EditorToEnd(bool),
    EditorSelectAll,
    /// Apply a formatting action to the selection
    EditorFormat(FormatAction),
    /// Open the link URL prompt
    EditorStartLink,
    EditorUndo,
    EditorRedo,
    /// Switch between source and rendered view
    EditorTogglePreview,
    /// Scroll the rendered view by this many rows (negative scrolls up)
    EditorPreviewScroll(isize),

    // Image editor
    /// Switch between URL and Upload input
    ImageToggleSource,
    /// Type into the active image field
    ImageInputChar(char),
    /// Delete the last character of the active image field
    ImageInputBackspace,
    /// Start reading the typed local file
    ImageUpload,
    /// A local file was read and encoded for this block
    ImageAcquired(BlockId, String),
    /// A local file could not be used for this block
    ImageRejected(BlockId, String),

    // Preview
    OpenPreview,
    ClosePreview,
    TogglePreviewDevice,
    SetPreviewDevice(PreviewDevice),
    /// Scroll preview up by n lines
    ScrollUp(usize),
    /// Scroll preview down by n lines
    ScrollDown(usize),
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Help
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    HelpScrollUp(usize),
    HelpScrollDown(usize),

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Quit application
    Quit,
}

/// Apply one message to the model.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Build canvas
        Message::SelectNext => select_offset(&mut model, 1),
        Message::SelectPrevious => select_offset(&mut model, -1),
        Message::SelectRowUp => select_row(&mut model, -1),
        Message::SelectRowDown => select_row(&mut model, 1),
        Message::SelectFirst => {
            model.selected = model.page.blocks().first().map(Block::id);
        }
        Message::SelectLast => {
            model.selected = model.page.blocks().last().map(Block::id);
        }
        Message::EditSelected => open_edit_panel(&mut model),
        Message::DeleteBlock(id) => delete_block(&mut model, id),

        // Block creation
        Message::StartAddBlock(kind) => {
            model.prompt = Some(Prompt::Width {
                kind,
                choice: BlockWidth::Half,
            });
        }
        Message::ChooseWidth(width) => {
            if let Some(Prompt::Width { kind, .. }) = model.prompt {
                model.prompt = None;
                let id = model.page.append(kind, width);
                model.selected = Some(id);
                crate::perf::log_event("block.append", format!("id={id}"));
            }
        }
        Message::ChooseHeight(height) => {
            match model.prompt.take() {
                Some(Prompt::Height { block, url, .. }) => {
                    let patch = BlockPatch::Image {
                        url: Some(url),
                        height: Some(height),
                    };
                    apply_patch(&mut model, block, patch);
                }
                other => model.prompt = other,
            }
        }
        Message::PromptChoiceUp => step_prompt_choice(&mut model, -1),
        Message::PromptChoiceDown => step_prompt_choice(&mut model, 1),
        Message::ConfirmPrompt => match model.prompt.clone() {
            Some(Prompt::Width { choice, .. }) => {
                return update(model, Message::ChooseWidth(choice));
            }
            Some(Prompt::Height { choice, .. }) => {
                return update(model, Message::ChooseHeight(choice));
            }
            Some(Prompt::Link { input }) => {
                model.prompt = None;
                if let Some(edit) = model.text_edit_mut() {
                    edit.engine.insert_link(&input);
                }
            }
            None => {}
        },
        Message::CancelPrompt => {
            model.prompt = None;
        }
        Message::PromptInputChar(ch) => {
            if let Some(Prompt::Link { input }) = &mut model.prompt {
                input.push(ch);
            }
        }
        Message::PromptInputBackspace => {
            if let Some(Prompt::Link { input }) = &mut model.prompt {
                input.pop();
            }
        }

        // Edit panel
        Message::CancelEdit => {
            if let Some(panel) = model.edit.take() {
                tracing::debug!(block = %panel.block(), "edit session discarded");
            }
        }
        Message::SaveEdit => save_edit_panel(&mut model),

        // Text editor
        Message::EditorInsertChar(ch) => with_engine(&mut model, |e| e.insert_char(ch)),
        Message::EditorInsertStr(s) => with_engine(&mut model, |e| e.insert_str(&s)),
        Message::EditorNewline => with_engine(&mut model, FormatEngine::newline),
        Message::EditorBackspace => with_engine(&mut model, FormatEngine::backspace),
        Message::EditorDelete => with_engine(&mut model, FormatEngine::delete),
        Message::EditorMove(dir, extend) => {
            with_engine(&mut model, |e| e.move_cursor(dir, extend));
        }
        Message::EditorMoveWord(dir, extend) => {
            with_engine(&mut model, |e| e.move_word(dir, extend));
        }
        Message::EditorHome(extend) => with_engine(&mut model, |e| e.move_home(extend)),
        Message::EditorEnd(extend) => with_engine(&mut model, |e| e.move_end(extend)),
        Message::EditorToStart(extend) => with_engine(&mut model, |e| e.move_to_start(extend)),
        Message::EditorToEnd(extend) => with_engine(&mut model, |e| e.move_to_end(extend)),
        Message::EditorSelectAll => with_engine(&mut model, FormatEngine::select_all),
        Message::EditorFormat(action) => with_engine(&mut model, |e| e.apply(action)),
        Message::EditorStartLink => {
            if model.text_edit().is_some() {
                model.prompt = Some(Prompt::Link {
                    input: String::new(),
                });
            }
        }
        Message::EditorUndo => with_engine(&mut model, |e| {
            e.undo();
        }),
        Message::EditorRedo => with_engine(&mut model, |e| {
            e.redo();
        }),
        Message::EditorTogglePreview => {
            if let Some(edit) = model.text_edit_mut() {
                edit.preview = !edit.preview;
            }
        }
        Message::EditorPreviewScroll(delta) => {
            if let Some(edit) = model.text_edit_mut()
                && edit.preview
            {
                edit.scroll = edit.scroll.saturating_add_signed(delta);
            }
        }

        // Image editor
        Message::ImageToggleSource => {
            if let Some(edit) = model.image_edit_mut() {
                edit.source = edit.source.toggled();
            }
        }
        Message::ImageInputChar(ch) => {
            if let Some(edit) = model.image_edit_mut() {
                match edit.source {
                    ImageSource::Url => edit.value.push(ch),
                    ImageSource::Upload => edit.path.push(ch),
                }
            }
        }
        Message::ImageInputBackspace => {
            if let Some(edit) = model.image_edit_mut() {
                match edit.source {
                    ImageSource::Url => edit.value.pop(),
                    ImageSource::Upload => edit.path.pop(),
                };
            }
        }
        Message::ImageUpload => start_upload(&mut model),
        Message::ImageAcquired(block, uri) => {
            if let Some(edit) = model.image_edit_mut()
                && edit.block == block
            {
                edit.value = uri;
                edit.reading = false;
                model.show_toast(ToastLevel::Info, "Image loaded");
            } else {
                tracing::debug!(%block, "image read finished after its panel closed");
            }
        }
        Message::ImageRejected(block, message) => {
            if let Some(edit) = model.image_edit_mut()
                && edit.block == block
            {
                edit.reading = false;
                model.show_toast(ToastLevel::Warning, message);
            } else {
                tracing::debug!(%block, "image rejection arrived after its panel closed");
            }
        }

        // Preview
        Message::OpenPreview => {
            model.screen = Screen::Preview;
            model.preview_viewport.go_to_top();
        }
        Message::ClosePreview => {
            model.screen = Screen::Build;
        }
        Message::TogglePreviewDevice => {
            model.device = model.device.toggled();
            model.preview_viewport.go_to_top();
        }
        Message::SetPreviewDevice(device) => {
            if model.device != device {
                model.device = device;
                model.preview_viewport.go_to_top();
            }
        }
        Message::ScrollUp(n) => model.preview_viewport.scroll_up(n),
        Message::ScrollDown(n) => model.preview_viewport.scroll_down(n),
        Message::PageUp => model.preview_viewport.page_up(),
        Message::PageDown => model.preview_viewport.page_down(),
        Message::GoToTop => model.preview_viewport.go_to_top(),
        Message::GoToBottom => model.preview_viewport.go_to_bottom(),

        // Help
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => {
            model.help_visible = false;
            model.help_scroll_offset = 0;
        }
        Message::HelpScrollUp(n) => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_sub(n);
        }
        Message::HelpScrollDown(n) => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_add(n);
        }

        // Window
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model
                .preview_viewport
                .resize(width, height.saturating_sub(2));
        }
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

fn with_engine(model: &mut Model, f: impl FnOnce(&mut FormatEngine)) {
    if let Some(edit) = model.text_edit_mut() {
        f(&mut edit.engine);
    }
}

fn select_offset(model: &mut Model, delta: isize) {
    let blocks = model.page.blocks();
    if blocks.is_empty() {
        model.selected = None;
        return;
    }
    let target = match model.selected.and_then(|id| model.page.position(id)) {
        Some(index) => index
            .saturating_add_signed(delta)
            .min(blocks.len() - 1),
        None => 0,
    };
    model.selected = Some(blocks[target].id());
}

/// Move the selection to the row above or below, keeping the column slot
/// where possible.
fn select_row(model: &mut Model, delta: isize) {
    let rows = model.page.rows();
    if rows.is_empty() {
        model.selected = None;
        return;
    }
    let current = model.selected.and_then(|id| {
        rows.iter().enumerate().find_map(|(row_idx, row)| {
            row.iter()
                .position(|block| block.id() == id)
                .map(|slot| (row_idx, slot))
        })
    });
    let Some((row_idx, slot)) = current else {
        model.selected = rows[0].items().first().map(|b| b.id());
        return;
    };
    let target_row = row_idx.saturating_add_signed(delta).min(rows.len() - 1);
    let items = rows[target_row].items();
    let target_slot = slot.min(items.len().saturating_sub(1));
    if let Some(block) = items.get(target_slot) {
        model.selected = Some(block.id());
    }
}

fn open_edit_panel(model: &mut Model) {
    let Some(block) = model.selected_block() else {
        return;
    };
    let panel = match block.content() {
        BlockContent::Text { markdown } => EditPanel::Text(TextEdit {
            block: block.id(),
            engine: FormatEngine::new(markdown),
            preview: false,
            scroll: 0,
        }),
        BlockContent::Image { url, .. } => EditPanel::Image(ImageEdit {
            block: block.id(),
            source: ImageSource::Url,
            value: url.clone().unwrap_or_default(),
            path: String::new(),
            reading: false,
        }),
    };
    tracing::debug!(block = %panel.block(), "edit session opened");
    model.prompt = None;
    model.edit = Some(panel);
}

fn save_edit_panel(model: &mut Model) {
    let Some(panel) = model.edit.take() else {
        return;
    };
    match panel {
        EditPanel::Text(edit) => {
            apply_patch(model, edit.block, BlockPatch::Text(edit.engine.text()));
        }
        EditPanel::Image(edit) => {
            let url = edit.value.trim();
            if url.is_empty() {
                let patch = BlockPatch::Image {
                    url: None,
                    height: None,
                };
                apply_patch(model, edit.block, patch);
            } else {
                let choice = model
                    .page
                    .get(edit.block)
                    .and_then(Block::image_height)
                    .unwrap_or_default();
                model.prompt = Some(Prompt::Height {
                    block: edit.block,
                    url: url.to_string(),
                    choice,
                });
            }
        }
    }
}

fn apply_patch(model: &mut Model, block: BlockId, patch: BlockPatch) {
    match model.page.replace_fields(block, patch) {
        Ok(()) => crate::perf::log_event("block.update", format!("id={block}")),
        Err(err) => {
            tracing::warn!(%block, error = %err, "block update rejected");
            model.show_toast(ToastLevel::Warning, err.to_string());
        }
    }
}

fn delete_block(model: &mut Model, id: BlockId) {
    let Some(index) = model.page.position(id) else {
        return;
    };
    model.page.remove(id);
    if model.editing_block() == Some(id) {
        model.edit = None;
    }
    if matches!(&model.prompt, Some(Prompt::Height { block, .. }) if *block == id) {
        model.prompt = None;
    }
    if model.selected == Some(id) {
        let blocks = model.page.blocks();
        model.selected = blocks
            .get(index)
            .or_else(|| blocks.last())
            .map(Block::id);
    }
    crate::perf::log_event("block.remove", format!("id={id}"));
    model.show_toast(ToastLevel::Info, format!("Deleted {id}"));
}

fn start_upload(model: &mut Model) {
    let Some(edit) = model.image_edit_mut() else {
        return;
    };
    if edit.reading {
        return;
    }
    let path = edit.path.trim().to_string();
    if path.is_empty() {
        model.show_toast(ToastLevel::Warning, "Enter a file path to upload");
        return;
    }
    if is_inline_reference(&path) {
        edit.value = path;
        edit.source = ImageSource::Url;
        return;
    }
    edit.reading = true;
}

fn step_prompt_choice(model: &mut Model, delta: isize) {
    match &mut model.prompt {
        Some(Prompt::Width { choice, .. }) => {
            *choice = step(&BlockWidth::ALL, *choice, delta);
        }
        Some(Prompt::Height { choice, .. }) => {
            *choice = step(&ImageHeight::ALL, *choice, delta);
        }
        Some(Prompt::Link { .. }) | None => {}
    }
}

fn step<T: Copy + PartialEq>(options: &[T], current: T, delta: isize) -> T {
    let index = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = index
        .saturating_add_signed(delta)
        .min(options.len().saturating_sub(1));
    options.get(next).copied().unwrap_or(current)
}
