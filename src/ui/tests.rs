use super::*;
use crate::app::{EditPanel, ImageSource, Message, Model, PreviewDevice, Screen, update};
use crate::page::{BlockKind, BlockPatch, BlockWidth, ImageHeight, Page};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui_image::picker::Picker;
use std::path::{Path, PathBuf};

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(100, 40);
    Terminal::new(backend).unwrap()
}

fn draw(model: &mut Model) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    let symbols: Vec<&str> = buffer.content().iter().map(|c| c.symbol()).collect();
    symbols
        .chunks(width)
        .map(|row| row.concat())
        .collect::<Vec<_>>()
        .join("\n")
}

fn model_with(page: Page) -> Model {
    Model::new(page, (100, 40))
}

fn png_data_uri() -> String {
    use image::{DynamicImage, ImageFormat, RgbImage};
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 40])));
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    crate::image::acquire::encode_bytes(bytes.get_ref(), Path::new("red.png")).unwrap()
}

#[test]
fn test_empty_page_shows_empty_state() {
    let mut model = model_with(Page::new());
    let screen = draw(&mut model);
    assert!(screen.contains("Components"));
    assert!(screen.contains("Page Builder"));
    assert!(screen.contains("Nothing here yet"));
    assert!(screen.contains("Start building by adding components from the sidebar"));
}

#[test]
fn test_sidebar_lists_block_kinds() {
    let mut model = model_with(Page::new());
    let screen = draw(&mut model);
    assert!(screen.contains("[t] Text"));
    assert!(screen.contains("Add text content"));
    assert!(screen.contains("[i] Image"));
    assert!(screen.contains("Add an image"));
}

#[test]
fn test_empty_blocks_show_click_hints() {
    let mut page = Page::new();
    page.append(BlockKind::Text, BlockWidth::Half);
    page.append(BlockKind::Image, BlockWidth::Half);
    let mut model = model_with(page);
    let screen = draw(&mut model);
    assert!(screen.contains("Click to add text"));
    assert!(screen.contains("Click to add image"));
    assert!(screen.contains("text_1"));
    assert!(screen.contains("image_2"));
}

#[test]
fn test_half_width_blocks_share_a_row() {
    let mut page = Page::new();
    page.append(BlockKind::Text, BlockWidth::Half);
    page.append(BlockKind::Text, BlockWidth::Half);
    let mut model = model_with(page);
    let screen = draw(&mut model);
    let row = screen
        .lines()
        .find(|line| line.contains("text_1"))
        .expect("card title row");
    assert!(row.contains("text_2"), "both half cards on one line: {row}");
}

#[test]
fn test_text_block_renders_markdown() {
    let mut page = Page::new();
    let id = page.append(BlockKind::Text, BlockWidth::Full);
    page.replace_fields(id, BlockPatch::Text("# Hello\n\nSome **bold** text".to_string()))
        .unwrap();
    let mut model = model_with(page);
    let screen = draw(&mut model);
    assert!(screen.contains("Hello"));
    assert!(screen.contains("Some bold text"));
    assert!(!screen.contains("**bold**"));
}

#[test]
fn test_remote_image_shows_placeholder() {
    let mut page = Page::new();
    let id = page.append(BlockKind::Image, BlockWidth::Full);
    page.replace_fields(
        id,
        BlockPatch::Image {
            url: Some("https://example.com/cat.png".to_string()),
            height: Some(ImageHeight::Small),
        },
    )
    .unwrap();
    let mut model = model_with(page);
    let screen = draw(&mut model);
    assert!(screen.contains("[Image: https://example.com/cat.png]"));
}

#[test]
fn test_width_prompt_lists_choices() {
    let model = model_with(Page::new());
    let mut model = update(model, Message::StartAddBlock(BlockKind::Text));
    let screen = draw(&mut model);
    assert!(screen.contains("Add Text"));
    assert!(screen.contains("Half Width"));
    assert!(screen.contains("6 columns"));
    assert!(screen.contains("Full Width"));
    assert!(screen.contains("12 columns"));
}

#[test]
fn test_height_prompt_lists_presets() {
    let mut page = Page::new();
    page.append(BlockKind::Image, BlockWidth::Full);
    let model = model_with(page);
    let model = update(model, Message::EditSelected);
    let mut model = "https://example.com/a.png"
        .chars()
        .fold(model, |m, c| update(m, Message::ImageInputChar(c)));
    model = update(model, Message::SaveEdit);
    let screen = draw(&mut model);
    assert!(screen.contains("Choose Height"));
    assert!(screen.contains("Small"));
    assert!(screen.contains("200px height"));
    assert!(screen.contains("Large"));
}

#[test]
fn test_text_panel_shows_toolbar_and_count() {
    let mut page = Page::new();
    let id = page.append(BlockKind::Text, BlockWidth::Half);
    page.replace_fields(id, BlockPatch::Text("hello".to_string()))
        .unwrap();
    let model = model_with(page);
    let mut model = update(model, Message::EditSelected);
    let screen = draw(&mut model);
    assert!(screen.contains("Edit Text"));
    assert!(screen.contains("Esc Cancel"));
    assert!(screen.contains("5 characters"));
    assert!(screen.contains("Use **bold**"));
}

#[test]
fn test_text_panel_preview_tab_renders_markdown() {
    let mut page = Page::new();
    let id = page.append(BlockKind::Text, BlockWidth::Half);
    page.replace_fields(id, BlockPatch::Text("plain *soft* words".to_string()))
        .unwrap();
    let model = model_with(page);
    let model = update(model, Message::EditSelected);
    let mut model = update(model, Message::EditorTogglePreview);
    let screen = draw(&mut model);
    assert!(screen.contains("plain soft words"));
    assert!(!screen.contains("*soft*"), "source hidden in preview mode");
}

#[test]
fn test_image_panel_upload_mode_shows_reading_state() {
    let mut page = Page::new();
    page.append(BlockKind::Image, BlockWidth::Full);
    let model = model_with(page);
    let mut model = update(model, Message::EditSelected);
    if let Some(EditPanel::Image(edit)) = model.edit.as_mut() {
        edit.source = ImageSource::Upload;
        edit.path = "/tmp/photo.png".to_string();
        edit.reading = true;
    }
    let screen = draw(&mut model);
    assert!(screen.contains("Edit Image"));
    assert!(screen.contains("File path"));
    assert!(screen.contains("/tmp/photo.png"));
    assert!(screen.contains("Reading…"));
    assert!(screen.contains("No image selected"));
}

#[test]
fn test_preview_of_empty_page() {
    let mut model = update(model_with(Page::new()), Message::OpenPreview);
    let screen = draw(&mut model);
    assert!(screen.contains("Preview"));
    assert!(screen.contains("Nothing to preview"));
    assert!(screen.contains("Add components to see them here"));
    assert!(!screen.contains("Components"));
}

#[test]
fn test_preview_placeholders_for_empty_blocks() {
    let mut page = Page::new();
    page.append(BlockKind::Text, BlockWidth::Half);
    page.append(BlockKind::Image, BlockWidth::Half);
    let mut model = update(model_with(page), Message::OpenPreview);
    let screen = draw(&mut model);
    assert!(screen.contains("Empty text component"));
    assert!(screen.contains("No image"));
    assert!(!screen.contains("Click to add"));
}

#[test]
fn test_mobile_preview_stacks_blocks() {
    let mut page = Page::new();
    for text in ["left side", "right side"] {
        let id = page.append(BlockKind::Text, BlockWidth::Half);
        page.replace_fields(id, BlockPatch::Text(text.to_string()))
            .unwrap();
    }
    let mut model = update(model_with(page), Message::OpenPreview);
    model = update(model, Message::SetPreviewDevice(PreviewDevice::Mobile));
    assert_eq!(model.screen, Screen::Preview);
    let screen = draw(&mut model);
    let left = screen.lines().position(|l| l.contains("left side")).unwrap();
    let right = screen.lines().position(|l| l.contains("right side")).unwrap();
    assert!(right > left, "mobile preview stacks blocks vertically");
}

#[test]
fn test_help_overlay_lists_config_paths() {
    let mut model = model_with(Page::new());
    model.config_global_path = Some(PathBuf::from("/home/me/.config/pagecraft/config"));
    model = update(model, Message::ToggleHelp);
    let screen = draw(&mut model);
    assert!(screen.contains("Help"));
    assert!(screen.contains("Add text / image block"));
}

#[test]
fn test_toast_is_drawn_after_delete() {
    let mut page = Page::new();
    let id = page.append(BlockKind::Text, BlockWidth::Half);
    let mut model = update(model_with(page), Message::DeleteBlock(id));
    let screen = draw(&mut model);
    assert!(screen.contains("[info] Deleted text_1"));
}

#[test]
fn test_canvas_scrolls_to_selected_row() {
    let mut page = Page::new();
    for i in 0..12 {
        let id = page.append(BlockKind::Text, BlockWidth::Full);
        page.replace_fields(id, BlockPatch::Text(format!("block number {i}")))
            .unwrap();
    }
    let mut model = update(model_with(page), Message::SelectLast);
    let screen = draw(&mut model);
    assert!(model.canvas_viewport.offset() > 0);
    assert!(screen.contains("block number 11"));
    assert!(!screen.contains("block number 0 "));
}

#[test]
fn test_data_uri_image_gets_protocol_and_renders() {
    let mut page = Page::new();
    let id = page.append(BlockKind::Image, BlockWidth::Full);
    let uri = png_data_uri();
    page.replace_fields(
        id,
        BlockPatch::Image {
            url: Some(uri.clone()),
            height: Some(ImageHeight::Small),
        },
    )
    .unwrap();
    let mut model = model_with(page).with_picker(Some(Picker::halfblocks()));
    model.load_page_images();
    assert!(model.image_protocols.contains_key(&uri));

    let screen = draw(&mut model);
    assert!(screen.contains("image_1"));
}

#[test]
fn test_image_protocols_dropped_when_block_removed() {
    let mut page = Page::new();
    let id = page.append(BlockKind::Image, BlockWidth::Full);
    page.replace_fields(
        id,
        BlockPatch::Image {
            url: Some(png_data_uri()),
            height: None,
        },
    )
    .unwrap();
    let mut model = model_with(page).with_picker(Some(Picker::halfblocks()));
    model.load_page_images();
    assert_eq!(model.image_protocols.len(), 1);

    model = update(model, Message::DeleteBlock(id));
    model.load_page_images();
    assert!(model.image_protocols.is_empty());
}

#[test]
fn test_split_build_columns_reserves_panel() {
    let area = ratatui::layout::Rect::new(0, 0, 120, 30);
    let (sidebar, canvas, panel) = split_build_columns(area, true);
    let panel = panel.unwrap();
    assert_eq!(sidebar.width, SIDEBAR_WIDTH);
    assert!(panel.width >= PANEL_MIN_WIDTH);
    assert_eq!(sidebar.width + canvas.width + panel.width, 120);

    let (_, canvas, panel) = split_build_columns(area, false);
    assert!(panel.is_none());
    assert_eq!(canvas.width, 120 - SIDEBAR_WIDTH);
}

#[test]
fn test_centered_popup_rect_is_clamped() {
    let area = ratatui::layout::Rect::new(0, 0, 30, 10);
    let rect = centered_popup_rect(40, 20, area);
    assert_eq!(rect, area);
}
