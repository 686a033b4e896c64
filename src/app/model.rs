use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::editor::FormatEngine;
use crate::image::ImageCache;
use crate::page::{Block, BlockId, BlockKind, BlockWidth, ImageHeight, Page};
use crate::ui::viewport::Viewport;

/// Decoded images kept around for protocol rebuilds.
const IMAGE_CACHE_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Top-level screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Build,
    Preview,
}

/// Device frame used by the preview screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewDevice {
    #[default]
    Desktop,
    Mobile,
}

impl PreviewDevice {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Mobile => "Mobile",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Desktop => Self::Mobile,
            Self::Mobile => Self::Desktop,
        }
    }
}

/// A modal prompt drawn over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Width choice for a block that does not exist yet.
    Width { kind: BlockKind, choice: BlockWidth },
    /// Height choice for an image reference that has not been saved yet.
    Height {
        block: BlockId,
        url: String,
        choice: ImageHeight,
    },
    /// URL entry for link insertion in the text editor.
    Link { input: String },
}

/// Where the image edit panel takes its reference from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSource {
    #[default]
    Url,
    Upload,
}

impl ImageSource {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Url => Self::Upload,
            Self::Upload => Self::Url,
        }
    }
}

/// Open text edit session.
#[derive(Debug)]
pub struct TextEdit {
    pub block: BlockId,
    pub engine: FormatEngine,
    /// Show the rendered markdown instead of the source
    pub preview: bool,
    /// First visible source line
    pub scroll: usize,
}

/// Open image edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEdit {
    pub block: BlockId,
    pub source: ImageSource,
    /// Pending reference: a URL or a `data:` URI from an upload
    pub value: String,
    /// Local path typed in upload mode
    pub path: String,
    /// A file read for this panel is in flight
    pub reading: bool,
}

/// The side panel used to edit one block.
#[derive(Debug)]
pub enum EditPanel {
    Text(TextEdit),
    Image(ImageEdit),
}

impl EditPanel {
    pub const fn block(&self) -> BlockId {
        match self {
            Self::Text(edit) => edit.block,
            Self::Image(edit) => edit.block,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Text(_) => "Edit Text",
            Self::Image(_) => "Edit Image",
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Blocks being assembled
    pub page: Page,
    pub screen: Screen,
    pub device: PreviewDevice,
    /// Highlighted block on the build canvas
    pub selected: Option<BlockId>,
    pub prompt: Option<Prompt>,
    pub edit: Option<EditPanel>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Scroll offset inside the help overlay
    pub help_scroll_offset: usize,
    /// Scroll state of the build canvas
    pub canvas_viewport: Viewport,
    /// Scroll state of the preview screen
    pub preview_viewport: Viewport,
    /// Terminal size (width, height)
    pub terminal_size: (u16, u16),
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    toast: Option<Toast>,
    /// Image protocols for rendering (keyed by image reference)
    pub image_protocols: HashMap<String, StatefulProtocol>,
    image_cache: ImageCache,
    /// Image picker for terminal rendering
    pub picker: Option<Picker>,
    /// Whether inline images are enabled
    pub images_enabled: bool,
    /// True when a resize is pending and image work should be paused
    resize_pending: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("blocks", &self.page.len())
            .field("screen", &self.screen)
            .field("device", &self.device)
            .field("selected", &self.selected)
            .field("prompt", &self.prompt)
            .field("editing", &self.edit.as_ref().map(EditPanel::block))
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model for `page`.
    pub fn new(page: Page, terminal_size: (u16, u16)) -> Self {
        let selected = page.blocks().first().map(Block::id);
        Self {
            page,
            selected,
            canvas_viewport: Viewport::new(
                terminal_size.0,
                terminal_size.1.saturating_sub(3),
                0,
            ),
            preview_viewport: Viewport::new(
                terminal_size.0,
                terminal_size.1.saturating_sub(2),
                0,
            ),
            terminal_size,
            ..Self::default()
        }
    }

    pub fn with_picker(mut self, picker: Option<Picker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.and_then(|id| self.page.get(id))
    }

    pub const fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn editing_block(&self) -> Option<BlockId> {
        self.edit.as_ref().map(EditPanel::block)
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        match &self.edit {
            Some(EditPanel::Text(edit)) => Some(edit),
            _ => None,
        }
    }

    pub(super) fn text_edit_mut(&mut self) -> Option<&mut TextEdit> {
        match &mut self.edit {
            Some(EditPanel::Text(edit)) => Some(edit),
            _ => None,
        }
    }

    pub fn image_edit(&self) -> Option<&ImageEdit> {
        match &self.edit {
            Some(EditPanel::Image(edit)) => Some(edit),
            _ => None,
        }
    }

    pub(super) fn image_edit_mut(&mut self) -> Option<&mut ImageEdit> {
        match &mut self.edit {
            Some(EditPanel::Image(edit)) => Some(edit),
            _ => None,
        }
    }

    /// Build protocols for every displayable image on the page.
    ///
    /// Only `data:` references decode; protocols for references that left
    /// the page are dropped.
    pub fn load_page_images(&mut self) {
        if self.resize_pending {
            crate::perf::log_event("image.load.skip", "resize_pending=true");
            return;
        }
        if !self.images_enabled {
            return;
        }
        let Some(picker) = &self.picker else { return };

        let references: HashSet<String> = self
            .page
            .blocks()
            .iter()
            .filter_map(Block::image_url)
            .filter(|url| url.starts_with("data:"))
            .map(ToOwned::to_owned)
            .collect();
        self.image_protocols
            .retain(|reference, _| references.contains(reference));

        for reference in references {
            if self.image_protocols.contains_key(&reference) {
                continue;
            }
            let Some(image) = self.image_cache.get_or_decode(&reference) else {
                continue;
            };
            crate::perf::log_event(
                "image.protocol.create",
                format!("size={}x{}", image.width(), image.height()),
            );
            let protocol = picker.new_resize_protocol(image);
            self.image_protocols.insert(reference, protocol);
        }
    }

    pub(super) const fn set_resize_pending(&mut self, pending: bool) {
        self.resize_pending = pending;
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            page: Page::new(),
            screen: Screen::Build,
            device: PreviewDevice::Desktop,
            selected: None,
            prompt: None,
            edit: None,
            help_visible: false,
            help_scroll_offset: 0,
            canvas_viewport: Viewport::new(80, 21, 0),
            preview_viewport: Viewport::new(80, 22, 0),
            terminal_size: (80, 24),
            config_global_path: None,
            config_local_path: None,
            toast: None,
            image_protocols: HashMap::new(),
            image_cache: ImageCache::new(IMAGE_CACHE_SIZE),
            picker: None,
            images_enabled: true,
            resize_pending: false,
            should_quit: false,
        }
    }
}
