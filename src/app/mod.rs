//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{
    EditPanel, ImageEdit, ImageSource, Model, PreviewDevice, Prompt, Screen, TextEdit, ToastLevel,
};
pub use update::{Message, update};

use std::path::PathBuf;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    device: PreviewDevice,
    images_enabled: bool,
    force_half_cell: bool,
    seed_demo: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application with an empty page.
    pub const fn new() -> Self {
        Self {
            device: PreviewDevice::Desktop,
            images_enabled: true,
            force_half_cell: false,
            seed_demo: false,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Open the preview in mobile layout by default.
    pub const fn with_mobile_preview(mut self, mobile: bool) -> Self {
        self.device = if mobile {
            PreviewDevice::Mobile
        } else {
            PreviewDevice::Desktop
        };
        self
    }

    /// Enable or disable inline image rendering.
    pub const fn with_images_enabled(mut self, enabled: bool) -> Self {
        self.images_enabled = enabled;
        self
    }

    /// Skip terminal graphics detection and draw images with half blocks.
    pub const fn with_force_half_cell(mut self, force: bool) -> Self {
        self.force_half_cell = force;
        self
    }

    /// Start from the demo page instead of an empty one.
    pub const fn with_seed_demo(mut self, seed: bool) -> Self {
        self.seed_demo = seed;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
