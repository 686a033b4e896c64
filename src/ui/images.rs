use ratatui::prelude::*;
use ratatui_image::protocol::StatefulProtocolType;
use ratatui_image::{Resize, StatefulImage};

use crate::app::Model;

/// An image reference and the screen area it should fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    pub reference: String,
    pub area: Rect,
}

/// True when an inline protocol is ready for `reference`.
pub fn has_protocol(model: &Model, reference: &str) -> bool {
    model.images_enabled && model.image_protocols.contains_key(reference)
}

/// Draw every slot whose protocol is loaded. Slots without one keep the
/// placeholder drawn under them.
pub fn render_images(model: &mut Model, frame: &mut Frame, slots: &[ImageSlot]) {
    if !model.images_enabled || model.image_protocols.is_empty() {
        return;
    }
    crate::perf::log_event(
        "render.images",
        format!(
            "slots={} protocols={}",
            slots.len(),
            model.image_protocols.len()
        ),
    );

    for slot in slots {
        if slot.area.width == 0 || slot.area.height == 0 {
            continue;
        }
        let Some(protocol) = model.image_protocols.get_mut(&slot.reference) else {
            continue;
        };
        let resize = if matches!(
            protocol.protocol_type(),
            StatefulProtocolType::Halfblocks(_)
        ) {
            Resize::Scale(Some(image::imageops::FilterType::CatmullRom))
        } else {
            Resize::Scale(None)
        };
        frame.render_stateful_widget(StatefulImage::default().resize(resize), slot.area, protocol);
    }
}
