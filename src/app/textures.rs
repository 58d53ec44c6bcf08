use std::collections::HashMap;

use eframe::egui::{ColorImage, Context, TextureHandle, TextureOptions};

use crate::dataset::Portrait;
use crate::registry::NodeId;

/// GPU-side cache of decoded profile portraits. Uploads happen once, on the
/// first frame after the loader thread hands over its pixel buffers; a node
/// whose portrait failed to decode simply never gets an entry.
#[derive(Default)]
pub(super) struct PortraitTextures {
    uploaded: bool,
    by_node: HashMap<NodeId, TextureHandle>,
}

impl PortraitTextures {
    pub(super) fn ensure_uploaded(
        &mut self,
        ctx: &Context,
        portraits: &HashMap<NodeId, Portrait>,
    ) {
        if self.uploaded {
            return;
        }

        for (node_id, portrait) in portraits {
            let image = ColorImage::from_rgba_unmultiplied(portrait.size, &portrait.rgba);
            let texture =
                ctx.load_texture(format!("portrait-{node_id}"), image, TextureOptions::LINEAR);
            self.by_node.insert(*node_id, texture);
        }

        self.uploaded = true;
    }

    pub(super) fn get(&self, node_id: NodeId) -> Option<&TextureHandle> {
        self.by_node.get(&node_id)
    }
}
