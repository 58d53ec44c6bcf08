use eframe::egui::{self, CursorIcon, Pos2, Rect, Ui};

use crate::registry::NodeId;

use super::NODE_RADIUS;
use super::super::ViewModel;
use super::super::render_utils::{screen_to_world, world_to_screen};

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(10.0, 400.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(in crate::app) fn node_at(&self, rect: Rect, pointer: Pos2) -> Option<(NodeId, f32)> {
        let radius = self.node_screen_radius();
        self.registry
            .snapshot()
            .iter()
            .filter_map(|record| {
                let center = world_to_screen(rect, self.pan, self.zoom, record.position);
                let distance = center.distance(pointer);
                (distance <= radius).then_some((record.id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    pub(in crate::app) fn hovered_node(&self, ui: &Ui, rect: Rect) -> Option<NodeId> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }
        self.node_at(rect, pointer).map(|(id, _distance)| id)
    }

    // While the drag is active the pointer position, projected back into
    // world space, overwrites the node's position outright; repulsion gets
    // the node back the frame after release.
    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.dragged = self.node_at(rect, pointer).map(|(id, _distance)| id);
        }

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(id) = self.dragged
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let world = screen_to_world(rect, self.pan, self.zoom, pointer);
            if let Some(position) = self.registry.position_mut(id) {
                *position = world;
            }
            ui.output_mut(|output| output.cursor_icon = CursorIcon::Grabbing);
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.dragged = None;
        }
    }

    pub(in crate::app) fn node_screen_radius(&self) -> f32 {
        (NODE_RADIUS * self.zoom).clamp(4.0, 120.0)
    }

    pub(in crate::app) fn apply_graph_selection(&mut self, selected: Option<NodeId>) {
        self.selected = selected;
    }
}
