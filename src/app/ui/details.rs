use eframe::egui::{self, RichText, Ui};

use crate::registry::NodeId;
use crate::util::format_money;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected else {
            ui.label("Click a node in the diagram or in the node list.");
            return;
        };

        let Some(info) = self.dataset.get(selected_id).cloned() else {
            ui.label("Selected node no longer exists in the dataset.");
            return;
        };

        let mounted = self.is_mounted(selected_id);
        let position = self
            .registry
            .resolve(selected_id)
            .map(|record| record.position);

        ui.horizontal(|ui| {
            if let Some(texture) = self.textures.get(selected_id) {
                ui.image((texture.id(), egui::vec2(56.0, 56.0)));
            } else {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(56.0, 56.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 26.0, info.color);
            }
            ui.vertical(|ui| {
                ui.label(RichText::new(&info.name).strong().size(16.0));
                ui.small(format!("id {}", info.id));
            });
        });

        ui.add_space(6.0);
        ui.label(format!("Value: {}", format_money(info.monetary_value)));
        ui.label(format!("Outgoing connections: {}", info.connections.len()));
        if let Some(position) = position {
            ui.label(format!("Position: ({:.2}, {:.2})", position.x, position.y));
        } else {
            ui.label(RichText::new("Currently unmounted").italics());
        }

        ui.add_space(6.0);
        let toggle_text = if mounted { "Unmount node" } else { "Mount node" };
        let mut pending_mount: Option<bool> = None;
        ui.horizontal(|ui| {
            if ui.button(toggle_text).clicked() {
                pending_mount = Some(!mounted);
            }
            if ui.button("Clear selection").clicked() {
                self.selected = None;
            }
        });

        ui.separator();
        ui.label(RichText::new("Connects to").strong());
        let mut pending_selection: Option<NodeId> = None;
        if info.connections.is_empty() {
            ui.small("No outgoing connections.");
        }
        for target in &info.connections {
            ui.horizontal(|ui| {
                match self.dataset.get(*target) {
                    Some(target_info) => {
                        if ui.link(&target_info.name).clicked() {
                            pending_selection = Some(target_info.id);
                        }
                        if !self.is_mounted(*target) {
                            // unresolved at draw time: the line is simply not shown
                            ui.label(RichText::new("unmounted").weak().italics());
                        }
                    }
                    None => {
                        ui.label(format!("unknown id {target}"));
                    }
                }
            });
        }

        ui.add_space(4.0);
        ui.label(RichText::new("Referenced by").strong());
        let referrers = self
            .dataset
            .nodes
            .iter()
            .filter(|node| node.connections.contains(&selected_id))
            .map(|node| (node.id, node.name.clone()))
            .collect::<Vec<_>>();
        if referrers.is_empty() {
            ui.small("No incoming connections.");
        }
        for (id, name) in referrers {
            if ui.link(name).clicked() {
                pending_selection = Some(id);
            }
        }

        if let Some(mount) = pending_mount {
            self.set_mounted(selected_id, mount);
        }
        if let Some(id) = pending_selection {
            self.apply_graph_selection(Some(id));
        }
    }
}
