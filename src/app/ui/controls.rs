use eframe::egui::{self, RichText, ScrollArea, Slider, Ui};

use crate::registry::NodeId;
use crate::util::format_money;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ScrollArea::vertical().show(ui, |ui| {
            self.draw_simulation_controls(ui);
            ui.separator();
            self.draw_connection_controls(ui);
            ui.separator();
            self.draw_layout_controls(ui);
            ui.separator();
            self.draw_search_controls(ui);
            ui.separator();
            self.draw_node_list(ui);
            ui.separator();
            self.draw_value_ranking(ui);
            ui.separator();
            ui.checkbox(&mut self.show_fps_bar, "Show FPS in top bar");
        });
    }

    fn draw_simulation_controls(&mut self, ui: &mut Ui) {
        ui.heading("Repulsion");
        ui.add_space(4.0);

        ui.checkbox(&mut self.live_repulsion, "Live repulsion");
        ui.add(
            Slider::new(&mut self.repulsion.threshold, 0.0..=3.0)
                .text("threshold")
                .step_by(0.05),
        );
        ui.add(
            Slider::new(&mut self.repulsion.strength, 0.0..=0.5)
                .text("strength")
                .step_by(0.005),
        );
        ui.small("Nodes closer than the threshold push each other apart.");
    }

    fn draw_connection_controls(&mut self, ui: &mut Ui) {
        ui.heading("Connections");
        ui.add_space(4.0);

        ui.checkbox(&mut self.animate_dashes, "Animate dashes");
        ui.add(
            Slider::new(&mut self.dash_speed, 0.0..=60.0)
                .text("dash speed")
                .step_by(1.0),
        );
        ui.checkbox(&mut self.show_endpoint_dots, "Endpoint dots");
    }

    fn draw_layout_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        ui.add_space(4.0);

        ui.add(
            Slider::new(&mut self.layout_radius, 0.5..=8.0)
                .text("ring radius")
                .step_by(0.1),
        );
        ui.horizontal(|ui| {
            if ui.button("Re-seed layout").clicked() {
                self.reseed_layout();
            }
            if ui.button("Reset view").clicked() {
                self.pan = egui::Vec2::ZERO;
                self.zoom = 80.0;
            }
        });
    }

    fn draw_search_controls(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        ui.add_space(4.0);

        ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("filter nodes by name")
                .desired_width(f32::INFINITY),
        );

        if let Some(matches) = self.search_matches() {
            ui.small(format!("{} match(es)", matches.len()));
        }
    }

    fn draw_node_list(&mut self, ui: &mut Ui) {
        ui.heading("Nodes");
        ui.add_space(4.0);
        ui.small("Unchecking unmounts a node; its connections vanish with it.");

        let mut pending_mount: Vec<(NodeId, bool)> = Vec::new();
        let mut pending_selection: Option<NodeId> = None;

        for info in &self.dataset.nodes {
            ui.horizontal(|ui| {
                let mut mounted = self.is_mounted(info.id);
                if ui.checkbox(&mut mounted, "").changed() {
                    pending_mount.push((info.id, mounted));
                }

                let (dot_rect, _) =
                    ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(dot_rect.center(), 4.0, info.color);

                let label = format!("{} ({})", info.name, format_money(info.monetary_value));
                let selected = self.selected == Some(info.id);
                if ui.selectable_label(selected, label).clicked() {
                    pending_selection = Some(info.id);
                }
            });
        }

        for (id, mounted) in pending_mount {
            self.set_mounted(id, mounted);
        }
        if let Some(id) = pending_selection {
            self.apply_graph_selection(Some(id));
        }
    }

    fn draw_value_ranking(&mut self, ui: &mut Ui) {
        ui.heading("Ranked by value");
        ui.add_space(4.0);

        let ranked = self.dataset.ranked_by_value();
        let mut pending_selection: Option<NodeId> = None;

        for (rank, id) in ranked.iter().enumerate() {
            let Some(info) = self.dataset.get(*id) else {
                continue;
            };

            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("#{}", rank + 1)).weak());
                if ui.link(&info.name).clicked() {
                    pending_selection = Some(info.id);
                }
                ui.label(format_money(info.monetary_value));
                if !self.is_mounted(info.id) {
                    ui.label(RichText::new("unmounted").weak().italics());
                }
            });
        }

        if let Some(id) = pending_selection {
            self.apply_graph_selection(Some(id));
        }
    }
}
