use std::collections::{HashMap, VecDeque};

use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::dataset::DatasetBundle;
use crate::layout::circular_layout;
use crate::registry::{NodeId, NodeRecord, NodeRegistry};
use crate::util::format_money;

use super::super::{DEFAULT_DASH_SPEED, RepulsionParams, ViewModel, textures::PortraitTextures};

impl ViewModel {
    pub(in crate::app) fn new(bundle: DatasetBundle, layout_radius: f32) -> Self {
        let DatasetBundle { dataset, portraits } = bundle;

        let mut model = Self {
            dataset,
            registry: NodeRegistry::new(),
            handles: HashMap::new(),
            parked_positions: HashMap::new(),
            lines: Vec::new(),
            lines_built_for: 0,
            lines_dirty: true,
            portraits,
            textures: PortraitTextures::default(),
            pan: Vec2::ZERO,
            zoom: 80.0,
            repulsion: RepulsionParams::default(),
            live_repulsion: true,
            dash_speed: DEFAULT_DASH_SPEED,
            animate_dashes: true,
            show_endpoint_dots: true,
            layout_radius,
            dragged: None,
            selected: None,
            search: String::new(),
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        };
        model.mount_all();
        model
    }

    // Seed the registry from the dataset: circular placement, one record per
    // entry, connections kept as ids and resolved lazily from then on.
    fn mount_all(&mut self) {
        self.registry.clear();
        self.handles.clear();
        self.parked_positions.clear();

        let positions = circular_layout(self.dataset.node_count(), self.layout_radius);
        for (info, position) in self.dataset.nodes.iter().zip(positions) {
            let handle = self.registry.register(NodeRecord {
                id: info.id,
                position,
                connected_to: info.connections.clone(),
            });
            self.handles.insert(info.id, handle);
        }

        self.lines_dirty = true;
    }

    pub(in crate::app) fn reseed_layout(&mut self) {
        let positions = circular_layout(self.registry.len(), self.layout_radius);
        for (record, position) in self.registry.records_mut().iter_mut().zip(positions) {
            record.position = position;
        }
    }

    pub(in crate::app) fn is_mounted(&self, id: NodeId) -> bool {
        self.registry.contains(id)
    }

    pub(in crate::app) fn set_mounted(&mut self, id: NodeId, mounted: bool) {
        if mounted == self.is_mounted(id) {
            return;
        }

        if mounted {
            let Some(info) = self.dataset.get(id) else {
                return;
            };

            let position = self
                .parked_positions
                .remove(&id)
                .or_else(|| circular_layout(1, self.layout_radius).first().copied())
                .unwrap_or(Vec2::ZERO);
            let handle = self.registry.register(NodeRecord {
                id,
                position,
                connected_to: info.connections.clone(),
            });
            self.handles.insert(id, handle);
        } else {
            if let Some(handle) = self.handles.remove(&id)
                && let Some(record) = self.registry.unregister(handle)
            {
                self.parked_positions.insert(id, record.position);
            }
            if self.dragged == Some(id) {
                self.dragged = None;
            }
        }

        self.lines_dirty = true;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);
        self.textures.ensure_uploaded(ctx, &self.portraits);
        self.sync_lines();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("forcelink");
                    ui.separator();
                    ui.label(format!("dataset: {}", self.dataset.source));
                    ui.label(format!(
                        "nodes: {} / {}",
                        self.registry.len(),
                        self.dataset.node_count()
                    ));
                    ui.label(format!("lines: {}", self.lines.len()));
                    ui.label(format!(
                        "total value: {}",
                        format_money(self.dataset.total_value())
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Re-seed layout").clicked() {
                        self.reseed_layout();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading node-link dataset...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
