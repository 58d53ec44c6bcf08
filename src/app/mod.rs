use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::dataset::{Dataset, DatasetBundle, Portrait, load_bundle};
use crate::registry::{NodeHandle, NodeId, NodeRegistry};

mod graph;
mod physics;
mod render_utils;
mod textures;
mod ui;

pub struct ForceLinkApp {
    dataset_path: Option<String>,
    layout_radius: f32,
    state: AppState,
    reload_rx: Option<Receiver<Result<DatasetBundle, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<DatasetBundle, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// One animated dashed connector, derived from the registry. Endpoints are
/// looked up from live positions at draw time; only the dash phase is state.
#[derive(Clone, Debug, PartialEq)]
struct ConnectionLine {
    source: NodeId,
    target: NodeId,
    dash_offset: f32,
}

#[derive(Clone, Copy)]
struct RepulsionParams {
    threshold: f32,
    strength: f32,
}

impl Default for RepulsionParams {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            strength: 0.05,
        }
    }
}

const DEFAULT_DASH_SPEED: f32 = 10.0;

struct ViewModel {
    dataset: Dataset,
    registry: NodeRegistry,
    handles: HashMap<NodeId, NodeHandle>,
    parked_positions: HashMap<NodeId, Vec2>,
    lines: Vec<ConnectionLine>,
    lines_built_for: usize,
    lines_dirty: bool,
    portraits: HashMap<NodeId, Portrait>,
    textures: textures::PortraitTextures,
    pan: Vec2,
    zoom: f32,
    repulsion: RepulsionParams,
    live_repulsion: bool,
    dash_speed: f32,
    animate_dashes: bool,
    show_endpoint_dots: bool,
    layout_radius: f32,
    dragged: Option<NodeId>,
    selected: Option<NodeId>,
    search: String,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl ForceLinkApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset_path: Option<String>,
        layout_radius: f32,
    ) -> Self {
        let state = Self::start_load(dataset_path.clone());
        Self {
            dataset_path,
            layout_radius,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(dataset_path: Option<String>) -> Receiver<Result<DatasetBundle, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result =
                load_bundle(dataset_path.as_deref()).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(dataset_path: Option<String>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset_path),
        }
    }
}

impl eframe::App for ForceLinkApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(bundle) => {
                            AppState::Ready(Box::new(ViewModel::new(bundle, self.layout_radius)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading node-link dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load node-link dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.dataset_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.dataset_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(bundle) => AppState::Ready(Box::new(ViewModel::new(
                                    bundle,
                                    self.layout_radius,
                                ))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Dataset load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
