use std::collections::HashSet;

use eframe::egui::epaint::QuadraticBezierShape;
use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::registry::NodeId;
use crate::util::{format_money, initial_letter};

use super::super::ViewModel;
use super::super::physics::repulsion_pass;
use super::super::render_utils::{
    blend_color, circle_visible, curve_control_point, dim_color, draw_background, world_to_screen,
};
use super::{INNER_RADIUS, NODE_RADIUS};

const HOVER_COLOR: Color32 = Color32::from_rgb(255, 16, 80);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const SEARCH_MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

const DASH_LENGTH: f32 = 10.0;
const GAP_LENGTH: f32 = 6.0;
const CURVE_BULGE: f32 = 0.12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn search_matches(&self) -> Option<HashSet<NodeId>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        Some(
            self.dataset
                .nodes
                .iter()
                .filter_map(|node| {
                    fuzzy_match_score(&matcher, &node.name, query).map(|_score| node.id)
                })
                .collect(),
        )
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        self.sync_lines();

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let elapsed_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);

        // per-frame tick: repulsion first, then the drag handler so an
        // active drag wins the frame for its node
        if self.live_repulsion {
            repulsion_pass(&mut self.registry, self.dragged, self.repulsion);
        }
        self.handle_node_drag(ui, rect, &response);
        if self.animate_dashes {
            self.advance_dashes(elapsed_seconds);
        }
        if self.live_repulsion || self.animate_dashes || self.dragged.is_some() {
            ui.ctx().request_repaint();
        }

        let pan = self.pan;
        let zoom = self.zoom;

        let dash_stroke = Stroke::new(1.6, Color32::from_rgba_unmultiplied(255, 255, 255, 230));
        let underlay_stroke = Stroke::new(3.4, Color32::from_rgba_unmultiplied(255, 255, 255, 26));
        let dash_period = DASH_LENGTH + GAP_LENGTH;
        let dot_radius = (0.05 * zoom).clamp(1.5, 8.0);

        for line in &self.lines {
            let Some((start_world, end_world)) = self.line_endpoints(line) else {
                continue;
            };

            let start = world_to_screen(rect, pan, zoom, start_world);
            let end = world_to_screen(rect, pan, zoom, end_world);
            if (end - start).length_sq() <= 1.0 {
                continue;
            }

            let control = curve_control_point(start, end, CURVE_BULGE);
            let curve = QuadraticBezierShape::from_points_stroke(
                [start, control, end],
                false,
                Color32::TRANSPARENT,
                underlay_stroke,
            );
            let points = curve.flatten(Some(0.3));

            painter.add(Shape::line(points.clone(), underlay_stroke));

            // the stored offset only ever decreases; normalize the phase so
            // the painter sees a small non-negative value
            let phase = line.dash_offset.rem_euclid(dash_period);
            painter.extend(Shape::dashed_line_with_offset(
                &points,
                dash_stroke,
                &[DASH_LENGTH],
                &[GAP_LENGTH],
                phase,
            ));

            if self.show_endpoint_dots {
                painter.circle_filled(start, dot_radius, Color32::WHITE);
                painter.circle_filled(end, dot_radius, Color32::WHITE);
            }
        }

        let hovered = self.hovered_node(ui, rect);
        if hovered.is_some() && self.dragged.is_none() {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::Grab);
        }

        let matches = self.search_matches();
        let search_active = matches.as_ref().is_some_and(|matches| !matches.is_empty());

        let node_radius = self.node_screen_radius();
        let inner_radius = node_radius * (INNER_RADIUS / NODE_RADIUS);
        let label_font = FontId::proportional((0.2 * zoom).clamp(9.0, 22.0));

        for record in self.registry.snapshot() {
            let center = world_to_screen(rect, pan, zoom, record.position);
            if !circle_visible(rect, center, node_radius + 40.0) {
                continue;
            }

            let Some(info) = self.dataset.get(record.id) else {
                continue;
            };

            let is_hovered = hovered == Some(record.id);
            let is_selected = self.selected == Some(record.id);
            let is_match = matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&record.id));

            let fill = if is_hovered {
                HOVER_COLOR
            } else if is_match {
                blend_color(info.color, SEARCH_MATCH_COLOR, 0.55)
            } else if search_active {
                dim_color(info.color, 0.38)
            } else {
                info.color
            };

            painter.circle_filled(center, node_radius, fill);
            if is_selected {
                painter.circle_stroke(center, node_radius + 3.0, Stroke::new(2.0, SELECTED_COLOR));
            }

            if let Some(texture) = self.textures.get(record.id) {
                let image_rect =
                    Rect::from_center_size(center, vec2(inner_radius * 2.0, inner_radius * 2.0));
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture.id(), image_rect, uv, Color32::WHITE);
            } else {
                painter.circle_filled(center, inner_radius, Color32::from_rgb(38, 40, 48));
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    initial_letter(&info.name),
                    FontId::proportional((inner_radius * 1.1).clamp(10.0, 42.0)),
                    Color32::from_gray(222),
                );
            }

            painter.text(
                center + vec2(0.0, node_radius + (0.15 * zoom).clamp(4.0, 18.0)),
                Align2::CENTER_TOP,
                &info.name,
                label_font.clone(),
                Color32::from_gray(235),
            );
        }

        if let Some(id) = hovered
            && let Some(info) = self.dataset.get(id)
            && let Some(record) = self.registry.resolve(id)
        {
            let center = world_to_screen(rect, pan, zoom, record.position);
            let rows = [
                info.name.clone(),
                format!("Value: {}", format_money(info.monetary_value)),
                format!("Connections: {}", record.connected_to.len()),
            ];

            let longest = rows.iter().map(|row| row.len()).max().unwrap_or(0);
            let box_size = vec2(longest as f32 * 7.4 + 18.0, 62.0);
            let anchor = center + vec2(node_radius + 12.0, -node_radius);
            let info_rect = Rect::from_min_size(anchor, box_size);

            painter.rect_filled(info_rect, 5.0, Color32::from_rgba_unmultiplied(51, 51, 51, 238));
            for (index, row) in rows.iter().enumerate() {
                painter.text(
                    info_rect.left_top() + vec2(9.0, 8.0 + index as f32 * 17.0),
                    Align2::LEFT_TOP,
                    row,
                    FontId::proportional(12.0),
                    Color32::from_gray(245),
                );
            }
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            self.apply_graph_selection(hovered);
        }
    }
}
