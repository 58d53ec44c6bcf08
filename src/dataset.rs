use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use eframe::egui::Color32;
use serde::Deserialize;

use crate::registry::NodeId;
use crate::util::parse_hex_color;

const EMBEDDED_DATASET: &str = include_str!("../data/nodes.json");

const DEFAULT_NODE_COLOR: Color32 = Color32::from_rgb(30, 30, 30);

#[derive(Clone, Debug)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub monetary_value: u64,
    pub color: Color32,
    pub profile_image: Option<String>,
    pub connections: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub source: String,
    pub nodes: Vec<NodeInfo>,
}

impl Dataset {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeInfo> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn total_value(&self) -> u64 {
        self.nodes.iter().map(|node| node.monetary_value).sum()
    }

    pub fn ranked_by_value(&self) -> Vec<NodeId> {
        let mut ids = self.nodes.iter().map(|node| node.id).collect::<Vec<_>>();
        ids.sort_by(|a, b| {
            let a_node = self.get(*a).expect("node exists");
            let b_node = self.get(*b).expect("node exists");
            b_node
                .monetary_value
                .cmp(&a_node.monetary_value)
                .then_with(|| a_node.name.cmp(&b_node.name))
        });
        ids
    }
}

/// Decoded RGBA pixels for one profile image, produced on the loader thread
/// and uploaded as an egui texture on the first ready frame.
#[derive(Clone, Debug)]
pub struct Portrait {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

pub struct DatasetBundle {
    pub dataset: Dataset,
    pub portraits: HashMap<NodeId, Portrait>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    nodes: Vec<RawNodeEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawNodeEntry {
    id: NodeId,
    name: String,
    #[serde(rename = "monetaryValue", default)]
    monetary_value: u64,
    #[serde(default)]
    color: Option<String>,
    #[serde(rename = "profileImage", default)]
    profile_image: Option<String>,
    #[serde(default)]
    connections: Vec<NodeId>,
}

pub fn load_bundle(dataset_path: Option<&str>) -> Result<DatasetBundle> {
    let (raw, source, base_dir) = match dataset_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset file {path}"))?;
            let base_dir = Path::new(path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (raw, path.to_string(), base_dir)
        }
        None => (
            EMBEDDED_DATASET.to_string(),
            "built-in sample".to_string(),
            PathBuf::from("."),
        ),
    };

    let dataset = parse_dataset(&raw, &source)?;
    let portraits = decode_portraits(&dataset, &base_dir);

    log::info!(
        "loaded dataset {source}: {} nodes, {} connection entries, {} portraits",
        dataset.node_count(),
        dataset
            .nodes
            .iter()
            .map(|node| node.connections.len())
            .sum::<usize>(),
        portraits.len(),
    );

    Ok(DatasetBundle { dataset, portraits })
}

fn parse_dataset(raw: &str, source: &str) -> Result<Dataset> {
    let parsed: RawDataset = serde_json::from_str(raw)
        .with_context(|| format!("invalid dataset JSON in {source}"))?;

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(parsed.nodes.len());

    for entry in parsed.nodes {
        if !seen.insert(entry.id) {
            return Err(anyhow!("duplicate node id {} in {source}", entry.id));
        }

        let color = match &entry.color {
            Some(value) => parse_hex_color(value)
                .ok_or_else(|| anyhow!("invalid color {value:?} for node {}", entry.id))?,
            None => DEFAULT_NODE_COLOR,
        };

        let mut connections = entry
            .connections
            .into_iter()
            .filter(|target| *target != entry.id)
            .collect::<Vec<_>>();
        let mut kept = HashSet::new();
        connections.retain(|target| kept.insert(*target));

        nodes.push(NodeInfo {
            id: entry.id,
            name: entry.name,
            monetary_value: entry.monetary_value,
            color,
            profile_image: entry.profile_image,
            connections,
        });
    }

    let known_ids = nodes.iter().map(|node| node.id).collect::<HashSet<_>>();
    for node in &nodes {
        for target in &node.connections {
            if !known_ids.contains(target) {
                // kept for lazy resolution; the line is simply never drawn
                log::warn!(
                    "node {} ({}) references unknown node id {target}",
                    node.id,
                    node.name
                );
            }
        }
    }

    Ok(Dataset {
        source: source.to_string(),
        nodes,
    })
}

fn decode_portraits(dataset: &Dataset, base_dir: &Path) -> HashMap<NodeId, Portrait> {
    let mut portraits = HashMap::new();

    for node in &dataset.nodes {
        let Some(relative) = &node.profile_image else {
            continue;
        };

        let path = base_dir.join(relative);
        match decode_portrait(&path) {
            Ok(portrait) => {
                portraits.insert(node.id, portrait);
            }
            Err(error) => {
                log::warn!(
                    "portrait for node {} ({}) unavailable: {error:#}",
                    node.id,
                    node.name
                );
            }
        }
    }

    portraits
}

const PORTRAIT_MAX_EDGE: u32 = 128;

fn decode_portrait(path: &Path) -> Result<Portrait> {
    let decoded = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?
        .thumbnail(PORTRAIT_MAX_EDGE, PORTRAIT_MAX_EDGE)
        .to_rgba8();

    let (width, height) = decoded.dimensions();
    let mut rgba = decoded.into_raw();
    mask_to_disc(&mut rgba, width as usize, height as usize);

    Ok(Portrait {
        size: [width as usize, height as usize],
        rgba,
    })
}

// Zero the alpha outside the inscribed circle so the texture reads as a
// circular avatar without any per-frame clipping.
fn mask_to_disc(rgba: &mut [u8], width: usize, height: usize) {
    let center_x = (width as f32 - 1.0) * 0.5;
    let center_y = (height as f32 - 1.0) * 0.5;
    let radius = width.min(height) as f32 * 0.5;
    let radius_sq = radius * radius;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            if dx * dx + dy * dy > radius_sq {
                rgba[(y * width + x) * 4 + 3] = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_sample_parses() {
        let dataset = parse_dataset(EMBEDDED_DATASET, "embedded").expect("sample parses");
        assert_eq!(dataset.node_count(), 5);
        assert_eq!(dataset.total_value(), 1800);

        let alice = dataset.get(1).expect("id 1 present");
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.monetary_value, 500);
        assert_eq!(alice.color, Color32::from_rgb(0x20, 0x40, 0x90));
        assert_eq!(alice.connections, vec![2, 3, 5]);

        let charlie = dataset.get(3).expect("id 3 present");
        assert!(charlie.connections.is_empty());
    }

    #[test]
    fn ranking_sorts_by_value_descending() {
        let dataset = parse_dataset(EMBEDDED_DATASET, "embedded").expect("sample parses");
        assert_eq!(dataset.ranked_by_value(), vec![1, 4, 5, 2, 3]);
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let raw = r#"{"nodes": [
            {"id": 1, "name": "A", "connections": []},
            {"id": 1, "name": "B", "connections": []}
        ]}"#;
        let error = parse_dataset(raw, "test").expect_err("duplicate id");
        assert!(error.to_string().contains("duplicate node id 1"));
    }

    #[test]
    fn self_and_duplicate_connections_are_dropped() {
        let raw = r#"{"nodes": [
            {"id": 1, "name": "A", "connections": [1, 2, 2, 3]},
            {"id": 2, "name": "B", "connections": []},
            {"id": 3, "name": "C", "connections": []}
        ]}"#;
        let dataset = parse_dataset(raw, "test").expect("parses");
        assert_eq!(dataset.get(1).expect("present").connections, vec![2, 3]);
    }

    #[test]
    fn unknown_connection_ids_are_kept_for_lazy_resolution() {
        let raw = r#"{"nodes": [
            {"id": 1, "name": "A", "connections": [9]}
        ]}"#;
        let dataset = parse_dataset(raw, "test").expect("parses");
        assert_eq!(dataset.get(1).expect("present").connections, vec![9]);
    }

    #[test]
    fn invalid_colors_are_rejected() {
        let raw = r#"{"nodes": [
            {"id": 1, "name": "A", "color": "red", "connections": []}
        ]}"#;
        let error = parse_dataset(raw, "test").expect_err("bad color");
        assert!(error.to_string().contains("invalid color"));
    }

    #[test]
    fn missing_color_falls_back_to_default() {
        let raw = r#"{"nodes": [{"id": 1, "name": "A", "connections": []}]}"#;
        let dataset = parse_dataset(raw, "test").expect("parses");
        assert_eq!(dataset.get(1).expect("present").color, DEFAULT_NODE_COLOR);
    }
}
