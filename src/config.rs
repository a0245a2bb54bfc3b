//! Dashboard Configuration Module
//! Layout dimensions as explicit, file-loadable parameters.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Axis label areas around the mini charts, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10,
            right: 30,
            bottom: 40,
            left: 60,
        }
    }
}

/// Flow diagram panel placement and node geometry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SankeyPanel {
    /// Fraction of the surface given to the flow diagram.
    pub width_frac: f64,
    pub height_frac: f64,
    pub left: u32,
    pub top: u32,
    pub node_width: f64,
    pub node_padding: f64,
}

impl Default for SankeyPanel {
    fn default() -> Self {
        Self {
            width_frac: 0.45,
            height_frac: 0.6,
            left: 50,
            top: 40,
            node_width: 20.0,
            node_padding: 15.0,
        }
    }
}

/// Full surface layout. Every dimension the renderer uses is carried
/// here so callers can override any of it from a file or flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
    pub sankey: SankeyPanel,
    /// Size of each mini chart (line and bar).
    pub panel_width: u32,
    pub panel_height: u32,
    /// Gap between the mini charts and the surface edge / each other.
    pub panel_gap: u32,
    pub panel_top: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 900,
            margins: Margins::default(),
            sankey: SankeyPanel::default(),
            panel_width: 300,
            panel_height: 200,
            panel_gap: 60,
            panel_top: 60,
        }
    }
}

impl DashboardConfig {
    /// Load settings from a JSON file; absent fields keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }
}
