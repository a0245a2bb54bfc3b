//! Dashboard Renderer Module
//! Draws the flow diagram, line chart and bar chart onto one PNG surface.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

use crate::charts::layout::{FlowLayout, FlowLayoutResult, LayoutError, SankeyLayout};
use crate::config::DashboardConfig;
use crate::stats::{FlowGraph, GroupAverage, SurveySummary};

const NODE_FILL: RGBColor = RGBColor(136, 136, 136);
const LINK_FILL: RGBAColor = RGBAColor(0, 0, 0, 0.3);
const LINE_STROKE: RGBColor = RGBColor(70, 130, 180);
const BAR_FILL: RGBColor = RGBColor(247, 127, 0);

const LABEL_GAP: i32 = 6;
const RIBBON_STEPS: usize = 24;

type DrawResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No records to draw")]
    NoData,
    #[error("Flow layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("Drawing failed: {0}")]
    Backend(String),
}

/// Pixel placement of the three panels on the surface.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PanelRects {
    pub sankey: ((u32, u32), (u32, u32)),
    pub line: ((u32, u32), (u32, u32)),
    pub bar: ((u32, u32), (u32, u32)),
}

impl PanelRects {
    pub fn from_config(config: &DashboardConfig) -> Self {
        let sankey_w = (config.width as f64 * config.sankey.width_frac) as u32;
        let sankey_h = (config.height as f64 * config.sankey.height_frac) as u32;
        let panel = (config.panel_width, config.panel_height);
        let panel_x = config
            .width
            .saturating_sub(config.panel_width + config.panel_gap);
        let line_y = config.panel_top;
        let bar_y = line_y + config.panel_height + config.panel_gap;

        Self {
            sankey: ((config.sankey.left, config.sankey.top), (sankey_w, sankey_h)),
            line: ((panel_x, line_y), panel),
            bar: ((panel_x, bar_y), panel),
        }
    }
}

/// Renders the three-panel dashboard. The flow layout is pluggable;
/// the default is the column-stacked sankey.
pub struct DashboardRenderer {
    config: DashboardConfig,
    flow_layout: Box<dyn FlowLayout>,
}

impl DashboardRenderer {
    pub fn new(config: DashboardConfig) -> Self {
        let flow_layout = Box::new(SankeyLayout::new(
            config.sankey.node_width,
            config.sankey.node_padding,
        ));
        Self {
            config,
            flow_layout,
        }
    }

    pub fn with_flow_layout(config: DashboardConfig, flow_layout: Box<dyn FlowLayout>) -> Self {
        Self {
            config,
            flow_layout,
        }
    }

    /// Draw the whole dashboard and write it as a PNG.
    pub fn render_to_file(&self, summary: &SurveySummary, path: &Path) -> Result<(), ChartError> {
        if summary.is_empty() {
            return Err(ChartError::NoData);
        }

        let rects = PanelRects::from_config(&self.config);
        let (sankey_w, sankey_h) = rects.sankey.1;
        let flow = self
            .flow_layout
            .layout(&summary.support_flow, sankey_w as f64, sankey_h as f64)?;

        let root =
            BitMapBackend::new(path, (self.config.width, self.config.height)).into_drawing_area();
        self.draw_surface(&root, &rects, summary, &flow)
            .map_err(|e| ChartError::Backend(e.to_string()))
    }

    fn draw_surface(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        rects: &PanelRects,
        summary: &SurveySummary,
        flow: &FlowLayoutResult,
    ) -> DrawResult {
        root.fill(&WHITE)?;

        let sankey_area = root.clone().shrink(rects.sankey.0, rects.sankey.1);
        Self::draw_flow(&sankey_area, &summary.support_flow, flow)?;

        let line_area = root.clone().shrink(rects.line.0, rects.line.1);
        self.draw_line_chart(&line_area, &summary.walc_by_age)?;

        let bar_area = root.clone().shrink(rects.bar.0, rects.bar.1);
        self.draw_bar_chart(&bar_area, &summary.walc_by_absences)?;

        root.present()?;
        Ok(())
    }

    /// Grey node boxes, translucent ribbons, labels anchored toward the
    /// panel center so they stay off the surface edge.
    fn draw_flow(
        area: &DrawingArea<BitMapBackend, Shift>,
        graph: &FlowGraph,
        layout: &FlowLayoutResult,
    ) -> DrawResult {
        let (panel_width, _) = area.dim_in_pixel();

        for link in &layout.links {
            let x_start = layout.nodes[link.source].x1;
            let x_end = layout.nodes[link.target].x0;
            let ribbon =
                ribbon_points(x_start, link.y_source, x_end, link.y_target, link.thickness);
            area.draw(&Polygon::new(ribbon, LINK_FILL.filled()))?;
        }

        for node_box in &layout.nodes {
            area.draw(&Rectangle::new(
                [
                    (node_box.x0 as i32, node_box.y0 as i32),
                    (node_box.x1 as i32, node_box.y1 as i32),
                ],
                NODE_FILL.filled(),
            ))?;

            let on_left = node_box.x0 < panel_width as f64 / 2.0;
            let (label_x, anchor) = if on_left {
                (node_box.x1 as i32 + LABEL_GAP, HPos::Left)
            } else {
                (node_box.x0 as i32 - LABEL_GAP, HPos::Right)
            };
            let label_y = ((node_box.y0 + node_box.y1) / 2.0) as i32;
            let style = ("sans-serif", 12)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(anchor, VPos::Center));
            area.draw(&Text::new(
                graph.nodes[node_box.node].clone(),
                (label_x, label_y),
                style,
            ))?;
        }

        Ok(())
    }

    fn draw_line_chart(
        &self,
        area: &DrawingArea<BitMapBackend, Shift>,
        series: &[GroupAverage],
    ) -> DrawResult {
        let x_min = series.first().map(|g| g.key).unwrap_or(0) as f64;
        let mut x_max = series.last().map(|g| g.key).unwrap_or(0) as f64;
        if x_max <= x_min {
            x_max = x_min + 1.0;
        }
        let y_max = nice_ceil(series.iter().map(|g| g.mean).fold(0.0, f64::max), 5);

        let mut chart = ChartBuilder::on(area)
            .margin(4)
            .x_label_area_size(self.config.margins.bottom)
            .y_label_area_size(self.config.margins.left)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(6)
            .y_labels(5)
            .x_desc("Age")
            .y_desc("Avg Weekend Alcohol Use (Walc)")
            .axis_desc_style(("sans-serif", 12))
            .label_style(("sans-serif", 10))
            .draw()?;

        chart.draw_series(LineSeries::new(
            series.iter().map(|g| (g.key as f64, g.mean)),
            ShapeStyle::from(&LINE_STROKE).stroke_width(2),
        ))?;

        Ok(())
    }

    /// One band per distinct key; non-contiguous keys keep their own
    /// band and every other band is labelled.
    fn draw_bar_chart(
        &self,
        area: &DrawingArea<BitMapBackend, Shift>,
        series: &[GroupAverage],
    ) -> DrawResult {
        if series.is_empty() {
            return Ok(());
        }

        let keys: Vec<i64> = series.iter().map(|g| g.key).collect();
        let bands = series.len() as i32;
        let y_max = nice_ceil(series.iter().map(|g| g.mean).fold(0.0, f64::max), 5);

        let mut chart = ChartBuilder::on(area)
            .margin(4)
            .x_label_area_size(self.config.margins.bottom)
            .y_label_area_size(self.config.margins.left)
            .build_cartesian_2d((0..bands).into_segmented(), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bands as usize)
            .y_labels(5)
            .x_desc("Absences")
            .y_desc("Avg Weekend Alcohol Use")
            .axis_desc_style(("sans-serif", 12))
            .label_style(("sans-serif", 10))
            .x_label_formatter(&move |coord| match coord {
                SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                    let index = *i as usize;
                    if index < keys.len() && index % 2 == 0 {
                        keys[index].to_string()
                    } else {
                        String::new()
                    }
                }
                SegmentValue::Last => String::new(),
            })
            .draw()?;

        chart.draw_series(series.iter().enumerate().map(|(i, group)| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), group.mean),
                ],
                BAR_FILL.filled(),
            );
            bar.set_margin(0, 0, 3, 3);
            bar
        }))?;

        Ok(())
    }
}

/// Sample a horizontal ribbon of constant thickness between the two
/// end midpoints, eased so the ends leave the nodes flat.
fn ribbon_points(x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64) -> Vec<(i32, i32)> {
    let half = thickness / 2.0;
    let mut top = Vec::with_capacity(RIBBON_STEPS + 1);
    let mut bottom = Vec::with_capacity(RIBBON_STEPS + 1);

    for step in 0..=RIBBON_STEPS {
        let t = step as f64 / RIBBON_STEPS as f64;
        let ease = t * t * (3.0 - 2.0 * t);
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * ease;
        top.push((x as i32, (y - half) as i32));
        bottom.push((x as i32, (y + half) as i32));
    }

    bottom.reverse();
    top.extend(bottom);
    top
}

/// Round the axis maximum up to a tick-friendly value.
fn nice_ceil(max: f64, target_steps: usize) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let step = nice_step(max, target_steps);
    (max / step).ceil() * step
}

fn nice_step(range: f64, target_steps: usize) -> f64 {
    let raw_step = range / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_land_where_the_config_puts_them() {
        let rects = PanelRects::from_config(&DashboardConfig::default());

        assert_eq!(rects.sankey, ((50, 40), (630, 540)));
        assert_eq!(rects.line, ((1040, 60), (300, 200)));
        assert_eq!(rects.bar, ((1040, 320), (300, 200)));
    }

    #[test]
    fn narrow_surfaces_keep_panels_on_screen() {
        let config = DashboardConfig {
            width: 200,
            ..DashboardConfig::default()
        };
        let rects = PanelRects::from_config(&config);
        assert_eq!(rects.line.0 .0, 0);
    }

    #[test]
    fn nice_ceil_rounds_up_to_tick_multiples() {
        assert_eq!(nice_ceil(3.2, 5), 4.0);
        assert_eq!(nice_ceil(4.6, 5), 5.0);
        assert_eq!(nice_ceil(5.0, 5), 5.0);
        assert_eq!(nice_ceil(47.0, 5), 50.0);
        assert_eq!(nice_ceil(0.0, 5), 1.0);
    }

    #[test]
    fn empty_summary_is_rejected_before_drawing() {
        let renderer = DashboardRenderer::with_flow_layout(
            DashboardConfig::default(),
            Box::new(SankeyLayout::new(10.0, 5.0)),
        );
        let summary = SurveySummary::from_records(&[]);
        let path = std::env::temp_dir().join("surveyflow_never_written.png");

        assert!(matches!(
            renderer.render_to_file(&summary, &path),
            Err(ChartError::NoData)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn ribbons_are_closed_and_thick() {
        let points = ribbon_points(20.0, 10.0, 80.0, 50.0, 8.0);
        assert_eq!(points.len(), 2 * (RIBBON_STEPS + 1));

        // Flat at both ends: first top point sits half a thickness
        // above the source midpoint, last bottom point half below it.
        assert_eq!(points[0], (20, 6));
        assert_eq!(points[points.len() - 1], (20, 14));

        // Far end reaches the target midpoint.
        assert_eq!(points[RIBBON_STEPS], (80, 46));
        assert_eq!(points[RIBBON_STEPS + 1], (80, 54));
    }
}
