//! Flow Layout Module
//! Positions flow-graph nodes and links inside a drawing extent.

use thiserror::Error;

use crate::stats::FlowGraph;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Cannot lay out an empty flow graph")]
    EmptyGraph,
}

/// Positioned node box, in extent-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub node: usize,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Positioned ribbon: the vertical center of the link at each end plus
/// its thickness. Horizontal ends coincide with the node boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRibbon {
    pub source: usize,
    pub target: usize,
    pub y_source: f64,
    pub y_target: f64,
    pub thickness: f64,
}

/// Layout output. `nodes` is indexed by graph node index; `links`
/// follows the graph edge order.
#[derive(Debug, Clone, Default)]
pub struct FlowLayoutResult {
    pub nodes: Vec<NodeBox>,
    pub links: Vec<LinkRibbon>,
}

/// Turns nodes + weighted edges into positioned boxes and ribbons.
/// Implementations are interchangeable as far as the renderer cares.
pub trait FlowLayout {
    fn layout(
        &self,
        graph: &FlowGraph,
        width: f64,
        height: f64,
    ) -> Result<FlowLayoutResult, LayoutError>;
}

/// Column-stacked sankey layout: columns by longest path from the
/// sources, childless nodes justified to the last column, node heights
/// proportional to throughput, links stacked in edge order at both ends.
#[derive(Debug, Clone)]
pub struct SankeyLayout {
    pub node_width: f64,
    pub node_padding: f64,
}

impl SankeyLayout {
    pub fn new(node_width: f64, node_padding: f64) -> Self {
        Self {
            node_width,
            node_padding,
        }
    }
}

impl FlowLayout for SankeyLayout {
    fn layout(
        &self,
        graph: &FlowGraph,
        width: f64,
        height: f64,
    ) -> Result<FlowLayoutResult, LayoutError> {
        let n = graph.nodes.len();
        if n == 0 {
            return Err(LayoutError::EmptyGraph);
        }

        // Throughput per node: the larger of inbound and outbound flow.
        let mut inflow = vec![0u64; n];
        let mut outflow = vec![0u64; n];
        for edge in &graph.edges {
            outflow[edge.source] += edge.value;
            inflow[edge.target] += edge.value;
        }
        let value: Vec<f64> = inflow
            .iter()
            .zip(&outflow)
            .map(|(&i, &o)| i.max(o) as f64)
            .collect();

        // Column assignment by longest path from the sources; nodes
        // with no outgoing links sit in the last column.
        let mut depth = vec![0usize; n];
        for _ in 0..n {
            for edge in &graph.edges {
                if depth[edge.target] < depth[edge.source] + 1 {
                    depth[edge.target] = depth[edge.source] + 1;
                }
            }
        }
        let max_depth = depth.iter().copied().max().unwrap_or(0);
        for (i, d) in depth.iter_mut().enumerate() {
            if outflow[i] == 0 {
                *d = max_depth;
            }
        }

        let mut columns: Vec<Vec<usize>> = vec![Vec::new(); max_depth + 1];
        for i in 0..n {
            columns[depth[i]].push(i);
        }

        // The tightest column decides the pixels-per-unit-flow scale.
        let mut ky = f64::INFINITY;
        for column in &columns {
            if column.is_empty() {
                continue;
            }
            let total: f64 = column.iter().map(|&i| value[i]).sum();
            if total <= 0.0 {
                continue;
            }
            let available = height - (column.len() - 1) as f64 * self.node_padding;
            ky = ky.min(available / total);
        }
        if !ky.is_finite() || ky < 0.0 {
            ky = 0.0;
        }

        // Stack nodes top-down within each column.
        let mut tops = vec![0.0f64; n];
        let mut heights = vec![0.0f64; n];
        for column in &columns {
            let mut cursor = 0.0;
            for &i in column {
                tops[i] = cursor;
                heights[i] = value[i] * ky;
                cursor += heights[i] + self.node_padding;
            }
        }

        let span = max_depth.max(1) as f64;
        let nodes = (0..n)
            .map(|i| {
                let x0 = depth[i] as f64 * (width - self.node_width) / span;
                NodeBox {
                    node: i,
                    x0,
                    y0: tops[i],
                    x1: x0 + self.node_width,
                    y1: tops[i] + heights[i],
                }
            })
            .collect();

        // Links occupy consecutive slots at both of their endpoints.
        let mut out_cursor = vec![0.0f64; n];
        let mut in_cursor = vec![0.0f64; n];
        let links = graph
            .edges
            .iter()
            .map(|edge| {
                let thickness = edge.value as f64 * ky;
                let y_source = tops[edge.source] + out_cursor[edge.source] + thickness / 2.0;
                out_cursor[edge.source] += thickness;
                let y_target = tops[edge.target] + in_cursor[edge.target] + thickness / 2.0;
                in_cursor[edge.target] += thickness;
                LinkRibbon {
                    source: edge.source,
                    target: edge.target,
                    y_source,
                    y_target,
                    thickness,
                }
            })
            .collect();

        Ok(FlowLayoutResult { nodes, links })
    }
}
