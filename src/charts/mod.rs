//! Charts module - flow layout and dashboard rendering

mod dashboard;
mod layout;

pub use dashboard::{ChartError, DashboardRenderer};
pub use layout::{FlowLayout, FlowLayoutResult, LayoutError, LinkRibbon, NodeBox, SankeyLayout};
