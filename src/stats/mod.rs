//! Stats module - survey summaries fed to the renderer

mod aggregate;
mod flow;

pub use aggregate::{group_average, GroupAverage};
pub use flow::{build_support_flow, FlowEdge, FlowGraph, FlowGraphBuilder};

use crate::data::StudentRecord;

/// The three aggregated, sorted summaries the dashboard draws. The
/// renderer performs no further aggregation on these.
#[derive(Debug, Clone)]
pub struct SurveySummary {
    pub support_flow: FlowGraph,
    pub walc_by_age: Vec<GroupAverage>,
    pub walc_by_absences: Vec<GroupAverage>,
}

impl SurveySummary {
    /// One pass over the records per summary: the support flow graph,
    /// mean weekend alcohol use by age, and the same mean by absences.
    pub fn from_records(records: &[StudentRecord]) -> Self {
        Self {
            support_flow: build_support_flow(records),
            walc_by_age: group_average(records, |r| r.age, |r| r.walc as f64),
            walc_by_absences: group_average(records, |r| r.absences, |r| r.walc as f64),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.support_flow.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: i64, walc: i64, absences: i64) -> StudentRecord {
        StudentRecord {
            age,
            walc,
            g3: 12,
            absences,
            schoolsup: "yes".to_string(),
            famsup: "no".to_string(),
            higher: "yes".to_string(),
        }
    }

    #[test]
    fn summary_combines_all_three_aggregations() {
        let records = vec![record(18, 2, 0), record(18, 4, 2), record(19, 1, 0)];
        let summary = SurveySummary::from_records(&records);

        assert_eq!(summary.support_flow.total_flow(), 6);
        assert_eq!(
            summary.walc_by_age,
            vec![
                GroupAverage { key: 18, mean: 3.0 },
                GroupAverage { key: 19, mean: 1.0 },
            ]
        );
        assert_eq!(
            summary.walc_by_absences,
            vec![
                GroupAverage { key: 0, mean: 1.5 },
                GroupAverage { key: 2, mean: 4.0 },
            ]
        );
    }

    #[test]
    fn empty_records_make_an_empty_summary() {
        let summary = SurveySummary::from_records(&[]);
        assert!(summary.is_empty());
        assert!(summary.walc_by_age.is_empty());
        assert!(summary.walc_by_absences.is_empty());
    }
}
