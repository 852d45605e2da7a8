//! Outcome graph - in-memory matrix projection over two adjacent tiers.
//!
//! Edges are held as an adjacency map keyed by row id so "edges for this
//! row" is a single lookup instead of a scan over a flat key set.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OutcomeId;

use super::{Mapping, Outcome};

/// Which axis of the matrix an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

/// Per-outcome coverage figures for one axis entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCoverage {
    pub outcome_id: OutcomeId,
    pub code: String,
    /// Active mappings touching this outcome.
    pub mapped_count: usize,
    /// mapped_count / opposite-axis size, rounded to the nearest integer.
    pub coverage_percentage: u8,
}

/// Read projection of one mapping matrix: row and column outcomes plus
/// the active edge set between them.
#[derive(Debug, Clone)]
pub struct OutcomeGraph {
    rows: Vec<Outcome>,
    columns: Vec<Outcome>,
    /// Adjacency keyed by row outcome id.
    edges: HashMap<OutcomeId, HashSet<OutcomeId>>,
    edge_count: usize,
}

impl OutcomeGraph {
    /// Builds the projection from loaded outcomes and edges.
    ///
    /// Edges referencing ids outside the loaded axes are ignored; the
    /// store validates references on write, so stray edges only occur in
    /// historically inconsistent data and must not poison reads.
    pub fn new(rows: Vec<Outcome>, columns: Vec<Outcome>, mappings: Vec<Mapping>) -> Self {
        let row_ids: HashSet<OutcomeId> = rows.iter().map(|o| o.id).collect();
        let column_ids: HashSet<OutcomeId> = columns.iter().map(|o| o.id).collect();

        let mut edges: HashMap<OutcomeId, HashSet<OutcomeId>> = HashMap::new();
        let mut edge_count = 0;
        for mapping in mappings {
            if !row_ids.contains(&mapping.source) || !column_ids.contains(&mapping.target) {
                continue;
            }
            if edges.entry(mapping.source).or_default().insert(mapping.target) {
                edge_count += 1;
            }
        }

        Self {
            rows,
            columns,
            edges,
            edge_count,
        }
    }

    /// Row-axis outcomes in load order.
    pub fn rows(&self) -> &[Outcome] {
        &self.rows
    }

    /// Column-axis outcomes in load order.
    pub fn columns(&self) -> &[Outcome] {
        &self.columns
    }

    /// Whether an active edge connects the given row and column.
    pub fn contains(&self, row_id: OutcomeId, column_id: OutcomeId) -> bool {
        self.edges
            .get(&row_id)
            .is_some_and(|targets| targets.contains(&column_id))
    }

    /// All active edges, row-major.
    pub fn mappings(&self) -> Vec<Mapping> {
        let mut all: Vec<Mapping> = self
            .edges
            .iter()
            .flat_map(|(row, targets)| targets.iter().map(|col| Mapping::new(*row, *col)))
            .collect();
        all.sort_by_key(|m| (m.source, m.target));
        all
    }

    /// Total number of active edges.
    pub fn total_mappings(&self) -> usize {
        self.edge_count
    }

    /// Count of active mappings for one row.
    pub fn row_coverage(&self, row_id: OutcomeId) -> usize {
        self.edges.get(&row_id).map_or(0, HashSet::len)
    }

    /// Count of active mappings for one column.
    pub fn column_coverage(&self, column_id: OutcomeId) -> usize {
        self.edges
            .values()
            .filter(|targets| targets.contains(&column_id))
            .count()
    }

    /// Coverage as a display percentage, rounded to the nearest integer.
    ///
    /// # Edge Cases
    /// - Empty opposite axis: defined as 0, never a division by zero
    pub fn coverage_percentage(&self, id: OutcomeId, axis: Axis) -> u8 {
        let (count, opposite_len) = match axis {
            Axis::Row => (self.row_coverage(id), self.columns.len()),
            Axis::Column => (self.column_coverage(id), self.rows.len()),
        };
        if opposite_len == 0 {
            return 0;
        }
        ((count as f64 / opposite_len as f64) * 100.0).round() as u8
    }

    /// Coverage figures for every row.
    pub fn per_row_coverage(&self) -> Vec<MatrixCoverage> {
        self.rows
            .iter()
            .map(|o| MatrixCoverage {
                outcome_id: o.id,
                code: o.code.clone(),
                mapped_count: self.row_coverage(o.id),
                coverage_percentage: self.coverage_percentage(o.id, Axis::Row),
            })
            .collect()
    }

    /// Coverage figures for every column.
    pub fn per_column_coverage(&self) -> Vec<MatrixCoverage> {
        self.columns
            .iter()
            .map(|o| MatrixCoverage {
                outcome_id: o.id,
                code: o.code.clone(),
                mapped_count: self.column_coverage(o.id),
                coverage_percentage: self.coverage_percentage(o.id, Axis::Column),
            })
            .collect()
    }
}
