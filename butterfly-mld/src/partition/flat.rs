//! Plain per-level assignment arrays

use butterfly_common::Result;

use super::{count_cells, validate_levels, MultiLevelPartition};
use crate::types::{CellId, LevelId, NodeId};

/// Partition backed by one `Vec<CellId>` per stored level.
///
/// `levels[0]` is level 1. Cell counts are derived on demand, which keeps
/// this type trivial to build in tests at the cost of an O(n) `num_cells`.
#[derive(Debug, Clone)]
pub struct FlatPartition {
    levels: Vec<Vec<CellId>>,
    n_nodes: usize,
}

impl FlatPartition {
    pub fn new(levels: Vec<Vec<CellId>>) -> Result<Self> {
        let n_nodes = validate_levels(&levels)?;
        Ok(Self { levels, n_nodes })
    }

    /// Assignment array of a stored level (`level >= 1`)
    pub fn level(&self, level: LevelId) -> &[CellId] {
        &self.levels[level as usize - 1]
    }

    pub fn into_levels(self) -> Vec<Vec<CellId>> {
        self.levels
    }
}

impl MultiLevelPartition for FlatPartition {
    #[inline]
    fn cell(&self, level: LevelId, node: NodeId) -> CellId {
        if level == 0 {
            return node;
        }
        self.levels[level as usize - 1][node as usize]
    }

    fn highest_different_level(&self, first: NodeId, second: NodeId) -> LevelId {
        for (idx, cells) in self.levels.iter().enumerate().rev() {
            if cells[first as usize] != cells[second as usize] {
                return (idx + 1) as LevelId;
            }
        }
        0
    }

    fn num_levels(&self) -> usize {
        self.levels.len() + 1
    }

    fn num_cells(&self, level: LevelId) -> usize {
        if level == 0 {
            return self.n_nodes;
        }
        count_cells(&self.levels[level as usize - 1])
    }

    fn num_nodes(&self) -> usize {
        self.n_nodes
    }
}
