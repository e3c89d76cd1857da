//! Multi-level partition queries
//!
//! A partition assigns every node exactly one cell per level. Level 0 is the
//! graph itself (each node is its own cell); levels `1..num_levels()` are the
//! stored levels, coarser as the level increases.
//!
//! Two backends implement [`MultiLevelPartition`]:
//! - [`FlatPartition`]: one plain assignment array per level, for tests and tools
//! - [`PackedPartition`]: all levels of a node packed into one `u64`

mod flat;
mod packed;

pub use flat::FlatPartition;
pub use packed::PackedPartition;

use butterfly_common::{Error, Result};

use crate::types::{CellId, LevelId, NodeId, MAX_LEVELS};

/// Read-only lookup of a node's cell at every level of the hierarchy.
///
/// `cell` is a hot-path index: out-of-range levels or nodes are precondition
/// violations and panic rather than return an error.
pub trait MultiLevelPartition {
    /// Cell containing `node` at `level`. `cell(0, node) == node`.
    fn cell(&self, level: LevelId, node: NodeId) -> CellId;

    /// Coarsest level at which `first` and `second` are in different cells.
    ///
    /// Returns 0 when they share a cell at every stored level.
    fn highest_different_level(&self, first: NodeId, second: NodeId) -> LevelId;

    /// Number of levels, level 0 included
    fn num_levels(&self) -> usize;

    /// One more than the highest cell id at `level`
    fn num_cells(&self, level: LevelId) -> usize;

    fn num_nodes(&self) -> usize;
}

/// Check that cells nest: nodes sharing a cell at level L share a cell at L + 1.
pub fn check_nesting<P: MultiLevelPartition + ?Sized>(partition: &P) -> Result<()> {
    let n_nodes = partition.num_nodes();
    // Level 0 cells are single nodes and nest trivially
    for level in 1..partition.num_levels().saturating_sub(1) {
        let level = level as LevelId;
        let parent_level = level + 1;
        let mut parent_of: Vec<Option<CellId>> = vec![None; partition.num_cells(level)];

        for node in 0..n_nodes as NodeId {
            let cell = partition.cell(level, node);
            let parent = partition.cell(parent_level, node);
            match parent_of[cell as usize] {
                None => parent_of[cell as usize] = Some(parent),
                Some(first) if first != parent => {
                    return Err(Error::NestingViolation {
                        level,
                        cell,
                        parent_level,
                        first,
                        second: parent,
                    });
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Validate per-level assignment arrays and return the shared node count.
pub(crate) fn validate_levels(levels: &[Vec<CellId>]) -> Result<usize> {
    if levels.len() + 1 > MAX_LEVELS {
        return Err(Error::TooManyLevels(levels.len() + 1));
    }
    let n_nodes = levels.first().map(Vec::len).unwrap_or(0);
    for (idx, cells) in levels.iter().enumerate() {
        if cells.len() != n_nodes {
            return Err(Error::LevelLengthMismatch {
                level: (idx + 1) as LevelId,
                expected: n_nodes,
                actual: cells.len(),
            });
        }
    }
    Ok(n_nodes)
}

/// One more than the highest cell id in `cells`, 0 for an empty level
pub(crate) fn count_cells(cells: &[CellId]) -> usize {
    cells.iter().max().map_or(0, |&max| max as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twelve_node_levels() -> Vec<Vec<CellId>> {
        vec![
            vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5],
            vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 3, 3],
            vec![0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1],
            vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ]
    }

    #[test]
    fn test_nested_partition_passes() {
        let flat = FlatPartition::new(twelve_node_levels()).unwrap();
        check_nesting(&flat).unwrap();

        let packed = PackedPartition::new(twelve_node_levels()).unwrap();
        check_nesting(&packed).unwrap();
    }

    #[test]
    fn test_split_cell_is_rejected() {
        // Level-1 cell 1 (nodes 2, 3) is split across level-2 cells 0 and 1.
        let levels = vec![vec![0, 0, 1, 1, 2, 2], vec![0, 0, 0, 1, 1, 1]];
        let flat = FlatPartition::new(levels).unwrap();

        match check_nesting(&flat) {
            Err(Error::NestingViolation {
                level,
                cell,
                parent_level,
                first,
                second,
            }) => {
                assert_eq!((level, cell, parent_level), (1, 1, 2));
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("expected nesting violation, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_levels_rejects_ragged_input() {
        let levels = vec![vec![0, 0, 1], vec![0, 0]];
        assert!(matches!(
            validate_levels(&levels),
            Err(Error::LevelLengthMismatch {
                level: 2,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_count_cells() {
        assert_eq!(count_cells(&[]), 0);
        assert_eq!(count_cells(&[0, 0, 0]), 1);
        assert_eq!(count_cells(&[3, 0, 1]), 4);
    }
}
